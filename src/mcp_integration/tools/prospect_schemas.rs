//! Prospect tool schema definitions
//!
//! **Tools**:
//! - [`create_prospect_tool`] - Prospect creation with default phase resolution
//! - [`get_phases_tool`] - Prospect phase catalog
//! - [`search_contacts_tool`] - Free-text search over prospects and clients

use super::tool;
use serde_json::{Value, json};

fn text(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

/// Schema definition for prospect creation
pub fn create_prospect_tool() -> Value {
    tool(
        "create-upnify-prospect",
        "Create a new prospect (sales lead) in Upnify",
        json!({
            "nombre": text("First name"),
            "correo": text("Email address"),
            "apellidos": text("Last name"),
            "sexo": {
                "type": "string",
                "description": "Gender: H = male, M = female",
                "enum": ["H", "M"],
                "default": "H"
            },
            "telefono": text("Phone number"),
            "movil": text("Mobile number"),
            "puesto": text("Job title"),
            "empresa": text("Company name"),
            "ciudad": text("City"),
            "idPais": {
                "type": "string",
                "description": "Country code (MX, US, CO, ...)",
                "default": "MX"
            },
            "calle": text("Street"),
            "colonia": text("Neighborhood"),
            "codigoPostal": text("Postal code"),
            "tkFase": text("Phase token. Defaults to the first phase of the tenant's catalog")
        }),
        &["nombre", "correo"],
    )
}

/// Schema definition for the phase catalog
pub fn get_phases_tool() -> Value {
    tool(
        "get-upnify-phases",
        "List the prospect phases configured for the tenant",
        json!({}),
        &[],
    )
}

/// Schema definition for contact search
pub fn search_contacts_tool() -> Value {
    tool(
        "search-upnify-contacts",
        "Search prospects and clients by name, email or phone. Use the tkProspecto of a \
         result to create an opportunity",
        json!({
            "buscar": text("Search term"),
            "cantidadRegistros": {
                "type": "integer",
                "description": "Maximum number of results",
                "minimum": 1,
                "maximum": 100,
                "default": 10
            }
        }),
        &["buscar"],
    )
}
