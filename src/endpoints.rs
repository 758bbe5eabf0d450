//! CRM base URLs and endpoint paths.

pub const UPNIFY_BASE_URL: &str = "https://api.upnify.com";
/// Integration-token logins are served by the SalesUp host
pub const SALESUP_BASE_URL: &str = "https://api.salesup.com";

pub const INTEGRATION_LOGIN: &str = "/integraciones/sesion";
pub const PASSWORD_LOGIN: &str = "/v4/login";

pub const PROSPECTS: &str = "/v4/prospectos";
pub const OPPORTUNITIES: &str = "/v4/oportunidades";
pub const PHASES: &str = "/catalogos/fases";
pub const SEARCH: &str = "/v4/sistema/buscar";
pub const REMINDERS: &str = "/v4/agenda/recordatorios";

pub const SALES_REPORT: &str = "/v4/reportesnv/ventas/realizadas";
pub const PENDING_PAYMENTS_REPORT: &str = "/v4/reportesnv/clientes/cobrospendientes";
pub const ACTIVITY_REPORT: &str = "/v4/reportesnv/actividades/porperiodo";
pub const CONVERSION_REPORT: &str = "/v4/reportesnv/ventas/conversiones";
