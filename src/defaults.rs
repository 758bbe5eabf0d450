//! Field defaults and tenant classification tokens.
//!
//! The CRM requires several classification tokens on every create call. For a given
//! integration tenant they are effectively constants, so callers may omit them.

/// Country injected when a prospect has none
pub const COUNTRY: &str = "MX";
/// Gender code injected when a prospect has none (`H` male, `M` female)
pub const GENDER: &str = "H";
/// Dialing prefix sent with both prospect phone numbers
pub const PHONE_PREFIX: &str = "+52";

/// Prospect phase used when the phase catalog cannot be read
pub const PROSPECT_PHASE_TOKEN: &str = "PFAS-AF9C06CD-A4B2-4A68-8383-241935B40E37";
pub const OPPORTUNITY_PHASE_TOKEN: &str = "OFAS-F2481C74-02F3-435D-A139-A90EDC05E2E9";
pub const PRODUCT_LINE_TOKEN: &str = "LINP-E302A7F3-C8CD-489B-B9BF-67412CB62D37";
pub const CURRENCY_TOKEN: &str = "MON-ED434B3A-A165-4215-94E5-577327C2EF5E";
pub const CERTAINTY_TOKEN: &str = "CER-42A55CB2-776D-49BC-9AAF-185561FBE167";

/// Days added to today for an opportunity's estimated close date
pub const ESTIMATED_CLOSE_DAYS: i64 = 30;

pub const SEARCH_LIMIT: u32 = 10;
pub const SEARCH_LIMIT_MAX: u32 = 100;
/// Sections requested from the search endpoint (leading comma is expected by the CRM)
pub const SEARCH_SECTIONS: &str = ",prospectos,clientes";

pub const USER_AGENT: &str = "UpnifyMCP/1.0";

/// Human-readable labels for report query codes.
pub mod labels {
    /// Grouping codes for sales and pending-payment reports
    pub const SALES_GROUPING: &[(u32, &str)] = &[
        (1, "By executive"),
        (2, "By group"),
        (3, "By line"),
        (17, "By industry"),
        (4, "By origin"),
        (5, "By country"),
        (6, "By region"),
    ];

    pub const ACTIVITY_GROUPING: &[(u32, &str)] = &[(1, "By executive"), (2, "By group")];

    pub const CONVERSION_GROUPING: &[(u32, &str)] = &[
        (1, "By executive"),
        (2, "By group"),
        (3, "By origin"),
        (4, "By region"),
    ];

    pub const PERIODICITY: &[(u32, &str)] = &[
        (1, "Semiannual"),
        (2, "Quarterly"),
        (3, "Bimonthly"),
        (4, "Monthly"),
        (5, "Biweekly"),
        (6, "Weekly"),
    ];

    pub const PERIOD: &[(u32, &str)] = &[
        (1, "Today"),
        (2, "Yesterday"),
        (3, "Current week"),
        (4, "Last week"),
        (5, "Current month"),
        (6, "Last month"),
        (8, "Current year"),
        (10, "Last year"),
        (13, "Current semester"),
        (14, "Last semester"),
        (17, "Current quarter"),
        (18, "Last quarter"),
    ];

    /// Render `code (label)`, or `code (Unknown)` for codes outside the table.
    pub fn describe(code: u32, table: &[(u32, &str)]) -> String {
        let label = table
            .iter()
            .find(|(candidate, _)| *candidate == code)
            .map(|(_, label)| *label)
            .unwrap_or("Unknown");
        format!("{code} ({label})")
    }

}
