use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Display metadata for a competition the dashboard knows about. Upstream
/// returns far more competitions than these; everything else is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct League {
    pub name: &'static str,
    pub country: &'static str,
}

pub const DEFAULT_CODE: &str = "PL";

const fn league(name: &'static str, country: &'static str) -> League {
    League { name, country }
}

static LEAGUE_TABLE: &[(&str, League)] = &[
    // Europe
    ("PL", league("Premier League", "England")),
    ("ELC", league("Championship", "England")),
    ("PD", league("La Liga", "Spain")),
    ("SD", league("Segunda División", "Spain")),
    ("BL1", league("Bundesliga", "Germany")),
    ("BL2", league("2. Bundesliga", "Germany")),
    ("SA", league("Serie A", "Italy")),
    ("SB", league("Serie B", "Italy")),
    ("FL1", league("Ligue 1", "France")),
    ("FL2", league("Ligue 2", "France")),
    ("PPL", league("Primeira Liga", "Portugal")),
    ("DED", league("Eredivisie", "Netherlands")),
    ("CL", league("Champions League", "Europe")),
    ("EL", league("Europa League", "Europe")),
    ("ECL", league("Conference League", "Europe")),
    ("EC", league("European Championship", "Europe")),
    // South America
    ("BSA", league("Brasileirão", "Brazil")),
    ("CLI", league("Copa Libertadores", "South America")),
    ("CSA", league("Copa Sudamericana", "South America")),
    ("AG", league("Liga Profesional", "Argentina")),
    ("APD", league("Primera División", "Peru")),
    // North America
    ("MLS", league("Major League Soccer", "USA/Canada")),
    ("LMX", league("Liga MX", "Mexico")),
    // Asia & Oceania
    ("AAL", league("A-League", "Australia")),
    ("JPL", league("J1 League", "Japan")),
    ("K1", league("K League 1", "South Korea")),
    ("CSL", league("Super League", "China")),
    // Africa
    ("ACL", league("CAF Champions League", "Africa")),
    // International
    ("WC", league("World Cup", "International")),
    ("FIFA", league("International Friendlies", "International")),
];

static BY_CODE: Lazy<HashMap<&'static str, League>> =
    Lazy::new(|| LEAGUE_TABLE.iter().copied().collect());

pub fn get(code: &str) -> Option<League> {
    BY_CODE.get(code).copied()
}

pub fn contains(code: &str) -> bool {
    BY_CODE.contains_key(code)
}

/// Resolve a user-supplied league code; absent or unrecognized codes fall
/// back to [`DEFAULT_CODE`] silently.
pub fn normalize(code: Option<&str>) -> &str {
    match code {
        Some(code) if contains(code) => code,
        _ => DEFAULT_CODE,
    }
}

/// Every known league in catalog order, for navigation menus.
pub fn all() -> &'static [(&'static str, League)] {
    LEAGUE_TABLE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve() {
        let pl = get("PL").expect("PL should be in the catalog");
        assert_eq!(pl.name, "Premier League");
        assert_eq!(pl.country, "England");
        assert!(contains("WC"));
        assert!(!contains("XX"));
    }

    #[test]
    fn normalize_falls_back_to_default() {
        assert_eq!(normalize(Some("SA")), "SA");
        assert_eq!(normalize(Some("ZZ")), DEFAULT_CODE);
        assert_eq!(normalize(Some("")), DEFAULT_CODE);
        assert_eq!(normalize(None), DEFAULT_CODE);
    }

    #[test]
    fn catalog_has_no_duplicate_codes() {
        assert_eq!(BY_CODE.len(), LEAGUE_TABLE.len());
    }
}
