/// Region and zone text normalization.
///
/// IGN labels earthquakes with terse upper-case region strings such as
/// `"S GAUCÍN.MA"` (a compass prefix, a place, and a licence-plate style
/// province code) and AEMET zone descriptions are free Spanish text. This
/// module holds the lookup tables for both and the functions that turn them
/// into readable names or province lists.
///
/// The tables are plain immutable data. Parsers take a `&RegionTables` so
/// tests can substitute their own.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::municipalities::MUNICIPALITY_REGISTRY;

// ---------------------------------------------------------------------------
// Code tables
// ---------------------------------------------------------------------------

/// Province codes (vehicle registration letters) used by IGN.
pub static PROVINCE_CODES: &[(&str, &str)] = &[
    ("A", "Alicante"), ("AB", "Albacete"), ("AL", "Almería"),
    ("AV", "Ávila"), ("B", "Barcelona"), ("BA", "Badajoz"),
    ("BI", "Vizcaya"), ("BU", "Burgos"), ("C", "A Coruña"),
    ("CA", "Cádiz"), ("CC", "Cáceres"), ("CE", "Ceuta"),
    ("CO", "Córdoba"), ("CR", "Ciudad Real"), ("CS", "Castellón"),
    ("CU", "Cuenca"), ("GC", "Las Palmas"), ("GI", "Girona"),
    ("GR", "Granada"), ("GU", "Guadalajara"), ("H", "Huelva"),
    ("HU", "Huesca"), ("IB", "Illes Balears"), ("J", "Jaén"),
    ("L", "Lleida"), ("LE", "León"), ("LO", "La Rioja"),
    ("LU", "Lugo"), ("M", "Madrid"), ("MA", "Málaga"),
    ("ML", "Melilla"), ("MU", "Murcia"), ("NA", "Navarra"),
    ("O", "Asturias"), ("OR", "Ourense"), ("P", "Palencia"),
    ("PO", "Pontevedra"), ("S", "Cantabria"), ("SA", "Salamanca"),
    ("SE", "Sevilla"), ("SG", "Segovia"), ("SO", "Soria"),
    ("SS", "Guipúzcoa"), ("T", "Tarragona"), ("TE", "Teruel"),
    ("TF", "Sta. Cruz de Tenerife"), ("TO", "Toledo"),
    ("V", "Valencia"), ("VA", "Valladolid"), ("VI", "Álava"),
    ("Z", "Zaragoza"), ("ZA", "Zamora"),
];

/// English compass abbreviations used by IGN and their Spanish names.
pub static DIRECTION_NAMES: &[(&str, &str)] = &[
    ("N", "Norte"), ("S", "Sur"), ("E", "Este"), ("W", "Oeste"),
    ("NW", "Noroeste"), ("NE", "Noreste"),
    ("SW", "Suroeste"), ("SE", "Sureste"),
];

/// Articles and prepositions kept lowercase unless they open the name.
pub static LOWERCASE_WORDS: &[&str] = &["de", "del", "la", "el", "las", "los", "en"];

/// Keywords that identify a province inside an AEMET zone description.
pub static PROVINCE_KEYWORDS: &[(&str, &[&str])] = &[
    ("A Coruña", &["Coruña"]),
    ("Álava", &["Álava", "Araba"]),
    ("Albacete", &["Albacete"]),
    ("Alicante", &["Alicante", "Alacant"]),
    ("Almería", &["Almería"]),
    ("Asturias", &["Asturias"]),
    ("Ávila", &["Ávila"]),
    ("Badajoz", &["Badajoz"]),
    ("Barcelona", &["Barcelona"]),
    ("Bizkaia", &["Bizkaia", "Vizcaya"]),
    ("Burgos", &["Burgos"]),
    ("Cáceres", &["Cáceres"]),
    ("Cádiz", &["Cádiz"]),
    ("Cantabria", &["Cantabria"]),
    ("Castellón", &["Castellón", "Castelló"]),
    ("Ceuta", &["Ceuta"]),
    ("Ciudad Real", &["Ciudad Real"]),
    ("Córdoba", &["Córdoba"]),
    ("Cuenca", &["Cuenca"]),
    ("Gipuzkoa", &["Gipuzkoa", "Guipúzcoa"]),
    ("Girona", &["Girona", "Gerona"]),
    ("Granada", &["Granada"]),
    ("Guadalajara", &["Guadalajara"]),
    ("Huelva", &["Huelva"]),
    ("Huesca", &["Huesca", "oscense"]),
    ("Illes Balears", &["Balears", "Baleares", "Mallorca", "Menorca", "Ibiza", "Eivissa", "Formentera"]),
    ("Jaén", &["Jaén"]),
    ("León", &["León"]),
    ("Lleida", &["Lleida", "Lérida"]),
    ("Lugo", &["Lugo"]),
    ("Madrid", &["Madrid"]),
    ("Málaga", &["Málaga"]),
    ("Melilla", &["Melilla"]),
    ("Murcia", &["Murcia"]),
    ("Navarra", &["Navarra", "Nafarroa"]),
    ("Ourense", &["Ourense", "Orense"]),
    ("Palencia", &["Palencia"]),
    ("Las Palmas", &["Las Palmas", "Gran Canaria", "Lanzarote", "Fuerteventura"]),
    ("Pontevedra", &["Pontevedra"]),
    ("La Rioja", &["Rioja"]),
    ("Salamanca", &["Salamanca"]),
    ("S.C. Tenerife", &["Tenerife", "La Palma", "La Gomera", "El Hierro"]),
    ("Segovia", &["Segovia"]),
    ("Sevilla", &["Sevilla"]),
    ("Soria", &["Soria"]),
    ("Tarragona", &["Tarragona"]),
    ("Teruel", &["Teruel"]),
    ("Toledo", &["Toledo"]),
    ("Valencia", &["Valencia", "València"]),
    ("Valladolid", &["Valladolid"]),
    ("Zamora", &["Zamora"]),
    ("Zaragoza", &["Zaragoza"]),
];

/// Lowercase markers of an Andalusian zone description.
pub static ANDALUSIAN_MARKERS: &[&str] = &[
    "almería", "cádiz", "córdoba", "granada", "huelva",
    "jaén", "málaga", "sevilla", "andalucía",
];

/// The lookup tables a region formatter needs.
#[derive(Debug, Clone, Copy)]
pub struct RegionTables {
    pub province_codes: &'static [(&'static str, &'static str)],
    pub directions: &'static [(&'static str, &'static str)],
}

impl RegionTables {
    /// IGN's Spanish province codes and compass abbreviations.
    pub const SPAIN: RegionTables = RegionTables {
        province_codes: PROVINCE_CODES,
        directions: DIRECTION_NAMES,
    };

    pub fn province_name(&self, code: &str) -> Option<&'static str> {
        lookup(self.province_codes, code)
    }

    pub fn direction_name(&self, abbreviation: &str) -> Option<&'static str> {
        lookup(self.directions, abbreviation)
    }
}

impl Default for RegionTables {
    fn default() -> Self {
        RegionTables::SPAIN
    }
}

fn lookup(table: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

// ---------------------------------------------------------------------------
// IGN region strings
// ---------------------------------------------------------------------------

static DIRECTION_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(NW|NE|SW|SE|N|S|E|W)\s+(.+)$").expect("direction prefix regex must compile")
});

static PROVINCE_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+)\.([A-Z]{1,3})$").expect("province suffix regex must compile")
});

/// Splits a leading compass token off an IGN region.
/// `"S GAUCÍN.MA"` → `(Some("S"), "GAUCÍN.MA")`.
pub fn split_direction(raw: &str) -> (Option<&str>, &str) {
    match DIRECTION_PREFIX.captures(raw) {
        Some(caps) => match (caps.get(1), caps.get(2)) {
            (Some(dir), Some(body)) => (Some(dir.as_str()), body.as_str()),
            _ => (None, raw),
        },
        None => (None, raw),
    }
}

/// Splits a trailing `.<CODE>` off a region body.
/// `"GAUCÍN.MA"` → `Some(("GAUCÍN", "MA"))`.
pub fn split_province_code(body: &str) -> Option<(&str, &str)> {
    let caps = PROVINCE_SUFFIX.captures(body)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Returns `true` for regions inside Spain or its monitored seas.
///
/// A region with a `.<CODE>` suffix qualifies only when the code is a known
/// province; foreign epicentres carry country codes (`.MAC`, `.ARG`...).
/// Regions with no suffix, including hyphenated maritime zones such as
/// `"ATLÁNTICO-GALICIA"`, are kept.
pub fn is_spanish_region(raw: &str, tables: &RegionTables) -> bool {
    let (_, body) = split_direction(raw.trim());
    match split_province_code(body) {
        Some((_, code)) => tables.province_name(code).is_some(),
        None => true,
    }
}

/// Turns an IGN region into display text.
///
/// ```text
/// "S GAUCÍN.MA"        → "Sur de Gaucín, Málaga"
/// "ATLÁNTICO-GALICIA"  → "Atlántico-Galicia"
/// "GOLFO DE CÁDIZ"     → "Golfo de Cádiz"
/// ```
pub fn format_region(raw: &str, tables: &RegionTables) -> String {
    let (direction, body) = split_direction(raw.trim());
    let prefix = direction
        .map(|d| format!("{} de ", tables.direction_name(d).unwrap_or(d)))
        .unwrap_or_default();

    if let Some((location, code)) = split_province_code(body) {
        let province = tables.province_name(code).unwrap_or(code);
        return format!("{}{}, {}", prefix, title_case_es(location), province);
    }

    if body.contains('-') {
        let segments: Vec<String> = body.split('-').map(title_case_es).collect();
        return format!("{}{}", prefix, segments.join("-"));
    }

    format!("{}{}", prefix, title_case_es(body))
}

/// Spanish title case: every word capitalized except articles and
/// prepositions after the first word.
pub fn title_case_es(text: &str) -> String {
    let mut capitalized = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.to_lowercase().chars() {
        if at_word_start && c.is_alphabetic() {
            capitalized.extend(c.to_uppercase());
        } else {
            capitalized.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '\'');
    }

    capitalized
        .split(' ')
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i > 0 && LOWERCASE_WORDS.contains(&lower.as_str()) {
                lower
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// AEMET zone descriptions
// ---------------------------------------------------------------------------

/// Provinces mentioned in a zone description, restricted to `allowed`.
///
/// Matching is a case-insensitive substring search over each province's
/// keywords, so `"Litoral gaditano y Campiña de Cádiz"` yields `Cádiz`.
pub fn extract_provinces(area: &str, allowed: &[String]) -> Vec<&'static str> {
    let haystack = area.to_lowercase();
    PROVINCE_KEYWORDS
        .iter()
        .filter(|(province, _)| allowed.iter().any(|a| a == province))
        .filter(|(_, keywords)| {
            keywords
                .iter()
                .any(|k| haystack.contains(&k.to_lowercase()))
        })
        .map(|(province, _)| *province)
        .collect()
}

/// Registry municipalities mentioned in a zone description.
/// `"Cádiz (capital)"` matches on `"Cádiz"` alone.
pub fn extract_municipalities(area: &str) -> Vec<&'static str> {
    let haystack = area.to_lowercase();
    MUNICIPALITY_REGISTRY
        .iter()
        .filter(|m| {
            let bare = m.name.trim_end_matches(" (capital)").to_lowercase();
            haystack.contains(&bare)
        })
        .map(|m| m.name)
        .collect()
}

/// Whether a zone description names an Andalusian province or the region.
pub fn is_andalusian(area: &str) -> bool {
    let haystack = area.to_lowercase();
    ANDALUSIAN_MARKERS.iter().any(|m| haystack.contains(m))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        ["Cádiz", "Huelva", "Sevilla", "Málaga"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_no_duplicate_province_codes() {
        let mut seen = std::collections::HashSet::new();
        for (code, _) in PROVINCE_CODES {
            assert!(seen.insert(code), "duplicate province code '{}'", code);
        }
    }

    #[test]
    fn test_province_codes_are_one_to_three_uppercase_letters() {
        // The suffix regex only recognises [A-Z]{1,3}; a longer code would
        // never be looked up.
        for (code, name) in PROVINCE_CODES {
            assert!(
                (1..=3).contains(&code.len()) && code.chars().all(|c| c.is_ascii_uppercase()),
                "code '{}' for '{}' is not 1-3 uppercase letters",
                code,
                name
            );
        }
    }

    #[test]
    fn test_format_region_with_direction_and_province() {
        let tables = RegionTables::SPAIN;
        assert_eq!(format_region("S GAUCÍN.MA", &tables), "Sur de Gaucín, Málaga");
        assert_eq!(format_region("NW ARCOS DE LA FRONTERA.CA", &tables),
            "Noroeste de Arcos de la Frontera, Cádiz");
    }

    #[test]
    fn test_format_region_without_direction() {
        let tables = RegionTables::SPAIN;
        assert_eq!(format_region("LORCA.MU", &tables), "Lorca, Murcia");
        assert_eq!(format_region("GOLFO DE CÁDIZ", &tables), "Golfo de Cádiz");
    }

    #[test]
    fn test_format_region_maritime_zone_keeps_hyphen() {
        let tables = RegionTables::SPAIN;
        assert_eq!(format_region("ATLÁNTICO-GALICIA", &tables), "Atlántico-Galicia");
        assert_eq!(format_region("SW CABO DE SAN VICENTE-ALGARVE", &tables),
            "Suroeste de Cabo de San Vicente-Algarve");
    }

    #[test]
    fn test_format_region_unknown_code_is_kept_verbatim() {
        let tables = RegionTables::SPAIN;
        assert_eq!(format_region("RABAT.MAC", &tables), "Rabat, MAC");
    }

    #[test]
    fn test_direction_token_needs_whitespace() {
        // "SEVILLA" starts with "SE" but is not a direction prefix.
        assert_eq!(split_direction("SEVILLA"), (None, "SEVILLA"));
        assert_eq!(split_direction("NE OLVERA.CA"), (Some("NE"), "OLVERA.CA"));
    }

    #[test]
    fn test_spanish_region_filter() {
        let tables = RegionTables::SPAIN;
        assert!(is_spanish_region("S GAUCÍN.MA", &tables));
        assert!(is_spanish_region("ATLÁNTICO-GALICIA", &tables));
        assert!(is_spanish_region("ALBORÁN SUR", &tables));
        assert!(!is_spanish_region("NE RABAT.MAC", &tables));
        assert!(!is_spanish_region("AZORES.POR", &tables));
    }

    #[test]
    fn test_substitute_tables_change_the_filter() {
        static ONLY_CADIZ: &[(&str, &str)] = &[("CA", "Cádiz")];
        let tables = RegionTables { province_codes: ONLY_CADIZ, directions: DIRECTION_NAMES };
        assert!(is_spanish_region("ROTA.CA", &tables));
        assert!(!is_spanish_region("GAUCÍN.MA", &tables));
    }

    #[test]
    fn test_title_case_lowercases_articles_after_first_word() {
        assert_eq!(title_case_es("LA LÍNEA DE LA CONCEPCIÓN"), "La Línea de la Concepción");
        assert_eq!(title_case_es("EL PUERTO DE SANTA MARÍA"), "El Puerto de Santa María");
        assert_eq!(title_case_es("ISLAS DEL PACÍFICO EN LOS MARES"), "Islas del Pacífico en los Mares");
    }

    #[test]
    fn test_extract_provinces_respects_allowed_list() {
        let provinces = extract_provinces("Litoral gaditano; Campiña de Cádiz; Córdoba", &allowed());
        assert_eq!(provinces, vec!["Cádiz"]);
    }

    #[test]
    fn test_extract_provinces_is_case_insensitive() {
        let provinces = extract_provinces("SIERRA DE HUELVA y costa de málaga", &allowed());
        assert_eq!(provinces, vec!["Huelva", "Málaga"]);
    }

    #[test]
    fn test_extract_municipalities_ignores_capital_suffix() {
        let found = extract_municipalities("Bahía de Cádiz y Chipiona");
        assert!(found.contains(&"Cádiz (capital)"));
        assert!(found.contains(&"Chipiona"));
        assert!(!found.contains(&"Rota"));
    }

    #[test]
    fn test_is_andalusian() {
        assert!(is_andalusian("Campiña sevillana; Sierra de Sevilla"));
        assert!(is_andalusian("Litoral de ALMERÍA"));
        assert!(!is_andalusian("Pirineo oscense"));
    }
}
