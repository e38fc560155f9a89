/// Municipality registry for the forecast endpoints.
///
/// AEMET's municipal forecast API is keyed by INE code, not by name. This
/// module is the single source of truth for the municipalities the service
/// knows about; everything else looks names up here rather than hardcoding
/// codes.

// ---------------------------------------------------------------------------
// Municipality metadata
// ---------------------------------------------------------------------------

/// One municipality known to the forecast collector.
pub struct Municipality {
    /// Display name, also the key callers use.
    pub name: &'static str,
    /// 5-digit INE code (2-digit province + 3-digit municipality).
    pub ine_code: &'static str,
    pub province: &'static str,
}

/// Municipalities of the province of Cádiz, alphabetical.
pub static MUNICIPALITY_REGISTRY: &[Municipality] = &[
    Municipality { name: "Algeciras", ine_code: "11004", province: "Cádiz" },
    Municipality { name: "Arcos de la Frontera", ine_code: "11006", province: "Cádiz" },
    Municipality { name: "Barbate", ine_code: "11007", province: "Cádiz" },
    Municipality { name: "Cádiz (capital)", ine_code: "11012", province: "Cádiz" },
    Municipality { name: "Chiclana de la Frontera", ine_code: "11015", province: "Cádiz" },
    Municipality { name: "Chipiona", ine_code: "11016", province: "Cádiz" },
    Municipality { name: "Conil de la Frontera", ine_code: "11014", province: "Cádiz" },
    Municipality { name: "El Puerto de Santa María", ine_code: "11027", province: "Cádiz" },
    Municipality { name: "Espera", ine_code: "11017", province: "Cádiz" },
    Municipality { name: "Grazalema", ine_code: "11019", province: "Cádiz" },
    Municipality { name: "Jerez de la Frontera", ine_code: "11020", province: "Cádiz" },
    Municipality { name: "Jimena de la Frontera", ine_code: "11021", province: "Cádiz" },
    Municipality { name: "La Línea de la Concepción", ine_code: "11022", province: "Cádiz" },
    Municipality { name: "Los Barrios", ine_code: "11008", province: "Cádiz" },
    Municipality { name: "Medina-Sidonia", ine_code: "11023", province: "Cádiz" },
    Municipality { name: "Olvera", ine_code: "11024", province: "Cádiz" },
    Municipality { name: "Prado del Rey", ine_code: "11026", province: "Cádiz" },
    Municipality { name: "Puerto Real", ine_code: "11028", province: "Cádiz" },
    Municipality { name: "Rota", ine_code: "11030", province: "Cádiz" },
    Municipality { name: "San Fernando", ine_code: "11031", province: "Cádiz" },
    Municipality { name: "San Roque", ine_code: "11033", province: "Cádiz" },
    Municipality { name: "Sanlúcar de Barrameda", ine_code: "11034", province: "Cádiz" },
    Municipality { name: "Tarifa", ine_code: "11035", province: "Cádiz" },
    Municipality { name: "Ubrique", ine_code: "11038", province: "Cádiz" },
    Municipality { name: "Vejer de la Frontera", ine_code: "11039", province: "Cádiz" },
];

/// Looks up a municipality by display name. Returns `None` if not found.
pub fn find_municipality(name: &str) -> Option<&'static Municipality> {
    MUNICIPALITY_REGISTRY.iter().find(|m| m.name == name)
}

/// INE code for a display name, as the forecast endpoint expects it.
pub fn find_code(name: &str) -> Option<&'static str> {
    find_municipality(name).map(|m| m.ine_code)
}

/// All registry names, in registry order.
pub fn all_names() -> Vec<&'static str> {
    MUNICIPALITY_REGISTRY.iter().map(|m| m.name).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
