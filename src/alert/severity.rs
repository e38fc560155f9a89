//! Severity classification.
//!
//! Maps each source's native notion of severity onto the four canonical
//! levels. CAP tokens go through a lookup table; seismic magnitudes go
//! through ascending thresholds. Neither path can fail: anything the
//! tables do not recognise lands on `Yellow` (CAP) or `Green` (magnitude
//! below every threshold).

use crate::model::Severity;

/// CAP 1.2 `<severity>` tokens and their canonical level.
/// `Unknown` is listed explicitly; unlisted tokens get the same fallback.
pub static CAP_SEVERITY_MAP: &[(&str, Severity)] = &[
    ("Extreme", Severity::Red),
    ("Severe", Severity::Orange),
    ("Moderate", Severity::Yellow),
    ("Minor", Severity::Green),
    ("Unknown", Severity::Yellow),
];

/// Level assigned to missing or unrecognised CAP severity tokens.
pub const DEFAULT_CAP_SEVERITY: Severity = Severity::Yellow;

/// Lower bounds (inclusive) of each seismic tier, most severe first.
///
///   m >= 5.5  →  red     significant damage
///   m >= 4.0  →  orange  moderate damage
///   m >= 2.5  →  yellow  felt, minor damage
///   otherwise →  green   generally not felt
pub static SEISMIC_THRESHOLDS: &[(f64, Severity)] = &[
    (5.5, Severity::Red),
    (4.0, Severity::Orange),
    (2.5, Severity::Yellow),
];

/// Classifies a CAP severity token using the default table.
pub fn classify_cap_severity(token: Option<&str>) -> Severity {
    classify_cap_severity_with(token, CAP_SEVERITY_MAP)
}

/// Classifies a CAP severity token against a caller-supplied table.
///
/// Matching is exact after trimming, as CAP tokens are an enumerated set.
pub fn classify_cap_severity_with(token: Option<&str>, table: &[(&str, Severity)]) -> Severity {
    let Some(token) = token.map(str::trim) else {
        return DEFAULT_CAP_SEVERITY;
    };
    table
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, severity)| *severity)
        .unwrap_or(DEFAULT_CAP_SEVERITY)
}

/// Classifies an earthquake by magnitude. Tier boundaries are inclusive on
/// the lower end.
pub fn classify_seismic_severity(magnitude: f64) -> Severity {
    SEISMIC_THRESHOLDS
        .iter()
        .find(|(lower, _)| magnitude >= *lower)
        .map(|(_, severity)| *severity)
        .unwrap_or(Severity::Green)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
