/// Alert, HourlyForecast, DailyForecast, MunicipalityForecast, IngestError
/// core data structures and error handling
///
/// Canonical records for the AUXIO civil-protection feed.
///
/// Every source parser (CAP bulletins, the IGN seismic feed, AEMET municipal
/// forecasts) produces these types and nothing else. The module holds no
/// parsing logic and no I/O, only types and the display lookups renderers
/// need.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Canonical alert level, ordered most severe first so that an ascending
/// sort puts red alerts at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Red,
    Orange,
    Yellow,
    Green,
}

impl Severity {
    /// All levels, red → green.
    pub const ALL: [Severity; 4] = [
        Severity::Red,
        Severity::Orange,
        Severity::Yellow,
        Severity::Green,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Red => "red",
            Severity::Orange => "orange",
            Severity::Yellow => "yellow",
            Severity::Green => "green",
        }
    }

    /// Spanish label shown next to the alert.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Red => "Rojo",
            Severity::Orange => "Naranja",
            Severity::Yellow => "Amarillo",
            Severity::Green => "Verde",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Severity::Red => "🔴",
            Severity::Orange => "🟠",
            Severity::Yellow => "🟡",
            Severity::Green => "✅",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Alert
// ---------------------------------------------------------------------------

/// Which upstream produced an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSource {
    /// AEMET CAP bulletins.
    Meteorological,
    /// IGN GeoRSS earthquake feed.
    Seismic,
}

impl AlertSource {
    pub fn label(&self) -> &'static str {
        match self {
            AlertSource::Meteorological => "Meteorología (AEMET)",
            AlertSource::Seismic => "Sismología (IGN)",
        }
    }
}

/// A canonical emergency notice.
///
/// `area` is a `"; "`-joined, order-preserving, duplicate-free list of zone
/// names. Only the deduplicator mutates an alert after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub source: AlertSource,
    pub severity: Severity,
    pub headline: String,
    pub description: String,
    pub area: Option<String>,
    pub event_type: Option<String>,
    pub onset: Option<String>,
    pub expires: Option<String>,
    pub certainty: Option<String>,
    pub urgency: Option<String>,
    pub sender: Option<String>,
    pub web: Option<String>,
}

impl Alert {
    /// Splits `area` back into its zone names. Empty when there is no area.
    pub fn zones(&self) -> Vec<&str> {
        split_zones(self.area.as_deref().unwrap_or(""))
    }
}

/// Splits a `"; "`-joined zone list, trimming and dropping empty entries.
pub fn split_zones(area: &str) -> Vec<&str> {
    area.split(';')
        .map(str::trim)
        .filter(|z| !z.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Forecast types
// ---------------------------------------------------------------------------

/// One forecast hour for one municipality.
///
/// `precip_amount` is `None` whenever `precip_prob` is zero or absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyForecast {
    pub datetime: String, // "2024-02-01T13:00:00"
    pub temperature: Option<i32>,
    pub feels_like: Option<i32>,
    pub humidity: Option<i32>,
    pub precip_prob: Option<i32>,
    pub precip_amount: Option<String>,
    pub wind_dir: Option<String>,
    pub wind_speed: Option<i32>,
    pub wind_gust: Option<i32>,
    pub sky_description: Option<String>,
    pub sky_code: Option<String>,
}

impl HourlyForecast {
    pub fn wind_arrow(&self) -> &'static str {
        wind_arrow(self.wind_dir.as_deref())
    }
}

/// One calendar day beyond the hourly horizon.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: String, // "2024-02-04"
    pub temp_min: Option<i32>,
    pub temp_max: Option<i32>,
    pub sky_description: Option<String>,
    pub precip_prob: Option<i32>,
    pub wind_dir: Option<String>,
    pub wind_speed: Option<i32>,
}

impl DailyForecast {
    pub fn wind_arrow(&self) -> &'static str {
        wind_arrow(self.wind_dir.as_deref())
    }
}

/// Everything known about one municipality's forecast.
///
/// An empty `hours` list means "no forecast available"; it is never an error.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MunicipalityForecast {
    pub name: String,
    pub province: String,
    pub issued: String,
    pub hours: Vec<HourlyForecast>,
    pub daily: Vec<DailyForecast>,
}

impl MunicipalityForecast {
    /// The degraded result: blank metadata, no records.
    pub fn empty(name: &str) -> Self {
        MunicipalityForecast {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// Arrow pointing along the AEMET compass code (Spanish: `O` = west,
/// `SO`/`NO` = south-/north-west, `C` = calm).
pub fn wind_arrow(direction: Option<&str>) -> &'static str {
    match direction {
        Some("N") => "↑",
        Some("NE") => "↗",
        Some("E") => "→",
        Some("SE") => "↘",
        Some("S") => "↓",
        Some("SO") => "↙",
        Some("O") => "←",
        Some("NO") => "↖",
        Some("C") => "○",
        _ => "",
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or normalizing upstream data.
#[derive(Debug, PartialEq)]
pub enum IngestError {
    /// Non-2xx HTTP response from an upstream API.
    HttpError(u16),
    /// The request never produced a response (DNS, TLS, timeout...).
    Request(String),
    /// Upstream answered with a JSON error payload instead of data.
    UpstreamError(String),
    /// An AEMET envelope arrived without its `datos` URL.
    MissingDatos,
    /// A single XML document could not be parsed.
    MalformedDocument(String),
    /// Local filesystem failure while extracting an archive.
    Io(String),
    /// Configuration file unreadable or invalid.
    Config(String),
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::HttpError(code) => write!(f, "HTTP error: {}", code),
            IngestError::Request(msg) => write!(f, "Request failed: {}", msg),
            IngestError::UpstreamError(msg) => write!(f, "Upstream error: {}", msg),
            IngestError::MissingDatos => write!(f, "No data: response missing 'datos' field"),
            IngestError::MalformedDocument(msg) => write!(f, "Parse error: {}", msg),
            IngestError::Io(msg) => write!(f, "I/O error: {}", msg),
            IngestError::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for IngestError {}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for IngestError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => IngestError::HttpError(status.as_u16()),
            None => IngestError::Request(err.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_sorts_most_severe_first() {
        let mut levels = vec![Severity::Green, Severity::Red, Severity::Yellow, Severity::Orange];
        levels.sort();
        assert_eq!(levels, Severity::ALL.to_vec());
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Orange).unwrap();
        assert_eq!(json, "\"orange\"");
        let source = serde_json::to_string(&AlertSource::Seismic).unwrap();
        assert_eq!(source, "\"seismic\"");
    }

    #[test]
    fn test_hourly_forecast_uses_camel_case_keys() {
        let hour = HourlyForecast {
            datetime: "2024-02-01T13:00:00".to_string(),
            feels_like: Some(12),
            precip_prob: Some(40),
            ..Default::default()
        };
        let json = serde_json::to_value(&hour).unwrap();
        assert_eq!(json["feelsLike"], 12);
        assert_eq!(json["precipProb"], 40);
        assert!(json.get("feels_like").is_none());
    }

    #[test]
    fn test_split_zones_trims_and_drops_empty_entries() {
        assert_eq!(
            split_zones("Litoral gaditano;  Campiña gaditana ; ;"),
            vec!["Litoral gaditano", "Campiña gaditana"]
        );
        assert!(split_zones("").is_empty());
    }

    #[test]
    fn test_wind_arrow_uses_spanish_compass_codes() {
        assert_eq!(wind_arrow(Some("SO")), "↙");
        assert_eq!(wind_arrow(Some("O")), "←");
        assert_eq!(wind_arrow(Some("C")), "○");
        assert_eq!(wind_arrow(Some("W")), "");
        assert_eq!(wind_arrow(None), "");
    }

    #[test]
    fn test_ingest_error_display_names_the_category() {
        assert_eq!(IngestError::HttpError(404).to_string(), "HTTP error: 404");
        assert!(IngestError::MalformedDocument("unexpected EOF".into())
            .to_string()
            .starts_with("Parse error"));
        assert!(IngestError::MissingDatos.to_string().contains("No data"));
    }
}
