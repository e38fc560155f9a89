/// AEMET OpenData API Client
///
/// Every AEMET OpenData endpoint works in two steps. The first request
/// (authenticated with the `api_key` header) returns a small JSON envelope:
///
/// ```json
/// { "descripcion": "exito", "estado": 200,
///   "datos": "https://opendata.aemet.es/opendata/sh/4a1b...",
///   "metadatos": "https://opendata.aemet.es/opendata/sh/9c0d..." }
/// ```
///
/// and the second request downloads `datos`, which is the actual payload:
/// a CAP tar/tar.gz bundle for warnings, or forecast JSON.
///
/// API Documentation: https://opendata.aemet.es/dist/index.html

use serde::Deserialize;
use serde_json::Value;

use crate::model::IngestError;

pub const AEMET_BASE_URL: &str = "https://opendata.aemet.es/opendata";

const ALERTS_ENDPOINT: &str = "/api/avisos_cap/ultimoelaborado/area/";
const HOURLY_ENDPOINT: &str = "/api/prediccion/especifica/municipio/horaria/";
const DAILY_ENDPOINT: &str = "/api/prediccion/especifica/municipio/diaria/";

/// `estado` of a successful envelope.
const ESTADO_OK: i64 = 200;

// ============================================================================
// AEMET API Response Structures
// ============================================================================

/// First-step response of every OpenData endpoint.
#[derive(Debug, Deserialize)]
pub struct DatosEnvelope {
    pub descripcion: Option<String>,
    pub estado: Option<Value>, // 200, 401, 404, 429; sometimes a string
    pub datos: Option<String>,
    pub metadatos: Option<String>,
}

impl DatosEnvelope {
    fn estado_code(&self) -> Option<i64> {
        match self.estado.as_ref()? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Where to reach AEMET and with which key.
#[derive(Debug, Clone, Copy)]
pub struct AemetEndpoint<'a> {
    pub base_url: &'a str,
    pub api_key: &'a str,
}

// ============================================================================
// Envelope handling
// ============================================================================

/// Extracts the `datos` URL from a first-step response body.
///
/// - non-200 `estado` with a `descripcion` → `UpstreamError(descripcion)`
/// - no `datos` → `MissingDatos`
/// - not a JSON object → `MalformedDocument`
pub fn parse_datos_envelope(body: &[u8]) -> Result<String, IngestError> {
    let envelope: DatosEnvelope = serde_json::from_slice(body)
        .map_err(|e| IngestError::MalformedDocument(format!("AEMET envelope: {}", e)))?;

    if let Some(code) = envelope.estado_code() {
        if code != ESTADO_OK {
            if let Some(message) = envelope.descripcion.as_deref().filter(|d| !d.trim().is_empty()) {
                return Err(IngestError::UpstreamError(message.trim().to_string()));
            }
        }
    }

    envelope
        .datos
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .ok_or(IngestError::MissingDatos)
}

/// Payload bytes as text. AEMET serves forecast JSON as ISO-8859-15; bytes
/// that are not valid UTF-8 are read as Latin-1.
pub fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Fetch the latest CAP warning bundle for an area
///
/// # Parameters
/// - `client`: HTTP client
/// - `endpoint`: base URL and API key
/// - `area`: AEMET area code ("esp" for the whole country, "61" for Andalucía)
///
/// # Returns
/// Raw bytes of the bundle, for `archive::extract_documents`
pub fn fetch_alert_archive(
    client: &reqwest::blocking::Client,
    endpoint: &AemetEndpoint<'_>,
    area: &str,
) -> Result<Vec<u8>, IngestError> {
    let url = format!("{}{}{}", endpoint.base_url, ALERTS_ENDPOINT, area);
    let datos = request_datos_url(client, endpoint, &url)?;
    download(client, endpoint, &datos, "*/*")
}

/// Fetch the hourly forecast JSON for a municipality (INE code)
pub fn fetch_hourly_forecast(
    client: &reqwest::blocking::Client,
    endpoint: &AemetEndpoint<'_>,
    ine_code: &str,
) -> Result<Vec<u8>, IngestError> {
    let url = format!("{}{}{}", endpoint.base_url, HOURLY_ENDPOINT, ine_code);
    let datos = request_datos_url(client, endpoint, &url)?;
    download(client, endpoint, &datos, "application/json")
}

/// Fetch the daily forecast JSON for a municipality (INE code)
pub fn fetch_daily_forecast(
    client: &reqwest::blocking::Client,
    endpoint: &AemetEndpoint<'_>,
    ine_code: &str,
) -> Result<Vec<u8>, IngestError> {
    let url = format!("{}{}{}", endpoint.base_url, DAILY_ENDPOINT, ine_code);
    let datos = request_datos_url(client, endpoint, &url)?;
    download(client, endpoint, &datos, "application/json")
}

/// Step one: ask the endpoint where the data lives.
fn request_datos_url(
    client: &reqwest::blocking::Client,
    endpoint: &AemetEndpoint<'_>,
    url: &str,
) -> Result<String, IngestError> {
    let body = download(client, endpoint, url, "application/json")?;
    parse_datos_envelope(&body)
}

/// Authenticated GET returning the raw body.
fn download(
    client: &reqwest::blocking::Client,
    endpoint: &AemetEndpoint<'_>,
    url: &str,
    accept: &str,
) -> Result<Vec<u8>, IngestError> {
    let response = client
        .get(url)
        .header("Accept", accept)
        .header("api_key", endpoint.api_key)
        .send()?;

    if !response.status().is_success() {
        return Err(IngestError::HttpError(response.status().as_u16()));
    }

    Ok(response.bytes()?.to_vec())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_yields_datos_url() {
        let body = br#"{"descripcion":"exito","estado":200,"datos":"https://opendata.aemet.es/opendata/sh/4a1b","metadatos":"https://opendata.aemet.es/opendata/sh/9c0d"}"#;
        assert_eq!(
            parse_datos_envelope(body).unwrap(),
            "https://opendata.aemet.es/opendata/sh/4a1b"
        );
    }

    #[test]
    fn test_envelope_without_datos_is_missing_datos() {
        let body = br#"{"descripcion":"exito","estado":200}"#;
        assert_eq!(parse_datos_envelope(body), Err(IngestError::MissingDatos));
        assert_eq!(parse_datos_envelope(br#"{"datos":"  "}"#), Err(IngestError::MissingDatos));
    }

    #[test]
    fn test_envelope_error_estado_is_upstream_error() {
        let body = br#"{"descripcion":"No hay datos que satisfagan esos criterios","estado":404}"#;
        assert_eq!(
            parse_datos_envelope(body),
            Err(IngestError::UpstreamError("No hay datos que satisfagan esos criterios".to_string()))
        );
        let string_estado = br#"{"descripcion":"API key invalido","estado":"401"}"#;
        assert!(matches!(parse_datos_envelope(string_estado), Err(IngestError::UpstreamError(_))));
    }

    #[test]
    fn test_error_estado_without_description_is_missing_datos() {
        assert_eq!(parse_datos_envelope(br#"{"estado":429}"#), Err(IngestError::MissingDatos));
    }

    #[test]
    fn test_non_json_envelope_is_malformed() {
        let result = parse_datos_envelope(b"<html>Service Unavailable</html>");
        assert!(matches!(result, Err(IngestError::MalformedDocument(_))), "got {:?}", result);
    }

    #[test]
    fn test_decode_text_falls_back_to_latin1() {
        assert_eq!(decode_text("Cádiz".as_bytes()), "Cádiz");
        // "Cádiz" in ISO-8859-15: á = 0xE1
        assert_eq!(decode_text(&[0x43, 0xE1, 0x64, 0x69, 0x7A]), "Cádiz");
    }

    #[test]
    #[ignore] // Don't run in CI - depends on external API
    fn test_fetch_alert_archive_live() {
        dotenv::dotenv().ok();
        let Ok(api_key) = std::env::var("AEMET_API_KEY") else {
            eprintln!("AEMET_API_KEY not set - skipping");
            return;
        };
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap();
        let endpoint = AemetEndpoint { base_url: AEMET_BASE_URL, api_key: &api_key };

        let result = fetch_alert_archive(&client, &endpoint, "esp");
        assert!(result.is_ok(), "Should download the warning bundle: {:?}", result.err());
        assert!(!result.unwrap().is_empty());
    }
}
