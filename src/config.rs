/// Runtime configuration.
///
/// Everything has a default, so the service runs with no config file at all.
/// An optional `auxio.toml` overrides individual keys:
///
/// ```toml
/// alert_area = "61"                  # Andalucía only
/// forecast_municipalities = ["Chipiona", "Rota"]
///
/// [logging]
/// level = "debug"
/// file = "/var/log/auxio.log"
/// timestamps = true
/// ```
///
/// The AEMET API key is a secret and only ever comes from the environment
/// (`AEMET_API_KEY`, optionally via `.env`).

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::ingest::aemet::AEMET_BASE_URL;
use crate::ingest::ign::IGN_FEED_URL;
use crate::logging::LogLevel;
use crate::model::IngestError;

pub const API_KEY_VAR: &str = "AEMET_API_KEY";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub aemet_base_url: String,
    /// AEMET warning area: "esp" (national) or a region code.
    pub alert_area: String,
    pub ign_feed_url: String,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub default_municipality: String,
    pub forecast_municipalities: Vec<String>,
    /// Provinces `regions::extract_provinces` will recognise.
    pub allowed_provinces: Vec<String>,
    pub logging: LoggingConfig,
    #[serde(skip)]
    pub aemet_api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// "debug", "info", "warn" or "error"
    pub level: String,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            aemet_base_url: AEMET_BASE_URL.to_string(),
            alert_area: "esp".to_string(),
            ign_feed_url: IGN_FEED_URL.to_string(),
            http_timeout_secs: 30,
            user_agent: "AUXIO/1.0".to_string(),
            default_municipality: "Chipiona".to_string(),
            forecast_municipalities: strings(&[
                "Chipiona",
                "Rota",
                "Sanlúcar de Barrameda",
                "Jerez de la Frontera",
                "Cádiz (capital)",
            ]),
            allowed_provinces: strings(&["Cádiz", "Huelva", "Sevilla", "Málaga"]),
            logging: LoggingConfig::default(),
            aemet_api_key: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: None,
            timestamps: false,
        }
    }
}

impl AppConfig {
    /// Loads `.env`, then the TOML file if one is given, then the API key.
    pub fn load(path: Option<&Path>) -> Result<Self, IngestError> {
        dotenv::dotenv().ok();

        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|e| IngestError::Config(format!("{}: {}", path.display(), e)))?;
                Self::from_toml_str(&text)?
            }
            None => AppConfig::default(),
        };

        config.aemet_api_key = std::env::var(API_KEY_VAR)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        Ok(config)
    }

    /// Parses TOML; missing keys keep their defaults. Never reads the API key.
    pub fn from_toml_str(text: &str) -> Result<Self, IngestError> {
        toml::from_str(text).map_err(|e| IngestError::Config(e.to_string()))
    }

    pub fn aemet_enabled(&self) -> bool {
        self.aemet_api_key.is_some()
    }

    /// Configured level, `Info` when unrecognised.
    pub fn log_level(&self) -> LogLevel {
        LogLevel::parse(&self.logging.level).unwrap_or(LogLevel::Info)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
