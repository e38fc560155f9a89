/// Fetch orchestration.
///
/// Runs each upstream through its parser and turns every failure into an
/// empty contribution plus a log line. A collection run always completes;
/// the worst case is an empty report.

use chrono::Utc;
use serde::Serialize;

use crate::alert::{dedup, filter_by_province, sort_by_severity};
use crate::config::AppConfig;
use crate::ingest::aemet::{self, AemetEndpoint};
use crate::ingest::archive::{self, ArchiveContents};
use crate::ingest::{cap, forecast, ign};
use crate::logging::{self, DataSource};
use crate::model::{Alert, DailyForecast, IngestError, MunicipalityForecast};
use crate::municipalities::find_code;

/// Everything one run produced, as printed by the binary.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionReport {
    pub generated_at: String,
    pub alerts: Vec<Alert>,
    /// One entry per allowed province, in config order, even when zero.
    pub provinces: Vec<ProvinceSummary>,
    pub forecasts: Vec<MunicipalityForecast>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvinceSummary {
    pub province: String,
    pub alerts: usize,
}

pub struct Collector {
    client: reqwest::blocking::Client,
    config: AppConfig,
}

impl Collector {
    /// Builds the shared HTTP client (timeout and User-Agent from config).
    pub fn new(config: AppConfig) -> Result<Self, IngestError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.http_timeout())
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Collector { client, config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// AEMET endpoint, or `None` when no API key is configured.
    fn aemet_endpoint(&self) -> Option<AemetEndpoint<'_>> {
        self.config.aemet_api_key.as_deref().map(|api_key| AemetEndpoint {
            base_url: &self.config.aemet_base_url,
            api_key,
        })
    }

    // -----------------------------------------------------------------------
    // Alerts
    // -----------------------------------------------------------------------

    fn try_aemet_alerts(&self, endpoint: &AemetEndpoint<'_>) -> Result<Vec<Alert>, IngestError> {
        let bundle = aemet::fetch_alert_archive(&self.client, endpoint, &self.config.alert_area)?;
        Ok(alerts_from_archive(&bundle))
    }

    fn try_seismic_alerts(&self) -> Result<Vec<Alert>, IngestError> {
        let feed = ign::fetch_feed(&self.client, &self.config.ign_feed_url)?;
        ign::parse_seismic_feed(&feed)
    }

    /// Deduplicated AEMET warnings; empty on any failure or without a key.
    pub fn aemet_alerts(&self) -> Vec<Alert> {
        let Some(endpoint) = self.aemet_endpoint() else {
            logging::warn(DataSource::Aemet, None, "AEMET_API_KEY not set, skipping");
            return Vec::new();
        };
        self.try_aemet_alerts(&endpoint).unwrap_or_else(|e| {
            logging::log_aemet_failure(&self.config.alert_area, "Alert fetch", &e);
            Vec::new()
        })
    }

    /// Spanish earthquakes from the IGN feed; empty on any failure.
    pub fn seismic_alerts(&self) -> Vec<Alert> {
        self.try_seismic_alerts().unwrap_or_else(|e| {
            logging::log_ign_failure(&self.config.ign_feed_url, "Feed fetch", &e);
            Vec::new()
        })
    }

    /// AEMET + IGN, most severe first.
    pub fn collect_alerts(&self) -> Vec<Alert> {
        let mut alerts = Vec::new();
        let mut total = 1;
        let mut failed = 0;

        match self.aemet_endpoint() {
            Some(endpoint) => {
                total += 1;
                match self.try_aemet_alerts(&endpoint) {
                    Ok(found) => {
                        logging::info(DataSource::Aemet, None, &format!("{} alertas de AEMET", found.len()));
                        alerts.extend(found);
                    }
                    Err(e) => {
                        failed += 1;
                        logging::log_aemet_failure(&self.config.alert_area, "Alert fetch", &e);
                    }
                }
            }
            None => logging::warn(DataSource::Aemet, None, "AEMET_API_KEY not set, skipping"),
        }

        match self.try_seismic_alerts() {
            Ok(found) => {
                logging::info(DataSource::Ign, None, &format!("{} alertas sísmicas", found.len()));
                alerts.extend(found);
            }
            Err(e) => {
                failed += 1;
                logging::log_ign_failure(&self.config.ign_feed_url, "Feed fetch", &e);
            }
        }

        sort_by_severity(&mut alerts);
        logging::log_collection_summary(DataSource::System, total, total - failed, failed);
        alerts
    }

    // -----------------------------------------------------------------------
    // Forecasts
    // -----------------------------------------------------------------------

    fn try_forecast(&self, endpoint: &AemetEndpoint<'_>, name: &str, code: &str) -> Result<MunicipalityForecast, IngestError> {
        let hourly_bytes = aemet::fetch_hourly_forecast(&self.client, endpoint, code)?;
        let hourly = forecast::parse_hourly_forecast_bytes(aemet::decode_text(&hourly_bytes).as_bytes());

        let daily_bytes = aemet::fetch_daily_forecast(&self.client, endpoint, code)?;
        let daily = forecast::parse_daily_forecast_bytes(aemet::decode_text(&daily_bytes).as_bytes());

        Ok(merge_forecast(hourly, daily, name))
    }

    /// Hourly plus daily forecast for a registry municipality.
    ///
    /// Unknown names, a missing API key and any upstream failure all give
    /// `MunicipalityForecast::empty(name)`.
    pub fn collect_forecast(&self, name: &str) -> MunicipalityForecast {
        let Some(code) = find_code(name) else {
            logging::warn(DataSource::Aemet, Some(name), "Unknown municipality");
            return MunicipalityForecast::empty(name);
        };
        let Some(endpoint) = self.aemet_endpoint() else {
            logging::debug(DataSource::Aemet, Some(name), "No API key, forecast skipped");
            return MunicipalityForecast::empty(name);
        };

        match self.try_forecast(&endpoint, name, code) {
            Ok(result) => {
                logging::info(
                    DataSource::Aemet,
                    Some(name),
                    &format!("{} horas y {} días de previsión", result.hours.len(), result.daily.len()),
                );
                result
            }
            Err(e) => {
                logging::log_aemet_failure(name, "Forecast fetch", &e);
                MunicipalityForecast::empty(name)
            }
        }
    }

    /// Forecast for `name`, or for the configured default municipality.
    pub fn collect_forecast_or_default(&self, name: Option<&str>) -> MunicipalityForecast {
        self.collect_forecast(name.unwrap_or(self.config.default_municipality.as_str()))
    }

    /// Municipalities to forecast; the default one when the list is empty.
    pub fn forecast_targets(&self) -> Vec<String> {
        if self.config.forecast_municipalities.is_empty() {
            vec![self.config.default_municipality.clone()]
        } else {
            self.config.forecast_municipalities.clone()
        }
    }

    /// Forecasts for every configured municipality that has hourly data.
    pub fn collect_forecasts(&self) -> Vec<MunicipalityForecast> {
        let names = self.forecast_targets();
        let forecasts: Vec<MunicipalityForecast> = names
            .iter()
            .map(|name| self.collect_forecast(name))
            .filter(|f| !f.hours.is_empty())
            .collect();

        logging::log_collection_summary(
            DataSource::Aemet,
            names.len(),
            forecasts.len(),
            names.len() - forecasts.len(),
        );
        forecasts
    }

    // -----------------------------------------------------------------------
    // Provinces
    // -----------------------------------------------------------------------

    /// Alerts whose area mentions `province`, limited to the configured
    /// allowed provinces.
    pub fn alerts_in_province<'a>(&self, alerts: &'a [Alert], province: &str) -> Vec<&'a Alert> {
        filter_by_province(alerts, province, &self.config.allowed_provinces)
    }

    /// Alert counts for every allowed province.
    pub fn province_summary(&self, alerts: &[Alert]) -> Vec<ProvinceSummary> {
        self.config
            .allowed_provinces
            .iter()
            .map(|province| ProvinceSummary {
                province: province.clone(),
                alerts: self.alerts_in_province(alerts, province).len(),
            })
            .collect()
    }

    /// Full run: alerts, then forecasts.
    pub fn collect_report(&self) -> CollectionReport {
        let alerts = self.collect_alerts();
        let provinces = self.province_summary(&alerts);
        CollectionReport {
            generated_at: Utc::now().to_rfc3339(),
            alerts,
            provinces,
            forecasts: self.collect_forecasts(),
        }
    }
}

// ---------------------------------------------------------------------------
// Offline pipeline steps
// ---------------------------------------------------------------------------

/// Extract → parse every CAP document → deduplicate.
///
/// Malformed documents are skipped; the rest of the bundle still counts.
pub fn alerts_from_archive(data: &[u8]) -> Vec<Alert> {
    let contents = match archive::extract_documents(data) {
        Ok(contents) => contents,
        Err(e) => {
            logging::log_aemet_failure("archive", "Extract", &e);
            return Vec::new();
        }
    };

    let documents = match contents {
        ArchiveContents::Documents(documents) => documents,
        ArchiveContents::UpstreamError(message) => {
            logging::warn(DataSource::Aemet, None, &format!("API returned JSON response: {}", message));
            return Vec::new();
        }
        ArchiveContents::NoDocuments => {
            logging::warn(DataSource::Aemet, None, "No XML files found in archive");
            return Vec::new();
        }
        ArchiveContents::NotAnArchive(reason) => {
            logging::warn(DataSource::Aemet, None, &format!("Unrecognized response: {}", reason));
            return Vec::new();
        }
    };

    let mut alerts = Vec::new();
    for (i, document) in documents.iter().enumerate() {
        match cap::parse_cap(document) {
            Ok(parsed) => alerts.extend(parsed),
            Err(e) => {
                let context = format!("document {}", i + 1);
                logging::debug(DataSource::Aemet, Some(&context), &format!("Skipping invalid CAP: {}", e));
            }
        }
    }

    dedup::deduplicate_alerts(alerts)
}

/// Seismic feed text → alerts; empty on malformed XML.
pub fn alerts_from_feed(xml: &str) -> Vec<Alert> {
    ign::parse_seismic_feed(xml).unwrap_or_else(|e| {
        logging::log_ign_failure("feed", "Parse", &e);
        Vec::new()
    })
}

/// Combines hourly and daily forecasts under the requested name.
///
/// Only days strictly after the last hourly date are kept, so the daily
/// list extends the hourly horizon instead of repeating it.
pub fn merge_forecast(mut hourly: MunicipalityForecast, daily: Vec<DailyForecast>, name: &str) -> MunicipalityForecast {
    let last_hourly_date = hourly
        .hours
        .last()
        .and_then(|h| h.datetime.get(..10))
        .unwrap_or("")
        .to_string();

    hourly.name = name.to_string();
    hourly.daily = daily
        .into_iter()
        .filter(|d| d.date.as_str() > last_hourly_date.as_str())
        .collect();
    hourly
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
