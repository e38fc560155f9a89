/// AUXIO collector binary
///
/// Loads `.env` and `auxio.toml` (both optional), runs one collection and
/// prints the report as JSON on stdout. Log output goes to stderr.

use std::path::Path;
use std::process::ExitCode;

use auxio_service::collector::Collector;
use auxio_service::config::AppConfig;
use auxio_service::logging::{self, DataSource};

const CONFIG_FILE: &str = "auxio.toml";

fn main() -> ExitCode {
    let config_path = Path::new(CONFIG_FILE);
    let config = match AppConfig::load(config_path.exists().then_some(config_path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init_logger(
        config.log_level(),
        config.logging.file.as_deref(),
        config.logging.timestamps,
    );
    if config.aemet_enabled() {
        logging::info(DataSource::Config, None, "AEMET API key loaded");
    }

    let collector = match Collector::new(config) {
        Ok(collector) => collector,
        Err(e) => {
            logging::error(DataSource::System, None, &format!("HTTP client setup failed: {}", e));
            return ExitCode::FAILURE;
        }
    };

    let report = collector.collect_report();
    logging::info(
        DataSource::System,
        None,
        &format!("{} alertas, {} previsiones", report.alerts.len(), report.forecasts.len()),
    );

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            logging::error(DataSource::System, None, &format!("Serialization failed: {}", e));
            ExitCode::FAILURE
        }
    }
}
