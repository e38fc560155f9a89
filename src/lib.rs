/// AUXIO civil-protection feed: AEMET weather warnings, IGN earthquakes and
/// AEMET municipal forecasts, normalized into one set of records.

pub mod alert;
pub mod collector;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod municipalities;
pub mod regions;
