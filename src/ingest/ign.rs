/// IGN (Instituto Geográfico Nacional) seismic feed client
///
/// The IGN publishes recent earthquakes as GeoRSS. Each `<item>` carries the
/// interesting fields only as prose inside `<description>`:
///
/// ```text
/// Se ha producido un terremoto de magnitud 3.1 en S GAUCÍN.MA en la fecha
/// 01/02/2024 10:00:00 en la siguiente localización: 36.52,-5.31
/// ```
///
/// The three `extract_*` functions below are the only code that knows the
/// wording; everything else works on their results.
///
/// Feed: https://www.ign.es/ign/RssTools/sismologia.xml

use once_cell::sync::Lazy;
use regex::Regex;
use roxmltree::Node;

use crate::alert::severity::classify_seismic_severity;
use crate::ingest::xml::{child_text, children_named, parse_document};
use crate::model::{Alert, AlertSource, IngestError};
use crate::regions::{RegionTables, format_region, is_spanish_region};

pub const IGN_FEED_URL: &str = "https://www.ign.es/ign/RssTools/sismologia.xml";

/// W3C Basic Geo vocabulary used for `geo:lat` / `geo:long`.
pub const GEO_NS: &str = "http://www.w3.org/2003/01/geo/wgs84_pos#";

const SEISMIC_EVENT_TYPE: &str = "Terremoto";
const IGN_SENDER: &str = "Instituto Geográfico Nacional";

// ============================================================================
// Free-text extraction
// ============================================================================

static MAGNITUDE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"magnitud\s+([\d.]+)").expect("magnitude regex must compile")
});

static REGION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"magnitud\s+[\d.]+\s+en\s+(.+?)\s+en la fecha").expect("region regex must compile")
});

static DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"en la fecha\s+(\d{2}/\d{2}/\d{4}\s+\d{1,2}:\d{2}:\d{2})")
        .expect("date regex must compile")
});

/// Number following `"magnitud "`. `None` if absent or not a number.
pub fn extract_magnitude(description: &str) -> Option<f64> {
    let raw = MAGNITUDE.captures(description)?.get(1)?.as_str();
    raw.trim_end_matches('.').parse::<f64>().ok()
}

/// Raw IGN region between `"magnitud <n> en "` and `" en la fecha"`,
/// e.g. `"S GAUCÍN.MA"`.
pub fn extract_region(description: &str) -> Option<String> {
    let region = REGION.captures(description)?.get(1)?.as_str().trim();
    if region.is_empty() {
        None
    } else {
        Some(region.to_string())
    }
}

/// `"dd/mm/yyyy hh:mm:ss"` following `"en la fecha "`, as written.
pub fn extract_date(description: &str) -> Option<String> {
    Some(DATE.captures(description)?.get(1)?.as_str().to_string())
}

// ============================================================================
// Feed parsing
// ============================================================================

/// Parses the GeoRSS feed with the built-in Spanish region tables.
pub fn parse_seismic_feed(xml: &str) -> Result<Vec<Alert>, IngestError> {
    parse_seismic_feed_with(xml, &RegionTables::SPAIN)
}

/// Parses the GeoRSS feed into seismic alerts, in feed order.
///
/// Items without a magnitude are skipped, as are items whose region carries
/// a code that is not in `tables` (foreign epicentres). Malformed XML is the
/// only error.
pub fn parse_seismic_feed_with(xml: &str, tables: &RegionTables) -> Result<Vec<Alert>, IngestError> {
    let doc = parse_document(xml)?;
    let root = doc.root_element();

    // RSS 2.0 nests items in <channel>; tolerate items directly under the root.
    let container = root
        .children()
        .find(|c| c.is_element() && c.tag_name().name() == "channel")
        .unwrap_or(root);

    Ok(children_named(container, "", "item")
        .into_iter()
        .filter_map(|item| parse_item(item, tables))
        .collect())
}

fn parse_item(item: Node<'_, '_>, tables: &RegionTables) -> Option<Alert> {
    let description = child_text(item, "", "description").unwrap_or_default();

    let magnitude = extract_magnitude(&description)?;
    let region = extract_region(&description);

    if let Some(raw) = region.as_deref() {
        if !is_spanish_region(raw, tables) {
            return None;
        }
    }

    let onset = extract_date(&description);
    let area = region.as_deref().map(|raw| format_region(raw, tables));

    let mut headline = format!("Terremoto M{}", magnitude);
    let mut summary = format!("Magnitud {}", magnitude);
    if let Some(area) = area.as_deref() {
        headline.push_str(&format!(" en {}", area));
        summary.push_str(&format!(" en {}", area));
    }
    if let Some(onset) = onset.as_deref() {
        summary.push_str(&format!(", {}", onset));
    }
    if let Some((lat, lon)) = coordinates(item) {
        summary.push_str(&format!(" ({}, {})", lat, lon));
    }

    Some(Alert {
        source: AlertSource::Seismic,
        severity: classify_seismic_severity(magnitude),
        headline,
        description: summary,
        area,
        event_type: Some(SEISMIC_EVENT_TYPE.to_string()),
        onset,
        expires: None,
        certainty: None,
        urgency: None,
        sender: Some(IGN_SENDER.to_string()),
        web: child_text(item, "", "link"),
    })
}

/// `geo:lat` / `geo:long`, only when both are present.
fn coordinates(item: Node<'_, '_>) -> Option<(String, String)> {
    let lat = child_text(item, GEO_NS, "lat")?;
    let lon = child_text(item, GEO_NS, "long")?;
    Some((lat, lon))
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Fetch the raw GeoRSS feed
///
/// # Parameters
/// - `client`: HTTP client (timeout and User-Agent already configured)
/// - `url`: feed URL, normally `IGN_FEED_URL`
pub fn fetch_feed(client: &reqwest::blocking::Client, url: &str) -> Result<String, IngestError> {
    let response = client
        .get(url)
        .header("Accept", "application/rss+xml, application/xml")
        .send()?;

    if !response.status().is_success() {
        return Err(IngestError::HttpError(response.status().as_u16()));
    }

    Ok(response.text()?)
}

// ============================================================================
// Tests
// ============================================================================
