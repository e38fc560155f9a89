//! Zone-replicated alert merging.
//!
//! AEMET publishes one CAP document per warning zone, so a single bulletin
//! ("tormentas, nivel amarillo") shows up dozens of times with only the
//! `areaDesc` changing. The headline also repeats the zone name as a
//! trailing `". <zone>"` fragment. This module strips that fragment and
//! folds the copies back into one alert whose `area` lists every zone.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Alert, Severity, split_zones};

/// Generic `". CCAA"` (Comunidades Autónomas) tail on aggregated headlines.
static CCAA_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.\s*CCAA\s*$").expect("CCAA suffix regex must compile"));

/// Grouping key: severity, cleaned headline and validity window.
type GroupKey = (Severity, String, String, String);

/// Merges alerts that describe the same bulletin in different zones.
///
/// Green alerts are discarded. Output keeps the order in which each group
/// was first seen; the first alert of a group keeps all of its fields apart
/// from the merged `area`.
///
/// A merged `area` can contain a zone that the representative's headline
/// still ends with (its own zone did not match, a sibling's does), so the
/// merge is repeated until nothing changes. Headlines only shrink and
/// groups only combine.
pub fn deduplicate_alerts(alerts: Vec<Alert>) -> Vec<Alert> {
    let mut current = merge_pass(alerts);
    loop {
        let next = merge_pass(current.clone());
        if next == current {
            return current;
        }
        current = next;
    }
}

/// One clean-then-group pass.
fn merge_pass(alerts: Vec<Alert>) -> Vec<Alert> {
    let mut merged: Vec<Alert> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for mut alert in alerts {
        if alert.severity == Severity::Green {
            continue;
        }

        alert.headline = clean_headline(&alert.headline, alert.area.as_deref());

        let key = (
            alert.severity,
            alert.headline.clone(),
            alert.onset.clone().unwrap_or_default(),
            alert.expires.clone().unwrap_or_default(),
        );

        match index.get(&key) {
            Some(&pos) => {
                let existing = &mut merged[pos];
                existing.area = union_areas(existing.area.as_deref(), alert.area.as_deref());
            }
            None => {
                alert.area = union_areas(alert.area.as_deref(), None);
                index.insert(key, merged.len());
                merged.push(alert);
            }
        }
    }

    merged
}

/// Removes the `". CCAA"` tail, then the first `". <zone>"` tail that
/// matches one of the alert's own zones.
pub fn clean_headline(headline: &str, area: Option<&str>) -> String {
    let mut cleaned = CCAA_SUFFIX.replace(headline, "").into_owned();

    if let Some(area) = area {
        for zone in split_zones(area) {
            let suffix = format!(". {}", zone);
            if let Some(stripped) = cleaned.strip_suffix(&suffix) {
                cleaned = stripped.to_string();
                break;
            }
        }
    }

    cleaned
}

/// Order-preserving union of two zone lists; `None` when both are empty.
pub fn union_areas(existing: Option<&str>, incoming: Option<&str>) -> Option<String> {
    let mut zones: Vec<&str> = Vec::new();
    for zone in split_zones(existing.unwrap_or(""))
        .into_iter()
        .chain(split_zones(incoming.unwrap_or("")))
    {
        if !zones.contains(&zone) {
            zones.push(zone);
        }
    }

    if zones.is_empty() {
        None
    } else {
        Some(zones.join("; "))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
