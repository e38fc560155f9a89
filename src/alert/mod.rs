/// Alert classification, merging and aggregation.
///
/// `severity` and `dedup` do the per-source work; the helpers here operate
/// on the combined list that the collector hands to renderers.

pub mod dedup;
pub mod severity;

use std::collections::BTreeMap;

use crate::model::{Alert, AlertSource, Severity};
use crate::regions::extract_provinces;

/// Stable sort, red first. Alerts of equal severity keep their order.
pub fn sort_by_severity(alerts: &mut [Alert]) {
    alerts.sort_by_key(|a| a.severity);
}

pub fn filter_by_severity(alerts: &[Alert], severity: Severity) -> Vec<&Alert> {
    alerts.iter().filter(|a| a.severity == severity).collect()
}

pub fn filter_by_source(alerts: &[Alert], source: AlertSource) -> Vec<&Alert> {
    alerts.iter().filter(|a| a.source == source).collect()
}

/// Alerts whose area mentions `province`. Only provinces in `allowed` are
/// ever recognised, so asking for anything else returns nothing.
pub fn filter_by_province<'a>(alerts: &'a [Alert], province: &str, allowed: &[String]) -> Vec<&'a Alert> {
    alerts
        .iter()
        .filter(|a| {
            a.area
                .as_deref()
                .map(|area| extract_provinces(area, allowed).iter().any(|p| *p == province))
                .unwrap_or(false)
        })
        .collect()
}

/// Groups by source, in order of first appearance.
pub fn group_by_source(alerts: &[Alert]) -> Vec<(AlertSource, Vec<&Alert>)> {
    let mut groups: Vec<(AlertSource, Vec<&Alert>)> = Vec::new();
    for alert in alerts {
        match groups.iter_mut().find(|(source, _)| *source == alert.source) {
            Some((_, members)) => members.push(alert),
            None => groups.push((alert.source, vec![alert])),
        }
    }
    groups
}

/// Groups by severity, red → green. Empty levels are absent.
pub fn group_by_severity(alerts: &[Alert]) -> BTreeMap<Severity, Vec<&Alert>> {
    let mut groups: BTreeMap<Severity, Vec<&Alert>> = BTreeMap::new();
    for alert in alerts {
        groups.entry(alert.severity).or_default().push(alert);
    }
    groups
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
