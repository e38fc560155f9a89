/// CAP 1.2 alert parser.
///
/// Turns one Common Alerting Protocol document into canonical `Alert`s.
/// AEMET ships one `<alert>` per file, but the parser also accepts a
/// wrapper element holding several `<alert>` children.
///
/// Reference: http://docs.oasis-open.org/emergency/cap/v1.2/CAP-v1.2.html

use roxmltree::Node;

use crate::alert::severity::classify_cap_severity;
use crate::ingest::xml::{child_text, children_named, parse_document};
use crate::model::{Alert, AlertSource, IngestError};

pub const CAP_NS: &str = "urn:oasis:names:tc:emergency:cap:1.2";

/// Parses a CAP document into zero or more alerts.
///
/// `<alert>` elements without any `<info>` block produce nothing. Returns
/// `MalformedDocument` if the XML itself cannot be parsed; callers working
/// through an archive skip that document and keep going.
pub fn parse_cap(xml: &str) -> Result<Vec<Alert>, IngestError> {
    let doc = parse_document(xml)?;
    let root = doc.root_element();

    let alert_elements = if root.tag_name().name() == "alert" {
        vec![root]
    } else {
        children_named(root, CAP_NS, "alert")
    };

    Ok(alert_elements.into_iter().filter_map(parse_alert).collect())
}

fn parse_alert(alert: Node<'_, '_>) -> Option<Alert> {
    let sender = child_text(alert, CAP_NS, "sender");

    let infos = children_named(alert, CAP_NS, "info");
    let info = pick_spanish(&infos).or_else(|| infos.first().copied())?;

    let severity = classify_cap_severity(child_text(info, CAP_NS, "severity").as_deref());
    let headline = child_text(info, CAP_NS, "headline").unwrap_or_default();
    let description = child_text(info, CAP_NS, "description").unwrap_or_else(|| headline.clone());

    Some(Alert {
        source: AlertSource::Meteorological,
        severity,
        headline,
        description,
        area: area_descriptions(info),
        event_type: child_text(info, CAP_NS, "event"),
        onset: child_text(info, CAP_NS, "onset"),
        expires: child_text(info, CAP_NS, "expires"),
        certainty: child_text(info, CAP_NS, "certainty"),
        urgency: child_text(info, CAP_NS, "urgency"),
        sender,
        web: child_text(info, CAP_NS, "web"),
    })
}

/// First `<info>` whose `<language>` starts with "es", any case.
fn pick_spanish<'a, 'input>(infos: &[Node<'a, 'input>]) -> Option<Node<'a, 'input>> {
    infos.iter().copied().find(|info| {
        child_text(*info, CAP_NS, "language")
            .map(|lang| lang.to_lowercase().starts_with("es"))
            .unwrap_or(false)
    })
}

/// `"; "`-joined `<area><areaDesc>` texts in document order.
fn area_descriptions(info: Node<'_, '_>) -> Option<String> {
    let parts: Vec<String> = children_named(info, CAP_NS, "area")
        .into_iter()
        .filter_map(|area| child_text(area, CAP_NS, "areaDesc"))
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
