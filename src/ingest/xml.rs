//! Namespace-tolerant element lookup shared by the CAP and GeoRSS parsers.
//!
//! Upstream documents are inconsistent about namespaces: some CAP files
//! declare `urn:oasis:names:tc:emergency:cap:1.2` as the default namespace,
//! others omit it entirely. Every lookup tries the namespaced children first
//! and falls back to unqualified children with the same local name.

use roxmltree::{Document, Node, ParsingOptions};

use crate::model::IngestError;

/// Parses an XML document, allowing a DOCTYPE (some feeds ship one).
pub fn parse_document(xml: &str) -> Result<Document<'_>, IngestError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(xml, options)
        .map_err(|e| IngestError::MalformedDocument(e.to_string()))
}

/// Element children of `parent` called `name`: those in namespace `ns` if
/// any exist, otherwise those with no namespace.
pub fn children_named<'a, 'input>(
    parent: Node<'a, 'input>,
    ns: &str,
    name: &str,
) -> Vec<Node<'a, 'input>> {
    let namespaced: Vec<_> = parent
        .children()
        .filter(|c| is_element_named(c, name, Some(ns)))
        .collect();
    if !namespaced.is_empty() {
        return namespaced;
    }
    parent
        .children()
        .filter(|c| is_element_named(c, name, None))
        .collect()
}

/// Trimmed text of the first `name` child with non-empty content,
/// namespaced candidates first.
pub fn child_text(parent: Node<'_, '_>, ns: &str, name: &str) -> Option<String> {
    let namespaced = parent
        .children()
        .filter(|c| is_element_named(c, name, Some(ns)));
    let bare = parent
        .children()
        .filter(|c| is_element_named(c, name, None));

    namespaced
        .chain(bare)
        .map(|node| element_text(node))
        .find(|text| !text.is_empty())
}

/// All text beneath an element (CDATA included), trimmed.
pub fn element_text(node: Node<'_, '_>) -> String {
    let text: String = node
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    text.trim().to_string()
}

fn is_element_named(node: &Node<'_, '_>, name: &str, ns: Option<&str>) -> bool {
    node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == ns
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = "urn:example:ns";

    #[test]
    fn test_namespaced_children_are_preferred() {
        let xml = r#"<root xmlns:x="urn:example:ns"><x:item>ns</x:item><item>bare</item></root>"#;
        let doc = parse_document(xml).unwrap();
        let items = children_named(doc.root_element(), NS, "item");
        assert_eq!(items.len(), 1);
        assert_eq!(element_text(items[0]), "ns");
    }

    #[test]
    fn test_falls_back_to_unqualified_children() {
        let xml = "<root><item>a</item><item>b</item></root>";
        let doc = parse_document(xml).unwrap();
        let items = children_named(doc.root_element(), NS, "item");
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_default_namespace_counts_as_namespaced() {
        let xml = r#"<root xmlns="urn:example:ns"><item> value </item></root>"#;
        let doc = parse_document(xml).unwrap();
        assert_eq!(child_text(doc.root_element(), NS, "item").as_deref(), Some("value"));
    }

    #[test]
    fn test_child_text_skips_blank_candidates() {
        let xml = r#"<root xmlns:x="urn:example:ns"><x:item>  </x:item><item>fallback</item></root>"#;
        let doc = parse_document(xml).unwrap();
        assert_eq!(child_text(doc.root_element(), NS, "item").as_deref(), Some("fallback"));
        assert_eq!(child_text(doc.root_element(), NS, "missing"), None);
    }

    #[test]
    fn test_cdata_is_included_in_text() {
        let xml = "<root><d><![CDATA[magnitud 3.1 <b>en</b>]]></d></root>";
        let doc = parse_document(xml).unwrap();
        assert_eq!(child_text(doc.root_element(), NS, "d").as_deref(), Some("magnitud 3.1 <b>en</b>"));
    }

    #[test]
    fn test_malformed_xml_is_a_parse_error() {
        let result = parse_document("<root><unclosed></root>");
        assert!(matches!(result, Err(IngestError::MalformedDocument(_))), "got {:?}", result.map(|_| ()));
    }
}
