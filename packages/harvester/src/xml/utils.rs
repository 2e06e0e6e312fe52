//! XML utility functions for positional navigation of DOM trees.
//!
//! Positions count element children only; text, comment and processing
//! instruction nodes are skipped.

use roxmltree::Node;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use firds_harvester::xml::get_tag_name;
///
/// let xml = r#"<a:root xmlns:a="urn:x"><a:FinInstrm/></a:root>"#;
/// let doc = Document::parse(xml).unwrap();
/// let child = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(child), "FinInstrm");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Get all element children of a node.
///
/// # Returns
/// Iterator over element children (excludes text nodes, comments, etc.)
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Get the element child at `index`.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use firds_harvester::xml::nth_element_child;
///
/// let xml = "<root>\n  <a/>\n  <b/>\n</root>";
/// let doc = Document::parse(xml).unwrap();
/// let b = nth_element_child(doc.root_element(), 1).unwrap();
/// assert!(b.has_tag_name("b"));
/// assert!(nth_element_child(doc.root_element(), 2).is_none());
/// ```
pub fn nth_element_child<'a, 'input>(
    node: Node<'a, 'input>,
    index: usize,
) -> Option<Node<'a, 'input>> {
    element_children(node).nth(index)
}

/// Follow a path of element-child positions from `node`.
///
/// # Returns
/// The element at the end of the path, or `None` if any step is missing
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use firds_harvester::xml::element_at_path;
///
/// let xml = r#"<r><a><x/><y>found</y></a></r>"#;
/// let doc = Document::parse(xml).unwrap();
/// let y = element_at_path(doc.root_element(), &[0, 1]).unwrap();
/// assert_eq!(y.text(), Some("found"));
/// ```
pub fn element_at_path<'a, 'input>(
    node: Node<'a, 'input>,
    path: &[usize],
) -> Option<Node<'a, 'input>> {
    path.iter()
        .try_fold(node, |current, &index| nth_element_child(current, index))
}

/// Format a position path as `[0][0][3]`.
pub fn format_path(path: &[usize]) -> String {
    path.iter().map(|i| format!("[{i}]")).collect()
}

/// Get the direct text content of a node, untrimmed.
///
/// # Returns
/// The first text child, or an empty string if the element has none
pub fn get_text(node: Node<'_, '_>) -> String {
    node.text().map(str::to_string).unwrap_or_default()
}

/// Get an attribute value from a node.
pub fn get_attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn test_get_tag_name() {
        let xml = r#"<root><child/></root>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_tag_name(doc.root_element()), "root");
    }

    #[test]
    fn test_get_tag_name_with_namespace() {
        let xml = r#"<ns:root xmlns:ns="http://example.com"><ns:child/></ns:root>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_tag_name(doc.root_element()), "root");
    }

    #[test]
    fn test_element_children_skips_text_and_comments() {
        let xml = "<root>\n  text\n  <!-- note -->\n  <a/>\n  <b/>\n</root>";
        let doc = Document::parse(xml).unwrap();
        let names: Vec<_> = element_children(doc.root_element())
            .map(get_tag_name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_element_at_path_missing_step() {
        let xml = r#"<r><a><x/></a></r>"#;
        let doc = Document::parse(xml).unwrap();
        assert!(element_at_path(doc.root_element(), &[0, 1]).is_none());
        assert!(element_at_path(doc.root_element(), &[1]).is_none());
    }

    #[test]
    fn test_element_at_empty_path_is_self() {
        let xml = r#"<r/>"#;
        let doc = Document::parse(xml).unwrap();
        let node = element_at_path(doc.root_element(), &[]).unwrap();
        assert_eq!(get_tag_name(node), "r");
    }

    #[test]
    fn test_format_path() {
        assert_eq!(format_path(&[0, 0, 3]), "[0][0][3]");
        assert_eq!(format_path(&[]), "");
    }

    #[test]
    fn test_get_text() {
        let xml = r#"<r><a>value</a><b/></r>"#;
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element();
        assert_eq!(get_text(nth_element_child(root, 0).unwrap()), "value");
        assert_eq!(get_text(nth_element_child(root, 1).unwrap()), "");
    }

    #[test]
    fn test_get_attribute() {
        let xml = r#"<str name="file_type">DLTINS</str>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_attribute(doc.root_element(), "name"), Some("file_type"));
        assert_eq!(get_attribute(doc.root_element(), "missing"), None);
    }
}
