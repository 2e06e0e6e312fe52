//! Indented rendering of an XML tree for display.
//!
//! Namespace prefixes and declarations are dropped and whitespace-only text
//! is skipped, so the output is meant for reading, not for re-parsing.

use std::fmt::Write;

use roxmltree::Node;

use super::utils::{element_children, get_tag_name};

const INDENT: &str = "  ";

/// Render `node` and its element descendants, one element per line.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use firds_harvester::xml::pretty_print;
///
/// let doc = Document::parse(r#"<a><b id="1">x</b><c/></a>"#).unwrap();
/// assert_eq!(
///     pretty_print(doc.root_element()),
///     "<a>\n  <b id=\"1\">x</b>\n  <c/>\n</a>\n"
/// );
/// ```
pub fn pretty_print(node: Node<'_, '_>) -> String {
    let mut out = String::new();
    write_element(&mut out, node, 0);
    out
}

fn write_element(out: &mut String, node: Node<'_, '_>, depth: usize) {
    let indent = INDENT.repeat(depth);
    let name = get_tag_name(node);

    let _ = write!(out, "{indent}<{name}");
    for attr in node.attributes() {
        let _ = write!(out, " {}=\"{}\"", attr.name(), escape(attr.value()));
    }

    let text = node.text().map(str::trim).unwrap_or_default();
    let mut children = element_children(node).peekable();

    if children.peek().is_none() {
        if text.is_empty() {
            out.push_str("/>\n");
        } else {
            let _ = writeln!(out, ">{}</{name}>", escape(text));
        }
        return;
    }

    out.push_str(">\n");
    if !text.is_empty() {
        let _ = writeln!(out, "{indent}{INDENT}{}", escape(text));
    }
    for child in children {
        write_element(out, child, depth + 1);
    }
    let _ = writeln!(out, "{indent}</{name}>");
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
