//! Compiler XML documentation reader.
//!
//! ```xml
//! <doc>
//!   <assembly><name>Acme</name></assembly>
//!   <members>
//!     <member name="T:Acme.Widget"><summary>A widget.</summary></member>
//!   </members>
//! </doc>
//! ```
//!
//! Each child tag of a `<member>` keeps its inner markup verbatim (one
//! level of wrapper stripped, whitespace trimmed) so inline tags such as
//! `<see cref="..."/>` survive until rendering.

use crate::error::{Result, SetupError};
use crate::model::{DocEntry, NAMED_TAGS};
use roxmltree::{Document, Node};
use tracing::debug;

/// One `<member>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMember {
    pub id: String,
    pub doc: DocEntry,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocFile {
    /// `<assembly><name>` when present.
    pub assembly: Option<String>,
    pub members: Vec<RawMember>,
}

pub fn parse(xml: &str) -> Result<DocFile> {
    let document = Document::parse(xml)?;
    let root = document.root_element();
    if root.tag_name().name() != "doc" {
        return Err(SetupError::Malformed(format!(
            "expected <doc> root element, found <{}>",
            root.tag_name().name()
        )));
    }

    let assembly = child_element(root, "assembly")
        .and_then(|a| child_element(a, "name"))
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string());

    let members = child_element(root, "members")
        .ok_or_else(|| SetupError::Malformed("missing <members> element".to_string()))?;

    let mut out = Vec::new();
    for member in members.children().filter(|n| n.has_tag_name("member")) {
        let Some(id) = member.attribute("name") else {
            debug!("skipping <member> without a name attribute");
            continue;
        };
        out.push(RawMember {
            id: id.to_string(),
            doc: read_entry(xml, member),
        });
    }

    Ok(DocFile {
        assembly,
        members: out,
    })
}

fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}

fn read_entry(source: &str, member: Node) -> DocEntry {
    let mut doc = DocEntry::default();
    for child in member.children().filter(Node::is_element) {
        let tag = child.tag_name().name();
        let content = inner_markup(&source[child.range()]);

        match NAMED_TAGS.iter().find(|(named, _)| *named == tag) {
            Some((_, key_attr)) => match child.attribute(*key_attr) {
                Some(key) => doc.insert_named(tag, key, content),
                None => debug!(tag, "skipping tag without a {} attribute", key_attr),
            },
            None => doc.insert(tag, content),
        }
    }
    doc
}

/// Strip one level of tag wrapper from an element's source text.
///
/// `<summary>\n  A <c>b</c>\n</summary>` → `A <c>b</c>`
fn inner_markup(element: &str) -> String {
    let Some(open_end) = start_tag_end(element) else {
        return String::new();
    };
    if element[..open_end].ends_with("/>") {
        return String::new();
    }
    let close_start = element.rfind("</").unwrap_or(element.len());
    if close_start < open_end {
        return String::new();
    }
    element[open_end..close_start].trim().to_string()
}

/// Byte offset just past the `>` closing the start tag, skipping quoted
/// attribute values.
fn start_tag_end(element: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in element.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, '>') => return Some(i + 1),
            _ => {}
        }
    }
    None
}
