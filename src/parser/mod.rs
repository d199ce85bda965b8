//! Parser module — XML documentation file to [`Hierarchy`].

pub mod member_id;
pub mod tree;
pub mod xml;

use crate::error::Result;
use crate::model::Hierarchy;

/// Parsed documentation source.
#[derive(Debug, Default)]
pub struct Documentation {
    /// Assembly name declared by the documentation file.
    pub assembly: Option<String>,
    pub hierarchy: Hierarchy,
}

/// Parse XML documentation text into the pre-correlation hierarchy.
pub fn parse_documentation(xml_text: &str) -> Result<Documentation> {
    let file = xml::parse(xml_text)?;
    Ok(Documentation {
        assembly: file.assembly,
        hierarchy: tree::build(file.members),
    })
}
