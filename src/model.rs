//! Data model for parsed documentation — independent of any metadata source.
//!
//! A [`Hierarchy`] is built once per run from the XML documentation file and
//! only read afterwards. Its serialized form is the debug dump.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Tags whose content is keyed by an attribute rather than stored as text.
/// (tag, key attribute)
pub const NAMED_TAGS: &[(&str, &str)] = &[
    ("param", "name"),
    ("typeparam", "name"),
    ("exception", "cref"),
];

/// Category of a documented element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MemberKind {
    Type,
    Constructor,
    Field,
    Property,
    Method,
    Event,
}

impl MemberKind {
    /// Map a member-ID prefix letter to a kind.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "T" => Some(Self::Type),
            "F" => Some(Self::Field),
            "P" => Some(Self::Property),
            "M" => Some(Self::Method),
            "E" => Some(Self::Event),
            _ => None,
        }
    }

    /// Level-2 section title on a type page.
    pub fn section_title(self) -> &'static str {
        match self {
            Self::Type => "Types",
            Self::Constructor => "Constructors",
            Self::Field => "Fields",
            Self::Property => "Properties",
            Self::Method => "Methods",
            Self::Event => "Events",
        }
    }

    fn key_prefix(self) -> char {
        match self {
            Self::Type => 'T',
            Self::Constructor | Self::Method => 'M',
            Self::Field => 'F',
            Self::Property => 'P',
            Self::Event => 'E',
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Type => "type",
            Self::Constructor => "constructor",
            Self::Field => "field",
            Self::Property => "property",
            Self::Method => "method",
            Self::Event => "event",
        };
        f.write_str(name)
    }
}

/// Rendering shape of a type page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ObjectKind {
    #[default]
    Class,
    Enum,
    Delegate,
}

/// Documentation tags of a single member entry.
///
/// Plain tags (summary, remarks, returns, value, ...) map to their trimmed
/// inner markup. Named tags (see [`NAMED_TAGS`]) map a key attribute to the
/// description, e.g. `param` maps parameter name to description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocEntry {
    text: IndexMap<String, String>,
    named: IndexMap<String, IndexMap<String, String>>,
}

impl DocEntry {
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.text.get(tag).map(String::as_str)
    }

    /// Content of `tag`, or "" when absent.
    pub fn text_or_empty(&self, tag: &str) -> &str {
        self.get(tag).unwrap_or("")
    }

    pub fn insert(&mut self, tag: impl Into<String>, content: impl Into<String>) {
        self.text.insert(tag.into(), content.into());
    }

    pub fn insert_named(
        &mut self,
        tag: impl Into<String>,
        key: impl Into<String>,
        content: impl Into<String>,
    ) {
        self.named
            .entry(tag.into())
            .or_default()
            .insert(key.into(), content.into());
    }

    /// Keyed entries for a named tag, in document order.
    pub fn named(&self, tag: &str) -> Option<&IndexMap<String, String>> {
        self.named.get(tag)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.named("param")
            .and_then(|params| params.get(name))
            .map(String::as_str)
    }

    pub fn has_params(&self) -> bool {
        self.named("param").is_some_and(|p| !p.is_empty())
    }
}

impl Serialize for DocEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.text.len() + self.named.len()))?;
        for (tag, content) in &self.text {
            map.serialize_entry(tag, content)?;
        }
        for (tag, entries) in &self.named {
            map.serialize_entry(tag, entries)?;
        }
        map.end()
    }
}

/// A documented member of a type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChildNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MemberKind,
    /// Parameter type names as written in the member ID.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
    pub documentation: DocEntry,
}

impl ChildNode {
    /// Composite key: overloads sharing a bare name stay distinct.
    ///
    /// `M:Spin()`, `M:Spin(System.Int32)`, `F:count`
    pub fn key(&self) -> String {
        let prefix = self.kind.key_prefix();
        match self.kind {
            MemberKind::Method | MemberKind::Constructor => {
                format!("{}:{}({})", prefix, self.name, self.params.join(","))
            }
            _ if !self.params.is_empty() => {
                format!("{}:{}({})", prefix, self.name, self.params.join(","))
            }
            _ => format!("{}:{}", prefix, self.name),
        }
    }
}

/// A documented type and its members.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HierarchyNode {
    pub kind: ObjectKind,
    /// Members in discovery order, keyed by [`ChildNode::key`].
    pub children: IndexMap<String, ChildNode>,
    pub documentation: DocEntry,
    /// Set once a `T:` entry for this type has been seen.
    #[serde(skip)]
    pub declared: bool,
}

impl HierarchyNode {
    /// Documentation of the first member with this kind and bare name.
    pub fn child_doc(&self, kind: MemberKind, name: &str) -> Option<&DocEntry> {
        self.children
            .values()
            .find(|c| c.kind == kind && c.name == name)
            .map(|c| &c.documentation)
    }
}

/// namespace → type name → node. Namespaces iterate in ascending order,
/// types in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Hierarchy {
    pub namespaces: BTreeMap<String, IndexMap<String, HierarchyNode>>,
}

impl Hierarchy {
    pub fn get(&self, namespace: &str, type_name: &str) -> Option<&HierarchyNode> {
        self.namespaces.get(namespace)?.get(type_name)
    }

    /// Number of type nodes across all namespaces.
    pub fn type_count(&self) -> usize {
        self.namespaces.values().map(IndexMap::len).sum()
    }
}
