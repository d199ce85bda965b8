//! Authoritative type/member metadata.
//!
//! [`MetadataProvider`] is the seam between the pipeline and wherever the
//! metadata comes from. Production runs use [`manifest::ManifestProvider`];
//! tests build one in memory.

pub mod correlate;
pub mod manifest;

use serde::Deserialize;
use std::fmt;

/// The "no value" return type.
pub const VOID: &str = "System.Void";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

impl TypeKind {
    /// Word used in page titles and declarations.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Delegate => "delegate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// A method, constructor or delegate signature.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDef {
    #[serde(default)]
    pub name: String,
    #[serde(default = "void")]
    pub return_type: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

impl MethodDef {
    pub fn is_static(&self) -> bool {
        self.modifiers.iter().any(|m| m == "static")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// e.g. `["get", "private set"]`
    #[serde(default = "default_accessors")]
    pub accessors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnumValue {
    pub name: String,
    #[serde(default)]
    pub value: Option<i64>,
}

/// A type defined in (or described by) the metadata source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDef {
    pub full_name: String,
    #[serde(default)]
    pub kind: TypeKind,
    /// Owning assembly; `None` means the provider's own assembly.
    #[serde(default)]
    pub assembly: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub base_type: Option<String>,
    #[serde(default)]
    pub constructors: Vec<MethodDef>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
    #[serde(default)]
    pub methods: Vec<MethodDef>,
    #[serde(default)]
    pub events: Vec<EventDef>,
    /// Enumerators, for enums.
    #[serde(default)]
    pub values: Vec<EnumValue>,
    /// Signature, for delegates.
    #[serde(default)]
    pub invoke: Option<MethodDef>,
}

impl TypeDef {
    /// Bare name without namespace, enclosing type or generic arity.
    pub fn name(&self) -> &str {
        strip_arity(last_segment(&self.full_name))
    }

    /// Every type name appearing in this definition's signatures.
    fn signature_types(&self) -> impl Iterator<Item = &str> {
        let methods = self
            .constructors
            .iter()
            .chain(&self.methods)
            .chain(&self.invoke);
        methods
            .flat_map(|m| {
                std::iter::once(m.return_type.as_str())
                    .chain(m.parameters.iter().map(|p| p.ty.as_str()))
            })
            .chain(self.fields.iter().map(|f| f.ty.as_str()))
            .chain(self.properties.iter().map(|p| p.ty.as_str()))
            .chain(self.events.iter().map(|e| e.ty.as_str()))
            .chain(self.base_type.as_deref())
    }
}

fn void() -> String {
    VOID.to_string()
}

fn default_accessors() -> Vec<String> {
    vec!["get".to_string(), "set".to_string()]
}

/// Provider-wide view of a known type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDescriptor<'a> {
    /// Canonical full name as the provider knows it.
    pub full_name: &'a str,
    /// Owning assembly, when known.
    pub assembly: Option<&'a str>,
    /// Full definition, for types the provider describes.
    pub definition: Option<&'a TypeDef>,
}

pub trait MetadataProvider {
    /// Identity of the assembly being documented.
    fn assembly(&self) -> &str;

    /// Exact lookup of a described type.
    fn find_type(&self, full_name: &str) -> Option<&TypeDef>;

    /// Exact lookup across the whole universe: described types, declared
    /// references and every type used in a signature.
    fn lookup(&self, full_name: &str) -> Option<TypeDescriptor<'_>>;

    /// Whether `full_name` belongs to the documented assembly.
    fn is_local(&self, full_name: &str) -> bool {
        self.lookup(full_name)
            .and_then(|d| d.assembly)
            .is_some_and(|a| a == self.assembly())
    }
}

/// Resolve a documentation-style type name to the provider's canonical one.
///
/// Candidate spellings are the exact name, nested-type forms (`Outer.Inner`
/// → `Outer+Inner`) and the generic definition (`Box{T}` → ``Box`1``). A
/// described type under any spelling wins over a bare universe entry, so
/// instantiations used in signatures still reach their definition.
pub fn canonical<'a>(provider: &'a dyn MetadataProvider, name: &str) -> Option<TypeDescriptor<'a>> {
    let found: Vec<TypeDescriptor<'a>> = candidate_names(name)
        .iter()
        .filter_map(|candidate| provider.lookup(candidate))
        .collect();
    found
        .iter()
        .find(|d| d.definition.is_some())
        .or(found.first())
        .copied()
}

fn candidate_names(name: &str) -> Vec<String> {
    let mut names = vec![name.to_string()];
    names.extend(nested_forms(name));
    if let Some(definition) = generic_definition(name) {
        let nested = nested_forms(&definition);
        names.push(definition);
        names.extend(nested);
    }
    names
}

/// `Box{System.String}` → ``Box`1``; `None` for non-generic names.
pub fn generic_definition(name: &str) -> Option<String> {
    let (base, args) = generic_parts(name);
    if args.is_empty() {
        None
    } else {
        Some(format!("{}`{}", base, args.len()))
    }
}

/// Alternate spellings of a dotted name where trailing dots denote nesting.
///
/// `A.B.C` → `A.B+C`, `A+B+C`
pub fn nested_forms(name: &str) -> Vec<String> {
    let mut forms = Vec::new();
    let mut current = name.to_string();
    while let Some(dot) = current.rfind('.') {
        current.replace_range(dot..dot + 1, "+");
        forms.push(current.clone());
    }
    forms
}

/// Split `Base{A,B}` into (`Base`, [`A`, `B`]).
pub fn generic_parts(name: &str) -> (&str, Vec<&str>) {
    let Some(open) = name.find('{') else {
        return (name, Vec::new());
    };
    if !name.ends_with('}') {
        return (name, Vec::new());
    }
    let inner = &name[open + 1..name.len() - 1];
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                args.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    args.push(inner[start..].trim());
    (&name[..open], args)
}

/// Last `.`/`+` separated segment of a name, ignoring generic arguments.
pub fn last_segment(name: &str) -> &str {
    let (base, _) = generic_parts(name);
    base.rsplit(['.', '+']).next().unwrap_or(base)
}

fn strip_arity(name: &str) -> &str {
    name.split('`').next().unwrap_or(name)
}

/// A type reference as written in a signature: element name plus array rank.
///
/// `Acme.Item[][]` → name `Acme.Item`, rank 2. By-ref (`@`, `&`) and
/// pointer (`*`) markers are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub name: String,
    pub rank: usize,
}

impl TypeRef {
    pub fn parse(raw: &str) -> TypeRef {
        let mut name = raw.trim().trim_end_matches(['@', '&', '*']);
        let mut rank = 0;
        while name.ends_with(']') {
            match name.rfind('[') {
                Some(open) => {
                    name = &name[..open];
                    rank += 1;
                }
                None => break,
            }
        }
        TypeRef {
            name: name.to_string(),
            rank,
        }
    }

    pub fn is_array(&self) -> bool {
        self.rank > 0
    }

    /// Element type of an array; the type itself otherwise.
    pub fn element(&self) -> TypeRef {
        TypeRef {
            name: self.name.clone(),
            rank: self.rank.saturating_sub(1),
        }
    }

    pub fn is_void(&self) -> bool {
        self.rank == 0 && self.name == VOID
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for _ in 0..self.rank {
            f.write_str("[]")?;
        }
        Ok(())
    }
}
