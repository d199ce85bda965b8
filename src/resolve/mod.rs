//! Type reference resolution: relative links for documented types, external
//! index links for everything else, plain text as the last resort.

pub mod index;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::metadata::{
    canonical, generic_definition, generic_parts, last_segment, MetadataProvider, TypeRef,
};
use index::ReferenceIndex;
use std::path::{Component, Path, PathBuf};

/// C# keyword spellings of built-in types.
static ALIASES: &[(&str, &str)] = &[
    ("System.Boolean", "bool"),
    ("System.Byte", "byte"),
    ("System.SByte", "sbyte"),
    ("System.Char", "char"),
    ("System.Decimal", "decimal"),
    ("System.Double", "double"),
    ("System.Single", "float"),
    ("System.Int16", "short"),
    ("System.UInt16", "ushort"),
    ("System.Int32", "int"),
    ("System.UInt32", "uint"),
    ("System.Int64", "long"),
    ("System.UInt64", "ulong"),
    ("System.IntPtr", "nint"),
    ("System.UIntPtr", "nuint"),
    ("System.Object", "object"),
    ("System.String", "string"),
    ("System.Void", "void"),
];

pub fn alias(full_name: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(name, _)| *name == full_name)
        .map(|(_, short)| *short)
}

/// Human-readable spelling of a type reference.
///
/// `System.Int32[]` → `int[]`, `System.Collections.Generic.List{Acme.Item}` →
/// `List<Item>`, `Acme.Box`1` → `Box`
pub fn display_name(raw: &str) -> String {
    let ty = TypeRef::parse(raw);
    let mut out = display_element(&ty.name);
    for _ in 0..ty.rank {
        out.push_str("[]");
    }
    out
}

fn display_element(name: &str) -> String {
    if let Some(short) = alias(name) {
        return short.to_string();
    }
    let (_, args) = generic_parts(name);
    let base = last_segment(name);
    let base = base.split('`').next().unwrap_or(base);
    if args.is_empty() {
        base.to_string()
    } else {
        let args: Vec<String> = args.into_iter().map(display_name).collect();
        format!("{}<{}>", base, args.join(", "))
    }
}

/// Output path of a type's page, relative to the output root.
///
/// `Acme.Models.User` → `Acme/Models/User.md`; nested `Acme.Outer+Inner` →
/// `Acme/Outer/Inner.md`.
pub fn page_path(full_name: &str) -> PathBuf {
    let normalized = full_name.replace('+', ".");
    let mut segments: Vec<&str> = normalized.split('.').collect();
    let file = segments.pop().unwrap_or_default();
    let mut path: PathBuf = segments.iter().collect();
    path.push(format!("{}.md", file));
    path
}

/// Relative link from the page `from` to the page `to`, both relative to
/// the output root. Always uses `/` separators.
pub fn relative_path(from: &Path, to: &Path) -> String {
    let from_dir: Vec<Component> = from
        .parent()
        .map(|p| p.components().collect())
        .unwrap_or_default();
    let target: Vec<Component> = to.components().collect();

    let common = from_dir
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from_dir.len() {
        parts.push("..".to_string());
    }
    for component in &target[common..] {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }
    parts.join("/")
}

/// Turns type references into markdown for a given page.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    provider: &'a dyn MetadataProvider,
    index: &'a dyn ReferenceIndex,
    diagnostics: &'a Diagnostics,
}

impl<'a> Resolver<'a> {
    pub fn new(
        provider: &'a dyn MetadataProvider,
        index: &'a dyn ReferenceIndex,
        diagnostics: &'a Diagnostics,
    ) -> Self {
        Resolver {
            provider,
            index,
            diagnostics,
        }
    }

    /// Markdown for a reference to `ty`, as seen from the page at `from`.
    pub fn link(&self, ty: &TypeRef, from: &Path) -> String {
        if ty.is_array() {
            return format!("{}[]", self.link(&ty.element(), from));
        }

        let descriptor = canonical(self.provider, &ty.name);
        let full_name = descriptor.map_or(ty.name.as_str(), |d| d.full_name);

        if self.provider.is_local(full_name) {
            let target = page_path(full_name);
            return format!(
                "[{}]({})",
                display_element(&ty.name),
                relative_path(from, &target)
            );
        }

        // The index knows definitions (`List`1`), not instantiations.
        let uid = generic_definition(full_name);
        let uid = uid.as_deref().unwrap_or(full_name);
        let generic = uid != full_name;
        match self.index.lookup(uid) {
            Ok(Some(found)) => {
                let text = match alias(full_name) {
                    Some(short) => short.to_string(),
                    None if generic => display_element(full_name),
                    None => found.name,
                };
                format!("[{}]({})", text, found.url)
            }
            Ok(None) => {
                self.diagnostics.warn(
                    DiagnosticKind::MissingType,
                    format!("no documentation found for type `{}`", full_name),
                );
                full_name.to_string()
            }
            Err(e) => {
                self.diagnostics.warn(
                    DiagnosticKind::ExternalLookup,
                    format!("lookup of `{}` failed: {}", full_name, e),
                );
                full_name.to_string()
            }
        }
    }

    /// Parse a raw type name and link it.
    pub fn link_name(&self, raw: &str, from: &Path) -> String {
        self.link(&TypeRef::parse(raw), from)
    }
}
