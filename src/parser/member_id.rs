//! Member-ID grammar.
//!
//! Compiler-emitted IDs look like `<Kind>:<QualifiedName>`:
//!
//! - `T:Acme.Widget`
//! - `M:Acme.Widget.#ctor(System.Int32)`
//! - `M:Acme.Widget.Spin` / `M:Acme.Widget.Spin(System.String,Acme.Item[])`
//! - `P:Acme.Widget.Size`, `F:Acme.Widget.count`, `E:Acme.Widget.Spun`
//!
//! Members try the method pattern first, then the field/property pattern.
//! Anything else is [`MemberId::Unparseable`].

use crate::model::MemberKind;
use regex::Regex;
use std::sync::LazyLock;

static RE_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+)\.([^.]*\w[^.]*)$").unwrap());

// Optional `~ReturnType` suffix appears on conversion operators.
static RE_METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^()]+)\.([^.()]+)\.([^.()]+)\((.*)\)(?:~.+)?$").unwrap()
});

static RE_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^()]+)\.([^.()]+)\.([^.()~]+)$").unwrap());

/// Canonical constructor marker.
pub const CONSTRUCTOR: &str = ".ctor";
/// Canonical static constructor marker.
pub const STATIC_CONSTRUCTOR: &str = ".cctor";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeId {
    pub namespace: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberPath {
    pub namespace: String,
    /// Enclosing type's bare name.
    pub owner: String,
    pub name: String,
    pub params: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberId {
    Type(TypeId),
    Constructor(MemberPath),
    Field(MemberPath),
    Property(MemberPath),
    Method(MemberPath),
    Event(MemberPath),
    Unparseable,
}

impl MemberId {
    pub fn parse(raw: &str) -> MemberId {
        let Some((prefix, rest)) = raw.split_once(':') else {
            return MemberId::Unparseable;
        };
        let Some(kind) = MemberKind::from_prefix(prefix) else {
            return MemberId::Unparseable;
        };

        if kind == MemberKind::Type {
            return match RE_TYPE.captures(rest) {
                Some(caps) => MemberId::Type(TypeId {
                    namespace: caps[1].to_string(),
                    name: caps[2].to_string(),
                }),
                None => MemberId::Unparseable,
            };
        }

        let path = if let Some(caps) = RE_METHOD.captures(rest) {
            MemberPath {
                namespace: caps[1].to_string(),
                owner: caps[2].to_string(),
                name: caps[3].to_string(),
                params: split_parameters(&caps[4]),
            }
        } else if let Some(caps) = RE_FIELD.captures(rest) {
            MemberPath {
                namespace: caps[1].to_string(),
                owner: caps[2].to_string(),
                name: caps[3].to_string(),
                params: Vec::new(),
            }
        } else {
            return MemberId::Unparseable;
        };

        // Constructors are emitted under the method prefix.
        if let Some(marker) = constructor_marker(&path.name) {
            return MemberId::Constructor(MemberPath {
                name: marker.to_string(),
                ..path
            });
        }

        match kind {
            MemberKind::Field => MemberId::Field(path),
            MemberKind::Property => MemberId::Property(path),
            MemberKind::Event => MemberId::Event(path),
            _ => MemberId::Method(path),
        }
    }

    pub fn kind(&self) -> Option<MemberKind> {
        match self {
            MemberId::Type(_) => Some(MemberKind::Type),
            MemberId::Constructor(_) => Some(MemberKind::Constructor),
            MemberId::Field(_) => Some(MemberKind::Field),
            MemberId::Property(_) => Some(MemberKind::Property),
            MemberId::Method(_) => Some(MemberKind::Method),
            MemberId::Event(_) => Some(MemberKind::Event),
            MemberId::Unparseable => None,
        }
    }
}

fn constructor_marker(name: &str) -> Option<&'static str> {
    if name.contains("#cctor") {
        Some(STATIC_CONSTRUCTOR)
    } else if name.contains("#ctor") {
        Some(CONSTRUCTOR)
    } else {
        None
    }
}

/// Split a member name with an optional parenthesized parameter list.
///
/// `Spin(System.Int32,System.String)` → (`Spin`, [`System.Int32`, `System.String`]),
/// `Spin()` and `Spin` → (`Spin`, []).
pub fn extract_parameters(name: &str) -> (&str, Vec<String>) {
    match (name.find('('), name.ends_with(')')) {
        (Some(open), true) => (&name[..open], split_parameters(&name[open + 1..name.len() - 1])),
        _ => (name, Vec::new()),
    }
}

/// Split a parameter list on top-level commas.
///
/// Commas nested in `{}` (generic arguments), `[]` (multi-dimensional
/// arrays) or `()` do not split.
pub fn split_parameters(list: &str) -> Vec<String> {
    if list.trim().is_empty() {
        return Vec::new();
    }
    let mut params = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '{' | '[' | '(' => depth += 1,
            '}' | ']' | ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                params.push(list[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(list[start..].trim().to_string());
    params
}
