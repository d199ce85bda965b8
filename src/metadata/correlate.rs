//! Matching documentation entries to metadata descriptors.

use super::{canonical, nested_forms, MetadataProvider, MethodDef, TypeDef, TypeKind, TypeRef};
use super::{EventDef, FieldDef, PropertyDef};
use crate::model::{ChildNode, MemberKind, ObjectKind};
use crate::parser::member_id::STATIC_CONSTRUCTOR;
use thiserror::Error;

/// A documented member with no matching descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} `{owner}.{name}` not found in metadata: {reason}")]
pub struct MissingMember {
    pub owner: String,
    pub kind: MemberKind,
    pub name: String,
    pub reason: String,
}

/// A correlated member descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Member<'a> {
    Constructor(&'a MethodDef),
    Field(&'a FieldDef),
    Property(&'a PropertyDef),
    Method(&'a MethodDef),
    Event(&'a EventDef),
}

/// A correlated type: its descriptor and how its page is shaped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelatedType<'a> {
    pub definition: &'a TypeDef,
    pub kind: ObjectKind,
}

#[derive(Clone, Copy)]
pub struct Correlator<'a> {
    provider: &'a dyn MetadataProvider,
}

impl<'a> Correlator<'a> {
    pub fn new(provider: &'a dyn MetadataProvider) -> Self {
        Correlator { provider }
    }

    /// Look up a documented type by its qualified name, retrying with the
    /// nested-type separator when the plain name is unknown.
    pub fn correlate_type(&self, namespace: &str, name: &str) -> Option<CorrelatedType<'a>> {
        let qualified = format!("{}.{}", namespace, name);
        if let Some(definition) = self.provider.find_type(&qualified) {
            return Some(CorrelatedType {
                definition,
                kind: object_kind(definition),
            });
        }
        nested_forms(&qualified)
            .iter()
            .find_map(|form| self.provider.find_type(form))
            .map(|definition| CorrelatedType {
                definition,
                kind: object_kind(definition),
            })
    }

    /// Resolve a parameter type name from a member ID to the provider's
    /// spelling. An exact match keeps generic instantiations distinct
    /// (`List{System.Int32}` vs `List{System.String}`); otherwise the
    /// canonical form is used.
    pub fn resolve_parameter(&self, raw: &str) -> Option<TypeRef> {
        let parsed = TypeRef::parse(raw);
        let name = match self.provider.lookup(&parsed.name) {
            Some(found) => found.full_name.to_string(),
            None => canonical(self.provider, &parsed.name)?.full_name.to_string(),
        };
        Some(TypeRef {
            name,
            rank: parsed.rank,
        })
    }

    /// Find the descriptor for a documented member of `owner`.
    pub fn member(&self, owner: &'a TypeDef, child: &ChildNode) -> Result<Member<'a>, MissingMember> {
        let missing = |reason: String| MissingMember {
            owner: owner.full_name.clone(),
            kind: child.kind,
            name: child.name.clone(),
            reason,
        };

        match child.kind {
            MemberKind::Constructor => {
                let wants_static = child.name == STATIC_CONSTRUCTOR;
                let candidates = owner
                    .constructors
                    .iter()
                    .filter(|c| c.is_static() == wants_static);
                self.overload(candidates, &child.params)
                    .map_err(missing)
                    .map(Member::Constructor)
            }
            MemberKind::Method => {
                let candidates = owner.methods.iter().filter(|m| m.name == child.name);
                self.overload(candidates, &child.params)
                    .map_err(missing)
                    .map(Member::Method)
            }
            MemberKind::Field => owner
                .fields
                .iter()
                .find(|f| f.name == child.name)
                .map(Member::Field)
                .ok_or_else(|| missing("no field with this name".to_string())),
            MemberKind::Property => owner
                .properties
                .iter()
                .find(|p| p.name == child.name)
                .map(Member::Property)
                .ok_or_else(|| missing("no property with this name".to_string())),
            MemberKind::Event => owner
                .events
                .iter()
                .find(|e| e.name == child.name)
                .map(Member::Event)
                .ok_or_else(|| missing("no event with this name".to_string())),
            MemberKind::Type => Err(missing("types are not members".to_string())),
        }
    }

    /// Pick the overload whose parameter types match exactly.
    fn overload<I>(&self, candidates: I, params: &[String]) -> Result<&'a MethodDef, String>
    where
        I: Iterator<Item = &'a MethodDef>,
    {
        let mut wanted = Vec::with_capacity(params.len());
        for raw in params {
            match self.resolve_parameter(raw) {
                Some(resolved) => wanted.push(resolved),
                None => return Err(format!("unknown parameter type `{}`", raw)),
            }
        }

        let mut seen = 0;
        for candidate in candidates {
            seen += 1;
            if candidate.parameters.len() != wanted.len() {
                continue;
            }
            let matches = candidate
                .parameters
                .iter()
                .zip(&wanted)
                .all(|(p, w)| TypeRef::parse(&p.ty) == *w);
            if matches {
                return Ok(candidate);
            }
        }

        if seen == 0 {
            Err("no overload with this name".to_string())
        } else {
            Err(format!(
                "none of {} overload(s) takes ({})",
                seen,
                params.join(", ")
            ))
        }
    }
}

/// Page shape from descriptor flags.
pub fn object_kind(definition: &TypeDef) -> ObjectKind {
    match definition.kind {
        TypeKind::Enum => ObjectKind::Enum,
        TypeKind::Delegate => ObjectKind::Delegate,
        _ => ObjectKind::Class,
    }
}
