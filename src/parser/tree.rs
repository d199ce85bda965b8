//! Documentation tree builder: namespace → type → member.
//!
//! Type entries are first-writer-wins. Members are keyed by kind, name and
//! parameter signature, so overloads never collide; re-documenting the exact
//! same member replaces the earlier entry.

use crate::model::*;
use crate::parser::member_id::{MemberId, MemberPath};
use crate::parser::xml::RawMember;
use tracing::{debug, trace};

/// Build a hierarchy from raw `<member>` entries, in document order.
pub fn build(members: Vec<RawMember>) -> Hierarchy {
    let mut hierarchy = Hierarchy::default();
    for RawMember { id, doc } in members {
        let parsed = MemberId::parse(&id);
        trace!(id = %id, kind = ?parsed.kind(), "member id");
        insert(&mut hierarchy, parsed, doc, &id);
    }
    hierarchy
}

/// Add one parsed entry to the hierarchy. Unparseable IDs are dropped.
pub fn insert(hierarchy: &mut Hierarchy, id: MemberId, doc: DocEntry, raw: &str) {
    match id {
        MemberId::Type(t) => add_type(hierarchy, &t.namespace, &t.name, doc),
        MemberId::Constructor(p) => add_member(hierarchy, MemberKind::Constructor, p, doc),
        MemberId::Field(p) => add_member(hierarchy, MemberKind::Field, p, doc),
        MemberId::Property(p) => add_member(hierarchy, MemberKind::Property, p, doc),
        MemberId::Method(p) => add_member(hierarchy, MemberKind::Method, p, doc),
        MemberId::Event(p) => add_member(hierarchy, MemberKind::Event, p, doc),
        MemberId::Unparseable => debug!(id = %raw, "skipping unparseable member id"),
    }
}

fn add_type(hierarchy: &mut Hierarchy, namespace: &str, name: &str, doc: DocEntry) {
    let node = hierarchy
        .namespaces
        .entry(namespace.to_string())
        .or_default()
        .entry(name.to_string())
        .or_default();
    // A node created by one of its members gets the type documentation once.
    if !node.declared {
        node.declared = true;
        node.documentation = doc;
    }
}

fn add_member(hierarchy: &mut Hierarchy, kind: MemberKind, path: MemberPath, doc: DocEntry) {
    let node = hierarchy
        .namespaces
        .entry(path.namespace)
        .or_default()
        .entry(path.owner)
        .or_default();
    let child = ChildNode {
        name: path.name,
        kind,
        params: path.params,
        documentation: doc,
    };
    node.children.insert(child.key(), child);
}
