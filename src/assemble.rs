//! Document assembler: one page per documented type, plus the nav index.
//!
//! Iteration is strictly nested (namespace, type, member) and never
//! reordered, so page contents and the index are deterministic.

use crate::diagnostics::DiagnosticKind;
use crate::metadata::correlate::CorrelatedType;
use crate::model::{Hierarchy, HierarchyNode, MemberKind, ObjectKind};
use crate::render::inline::convert;
use crate::render::section;
use crate::render::RenderContext;
use crate::resolve::page_path;
use crate::site::{url_path, NavIndex};
use std::path::PathBuf;
use tracing::debug;

/// Bases that say nothing about a type.
const TRIVIAL_BASES: &[&str] = &[
    "System.Object",
    "System.ValueType",
    "System.Enum",
    "System.Delegate",
    "System.MulticastDelegate",
];

/// Level-2 sections of a type page, in page order.
const SECTIONS: [MemberKind; 5] = [
    MemberKind::Constructor,
    MemberKind::Field,
    MemberKind::Property,
    MemberKind::Method,
    MemberKind::Event,
];

/// A rendered type page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Relative to the output root.
    pub path: PathBuf,
    pub namespace: String,
    pub type_name: String,
    pub contents: String,
}

/// Render every documented type that has metadata.
///
/// Node kinds are filled in from correlation as a side effect.
pub fn assemble(hierarchy: &mut Hierarchy, ctx: &RenderContext) -> (Vec<Page>, NavIndex) {
    let mut pages = Vec::new();
    let mut index = NavIndex::default();

    for (namespace, types) in hierarchy.namespaces.iter_mut() {
        let mut entries = Vec::new();
        for (type_name, node) in types.iter_mut() {
            let Some(correlated) = ctx.correlator.correlate_type(namespace, type_name) else {
                ctx.diagnostics.warn(
                    DiagnosticKind::MissingMember,
                    format!("type `{}.{}` not found in metadata", namespace, type_name),
                );
                continue;
            };
            node.kind = correlated.kind;

            let path = page_path(&correlated.definition.full_name);
            let page_ctx = ctx.for_page(&path);
            let contents = render_page(&page_ctx, correlated, node);
            debug!(path = %path.display(), "rendered page");

            entries.push((type_name.clone(), url_path(&path)));
            pages.push(Page {
                path,
                namespace: namespace.clone(),
                type_name: type_name.clone(),
                contents,
            });
        }
        if entries.is_empty() {
            continue;
        }
        index.push_namespace(namespace, entries);
    }

    (pages, index)
}

/// Full markdown of one type page.
pub fn render_page(ctx: &RenderContext, correlated: CorrelatedType, node: &HierarchyNode) -> String {
    let definition = correlated.definition;
    let mut blocks: Vec<String> = Vec::new();

    if correlated.kind == ObjectKind::Class {
        let base = definition
            .base_type
            .as_deref()
            .filter(|base| !TRIVIAL_BASES.contains(base));
        if let Some(base) = base {
            blocks.push(format!("Inherits: {}", ctx.link_name(base)));
        }
    }

    blocks.push(format!(
        "# {} {}",
        capitalize(definition.kind.keyword()),
        definition.name()
    ));

    if correlated.kind == ObjectKind::Delegate {
        push_fragment(&mut blocks, section::delegate(ctx, definition, &node.documentation));
        return finish(blocks);
    }

    let summary = convert(node.documentation.text_or_empty("summary"), ctx);
    if !summary.is_empty() {
        blocks.push(summary);
    }

    if correlated.kind == ObjectKind::Enum {
        push_fragment(&mut blocks, section::enumeration(ctx, definition, node));
        return finish(blocks);
    }

    for kind in SECTIONS {
        let fragments: Vec<String> = node
            .children
            .values()
            .filter(|child| child.kind == kind)
            .map(|child| section::render_member(ctx, definition, child))
            .filter(|fragment| !fragment.is_empty())
            .collect();
        if fragments.is_empty() {
            continue;
        }
        blocks.push(format!("## {}", kind.section_title()));
        for fragment in fragments {
            push_fragment(&mut blocks, fragment);
        }
    }

    finish(blocks)
}

fn push_fragment(blocks: &mut Vec<String>, fragment: String) {
    let fragment = fragment.trim_end();
    if !fragment.is_empty() {
        blocks.push(fragment.to_string());
    }
}

fn finish(blocks: Vec<String>) -> String {
    blocks.join("\n\n") + "\n"
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
