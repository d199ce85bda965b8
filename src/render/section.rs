//! Section renderer: one markdown fragment per correlated entity.
//!
//! Every fragment follows the same layout:
//!
//! 1. `### Title`
//! 2. summary
//! 3. fenced C# declaration
//! 4. remarks, example
//! 5. tables: parameters, returns / value, exceptions
//!
//! Enums replace everything after the header with a table of enumerators.
//! A member that cannot be correlated renders as "" with one warning.

use crate::diagnostics::DiagnosticKind;
use crate::metadata::correlate::Member;
use crate::metadata::{
    EventDef, FieldDef, MethodDef, Parameter, PropertyDef, TypeDef, TypeRef,
};
use crate::model::{ChildNode, DocEntry, HierarchyNode, MemberKind};
use crate::render::inline::convert;
use crate::render::table::Table;
use crate::render::RenderContext;
use crate::resolve::display_name;

/// Render a documented member of `owner`.
pub fn render_member(ctx: &RenderContext, owner: &TypeDef, child: &ChildNode) -> String {
    let doc = &child.documentation;
    match ctx.correlator.member(owner, child) {
        Ok(Member::Constructor(ctor)) => constructor(ctx, owner, ctor, doc),
        Ok(Member::Method(method_def)) => method(ctx, method_def, doc),
        Ok(Member::Field(field_def)) => field(ctx, field_def, doc),
        Ok(Member::Property(property_def)) => property(ctx, property_def, doc),
        Ok(Member::Event(event_def)) => event(ctx, event_def, doc),
        Err(missing) => {
            ctx.diagnostics
                .warn(DiagnosticKind::MissingMember, missing.to_string());
            String::new()
        }
    }
}

pub fn constructor(ctx: &RenderContext, owner: &TypeDef, ctor: &MethodDef, doc: &DocEntry) -> String {
    let mut fragment = Fragment::new(ctx, doc, call_title(owner.name(), &ctor.parameters));
    fragment.summary();
    fragment.declaration(signature(&ctor.modifiers, None, owner.name(), &ctor.parameters));
    fragment.remarks();
    fragment.parameters(&ctor.parameters);
    fragment.exceptions();
    fragment.finish()
}

pub fn method(ctx: &RenderContext, method: &MethodDef, doc: &DocEntry) -> String {
    let mut fragment = Fragment::new(ctx, doc, call_title(&method.name, &method.parameters));
    fragment.summary();
    fragment.declaration(signature(
        &method.modifiers,
        Some(&method.return_type),
        &method.name,
        &method.parameters,
    ));
    fragment.remarks();
    fragment.parameters(&method.parameters);
    fragment.returns(&method.return_type);
    fragment.exceptions();
    fragment.finish()
}

pub fn field(ctx: &RenderContext, field: &FieldDef, doc: &DocEntry) -> String {
    let mut fragment = Fragment::new(ctx, doc, field.name.clone());
    fragment.summary();
    fragment.declaration(format!(
        "{}{} {};",
        modifier_prefix(&field.modifiers),
        display_name(&field.ty),
        field.name
    ));
    fragment.remarks();
    fragment.value(&field.ty);
    fragment.exceptions();
    fragment.finish()
}

pub fn property(ctx: &RenderContext, property: &PropertyDef, doc: &DocEntry) -> String {
    let mut fragment = Fragment::new(ctx, doc, property.name.clone());
    fragment.summary();
    let accessors: String = property
        .accessors
        .iter()
        .map(|a| format!("{}; ", a))
        .collect();
    fragment.declaration(format!(
        "{}{} {} {{ {}}}",
        modifier_prefix(&property.modifiers),
        display_name(&property.ty),
        property.name,
        accessors
    ));
    fragment.remarks();
    fragment.value(&property.ty);
    fragment.exceptions();
    fragment.finish()
}

pub fn event(ctx: &RenderContext, event: &EventDef, doc: &DocEntry) -> String {
    let mut fragment = Fragment::new(ctx, doc, event.name.clone());
    fragment.summary();
    fragment.declaration(format!(
        "{}event {} {};",
        modifier_prefix(&event.modifiers),
        display_name(&event.ty),
        event.name
    ));
    fragment.remarks();
    fragment.exceptions();
    fragment.finish()
}

/// A delegate's signature section. Needs the `invoke` descriptor.
pub fn delegate(ctx: &RenderContext, definition: &TypeDef, doc: &DocEntry) -> String {
    let Some(invoke) = &definition.invoke else {
        ctx.diagnostics.warn(
            DiagnosticKind::MissingMember,
            format!(
                "delegate `{}` has no invoke signature in metadata",
                definition.full_name
            ),
        );
        return String::new();
    };

    let mut fragment = Fragment::new(ctx, doc, call_title(definition.name(), &invoke.parameters));
    fragment.summary();
    let modifiers = if definition.modifiers.is_empty() {
        &invoke.modifiers
    } else {
        &definition.modifiers
    };
    fragment.declaration(format!(
        "{}delegate {} {}({});",
        modifier_prefix(modifiers),
        display_name(&invoke.return_type),
        definition.name(),
        parameter_list(&invoke.parameters)
    ));
    fragment.remarks();
    fragment.parameters(&invoke.parameters);
    fragment.returns(&invoke.return_type);
    fragment.exceptions();
    fragment.finish()
}

/// An enum's enumerators, described by the matching field documentation.
pub fn enumeration(ctx: &RenderContext, definition: &TypeDef, node: &HierarchyNode) -> String {
    let mut table = Table::new(&["Name", "Description"]);
    for value in &definition.values {
        let summary = node
            .child_doc(MemberKind::Field, &value.name)
            .map(|doc| convert(doc.text_or_empty("summary"), ctx))
            .unwrap_or_default();
        table.row([value.name.clone(), summary]);
    }
    let mut blocks = vec!["### Values".to_string()];
    if !table.is_empty() {
        blocks.push(table.render().trim_end().to_string());
    }
    blocks.join("\n\n") + "\n"
}

// -- Fragment builder ---------------------------------------------------------

struct Fragment<'c, 'a> {
    ctx: &'c RenderContext<'a>,
    doc: &'c DocEntry,
    blocks: Vec<String>,
}

impl<'c, 'a> Fragment<'c, 'a> {
    fn new(ctx: &'c RenderContext<'a>, doc: &'c DocEntry, title: String) -> Self {
        Fragment {
            ctx,
            doc,
            blocks: vec![format!("### {}", title)],
        }
    }

    /// Converted content of a plain tag, if any.
    fn tag(&self, tag: &str) -> Option<String> {
        self.doc
            .get(tag)
            .map(|text| convert(text, self.ctx))
            .filter(|text| !text.is_empty())
    }

    fn summary(&mut self) {
        if let Some(text) = self.tag("summary") {
            self.blocks.push(text);
        }
    }

    fn declaration(&mut self, declaration: String) {
        self.blocks.push(format!("```csharp\n{}\n```", declaration));
    }

    fn remarks(&mut self) {
        if let Some(text) = self.tag("remarks") {
            self.blocks.push(text);
        }
        if let Some(text) = self.tag("example") {
            self.blocks.push("#### Example".to_string());
            self.blocks.push(text);
        }
    }

    /// Parameter table in declaration order. Skipped without `<param>` docs.
    fn parameters(&mut self, parameters: &[Parameter]) {
        if parameters.is_empty() || !self.doc.has_params() {
            return;
        }
        let mut table = Table::new(&["Type", "Name", "Description"]);
        for parameter in parameters {
            let description = self
                .doc
                .param(&parameter.name)
                .map(|text| convert(text, self.ctx))
                .unwrap_or_default();
            table.row([
                self.ctx.link_name(&parameter.ty),
                parameter.name.clone(),
                description,
            ]);
        }
        self.table("Parameters", table);
    }

    fn returns(&mut self, return_type: &str) {
        let ty = TypeRef::parse(return_type);
        if ty.is_void() {
            return;
        }
        let mut table = Table::new(&["Type", "Description"]);
        table.row([self.ctx.link(&ty), self.tag("returns").unwrap_or_default()]);
        self.table("Returns", table);
    }

    fn value(&mut self, ty: &str) {
        let mut table = Table::new(&["Type", "Description"]);
        table.row([self.ctx.link_name(ty), self.tag("value").unwrap_or_default()]);
        self.table("Value", table);
    }

    fn exceptions(&mut self) {
        let Some(exceptions) = self.doc.named("exception") else {
            return;
        };
        let mut table = Table::new(&["Type", "Condition"]);
        for (cref, text) in exceptions {
            let name = cref.split_once(':').map_or(cref.as_str(), |(_, name)| name);
            table.row([self.ctx.link_name(name), convert(text, self.ctx)]);
        }
        if !table.is_empty() {
            self.table("Exceptions", table);
        }
    }

    fn table(&mut self, heading: &str, table: Table) {
        self.blocks.push(format!("#### {}", heading));
        self.blocks.push(table.render().trim_end().to_string());
    }

    fn finish(self) -> String {
        self.blocks.join("\n\n") + "\n"
    }
}

// -- Declarations -------------------------------------------------------------

fn modifier_prefix(modifiers: &[String]) -> String {
    modifiers.iter().map(|m| format!("{} ", m)).collect()
}

fn parameter_list(parameters: &[Parameter]) -> String {
    parameters
        .iter()
        .map(|p| format!("{} {}", display_name(&p.ty), p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `public Result Spin(int times)`
fn signature(modifiers: &[String], return_type: Option<&str>, name: &str, parameters: &[Parameter]) -> String {
    let returns = return_type
        .map(|r| format!("{} ", display_name(r)))
        .unwrap_or_default();
    format!(
        "{}{}{}({})",
        modifier_prefix(modifiers),
        returns,
        name,
        parameter_list(parameters)
    )
}

/// `Spin(int, string)`
fn call_title(name: &str, parameters: &[Parameter]) -> String {
    let types: Vec<String> = parameters.iter().map(|p| display_name(&p.ty)).collect();
    format!("{}({})", name, types.join(", "))
}
