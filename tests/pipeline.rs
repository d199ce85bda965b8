use netdoc::diagnostics::{DiagnosticKind, Diagnostics};
use netdoc::error::SetupError;
use netdoc::metadata::manifest::ManifestProvider;
use netdoc::parser::parse_documentation;
use netdoc::resolve::index::{ExternalRef, LookupError, Offline, ReferenceIndex};
use netdoc::{generate, render_site, Config};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

/// Answers from a fixed table and records every query.
#[derive(Default)]
struct TableIndex {
    entries: HashMap<String, ExternalRef>,
    queries: RefCell<Vec<String>>,
}

impl TableIndex {
    fn with(mut self, full_name: &str, name: &str, url: &str) -> Self {
        self.entries.insert(
            full_name.to_string(),
            ExternalRef {
                name: name.to_string(),
                url: url.to_string(),
            },
        );
        self
    }
}

impl ReferenceIndex for TableIndex {
    fn lookup(&self, full_name: &str) -> Result<Option<ExternalRef>, LookupError> {
        self.queries.borrow_mut().push(full_name.to_string());
        Ok(self.entries.get(full_name).cloned())
    }
}

const WIDGET_DOCS: &str = r#"<?xml version="1.0"?>
<doc>
    <assembly><name>Acme</name></assembly>
    <members>
        <member name="T:Acme.Widget"><summary>A widget.</summary></member>
        <member name="M:Acme.Widget.Spin"><summary>Spins it.</summary></member>
        <member name="M:Acme.Widget.Spin(System.Int32,System.Int32)">
            <summary>Spins it a lot.</summary>
        </member>
        <member name="M:Acme.Widget.Name(System.Int32)">
            <summary>Gets a name.</summary>
            <param name="index">Which one.</param>
            <returns>The name.</returns>
        </member>
        <member name="T:Acme.Result"><summary>An outcome.</summary></member>
    </members>
</doc>"#;

const WIDGET_MANIFEST: &str = r#"{
    "assembly": "Acme",
    "types": [
        {
            "fullName": "Acme.Widget",
            "modifiers": ["public"],
            "methods": [
                { "name": "Spin", "returnType": "Acme.Result", "modifiers": ["public"] },
                {
                    "name": "Spin", "modifiers": ["public"],
                    "parameters": [{ "name": "times", "type": "System.Int32" }]
                },
                {
                    "name": "Name", "returnType": "System.String", "modifiers": ["public"],
                    "parameters": [{ "name": "index", "type": "System.Int32" }]
                }
            ]
        },
        { "fullName": "Acme.Result", "modifiers": ["public"] }
    ]
}"#;

fn render(index: &dyn ReferenceIndex) -> (netdoc::Site, Diagnostics) {
    let provider = ManifestProvider::from_json(WIDGET_MANIFEST).unwrap();
    let mut hierarchy = parse_documentation(WIDGET_DOCS).unwrap().hierarchy;
    let diagnostics = Diagnostics::new();
    let site = render_site(&mut hierarchy, &provider, index, &diagnostics);
    (site, diagnostics)
}

#[test]
fn widget_page_sections_in_order() {
    let (site, _) = render(&Offline);
    let widget = site
        .pages
        .iter()
        .find(|p| p.type_name == "Widget")
        .unwrap();
    let text = &widget.contents;

    let order = [
        "# Class Widget",
        "A widget.",
        "## Methods",
        "### Spin()",
        "Spins it.",
        "```csharp\npublic Result Spin()\n```",
        "#### Returns",
        "[Result](Result.md)",
    ];
    let positions: Vec<usize> = order
        .iter()
        .map(|s| text.find(s).unwrap_or_else(|| panic!("{:?} not in\n{}", s, text)))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", text);
}

#[test]
fn unmatched_overload_warns_once() {
    let (site, diagnostics) = render(&Offline);
    let widget = &site.pages[0].contents;

    assert!(!widget.contains("Spins it a lot."));
    assert_eq!(widget.matches("### Spin(").count(), 1);
    assert_eq!(diagnostics.count(DiagnosticKind::MissingMember), 1);
}

#[test]
fn external_types_link_through_index() {
    let index = TableIndex::default()
        .with("System.Int32", "Int32", "https://docs.example/system.int32")
        .with("System.String", "String", "https://docs.example/system.string");
    let (site, diagnostics) = render(&index);
    let widget = &site.pages[0].contents;

    assert!(widget.contains("### Name(int)"));
    assert!(widget.contains("| [int](https://docs.example/system.int32) | index | Which one. |"));
    assert!(widget.contains("| [string](https://docs.example/system.string) | The name. |"));
    assert_eq!(diagnostics.count(DiagnosticKind::MissingType), 0);
    assert!(!index.queries.borrow().iter().any(|q| q.starts_with("Acme.")));
}

#[test]
fn offline_external_types_are_plain_text() {
    let (site, diagnostics) = render(&Offline);
    let widget = &site.pages[0].contents;

    assert!(widget.contains("| System.Int32 | index | Which one. |"));
    assert!(diagnostics.count(DiagnosticKind::MissingType) >= 2);
}

#[test]
fn generate_writes_everything() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::new(fixture_path("Acme.json"), fixture_path("Acme.xml"));
    config.output = dir.path().join("site");

    let summary = generate(&config, &Offline).unwrap();
    assert_eq!(summary.pages, 5);
    assert_eq!(summary.namespaces, 2);
    assert_eq!(summary.count(DiagnosticKind::MissingMember), 1);
    assert!(summary.count(DiagnosticKind::MissingType) > 0);

    let widget = fs::read_to_string(config.output.join("Acme/Widget.md")).unwrap();
    let expected = fs::read_to_string(fixture_path("Widget.expected.md")).unwrap();
    assert_eq!(widget, expected);
    assert!(config.output.join("index.yml").is_file());
    assert!(config.output.join("docs.json").is_file());
    assert!(!config.output.join("mkdocs.yml").exists());
}

#[test]
fn generate_fails_on_missing_metadata() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::new(
        dir.path().join("missing.json"),
        fixture_path("Acme.xml"),
    );
    config.output = dir.path().join("site");

    let err = generate(&config, &Offline).unwrap_err();
    assert!(matches!(err, SetupError::Read { .. }));
    assert!(!config.output.exists());
}

#[test]
fn generate_fails_on_bad_site_config() {
    let dir = TempDir::new().unwrap();
    let base = dir.path().join("mkdocs.yml");
    fs::write(&base, "nav: not-a-list\n").unwrap();

    let mut config = Config::new(fixture_path("Acme.json"), fixture_path("Acme.xml"));
    config.output = dir.path().join("site");
    config.site_config = Some(base);

    let err = generate(&config, &Offline).unwrap_err();
    assert!(matches!(err, SetupError::SiteLayout(_)));
    assert!(!config.output.exists());
}
