use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::process::Command;
use tempfile::{NamedTempFile, TempDir};

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_netdoc")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

/// Run against the Acme fixtures, offline, into `dir`.
fn generate(dir: &TempDir) -> assert_cmd::assert::Assert {
    cmd()
        .arg("--offline")
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("Acme.json"))
        .arg(fixture_path("Acme.xml"))
        .assert()
}

fn read(dir: &TempDir, path: &str) -> String {
    fs::read_to_string(dir.path().join(path)).unwrap()
}

// -- pages --

#[test]
fn writes_class_page() {
    let dir = TempDir::new().unwrap();
    generate(&dir).success();

    let expected = fs::read_to_string(fixture_path("Widget.expected.md")).unwrap();
    assert_eq!(read(&dir, "Acme/Widget.md"), expected);
}

#[test]
fn writes_one_page_per_type() {
    let dir = TempDir::new().unwrap();
    generate(&dir).success();

    for page in [
        "Acme/Widget.md",
        "Acme/Result.md",
        "Acme/Color.md",
        "Acme/ChangedHandler.md",
        "Acme/Models/User.md",
    ] {
        assert!(dir.path().join(page).is_file(), "missing {}", page);
    }
}

#[test]
fn member_crefs_render_as_code() {
    let dir = TempDir::new().unwrap();
    generate(&dir).success();

    let result = read(&dir, "Acme/Result.md");
    assert!(result.starts_with("# Struct Result\n\nOutcome of a `Widget.Spin` call.\n"));
    assert!(result.contains("public bool Success { get; }"));
    assert!(result.contains("| System.Boolean | `true` on success. |"));
}

#[test]
fn links_are_relative_across_namespaces() {
    let dir = TempDir::new().unwrap();
    generate(&dir).success();

    let user = read(&dir, "Acme/Models/User.md");
    assert!(user.contains("A user of a [Widget](../Widget.md)."));

    let handler = read(&dir, "Acme/ChangedHandler.md");
    assert!(handler.contains("public delegate void ChangedHandler(User user);"));
    assert!(handler.contains("| [User](Models/User.md) | user | The changed user. |"));
}

#[test]
fn enum_page_lists_values() {
    let dir = TempDir::new().unwrap();
    generate(&dir).success();

    let color = read(&dir, "Acme/Color.md");
    assert!(color.contains("| Red | The red one. |\n| Green |  |\n"));
    assert!(!color.contains("## Fields"));
}

#[test]
fn missing_overload_is_a_warning() {
    let dir = TempDir::new().unwrap();
    generate(&dir)
        .success()
        .stderr(predicate::str::contains("Acme.Models.User.Rename"))
        .stderr(predicate::str::contains("not found in metadata"));

    let user = read(&dir, "Acme/Models/User.md");
    assert_eq!(user.matches("### Rename(").count(), 1);
    assert!(user.contains("| System.String | name | The new name. |"));
    assert!(user.contains("#### Exceptions"));
    assert!(user.contains("`name` is `null`."));
}

#[test]
fn quiet_hides_warnings() {
    let dir = TempDir::new().unwrap();
    cmd()
        .args(["--offline", "-q", "-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("Acme.json"))
        .arg(fixture_path("Acme.xml"))
        .assert()
        .success()
        .stderr(predicate::str::contains("not found in metadata").not());
}

// -- index and dump --

#[test]
fn writes_index_in_namespace_order() {
    let dir = TempDir::new().unwrap();
    generate(&dir).success();

    let index: serde_yaml::Value = serde_yaml::from_str(&read(&dir, "index.yml")).unwrap();
    let sections = index.as_sequence().unwrap();
    assert_eq!(sections.len(), 2);

    let acme = sections[0]["Acme"].as_sequence().unwrap();
    let names: Vec<&str> = acme
        .iter()
        .filter_map(|entry| entry.as_mapping())
        .filter_map(|entry| entry.keys().next())
        .filter_map(|key| key.as_str())
        .collect();
    assert_eq!(names, ["Widget", "Result", "Color", "ChangedHandler"]);
    assert_eq!(
        sections[1]["Acme.Models"][0]["User"],
        serde_yaml::Value::from("Acme/Models/User.md")
    );
}

#[test]
fn writes_debug_dump() {
    let dir = TempDir::new().unwrap();
    generate(&dir).success();

    let dump: serde_json::Value = serde_json::from_str(&read(&dir, "docs.json")).unwrap();
    assert_eq!(dump["Acme"]["Widget"]["documentation"]["summary"], "A widget.");
    assert_eq!(
        dump["Acme"]["Widget"]["children"]["M:Spin()"]["type"],
        "Method"
    );
    assert_eq!(
        dump["Acme.Models"]["User"]["children"]["M:Rename(System.String)"]["documentation"]["param"]["name"],
        "The new name."
    );
}

#[test]
fn custom_artifact_names() {
    let dir = TempDir::new().unwrap();
    cmd()
        .args(["--offline", "-o", dir.path().to_str().unwrap()])
        .args(["--index-name", "nav.yml", "--dump-name", "tree.json"])
        .arg(fixture_path("Acme.json"))
        .arg(fixture_path("Acme.xml"))
        .assert()
        .success();

    assert!(dir.path().join("nav.yml").is_file());
    assert!(dir.path().join("tree.json").is_file());
    assert!(!dir.path().join("index.yml").exists());
}

// -- site config --

#[test]
fn merges_mkdocs_nav() {
    let dir = TempDir::new().unwrap();
    cmd()
        .args(["--offline", "-o", dir.path().to_str().unwrap()])
        .args(["--mkdocs", &fixture_path("mkdocs.yml")])
        .arg(fixture_path("Acme.json"))
        .arg(fixture_path("Acme.xml"))
        .assert()
        .success();

    let site: serde_yaml::Value = serde_yaml::from_str(&read(&dir, "mkdocs.yml")).unwrap();
    assert_eq!(site["site_name"], serde_yaml::Value::from("Acme"));
    let nav = site["nav"].as_sequence().unwrap();
    assert_eq!(nav.len(), 3);
    assert_eq!(nav[0]["Home"], serde_yaml::Value::from("index.md"));
    assert_eq!(
        nav[1]["Acme"][0]["Widget"],
        serde_yaml::Value::from("Acme/Widget.md")
    );
}

#[test]
fn merges_legacy_pages_key() {
    let dir = TempDir::new().unwrap();
    let mut base = NamedTempFile::new().unwrap();
    writeln!(base, "site_name: Legacy\npages:\n  - Home: index.md").unwrap();

    cmd()
        .args(["--offline", "-o", dir.path().to_str().unwrap()])
        .args(["--mkdocs", base.path().to_str().unwrap()])
        .arg(fixture_path("Acme.json"))
        .arg(fixture_path("Acme.xml"))
        .assert()
        .success();

    let site: serde_yaml::Value = serde_yaml::from_str(&read(&dir, "mkdocs.yml")).unwrap();
    assert_eq!(site["pages"].as_sequence().unwrap().len(), 3);
    assert!(site.get("nav").is_none());
}

// -- setup failures --

#[test]
fn missing_docs_file_fails() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    cmd()
        .args(["--offline", "-o", out.to_str().unwrap()])
        .arg(fixture_path("Acme.json"))
        .arg(fixture_path("does-not-exist.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));

    assert!(!out.exists());
}

#[test]
fn malformed_docs_fail_before_writing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let mut docs = NamedTempFile::new().unwrap();
    writeln!(docs, "<?xml version=\"1.0\"?>\n<notdoc><members/></notdoc>").unwrap();

    cmd()
        .args(["--offline", "-o", out.to_str().unwrap()])
        .arg(fixture_path("Acme.json"))
        .arg(docs.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected <doc> root element"));

    assert!(!out.exists());
}

#[test]
fn invalid_manifest_fails() {
    let dir = TempDir::new().unwrap();
    let mut manifest = NamedTempFile::new().unwrap();
    writeln!(manifest, "{{ \"types\": [] }}").unwrap();

    cmd()
        .args(["--offline", "-o", dir.path().to_str().unwrap()])
        .arg(manifest.path())
        .arg(fixture_path("Acme.xml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid metadata manifest"));
}

#[test]
fn requires_both_inputs() {
    cmd()
        .arg(fixture_path("Acme.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("<DOCS>"));
}
