//! Site artifacts: navigation index, debug dump and site-config merge.

use crate::error::{Result, SetupError};
use crate::model::Hierarchy;
use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Ordered `[{namespace: [{type: path}, ...]}, ...]`, the shape site
/// generators expect for a nav tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NavIndex {
    sections: Vec<IndexMap<String, Vec<IndexMap<String, String>>>>,
}

impl NavIndex {
    /// Append one namespace with its pages, in the given order.
    pub fn push_namespace(&mut self, namespace: &str, pages: Vec<(String, String)>) {
        let pages = pages
            .into_iter()
            .map(|(name, path)| IndexMap::from([(name, path)]))
            .collect();
        self.sections
            .push(IndexMap::from([(namespace.to_string(), pages)]));
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    fn to_value(&self) -> Result<Vec<Value>> {
        match serde_yaml::to_value(self)? {
            Value::Sequence(items) => Ok(items),
            _ => Ok(Vec::new()),
        }
    }
}

/// `Acme/Models/User.md` regardless of platform separator.
pub fn url_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Pretty JSON of the pre-correlation hierarchy.
pub fn debug_dump(hierarchy: &Hierarchy) -> Result<String> {
    let mut json = serde_json::to_string_pretty(hierarchy)?;
    json.push('\n');
    Ok(json)
}

/// Append the index to a site config's navigation.
///
/// Uses `nav`, or the legacy `pages` key when only that one is present.
pub fn merge_site_config(base: &str, index: &NavIndex) -> Result<String> {
    let mut config: Value = serde_yaml::from_str(base)?;
    if config.is_null() {
        config = Value::Mapping(Mapping::new());
    }
    let Value::Mapping(mapping) = &mut config else {
        return Err(SetupError::SiteLayout(
            "top level is not a mapping".to_string(),
        ));
    };

    let key = if mapping.contains_key("pages") && !mapping.contains_key("nav") {
        "pages"
    } else {
        "nav"
    };
    let entries = index.to_value()?;
    match mapping.get_mut(key) {
        Some(Value::Sequence(nav)) => nav.extend(entries),
        None | Some(Value::Null) => {
            mapping.insert(Value::from(key), Value::Sequence(entries));
        }
        Some(_) => {
            return Err(SetupError::SiteLayout(format!("`{}` is not a list", key)));
        }
    }

    Ok(serde_yaml::to_string(&config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn index() -> NavIndex {
        let mut index = NavIndex::default();
        index.push_namespace(
            "Acme",
            vec![
                ("Widget".to_string(), "Acme/Widget.md".to_string()),
                ("Result".to_string(), "Acme/Result.md".to_string()),
            ],
        );
        index.push_namespace(
            "Acme.Models",
            vec![("User".to_string(), "Acme/Models/User.md".to_string())],
        );
        index
    }

    #[test]
    fn index_yaml_preserves_order() {
        let yaml = index().to_yaml().unwrap();
        let value: Value = serde_yaml::from_str(&yaml).unwrap();
        let sections = value.as_sequence().unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0]["Acme"][0]["Widget"], Value::from("Acme/Widget.md"));
        assert_eq!(sections[0]["Acme"][1]["Result"], Value::from("Acme/Result.md"));
        assert_eq!(sections[1]["Acme.Models"][0]["User"], Value::from("Acme/Models/User.md"));
        assert!(yaml.find("Widget").unwrap() < yaml.find("Result").unwrap());
    }

    #[test]
    fn merge_appends_to_nav() {
        let base = "site_name: Acme\nnav:\n- Home: index.md\n";
        let merged = merge_site_config(base, &index()).unwrap();
        let value: Value = serde_yaml::from_str(&merged).unwrap();
        let nav = value["nav"].as_sequence().unwrap();
        assert_eq!(nav.len(), 3);
        assert_eq!(nav[0]["Home"], Value::from("index.md"));
        assert_eq!(nav[1]["Acme"][0]["Widget"], Value::from("Acme/Widget.md"));
        assert_eq!(value["site_name"], Value::from("Acme"));
    }

    #[test]
    fn merge_prefers_legacy_pages_key() {
        let base = "site_name: Acme\npages:\n- Home: index.md\n";
        let merged = merge_site_config(base, &index()).unwrap();
        let value: Value = serde_yaml::from_str(&merged).unwrap();
        assert_eq!(value["pages"].as_sequence().unwrap().len(), 3);
        assert!(value.get("nav").is_none());
    }

    #[test]
    fn merge_creates_nav() {
        let merged = merge_site_config("site_name: Acme\n", &index()).unwrap();
        let value: Value = serde_yaml::from_str(&merged).unwrap();
        assert_eq!(value["nav"].as_sequence().unwrap().len(), 2);
    }

    #[test]
    fn merge_rejects_non_list_nav() {
        let err = merge_site_config("nav: home.md\n", &index()).unwrap_err();
        assert!(err.to_string().contains("`nav` is not a list"));
    }

    #[test]
    fn url_paths_use_slashes() {
        let path: PathBuf = ["Acme", "Models", "User.md"].iter().collect();
        assert_eq!(url_path(&path), "Acme/Models/User.md");
    }
}
