//! JSON metadata manifest — the production [`MetadataProvider`].
//!
//! ```json
//! {
//!   "assembly": "Acme",
//!   "references": [{ "fullName": "System.String", "assembly": "System.Runtime" }],
//!   "types": [{
//!     "fullName": "Acme.Widget",
//!     "kind": "class",
//!     "modifiers": ["public"],
//!     "methods": [{ "name": "Spin", "returnType": "Acme.Result", "modifiers": ["public"] }]
//!   }]
//! }
//! ```

use super::{generic_parts, MetadataProvider, TypeDef, TypeDescriptor, TypeRef};
use crate::error::{Result, SetupError};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub assembly: String,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default)]
    pub types: Vec<TypeDef>,
}

/// A type outside the described set whose owning assembly is known.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    pub full_name: String,
    pub assembly: String,
}

#[derive(Debug)]
pub struct ManifestProvider {
    assembly: String,
    types: IndexMap<String, TypeDef>,
    /// Every other known type name → owning assembly, if known.
    known: HashMap<String, Option<String>>,
}

impl ManifestProvider {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| SetupError::read(path, e))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(text)?;
        Ok(Self::from_manifest(manifest))
    }

    pub fn from_manifest(manifest: Manifest) -> Self {
        let mut types = IndexMap::new();
        for def in manifest.types {
            types.insert(def.full_name.clone(), def);
        }

        let mut known: HashMap<String, Option<String>> = HashMap::new();
        for def in types.values() {
            for ty in def.signature_types() {
                collect_names(&TypeRef::parse(ty).name, &mut known);
            }
        }
        for reference in manifest.references {
            known.insert(reference.full_name, Some(reference.assembly));
        }
        known.retain(|name, _| !types.contains_key(name));

        debug!(
            assembly = %manifest.assembly,
            types = types.len(),
            referenced = known.len(),
            "loaded metadata manifest"
        );

        ManifestProvider {
            assembly: manifest.assembly,
            types,
            known,
        }
    }
}

/// Record a name and, for generic instantiations, each argument.
fn collect_names(name: &str, known: &mut HashMap<String, Option<String>>) {
    known.entry(name.to_string()).or_insert(None);
    let (_, args) = generic_parts(name);
    for arg in args {
        collect_names(&TypeRef::parse(arg).name, known);
    }
}

impl MetadataProvider for ManifestProvider {
    fn assembly(&self) -> &str {
        &self.assembly
    }

    fn find_type(&self, full_name: &str) -> Option<&TypeDef> {
        self.types.get(full_name)
    }

    fn lookup(&self, full_name: &str) -> Option<TypeDescriptor<'_>> {
        if let Some((name, def)) = self.types.get_key_value(full_name) {
            return Some(TypeDescriptor {
                full_name: name,
                assembly: Some(def.assembly.as_deref().unwrap_or(&self.assembly)),
                definition: Some(def),
            });
        }
        self.known
            .get_key_value(full_name)
            .map(|(name, assembly)| TypeDescriptor {
                full_name: name,
                assembly: assembly.as_deref(),
                definition: None,
            })
    }
}
