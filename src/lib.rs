//! netdoc: cross-linked markdown pages from .NET XML documentation.
//!
//! The pipeline is a single sequential pass:
//!
//! 1. parse the XML documentation file into a [`model::Hierarchy`]
//! 2. load the metadata manifest ([`metadata::manifest::ManifestProvider`])
//! 3. for each namespace, type and member: correlate, render, collect
//! 4. write pages, the navigation index and the debug dump
//!
//! Both inputs are read and validated before anything is written. Problems
//! with single members or references only produce warnings (see
//! [`diagnostics`]).

pub mod assemble;
pub mod diagnostics;
pub mod error;
pub mod metadata;
pub mod model;
pub mod parser;
pub mod render;
pub mod resolve;
pub mod site;

use crate::assemble::Page;
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::{Result, SetupError};
use crate::metadata::correlate::Correlator;
use crate::metadata::manifest::ManifestProvider;
use crate::metadata::MetadataProvider;
use crate::model::Hierarchy;
use crate::render::RenderContext;
use crate::resolve::index::ReferenceIndex;
use crate::resolve::Resolver;
use crate::site::NavIndex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const DEFAULT_OUTPUT: &str = "output";
pub const DEFAULT_INDEX_NAME: &str = "index.yml";
pub const DEFAULT_DUMP_NAME: &str = "docs.json";
/// File name of the merged site config, when one is requested.
pub const SITE_CONFIG_NAME: &str = "mkdocs.yml";

/// Inputs and outputs of one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON metadata manifest.
    pub metadata: PathBuf,
    /// Compiler-emitted XML documentation file.
    pub docs: PathBuf,
    pub output: PathBuf,
    pub index_name: String,
    pub dump_name: String,
    /// Base site config to merge the index into.
    pub site_config: Option<PathBuf>,
}

impl Config {
    pub fn new(metadata: impl Into<PathBuf>, docs: impl Into<PathBuf>) -> Self {
        Config {
            metadata: metadata.into(),
            docs: docs.into(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            index_name: DEFAULT_INDEX_NAME.to_string(),
            dump_name: DEFAULT_DUMP_NAME.to_string(),
            site_config: None,
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub pages: usize,
    pub namespaces: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl Summary {
    pub fn warnings(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind == kind).count()
    }
}

/// Rendered pages and the index, before anything touches the disk.
#[derive(Debug, Clone)]
pub struct Site {
    pub pages: Vec<Page>,
    pub index: NavIndex,
}

/// Render every page in memory.
pub fn render_site(
    hierarchy: &mut Hierarchy,
    provider: &dyn MetadataProvider,
    index: &dyn ReferenceIndex,
    diagnostics: &Diagnostics,
) -> Site {
    let ctx = RenderContext::new(
        Correlator::new(provider),
        Resolver::new(provider, index, diagnostics),
        diagnostics,
    );
    let (pages, index) = assemble::assemble(hierarchy, &ctx);
    Site { pages, index }
}

/// Run the whole pipeline for `config`.
pub fn generate(config: &Config, index: &dyn ReferenceIndex) -> Result<Summary> {
    let provider = ManifestProvider::load(&config.metadata)?;
    let docs_text =
        fs::read_to_string(&config.docs).map_err(|e| SetupError::read(&config.docs, e))?;
    let documentation = parser::parse_documentation(&docs_text)?;
    let site_base = match &config.site_config {
        Some(path) => Some(fs::read_to_string(path).map_err(|e| SetupError::read(path, e))?),
        None => None,
    };

    if let Some(assembly) = &documentation.assembly {
        if assembly != provider.assembly() {
            warn!(
                docs = %assembly,
                metadata = %provider.assembly(),
                "documentation and metadata describe different assemblies"
            );
        }
    }

    let mut hierarchy = documentation.hierarchy;
    debug!(
        namespaces = hierarchy.namespaces.len(),
        types = hierarchy.type_count(),
        "parsed documentation"
    );
    let dump = site::debug_dump(&hierarchy)?;

    let diagnostics = Diagnostics::new();
    let site = render_site(&mut hierarchy, &provider, index, &diagnostics);
    let index_yaml = site.index.to_yaml()?;
    let merged = site_base
        .map(|base| site::merge_site_config(&base, &site.index))
        .transpose()?;

    write_file(&config.output.join(&config.dump_name), &dump)?;
    for page in &site.pages {
        write_file(&config.output.join(&page.path), &page.contents)?;
    }
    write_file(&config.output.join(&config.index_name), &index_yaml)?;
    if let Some(merged) = merged {
        write_file(&config.output.join(SITE_CONFIG_NAME), &merged)?;
    }

    info!(
        pages = site.pages.len(),
        output = %config.output.display(),
        "wrote documentation"
    );

    Ok(Summary {
        pages: site.pages.len(),
        namespaces: site.index.len(),
        diagnostics: diagnostics.entries(),
    })
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SetupError::write(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| SetupError::write(path, e))
}
