//! Markdown rendering of correlated entities.

pub mod inline;
pub mod section;
pub mod table;

use crate::diagnostics::Diagnostics;
use crate::metadata::correlate::Correlator;
use crate::metadata::TypeRef;
use crate::resolve::Resolver;
use std::path::PathBuf;

/// Everything a renderer needs for one page, passed explicitly.
#[derive(Clone)]
pub struct RenderContext<'a> {
    /// Page being rendered, relative to the output root.
    pub page: PathBuf,
    pub correlator: Correlator<'a>,
    pub resolver: Resolver<'a>,
    pub diagnostics: &'a Diagnostics,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        correlator: Correlator<'a>,
        resolver: Resolver<'a>,
        diagnostics: &'a Diagnostics,
    ) -> Self {
        RenderContext {
            page: PathBuf::new(),
            correlator,
            resolver,
            diagnostics,
        }
    }

    /// The same context, rendering a different page.
    pub fn for_page(&self, page: impl Into<PathBuf>) -> Self {
        RenderContext {
            page: page.into(),
            ..self.clone()
        }
    }

    /// Link to a type from the current page.
    pub fn link(&self, ty: &TypeRef) -> String {
        self.resolver.link(ty, &self.page)
    }

    pub fn link_name(&self, raw: &str) -> String {
        self.resolver.link_name(raw, &self.page)
    }
}
