//! netdoc — generate cross-linked markdown pages from a .NET XML
//! documentation file and a metadata manifest.
//!
//! `netdoc Acme.json Acme.xml -o docs/api --mkdocs mkdocs.yml`

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use netdoc::diagnostics::DiagnosticKind;
use netdoc::resolve::index::{Cached, Offline, ReferenceIndex, XrefService, DEFAULT_XREF_URL};
use netdoc::{Config, DEFAULT_DUMP_NAME, DEFAULT_INDEX_NAME, DEFAULT_OUTPUT};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the verbosity flags.
const LOG_ENV: &str = "NETDOC_LOG";

#[derive(Parser)]
#[command(
    name = "netdoc",
    version,
    about = "Generate markdown API pages from .NET XML documentation"
)]
struct Cli {
    /// Metadata manifest (JSON) of the documented assembly
    metadata: PathBuf,

    /// XML documentation file emitted by the compiler
    docs: PathBuf,

    /// Output directory
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// More output (-v debug, -vv trace)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,

    /// Only report errors
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,

    /// Do not query the external reference index; external types render
    /// as plain text
    #[arg(long)]
    offline: bool,

    /// Query endpoint of the external reference index
    #[arg(long, default_value = DEFAULT_XREF_URL)]
    xref_url: String,

    /// Site config to merge the navigation index into; the result is
    /// written to <OUTPUT>/mkdocs.yml
    #[arg(long)]
    mkdocs: Option<PathBuf>,

    /// File name of the navigation index
    #[arg(long, default_value = DEFAULT_INDEX_NAME)]
    index_name: String,

    /// File name of the documentation dump
    #[arg(long, default_value = DEFAULT_DUMP_NAME)]
    dump_name: String,
}

impl Cli {
    fn log_level(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }

    fn config(&self) -> Config {
        Config {
            metadata: self.metadata.clone(),
            docs: self.docs.clone(),
            output: self.output.clone(),
            index_name: self.index_name.clone(),
            dump_name: self.dump_name.clone(),
            site_config: self.mkdocs.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let index: Box<dyn ReferenceIndex> = if cli.offline {
        Box::new(Cached::new(Offline))
    } else {
        Box::new(Cached::new(XrefService::new(cli.xref_url.as_str())))
    };

    let summary = netdoc::generate(&cli.config(), index.as_ref())
        .with_context(|| format!("failed to generate documentation from {}", cli.docs.display()))?;

    info!(
        pages = summary.pages,
        namespaces = summary.namespaces,
        warnings = summary.warnings(),
        missing_members = summary.count(DiagnosticKind::MissingMember),
        missing_types = summary.count(DiagnosticKind::MissingType),
        failed_lookups = summary.count(DiagnosticKind::ExternalLookup),
        "done"
    );
    Ok(())
}
