//! Tabload CLI Library
//!
//! Loads a tabular source into a remote key/attribute collection store.
//!
//! # Overview
//!
//! - **Run**: normalize the source, upload it in batches and validate the
//!   populated collection (`tabload run`)
//! - **Preview**: print the normalized items without contacting the store
//!   (`tabload preview`)
//! - **Validate**: check an existing collection against the source
//!   (`tabload validate`)

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod source;

// Re-export commonly used types
pub use config::Config;
pub use error::{CliError, Result};

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Tabload - tabular source to collection store loader
#[derive(Parser, Debug)]
#[command(name = "tabload")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to ./tabload.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Normalize, upload and validate
    Run {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        remote: RemoteArgs,

        /// Records per upload request
        #[arg(short, long)]
        batch_size: Option<usize>,
    },

    /// Print normalized items as JSON
    Preview {
        #[command(flatten)]
        source: SourceArgs,

        /// Only print the first N items
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Validate an already-populated collection
    Validate {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        remote: RemoteArgs,
    },
}

/// Where the rows come from
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Source CSV file
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Column used as the record key (defaults to the row index)
    #[arg(short = 'k', long)]
    pub primary_key: Option<String>,
}

impl SourceArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref source) = self.source {
            config.source_path = Some(source.clone());
        }
        if let Some(ref key) = self.primary_key {
            config.primary_key = Some(key.clone());
        }
    }
}

/// Which store and collection to talk to
#[derive(Args, Debug, Clone, Default)]
pub struct RemoteArgs {
    /// Collection store base URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Target the production collection
    #[arg(long)]
    pub prod: bool,

    /// Explicit collection name (overrides --prod)
    #[arg(long)]
    pub collection: Option<String>,
}

impl RemoteArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref endpoint) = self.endpoint {
            config.endpoint_base = endpoint.clone();
        }
    }

    /// Resolve the target collection name
    pub fn collection(&self, config: &Config) -> String {
        config
            .collection(self.prod, self.collection.as_deref())
            .to_string()
    }
}
