use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file (TOML); defaults apply when it is missing.
    #[arg(short, long, default_value = "./pagetree.toml")]
    pub config: PathBuf,

    /// Increase verbosity. Can be used multiple times (e.g., -v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the content tree once and print it
    Index {
        /// Repository root to scan
        path: PathBuf,
    },
    /// Build the content tree, index it and run a single query
    Search {
        /// Repository root to scan
        path: PathBuf,
        /// Keyword query
        query: String,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Watch a repository and keep the content tree and search index in sync
    Watch {
        /// Repository root to watch
        path: PathBuf,
    },
}
