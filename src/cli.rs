use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Dotted-path configuration tool
///
/// Inspect YAML configuration files by dotted path and seed them from a defaults file
#[derive(Parser, Debug)]
#[command(name = "dotconf")]
#[command(about, long_about = None, version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log filter (e.g. "dotconf=debug")
    #[arg(long, global = true, env = "DOTCONF_LOG", value_name = "FILTER")]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the value stored at a dotted path
    Get {
        /// Configuration file
        file: PathBuf,

        /// Dotted path, e.g. Core.Server.Name
        path: String,

        /// Print every value, one per line
        #[arg(long)]
        list: bool,
    },

    /// List keys below a section
    Keys {
        /// Configuration file
        file: PathBuf,

        /// Section to list (default: the whole document)
        path: Option<String>,

        /// List full relative paths instead of direct children
        #[arg(long)]
        deep: bool,
    },

    /// Seed a configuration file from a defaults file
    Merge {
        /// Configuration file to create or update
        file: PathBuf,

        /// Defaults file
        #[arg(long, value_name = "FILE")]
        defaults: PathBuf,

        /// Skip defaults whose path equals or contains this pattern
        #[arg(long = "ignore", value_name = "PATTERN")]
        ignore: Vec<String>,

        /// Print the merged document instead of writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Print every node in document order
    Dump {
        /// Configuration file
        file: PathBuf,

        /// Emit JSON instead of `path = values` lines
        #[arg(long)]
        json: bool,
    },
}
