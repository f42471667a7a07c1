// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Options that pick the source (repository, branch, suffix, API URL) are
// global, so they can go before or after the subcommand:
//
//   getignore list
//   getignore get Go Global/Vim -o .gitignore
//   getignore --branch main get Rust
//
// Rust concepts:
// - Derive macros: clap generates the parser from the struct
// - ArgAction::Count: -v, -vv, -vvv become a number
// =============================================================================

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::{DEFAULT_API_URL, DEFAULT_BRANCH, DEFAULT_REPOSITORY, DEFAULT_SUFFIX};

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "getignore",
    version,
    about = "Fetch gitignore templates from GitHub and merge them into one file",
    long_about = "getignore lists the templates in a GitHub repository (github/gitignore by default) \
                  and downloads the ones you name, merging them into a single .gitignore."
)]
pub struct Cli {
    /// Repository holding the templates, as OWNER/NAME
    #[arg(long, global = true, default_value = DEFAULT_REPOSITORY)]
    pub repo: String,

    /// Branch to read the templates from
    #[arg(long, global = true, default_value = DEFAULT_BRANCH)]
    pub branch: String,

    /// File suffix that marks a template
    #[arg(long, global = true, default_value = DEFAULT_SUFFIX)]
    pub suffix: String,

    /// Base URL of the GitHub REST API (include /api/v3/ for GitHub Enterprise)
    #[arg(long, global = true, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// API token; falls back to the GITHUB_TOKEN environment variable
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Give up on remote calls after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// More logging on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the templates available on the branch
    List {
        /// Print the list as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Download templates and merge them into one file
    ///
    /// Example: getignore get Go Global/Vim -o .gitignore
    Get {
        /// Template names, with or without the suffix (e.g. Go, Global/Vim)
        #[arg(required = true)]
        names: Vec<String>,

        /// Write the merged file here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
