use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::scripts::ScriptKind;

/// kkm-patch - one-time regex edits for the KKM source tree
#[derive(Parser)]
#[command(name = "kkm-patch")]
#[command(about = "Apply one-time regex maintenance edits to the KKM source tree")]
#[command(version)]
pub struct Cli {
    /// Project root that script targets are relative to
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Show what would change without writing any file
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Fail if any rule matches nothing
    #[arg(long, global = true)]
    pub strict: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a built-in patch script
    Run {
        /// Script name (see `list`)
        script: ScriptKind,
    },
    /// Run a patch plan from a JSON file
    Apply {
        /// Path to the plan file
        plan: PathBuf,
    },
    /// Validate a patch plan file without running it
    Validate {
        /// Path to the plan file
        plan: PathBuf,
    },
    /// List built-in scripts
    List,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }
}
