//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// toolset - reconcile the tool lists of managed C/C++ builds
#[derive(Parser)]
#[command(name = "toolset")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile a resource's tools with a requested tool list
    Plan(PlanArgs),

    /// Analyse every resource of a configuration
    Check(CheckArgs),

    /// Replace the tool-chain of a folder
    Switch(SwitchArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Where the project comes from.
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to the project manifest
    #[arg(short, long, env = "TOOLSET_MANIFEST", default_value = "project.toml")]
    pub manifest: PathBuf,

    /// Configuration id or name
    #[arg(short, long)]
    pub config: String,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Resource path (`/` for the root folder)
    #[arg(short, long, default_value = "/")]
    pub resource: String,

    /// Complete requested tool list
    #[arg(long, value_delimiter = ',', num_args = 0.., conflicts_with_all = ["add", "remove"])]
    pub to: Option<Vec<String>>,

    /// Tools to add to the current list
    #[arg(long, value_delimiter = ',')]
    pub add: Vec<String>,

    /// Tools to remove from the current list
    #[arg(long, value_delimiter = ',')]
    pub remove: Vec<String>,

    /// Commit the resulting tools
    #[arg(long)]
    pub apply: bool,

    /// Do not pair tools through converters
    #[arg(long)]
    pub no_converters: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

#[derive(Args)]
pub struct SwitchArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Folder path (`/` for the root folder)
    #[arg(short, long, default_value = "/")]
    pub resource: String,

    /// Catalog tool-chain to switch to
    #[arg(short, long)]
    pub tool_chain: String,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
