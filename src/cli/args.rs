//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Radial drill-down flavor wheel: weighted tree layout, zoom navigation and tasting selections
#[derive(Parser, Debug)]
#[command(name = "flavorwheel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Dataset directory holding .flavorwheel.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub dataset_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the weighted tree
    Tree,

    /// Show static extents of every node
    Layout,

    /// Toggle a leaf selection
    Toggle {
        /// Leaf path, e.g. "Japanese Tea/Aroma/Floral/Jasmine"
        path: String,
    },

    /// Show selections and completion progress
    Status,

    /// Clear all stored selections
    Reset,

    /// Drill to a node and show the visible segments
    View {
        /// Internal node to focus (default: root)
        #[arg(short, long)]
        focus: Option<String>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,

    /// Print config template
    Template,
}
