//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::domain::Orientation;

/// Rebuild a feed's plugin instance tree and lay it out for rendering
#[derive(Parser, Debug)]
#[command(name = "feedtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d -d -d)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .feedtree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the instance hierarchy as a tree
    Tree {
        /// JSON file with plugin instances
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// List root instances
    Roots {
        /// JSON file with plugin instances
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print node positions and edge paths as JSON
    Layout {
        /// JSON file with plugin instances
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        opts: LayoutArgs,
        /// Instance id to mark as selected
        #[arg(short, long)]
        selected: Option<u64>,
    },

    /// Report the instance drawn at a point
    Select {
        /// JSON file with plugin instances
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        opts: LayoutArgs,
        #[arg(short, long, allow_negative_numbers = true)]
        x: f64,
        #[arg(short, long, allow_negative_numbers = true)]
        y: f64,
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

/// Overrides for the configured layout
#[derive(clap::Args, Debug, Default, Clone)]
pub struct LayoutArgs {
    /// Canvas width
    #[arg(long)]
    pub width: Option<f64>,
    /// Canvas height
    #[arg(long)]
    pub height: Option<f64>,
    /// top-down or left-right
    #[arg(long)]
    pub orientation: Option<Orientation>,
    /// Pack subtrees by level contours only
    #[arg(long)]
    pub compact: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,
}
