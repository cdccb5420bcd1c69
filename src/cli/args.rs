//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Strip-subdivision treemaps over weighted hierarchies
#[derive(Parser, Debug)]
#[command(name = "rstreemap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file applied on top of the global one
    #[arg(
        short,
        long,
        global = true,
        env = "RSTREEMAP_CONFIG",
        value_hint = ValueHint::FilePath
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print one line per tile of the treemap
    Layout {
        /// Dataset root (default: configured dataset)
        #[arg(value_hint = ValueHint::AnyPath)]
        path: Option<PathBuf>,
        /// Viewport width (default: configured width)
        #[arg(long)]
        width: Option<u32>,
        /// Viewport height (default: configured height)
        #[arg(long)]
        height: Option<u32>,
    },

    /// Resolve a point to the leaf drawn under it
    Hit {
        /// Dataset root
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
        x: i32,
        y: i32,
        /// Viewport width (default: configured width)
        #[arg(long)]
        width: Option<u32>,
        /// Viewport height (default: configured height)
        #[arg(long)]
        height: Option<u32>,
    },

    /// Show the weighted hierarchy
    Tree {
        /// Dataset root (default: configured dataset)
        #[arg(value_hint = ValueHint::AnyPath)]
        path: Option<PathBuf>,
    },

    /// Run select/delete/grow/shrink commands read from stdin
    Session {
        /// Dataset root (default: configured dataset)
        #[arg(value_hint = ValueHint::AnyPath)]
        path: Option<PathBuf>,
    },

    /// Show effective settings
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
