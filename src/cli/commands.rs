//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "t2press")]
#[command(about = "Static site builder for Notion databases", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Site root containing config.toml
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scaffold config.toml and the default theme
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Fetch every published entry and rebuild the output directory
    Build {
        /// Output directory (overrides output_dir in config.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Table header policy (positional, prefix)
        #[arg(long, value_name = "POLICY")]
        table_headers: Option<String>,
    },

    /// Render one page's content HTML to stdout
    Render {
        /// Notion page id
        page_id: String,

        /// Table header policy (positional, prefix)
        #[arg(long, value_name = "POLICY")]
        table_headers: Option<String>,
    },
}
