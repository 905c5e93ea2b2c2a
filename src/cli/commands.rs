use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// hssh - collect SSH host definitions from host files
#[derive(Parser, Debug)]
#[command(name = "hssh")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding settings.toml
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the connections found in the given host files
    Show {
        /// Host files to parse
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Collect connections from every file in the host folder
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print a host file as canonical SSH config blocks
    Render {
        /// Host file to render
        file: PathBuf,
    },
}
