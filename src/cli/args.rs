//! CLI argument definitions using clap
//!
//! Commands:
//! - quilldb init --config <path>
//! - quilldb seed --config <path>
//! - quilldb exec --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// quilldb - an embedded store for categorized posts
#[derive(Parser, Debug)]
#[command(name = "quilldb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory and an empty record file
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./quilldb.json")]
        config: PathBuf,
    },

    /// Fill an empty store with sample categories and posts
    Seed {
        /// Path to configuration file
        #[arg(long, default_value = "./quilldb.json")]
        config: PathBuf,
    },

    /// Read JSON requests from stdin, one per line, and answer each on stdout
    Exec {
        /// Path to configuration file
        #[arg(long, default_value = "./quilldb.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exec_with_config() {
        let cli = Cli::try_parse_from(["quilldb", "exec", "--config", "/etc/quill.json"]).unwrap();
        match cli.command {
            Command::Exec { config } => assert_eq!(config, PathBuf::from("/etc/quill.json")),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_config_default_path() {
        let cli = Cli::try_parse_from(["quilldb", "init"]).unwrap();
        match cli.command {
            Command::Init { config } => assert_eq!(config, PathBuf::from("./quilldb.json")),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
