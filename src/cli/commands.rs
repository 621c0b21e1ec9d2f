//! CLI commands and argument parsing

use crate::types::LoadType;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Windowed paging simulator
#[derive(Parser, Debug)]
#[command(name = "window-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single load
    Load {
        /// Load direction
        #[arg(long = "type", value_enum, default_value = "refresh")]
        load_type: LoadTypeArg,

        /// Anchor or continuation key (required for prepend/append)
        #[arg(long)]
        key: Option<usize>,

        /// Items to request (defaults to the configured sizes)
        #[arg(long)]
        load_size: Option<usize>,

        /// Page size bounding prepends
        #[arg(long)]
        page_size: Option<usize>,

        /// Arm a one-shot fault so this load fails
        #[arg(long)]
        fail_next: bool,
    },

    /// Refresh around an anchor, then load to both boundaries
    Walk {
        /// Refresh anchor key
        #[arg(long)]
        anchor: Option<usize>,

        /// Inject a fault into every Nth load (0 = never)
        #[arg(long, default_value = "0")]
        fail_every: usize,

        /// Keep at most this many pages in the window
        #[arg(long)]
        max_pages: Option<usize>,

        /// Number of generations to walk, replacing the engine each time
        #[arg(long, default_value = "1")]
        generations: u32,

        /// Stop after this many extension rounds
        #[arg(long, default_value = "100")]
        max_rounds: usize,
    },

    /// Print the effective configuration
    Config,
}

/// Load direction argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LoadTypeArg {
    /// Initial or re-anchoring load
    Refresh,
    /// Extend toward lower indices
    Prepend,
    /// Extend toward higher indices
    Append,
}

impl From<LoadTypeArg> for LoadType {
    fn from(arg: LoadTypeArg) -> Self {
        match arg {
            LoadTypeArg::Refresh => LoadType::Refresh,
            LoadTypeArg::Prepend => LoadType::Prepend,
            LoadTypeArg::Append => LoadType::Append,
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_load() {
        let cli = Cli::parse_from([
            "window-pager",
            "load",
            "--type",
            "append",
            "--key",
            "20",
            "--fail-next",
        ]);
        match cli.command {
            Commands::Load {
                load_type,
                key,
                fail_next,
                ..
            } => {
                assert_eq!(LoadType::from(load_type), LoadType::Append);
                assert_eq!(key, Some(20));
                assert!(fail_next);
            }
            other => panic!("Expected Load, got {other:?}"),
        }
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_walk_with_globals() {
        let cli = Cli::parse_from([
            "window-pager",
            "walk",
            "--anchor",
            "30",
            "--generations",
            "2",
            "-f",
            "pretty",
            "-C",
            "pager.yaml",
        ]);
        assert_eq!(cli.format, OutputFormat::Pretty);
        assert_eq!(cli.config, Some(PathBuf::from("pager.yaml")));
        assert!(matches!(
            cli.command,
            Commands::Walk {
                anchor: Some(30),
                generations: 2,
                fail_every: 0,
                ..
            }
        ));
    }
}
