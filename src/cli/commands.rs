//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Vid Club extraction CLI
#[derive(Parser, Debug)]
#[command(name = "vidclub-extract")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
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
    /// Extract one source into a deduplicated table
    Extract {
        /// Source to extract (jobs, product, company, survey)
        #[arg(short, long)]
        source: String,

        /// First day, YYYY-MM-DD
        #[arg(long)]
        from: String,

        /// Last day, YYYY-MM-DD (default: today)
        #[arg(long)]
        to: Option<String>,

        /// Items per page
        #[arg(long)]
        limit: Option<u32>,

        /// Region filter ("all" or a two-letter code)
        #[arg(long)]
        region: Option<String>,

        /// Behaviour on an empty result (fail, skip, warn)
        #[arg(long)]
        if_empty: Option<String>,

        /// Maximum days per request window
        #[arg(long)]
        max_span_days: Option<u32>,

        /// Output file (required for parquet)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List supported sources
    Sources,

    /// Validate the configuration and credentials without calling the API
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
    /// Parquet file
    Parquet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extract() {
        let cli = Cli::try_parse_from([
            "vidclub-extract",
            "-C",
            "vidclub.yaml",
            "extract",
            "--source",
            "jobs",
            "--from",
            "2023-01-01",
            "--limit",
            "50",
            "--if-empty",
            "warn",
            "--format",
            "pretty",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("vidclub.yaml")));
        assert_eq!(cli.format, OutputFormat::Pretty);
        match cli.command {
            Commands::Extract {
                source,
                from,
                to,
                limit,
                if_empty,
                ..
            } => {
                assert_eq!(source, "jobs");
                assert_eq!(from, "2023-01-01");
                assert_eq!(to, None);
                assert_eq!(limit, Some(50));
                assert_eq!(if_empty.as_deref(), Some("warn"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_extract_requires_source_and_from() {
        assert!(Cli::try_parse_from(["vidclub-extract", "extract", "--from", "2023-01-01"]).is_err());
        assert!(Cli::try_parse_from(["vidclub-extract", "extract", "--source", "jobs"]).is_err());
    }
}
