//! CLI runner - executes commands

use crate::auth::{Credentials, TOKEN_ENV, URL_ENV};
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ExtractorConfig;
use crate::engine::{ExtractRequest, Extraction, Extractor, LogLevel, Message};
use crate::error::{Error, Result, ResultExt};
use crate::output::{write_json_file, write_parquet};
use crate::types::Source;
use serde_json::{json, Value};
use std::path::Path;

/// Options of the `extract` command
#[derive(Debug, Clone, Default)]
pub struct ExtractArgs<'a> {
    /// Source name
    pub source: &'a str,
    /// First day
    pub from: &'a str,
    /// Last day
    pub to: Option<&'a str>,
    /// Items per page override
    pub limit: Option<u32>,
    /// Region override
    pub region: Option<&'a str>,
    /// Empty-result mode override
    pub if_empty: Option<&'a str>,
    /// Window size override
    pub max_span_days: Option<u32>,
    /// Output file
    pub output: Option<&'a Path>,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Extract {
                source,
                from,
                to,
                limit,
                region,
                if_empty,
                max_span_days,
                output,
            } => {
                let args = ExtractArgs {
                    source,
                    from,
                    to: to.as_deref(),
                    limit: *limit,
                    region: region.as_deref(),
                    if_empty: if_empty.as_deref(),
                    max_span_days: *max_span_days,
                    output: output.as_deref(),
                };
                self.extract(&args).await
            }
            Commands::Sources => self.sources(),
            Commands::Validate => self.validate(),
        }
    }

    /// Load the config file, or defaults when none is given
    fn load_config(&self) -> Result<ExtractorConfig> {
        match &self.cli.config {
            Some(path) => ExtractorConfig::from_file(path),
            None => Ok(ExtractorConfig::default()),
        }
    }

    /// Extract a source and emit or write its rows
    async fn extract(&self, args: &ExtractArgs<'_>) -> Result<()> {
        if self.cli.format == OutputFormat::Parquet && args.output.is_none() {
            return Err(Error::config("--output is required for parquet format"));
        }

        let config = self.load_config()?;
        let credentials = resolve_credentials(&config, |key| std::env::var(key).ok())?;
        let extractor = Extractor::with_credentials(&config, credentials)?;
        let request = build_request(&config, args)?;

        let extraction = extractor.extract(&request).await?;
        for message in &extraction.messages {
            self.output_log(message);
        }

        let source = request.source.as_str();
        match (self.cli.format, args.output) {
            (OutputFormat::Parquet, Some(path)) => {
                write_parquet(path, &extraction.table, None)
                    .with_context(|| format!("Failed to write '{}'", path.display()))?;
            }
            (_, Some(path)) => {
                write_json_file(path, &extraction.table)
                    .with_context(|| format!("Failed to write '{}'", path.display()))?;
            }
            (_, None) => {
                for record in extraction.table.to_records() {
                    self.output_message(&json!({
                        "type": "RECORD",
                        "record": {
                            "source": source,
                            "data": record
                        }
                    }));
                }
            }
        }

        self.output_message(&stats_message(source, &extraction));
        Ok(())
    }

    /// List supported sources
    fn sources(&self) -> Result<()> {
        let sources: Vec<Value> = Source::ALL
            .iter()
            .map(|source| {
                json!({
                    "name": source.as_str(),
                    "date_filtered": source.is_date_filtered(),
                    "transposed": source.is_transposed()
                })
            })
            .collect();

        self.output_message(&json!({
            "type": "SOURCES",
            "sources": sources
        }));

        Ok(())
    }

    /// Validate config and credentials
    fn validate(&self) -> Result<()> {
        let config = self.load_config()?;
        let credentials = resolve_credentials(&config, |key| std::env::var(key).ok())?;

        self.output_log(&Message::info(format!(
            "Configuration is valid for {} (windows of {} days, {} items per page)",
            credentials.base_url(),
            config.extraction.max_span_days,
            config.extraction.items_per_page
        )));

        Ok(())
    }

    fn output_log(&self, message: &Message) {
        if message.level == LogLevel::Debug && !self.cli.verbose {
            return;
        }
        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": level_name(message.level),
                "message": message.text
            }
        }));
    }

    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json | OutputFormat::Parquet => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Credentials from the config file, or from `VIDCLUB_URL` and
/// `VIDCLUB_TOKEN` via `lookup` when the file has no credentials section
pub fn resolve_credentials(
    config: &ExtractorConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Credentials> {
    if config.credentials.is_empty() {
        Credentials::from_parts(lookup(URL_ENV), lookup(TOKEN_ENV))
    } else {
        config.credentials()
    }
}

/// Merge command-line overrides with config defaults into a request
pub fn build_request(config: &ExtractorConfig, args: &ExtractArgs<'_>) -> Result<ExtractRequest> {
    let defaults = &config.extraction;
    let if_empty = defaults.if_empty.to_string();

    let request = ExtractRequest::parse(
        args.source,
        args.from,
        args.to,
        args.limit.unwrap_or(defaults.items_per_page),
        args.region.unwrap_or(defaults.region.as_str()),
        args.if_empty.unwrap_or(&if_empty),
    )?;

    let request = match args.max_span_days {
        Some(days) => request.with_max_span_days(days),
        None => request,
    };
    request.validate()?;
    Ok(request)
}

fn stats_message(source: &str, extraction: &Extraction) -> Value {
    let stats = &extraction.stats;
    json!({
        "type": "STATS",
        "stats": {
            "source": source,
            "windows": stats.windows,
            "pages_fetched": stats.pages_fetched,
            "rows_fetched": stats.rows_fetched,
            "duplicates_removed": stats.duplicates_removed,
            "rows": stats.rows,
            "columns": extraction.table.columns(),
            "duration_ms": stats.duration_ms
        }
    })
}

fn level_name(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Debug => "DEBUG",
        LogLevel::Info => "INFO",
        LogLevel::Warn => "WARN",
    }
}
