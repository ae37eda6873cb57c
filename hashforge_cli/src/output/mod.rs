mod formatters;

pub use formatters::{CsvFormatter, JsonFormatter, TextFormatter};

use anyhow::{Context, Result};
use hashforge_core::{DigestFormatter, HashResult};
use serde::Serialize;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    /// Parse output format from string
    pub fn from_string(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => anyhow::bail!("Unknown output format: {}", s),
        }
    }
}

/// One printable digest line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashRecord {
    /// File path, `-` for stdin, or the quoted literal for `--text`
    pub source: String,
    pub algorithm: String,
    /// Digest encoded with the selected formatter
    pub digest: String,
    pub size: u64,
    pub duration_ms: u128,
}

impl HashRecord {
    /// Encode a result for display; the formatter must produce text
    pub fn from_result(
        source: impl Into<String>,
        result: &HashResult,
        formatter: &dyn DigestFormatter,
    ) -> Result<Self> {
        let digest = String::from_utf8(result.digest.encode(formatter)).with_context(|| {
            format!(
                "Formatter '{}' does not produce text output",
                formatter.name()
            )
        })?;

        Ok(Self {
            source: source.into(),
            algorithm: result.algorithm.clone(),
            digest,
            size: result.input_size,
            duration_ms: result.duration.as_millis(),
        })
    }
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format a single record
    fn format_single(&self, record: &HashRecord) -> Result<String>;

    /// Format a batch of records
    fn format_batch(&self, records: &[HashRecord]) -> Result<String> {
        let formatted: Result<Vec<String>> =
            records.iter().map(|r| self.format_single(r)).collect();

        Ok(formatted?.join("\n"))
    }
}

/// Create a formatter based on output format
pub fn create_formatter(format: OutputFormat, use_color: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(use_color)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Csv => Box::new(CsvFormatter::new()),
    }
}
