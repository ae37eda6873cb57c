use super::{HashRecord, OutputFormatter};
use anyhow::Result;
use colored::*;

/// `<digest>  <source>` lines, the layout of the coreutils `*sum` tools
pub struct TextFormatter {
    use_color: bool,
}

impl TextFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn colorize(&self, text: &str, color: fn(&str) -> ColoredString) -> String {
        if self.use_color {
            color(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format_single(&self, record: &HashRecord) -> Result<String> {
        let digest = self.colorize(&record.digest, |s| s.cyan());
        Ok(format!("{digest}  {}", record.source))
    }
}

/// JSON formatter
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn render<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        Ok(if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        })
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_single(&self, record: &HashRecord) -> Result<String> {
        self.render(record)
    }

    fn format_batch(&self, records: &[HashRecord]) -> Result<String> {
        self.render(records)
    }
}

/// CSV formatter with a header row
#[derive(Default)]
pub struct CsvFormatter;

impl CsvFormatter {
    pub fn new() -> Self {
        Self
    }

    fn escape(field: &str) -> String {
        if field.contains([',', '"', '\n']) {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }
}

impl OutputFormatter for CsvFormatter {
    fn format_single(&self, record: &HashRecord) -> Result<String> {
        Ok(format!(
            "{},{},{},{},{}",
            Self::escape(&record.source),
            record.algorithm,
            Self::escape(&record.digest),
            record.size,
            record.duration_ms
        ))
    }

    fn format_batch(&self, records: &[HashRecord]) -> Result<String> {
        let mut lines = vec!["source,algorithm,digest,size,duration_ms".to_string()];
        for record in records {
            lines.push(self.format_single(record)?);
        }
        Ok(lines.join("\n"))
    }
}
