use statusprobe_types::config::OutputFormat;

use crate::summary::RunSummary;

pub fn render(summary: &RunSummary, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(summary.to_string()),
        OutputFormat::Json => serde_json::to_string_pretty(summary),
    }
}
