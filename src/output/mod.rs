pub mod csv;
pub mod graph;
pub mod summary;

use crate::error::{GhstatsError, Result};
use crate::model::StatsReport;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub use graph::{plot, SeriesColors};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Graph,
    Json,
    Csv,
    Summary,
}

impl FromStr for OutputFormat {
    type Err = GhstatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "graph" => Ok(OutputFormat::Graph),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "summary" => Ok(OutputFormat::Summary),
            _ => Err(GhstatsError::Config(format!("Invalid output format: {s}"))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Graph => "graph",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Summary => "summary",
        };
        f.write_str(name)
    }
}

pub fn format_output(report: &StatsReport, format: OutputFormat, colors: &SeriesColors) -> Result<String> {
    Ok(match format {
        OutputFormat::Graph => graph::render(report, colors),
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Csv => csv::render(report),
        OutputFormat::Summary => summary::render(report),
    })
}

pub fn write_output(content: &str, path: &Path) -> Result<()> {
    std::fs::write(path, content)?;
    Ok(())
}
