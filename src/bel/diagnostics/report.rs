//! Diagnostic report rendering
//!
//!     One row per diagnostic, columns:
//!
//!         severity, category, line, column, rule, entry, message, hint
//!
//!     Formats: aligned text table, CSV, TSV, Markdown and JSON.

use super::Diagnostic;
use bel_config::ReportFormatName;
use std::fmt;
use std::str::FromStr;

const HEADERS: [&str; 8] = [
    "severity", "category", "line", "column", "rule", "entry", "message", "hint",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Table,
    Csv,
    Tsv,
    Markdown,
    Json,
}

impl ReportFormat {
    pub fn name(&self) -> &'static str {
        match self {
            ReportFormat::Table => "table",
            ReportFormat::Csv => "csv",
            ReportFormat::Tsv => "tsv",
            ReportFormat::Markdown => "markdown",
            ReportFormat::Json => "json",
        }
    }
}

impl From<ReportFormatName> for ReportFormat {
    fn from(name: ReportFormatName) -> Self {
        match name {
            ReportFormatName::Table => ReportFormat::Table,
            ReportFormatName::Csv => ReportFormat::Csv,
            ReportFormatName::Tsv => ReportFormat::Tsv,
            ReportFormatName::Markdown => ReportFormat::Markdown,
            ReportFormatName::Json => ReportFormat::Json,
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(ReportFormat::Table),
            "csv" => Ok(ReportFormat::Csv),
            "tsv" => Ok(ReportFormat::Tsv),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            other => Err(ReportError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug)]
pub enum ReportError {
    UnknownFormat(String),
    Json(serde_json::Error),
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::UnknownFormat(name) => write!(f, "Unknown report format: {}", name),
            ReportError::Json(e) => write!(f, "Failed to serialize report: {}", e),
        }
    }
}

impl std::error::Error for ReportError {}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::Json(err)
    }
}

fn row(diagnostic: &Diagnostic) -> [String; 8] {
    [
        diagnostic.severity.to_string(),
        diagnostic.category.to_string(),
        diagnostic.line.to_string(),
        diagnostic.column.to_string(),
        diagnostic.rule.to_string(),
        diagnostic.entry.clone().unwrap_or_default(),
        diagnostic.message.clone(),
        diagnostic.hint.clone().unwrap_or_default(),
    ]
}

/// Render diagnostics in the requested format
pub fn render(diagnostics: &[Diagnostic], format: ReportFormat) -> Result<String, ReportError> {
    let rows: Vec<[String; 8]> = diagnostics.iter().map(row).collect();
    let output = match format {
        ReportFormat::Table => render_table(&rows),
        ReportFormat::Csv => render_delimited(&rows, ',', csv_field),
        ReportFormat::Tsv => render_delimited(&rows, '\t', tsv_field),
        ReportFormat::Markdown => render_markdown(&rows),
        ReportFormat::Json => {
            let mut json = serde_json::to_string_pretty(diagnostics)?;
            json.push('\n');
            json
        }
    };
    Ok(output)
}

fn render_table(rows: &[[String; 8]]) -> String {
    if rows.is_empty() {
        return "no diagnostics\n".to_string();
    }
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(single_line(cell).chars().count());
        }
    }

    let mut output = String::new();
    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    push_table_line(&mut output, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_table_line(&mut output, &rule, &widths);
    for row in rows {
        let cells: Vec<String> = row.iter().map(|cell| single_line(cell)).collect();
        push_table_line(&mut output, &cells, &widths);
    }
    output
}

fn push_table_line(output: &mut String, cells: &[String], widths: &[usize; 8]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    output.push_str(padded.join("  ").trim_end());
    output.push('\n');
}

fn render_delimited(rows: &[[String; 8]], separator: char, field: fn(&str) -> String) -> String {
    let mut output = String::new();
    let sep = separator.to_string();
    output.push_str(&HEADERS.join(&sep));
    output.push('\n');
    for row in rows {
        let cells: Vec<String> = row.iter().map(|cell| field(cell)).collect();
        output.push_str(&cells.join(&sep));
        output.push('\n');
    }
    output
}

fn csv_field(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

fn tsv_field(cell: &str) -> String {
    cell.replace(['\t', '\n', '\r'], " ")
}

fn render_markdown(rows: &[[String; 8]]) -> String {
    let mut output = String::new();
    output.push_str(&format!("| {} |\n", HEADERS.join(" | ")));
    output.push_str(&format!("|{}\n", "---|".repeat(HEADERS.len())));
    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| single_line(cell).replace('|', "\\|"))
            .collect();
        output.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    output
}

fn single_line(cell: &str) -> String {
    cell.split_whitespace().collect::<Vec<_>>().join(" ")
}
