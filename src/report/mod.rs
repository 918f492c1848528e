//! Report writers. Each format renders to a string; [`write_reports`] names
//! the files and puts them on disk.

pub mod csv;
pub mod html;
pub mod json;

use crate::error::{Error, Result};
use crate::scanner::ScoredResult;
use crate::scorer::RiskClass;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    Html,
    Json,
    Csv,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }

    /// Parses a comma-separated list such as `html,json`, dropping repeats.
    pub fn parse_list(list: &str) -> Result<Vec<ReportFormat>> {
        let mut formats = Vec::new();
        for item in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let format = item.parse()?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        Ok(formats)
    }
}

impl FromStr for ReportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "html" => Ok(ReportFormat::Html),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// Headline counts shared by the terminal summary and every report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub registered: usize,
    pub active_web: usize,
    pub with_mx: usize,
    pub with_ssl: usize,
    pub threats: usize,
    pub high_risk: usize,
    pub medium_risk: usize,
}

impl Summary {
    pub fn from_results(results: &[ScoredResult]) -> Self {
        let mut summary = Summary {
            total: results.len(),
            ..Default::default()
        };
        for r in results {
            summary.registered += r.registered as usize;
            summary.active_web += r.signals.http_status().is_some_and(|s| s < 400) as usize;
            summary.with_mx += (!r.signals.mx_records().is_empty()) as usize;
            summary.with_ssl += r.signals.ssl_valid() as usize;
            summary.threats += r.signals.is_threat() as usize;
            summary.high_risk += (r.risk_class == RiskClass::High) as usize;
            summary.medium_risk += (r.risk_class == RiskClass::Medium) as usize;
        }
        summary
    }
}

/// Highest score first; ties keep scan order.
pub fn sorted_by_risk(results: &[ScoredResult]) -> Vec<&ScoredResult> {
    let mut sorted: Vec<&ScoredResult> = results.iter().collect();
    sorted.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));
    sorted
}

pub fn report_path(
    dir: &Path,
    target: &str,
    timestamp: &DateTime<Local>,
    format: ReportFormat,
) -> PathBuf {
    dir.join(format!(
        "typosquatch_{}_{}.{}",
        target.replace('.', "_"),
        timestamp.format("%Y%m%d_%H%M%S"),
        format.extension()
    ))
}

pub fn render(
    format: ReportFormat,
    target: &str,
    scan_time: &DateTime<Local>,
    results: &[ScoredResult],
) -> Result<String> {
    match format {
        ReportFormat::Html => Ok(html::render(target, scan_time, results)),
        ReportFormat::Json => json::render(target, scan_time, results),
        ReportFormat::Csv => csv::render(results),
    }
}

/// Writes one file per format into `dir`, creating it if needed.
pub fn write_reports(
    dir: &Path,
    target: &str,
    results: &[ScoredResult],
    formats: &[ReportFormat],
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let scan_time = Local::now();

    let mut written = Vec::with_capacity(formats.len());
    for &format in formats {
        let path = report_path(dir, target, &scan_time, format);
        fs::write(&path, render(format, target, &scan_time, results)?)?;
        info!("wrote {} report to {}", format.extension(), path.display());
        written.push(path);
    }
    Ok(written)
}
