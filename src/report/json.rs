use super::Summary;
use crate::error::Result;
use crate::scanner::ScoredResult;
use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ScanMeta<'a> {
    target: &'a str,
    scan_time: String,
    total_variations: usize,
    registered_count: usize,
    high_risk_count: usize,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    meta: ScanMeta<'a>,
    results: &'a [ScoredResult],
}

pub fn render(target: &str, scan_time: &DateTime<Local>, results: &[ScoredResult]) -> Result<String> {
    let summary = Summary::from_results(results);
    let report = JsonReport {
        meta: ScanMeta {
            target,
            scan_time: scan_time.to_rfc3339(),
            total_variations: summary.total,
            registered_count: summary.registered,
            high_risk_count: summary.high_risk,
        },
        results,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
