use super::sorted_by_risk;
use crate::error::Result;
use crate::scanner::ScoredResult;
use ::csv::Writer;

pub const COLUMNS: [&str; 18] = [
    "domain",
    "variation_type",
    "registered",
    "ip_address",
    "http_status",
    "mx_records",
    "ssl_valid",
    "ssl_issuer",
    "whois_registrar",
    "whois_creation_date",
    "recently_registered",
    "is_threat",
    "vt_detections",
    "urlhaus_status",
    "otx_pulses",
    "page_title",
    "is_parked",
    "risk_score",
];

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn row(r: &ScoredResult) -> [String; 18] {
    let s = &r.signals;
    [
        r.domain.clone(),
        r.variation_type.to_string(),
        r.registered.to_string(),
        opt(s.ip_address()),
        opt(s.http_status()),
        s.mx_records().join(", "),
        s.ssl_valid().to_string(),
        opt(s.ssl_issuer()),
        opt(s.whois_registrar()),
        opt(s.whois_creation_date()),
        s.recently_registered().to_string(),
        s.is_threat().to_string(),
        opt(s.vt_detections()),
        opt(s.urlhaus_status().map(|status| status.as_str())),
        opt(s.otx_pulses()),
        opt(s.page_title()),
        s.is_parked().to_string(),
        r.risk_score.to_string(),
    ]
}

/// Fixed column subset, highest score first.
pub fn render(results: &[ScoredResult]) -> Result<String> {
    let mut wtr = Writer::from_writer(vec![]);
    wtr.write_record(COLUMNS)?;
    for r in sorted_by_risk(results) {
        wtr.write_record(row(r))?;
    }
    let data = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}
