//! Per-candidate signal record.
//!
//! Each probe owns one typed sub-record, so two stages can never write the
//! same key. A stage's outcome tells apart "collected", "not run" and
//! "probe failed"; inside a collected sub-record `None` means the source
//! gave no answer for that key.

use crate::probe::ProbeError;
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Registration,
    Http,
    Tls,
    Whois,
    ThreatIntel,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Registration => "dns",
            Stage::Http => "http",
            Stage::Tls => "ssl",
            Stage::Whois => "whois",
            Stage::ThreatIntel => "threat_intel",
        }
    }
}

/// A probe's sub-record.
pub trait Signals: Serialize + Default + Clone + Send + Sync + 'static {
    const STAGE: Stage;
}

#[derive(Debug, Clone)]
pub enum StageOutcome<T> {
    Collected(T),
    /// Stage disabled, or gated off because the domain is not registered.
    Skipped,
    Failed(ProbeError),
}

impl<T> Default for StageOutcome<T> {
    fn default() -> Self {
        StageOutcome::Skipped
    }
}

impl<T> From<Result<T, ProbeError>> for StageOutcome<T> {
    fn from(result: Result<T, ProbeError>) -> Self {
        match result {
            Ok(signals) => StageOutcome::Collected(signals),
            Err(e) => StageOutcome::Failed(e),
        }
    }
}

impl<T> StageOutcome<T> {
    pub fn collected(&self) -> Option<&T> {
        match self {
            StageOutcome::Collected(signals) => Some(signals),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ProbeError> {
        match self {
            StageOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, StageOutcome::Skipped)
    }
}

/// Flattens into the parent record: collected keys as-is, nothing when
/// skipped, and a single `<stage>_error` key on failure.
impl<T: Signals> Serialize for StageOutcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StageOutcome::Collected(signals) => signals.serialize(serializer),
            StageOutcome::Skipped => serializer.serialize_map(Some(0))?.end(),
            StageOutcome::Failed(e) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(&format!("{}_error", T::STAGE.as_str()), &e.to_string())?;
                map.end()
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DnsSignals {
    /// Reported at the top level of a scored result.
    #[serde(skip_serializing)]
    pub registered: bool,
    pub ip_address: Option<String>,
    pub ipv6_address: Option<String>,
    pub mx_records: Vec<String>,
    pub ns_records: Vec<String>,
    pub a_records: Vec<String>,
    pub txt_records: Vec<String>,
    pub cname_record: Option<String>,
}

impl Signals for DnsSignals {
    const STAGE: Stage = Stage::Registration;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HttpSignals {
    pub http_status: Option<u16>,
    pub https_status: Option<u16>,
    pub page_title: Option<String>,
    pub redirect_chain: Vec<String>,
    pub final_url: Option<String>,
    pub server_header: Option<String>,
    pub is_parked: bool,
    pub content_length: Option<usize>,
}

impl Signals for HttpSignals {
    const STAGE: Stage = Stage::Http;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SslGrade {
    A,
    B,
    C,
    F,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TlsSignals {
    pub ssl_valid: bool,
    pub ssl_issuer: Option<String>,
    pub ssl_subject: Option<String>,
    pub ssl_expiry: Option<DateTime<Utc>>,
    pub ssl_san: Vec<String>,
    pub ssl_days_remaining: Option<i64>,
    pub ssl_self_signed: bool,
    pub ssl_wildcard: bool,
    pub ssl_grade: Option<SslGrade>,
}

impl Signals for TlsSignals {
    const STAGE: Stage = Stage::Tls;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WhoisSignals {
    pub whois_registrar: Option<String>,
    pub whois_creation_date: Option<String>,
    pub whois_expiry_date: Option<String>,
    pub whois_country: Option<String>,
    pub whois_emails: Vec<String>,
    pub whois_name_servers: Vec<String>,
    pub recently_registered: bool,
}

impl Signals for WhoisSignals {
    const STAGE: Stage = Stage::Whois;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlhausStatus {
    Malicious,
    Clean,
}

impl UrlhausStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrlhausStatus::Malicious => "malicious",
            UrlhausStatus::Clean => "clean",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ThreatSignals {
    pub is_threat: bool,
    pub threat_sources: Vec<String>,
    pub vt_detections: Option<u32>,
    pub vt_reputation: Option<i64>,
    pub urlhaus_status: Option<UrlhausStatus>,
    pub otx_pulses: Option<u32>,
    pub threat_categories: Vec<String>,
}

impl Signals for ThreatSignals {
    const STAGE: Stage = Stage::ThreatIntel;
}

/// Everything collected for one candidate. Built by exactly one task.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignalRecord {
    #[serde(flatten)]
    pub dns: StageOutcome<DnsSignals>,
    #[serde(flatten)]
    pub http: StageOutcome<HttpSignals>,
    #[serde(flatten)]
    pub tls: StageOutcome<TlsSignals>,
    #[serde(flatten)]
    pub whois: StageOutcome<WhoisSignals>,
    #[serde(flatten)]
    pub threat: StageOutcome<ThreatSignals>,
}

impl SignalRecord {
    pub fn registered(&self) -> bool {
        self.dns.collected().is_some_and(|d| d.registered)
    }

    pub fn ip_address(&self) -> Option<&str> {
        self.dns.collected().and_then(|d| d.ip_address.as_deref())
    }

    pub fn mx_records(&self) -> &[String] {
        self.dns
            .collected()
            .map(|d| d.mx_records.as_slice())
            .unwrap_or(&[])
    }

    pub fn http_status(&self) -> Option<u16> {
        self.http.collected().and_then(|h| h.http_status)
    }

    pub fn page_title(&self) -> Option<&str> {
        self.http.collected().and_then(|h| h.page_title.as_deref())
    }

    pub fn is_parked(&self) -> bool {
        self.http.collected().is_some_and(|h| h.is_parked)
    }

    pub fn ssl_valid(&self) -> bool {
        self.tls.collected().is_some_and(|t| t.ssl_valid)
    }

    pub fn ssl_self_signed(&self) -> bool {
        self.tls.collected().is_some_and(|t| t.ssl_self_signed)
    }

    pub fn ssl_issuer(&self) -> Option<&str> {
        self.tls.collected().and_then(|t| t.ssl_issuer.as_deref())
    }

    pub fn whois_registrar(&self) -> Option<&str> {
        self.whois.collected().and_then(|w| w.whois_registrar.as_deref())
    }

    pub fn whois_creation_date(&self) -> Option<&str> {
        self.whois.collected().and_then(|w| w.whois_creation_date.as_deref())
    }

    pub fn recently_registered(&self) -> bool {
        self.whois.collected().is_some_and(|w| w.recently_registered)
    }

    pub fn is_threat(&self) -> bool {
        self.threat.collected().is_some_and(|t| t.is_threat)
    }

    pub fn vt_detections(&self) -> Option<u32> {
        self.threat.collected().and_then(|t| t.vt_detections)
    }

    pub fn urlhaus_status(&self) -> Option<UrlhausStatus> {
        self.threat.collected().and_then(|t| t.urlhaus_status)
    }

    pub fn otx_pulses(&self) -> Option<u32> {
        self.threat.collected().and_then(|t| t.otx_pulses)
    }

    /// Stages that ran and failed, in pipeline order.
    pub fn failed_stages(&self) -> Vec<Stage> {
        let mut failed = Vec::new();
        if self.dns.error().is_some() {
            failed.push(Stage::Registration);
        }
        if self.http.error().is_some() {
            failed.push(Stage::Http);
        }
        if self.tls.error().is_some() {
            failed.push(Stage::Tls);
        }
        if self.whois.error().is_some() {
            failed.push(Stage::Whois);
        }
        if self.threat.error().is_some() {
            failed.push(Stage::ThreatIntel);
        }
        failed
    }
}
