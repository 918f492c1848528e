//! Signal collectors.
//!
//! A probe maps a domain to its own typed sub-record. Every internal failure
//! comes back as a [`ProbeError`]; nothing panics or propagates past the
//! stage that called it.

pub mod dns;
pub mod http;
pub mod intel;
pub mod tls;
pub mod whois;

use crate::config::ProbeConfig;
use crate::error::Result;
use crate::gate::CooldownGate;
use crate::signals::{DnsSignals, HttpSignals, Signals, ThreatSignals, TlsSignals, WhoisSignals};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub use dns::DnsProbe;
pub use http::HttpProbe;
pub use intel::ThreatIntelProbe;
pub use tls::TlsProbe;
pub use whois::WhoisProbe;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ProbeError {
    pub(crate) fn from_reqwest(e: &reqwest::Error, timeout: Duration) -> Self {
        if e.is_timeout() {
            ProbeError::Timeout(timeout)
        } else if e.is_decode() {
            ProbeError::Malformed(e.to_string())
        } else if e.is_connect() || e.is_request() {
            ProbeError::Network(e.to_string())
        } else {
            ProbeError::Protocol(e.to_string())
        }
    }
}

#[async_trait]
pub trait Probe: Send + Sync {
    type Output: Signals;

    async fn probe(&self, domain: &str) -> std::result::Result<Self::Output, ProbeError>;
}

pub type DynProbe<T> = Arc<dyn Probe<Output = T>>;

/// The five collectors one scan uses, shared by every candidate task.
#[derive(Clone)]
pub struct ProbeSet {
    pub dns: DynProbe<DnsSignals>,
    pub http: DynProbe<HttpSignals>,
    pub tls: DynProbe<TlsSignals>,
    pub whois: DynProbe<WhoisSignals>,
    pub threat: DynProbe<ThreatSignals>,
}

impl ProbeSet {
    /// Network-backed probes. The VirusTotal cooldown gate is created here,
    /// once per scan.
    pub fn from_config(config: &ProbeConfig) -> Result<Self> {
        let gate = Arc::new(CooldownGate::new(config.vt_cooldown));
        Ok(Self {
            dns: Arc::new(DnsProbe::new(config.dns_timeout)),
            http: Arc::new(HttpProbe::new(config)?),
            tls: Arc::new(TlsProbe::new(config)?),
            whois: Arc::new(WhoisProbe::new(config)),
            threat: Arc::new(ThreatIntelProbe::new(config, gate)?),
        })
    }
}
