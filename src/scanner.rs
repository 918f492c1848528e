//! Scan orchestration.
//!
//! One spawned task per candidate, at most `workers` in flight. DNS always
//! runs first and gates the rest: only registered candidates go on to the
//! HTTP, TLS, WHOIS and threat-intel stages, which run one after another
//! inside the candidate's task. Every candidate yields exactly one
//! [`ScoredResult`], including when its task times out or panics.

use crate::config::ScanConfig;
use crate::generator::{Candidate, VariationType};
use crate::probe::{Probe, ProbeSet};
use crate::scorer::{self, RiskClass};
use crate::signals::{SignalRecord, Signals, StageOutcome};
use futures::stream::{self, Stream, StreamExt};
use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize)]
pub struct ScoredResult {
    pub domain: String,
    pub variation_type: VariationType,
    pub registered: bool,
    #[serde(flatten)]
    pub signals: SignalRecord,
    pub risk_score: u8,
    pub risk_class: RiskClass,
    /// Set only on degraded results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScoredResult {
    pub fn scored(candidate: Candidate, signals: SignalRecord) -> Self {
        let risk_score = scorer::score(&candidate.domain, candidate.variation_type, &signals);
        Self {
            registered: signals.registered(),
            domain: candidate.domain,
            variation_type: candidate.variation_type,
            signals,
            risk_score,
            risk_class: RiskClass::from_score(risk_score),
            error: None,
        }
    }

    /// Stand-in for a candidate whose whole pipeline was lost.
    pub fn degraded(candidate: Candidate, error: impl Into<String>) -> Self {
        Self {
            domain: candidate.domain,
            variation_type: candidate.variation_type,
            registered: false,
            signals: SignalRecord::default(),
            risk_score: 0,
            risk_class: RiskClass::Minimal,
            error: Some(error.into()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Clone)]
pub struct Scanner {
    probes: ProbeSet,
    config: ScanConfig,
}

impl Scanner {
    pub fn new(probes: ProbeSet, config: ScanConfig) -> Self {
        Self { probes, config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Results in completion order, not candidate order.
    pub fn scan<'a, I>(&'a self, candidates: I) -> impl Stream<Item = ScoredResult> + 'a
    where
        I: IntoIterator<Item = Candidate>,
        I::IntoIter: 'a,
    {
        stream::iter(candidates)
            .map(move |candidate| self.run_task(candidate))
            .buffer_unordered(self.config.workers.max(1))
    }

    pub async fn scan_all(&self, candidates: Vec<Candidate>) -> Vec<ScoredResult> {
        self.scan(candidates).collect().await
    }

    async fn run_task(&self, candidate: Candidate) -> ScoredResult {
        let probes = self.probes.clone();
        let config = self.config.clone();
        let task_candidate = candidate.clone();
        let mut handle = tokio::spawn(async move { analyze(&probes, &config, task_candidate).await });

        match timeout(self.config.task_timeout, &mut handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                warn!("task for {} failed: {}", candidate.domain, e);
                ScoredResult::degraded(candidate, format!("task failed: {}", e))
            }
            Err(_) => {
                handle.abort();
                warn!(
                    "task for {} timed out after {:?}",
                    candidate.domain, self.config.task_timeout
                );
                let message = format!("timed out after {:?}", self.config.task_timeout);
                ScoredResult::degraded(candidate, message)
            }
        }
    }
}

/// Runs one candidate's pipeline to completion.
pub async fn analyze(probes: &ProbeSet, config: &ScanConfig, candidate: Candidate) -> ScoredResult {
    let domain = candidate.domain.as_str();
    let mut signals = SignalRecord {
        dns: run_stage(&*probes.dns, domain).await,
        ..Default::default()
    };

    if signals.registered() {
        if config.http_check {
            signals.http = run_stage(&*probes.http, domain).await;
        }
        if config.ssl_check {
            signals.tls = run_stage(&*probes.tls, domain).await;
        }
        if config.whois_check {
            signals.whois = run_stage(&*probes.whois, domain).await;
        }
        if config.threat_intel {
            signals.threat = run_stage(&*probes.threat, domain).await;
        }
    }

    ScoredResult::scored(candidate, signals)
}

async fn run_stage<T: Signals>(probe: &dyn Probe<Output = T>, domain: &str) -> StageOutcome<T> {
    let outcome = StageOutcome::from(probe.probe(domain).await);
    if let Some(e) = outcome.error() {
        debug!("{} stage failed for {}: {}", T::STAGE.as_str(), domain, e);
    }
    outcome
}
