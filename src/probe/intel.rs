use super::{Probe, ProbeError};
use crate::config::ProbeConfig;
use crate::gate::CooldownGate;
use crate::signals::{ThreatSignals, UrlhausStatus};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const VIRUSTOTAL: &str = "VirusTotal";
const URLHAUS: &str = "URLhaus";
const OTX: &str = "AlienVault OTX";

#[derive(Debug, Deserialize)]
struct VtResponse {
    data: VtData,
}

#[derive(Debug, Deserialize)]
struct VtData {
    #[serde(default)]
    attributes: VtAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct VtAttributes {
    #[serde(default)]
    last_analysis_stats: VtStats,
    #[serde(default)]
    reputation: i64,
    #[serde(default)]
    categories: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct VtStats {
    #[serde(default)]
    malicious: u32,
    #[serde(default)]
    suspicious: u32,
}

#[derive(Debug, Deserialize)]
struct UrlhausResponse {
    #[serde(default)]
    query_status: String,
}

#[derive(Debug, Deserialize)]
struct OtxResponse {
    #[serde(default)]
    pulse_info: OtxPulseInfo,
}

#[derive(Debug, Default, Deserialize)]
struct OtxPulseInfo {
    #[serde(default)]
    count: u32,
}

/// Reputation lookups against VirusTotal, URLhaus and AlienVault OTX.
///
/// VirusTotal is only queried with an API key and always through the shared
/// [`CooldownGate`]. A provider that errors leaves its fields empty; the
/// stage as a whole fails only when every queried provider errored.
pub struct ThreatIntelProbe {
    client: Client,
    timeout: Duration,
    vt_api_key: Option<String>,
    virustotal_url: String,
    urlhaus_url: String,
    otx_url: String,
    gate: Arc<CooldownGate>,
}

impl ThreatIntelProbe {
    pub fn new(config: &ProbeConfig, gate: Arc<CooldownGate>) -> crate::error::Result<Self> {
        let client = Client::builder()
            .timeout(config.intel_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            timeout: config.intel_timeout,
            vt_api_key: config.vt_api_key.clone().filter(|key| !key.is_empty()),
            virustotal_url: config.virustotal_url.trim_end_matches('/').to_string(),
            urlhaus_url: config.urlhaus_url.trim_end_matches('/').to_string(),
            otx_url: config.otx_url.trim_end_matches('/').to_string(),
            gate,
        })
    }

    async fn read_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ProbeError> {
        let response = request
            .send()
            .await
            .map_err(|e| ProbeError::from_reqwest(&e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Protocol(format!("HTTP {}", status)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProbeError::Malformed(e.to_string()))
    }

    async fn virustotal(&self, domain: &str, api_key: &str) -> Result<VtAttributes, ProbeError> {
        let request = self
            .client
            .get(format!("{}/domains/{}", self.virustotal_url, domain))
            .header("x-apikey", api_key);
        let response: VtResponse = self.gate.run(|| self.read_json(request)).await?;
        Ok(response.data.attributes)
    }

    async fn urlhaus(&self, domain: &str) -> Result<Option<UrlhausStatus>, ProbeError> {
        let request = self
            .client
            .post(format!("{}/host/", self.urlhaus_url))
            .form(&[("host", domain)]);
        let response: UrlhausResponse = self.read_json(request).await?;
        Ok(match response.query_status.as_str() {
            "is_host" => Some(UrlhausStatus::Malicious),
            "no_results" => Some(UrlhausStatus::Clean),
            other => {
                debug!("URLhaus query_status {:?} for {}", other, domain);
                None
            }
        })
    }

    async fn otx(&self, domain: &str) -> Result<u32, ProbeError> {
        let request = self
            .client
            .get(format!("{}/indicators/domain/{}/general", self.otx_url, domain));
        let response: OtxResponse = self.read_json(request).await?;
        Ok(response.pulse_info.count)
    }
}

#[async_trait]
impl Probe for ThreatIntelProbe {
    type Output = ThreatSignals;

    async fn probe(&self, domain: &str) -> Result<ThreatSignals, ProbeError> {
        let mut signals = ThreatSignals::default();
        let mut queried = 0;
        let mut errors = Vec::new();

        if let Some(api_key) = &self.vt_api_key {
            queried += 1;
            match self.virustotal(domain, api_key).await {
                Ok(attributes) => {
                    let detections = attributes
                        .last_analysis_stats
                        .malicious
                        .saturating_add(attributes.last_analysis_stats.suspicious);
                    signals.vt_detections = Some(detections);
                    signals.vt_reputation = Some(attributes.reputation);
                    signals.threat_categories = attributes
                        .categories
                        .into_values()
                        .collect::<BTreeSet<_>>()
                        .into_iter()
                        .collect();
                    if detections > 0 {
                        signals.threat_sources.push(VIRUSTOTAL.to_string());
                    }
                }
                Err(e) => {
                    warn!("VirusTotal lookup for {} failed: {}", domain, e);
                    errors.push(e);
                }
            }
        }

        queried += 1;
        match self.urlhaus(domain).await {
            Ok(status) => {
                signals.urlhaus_status = status;
                if status == Some(UrlhausStatus::Malicious) {
                    signals.threat_sources.push(URLHAUS.to_string());
                }
            }
            Err(e) => {
                debug!("URLhaus lookup for {} failed: {}", domain, e);
                errors.push(e);
            }
        }

        queried += 1;
        match self.otx(domain).await {
            Ok(pulses) => {
                signals.otx_pulses = Some(pulses);
                if pulses > 0 {
                    signals.threat_sources.push(OTX.to_string());
                }
            }
            Err(e) => {
                debug!("OTX lookup for {} failed: {}", domain, e);
                errors.push(e);
            }
        }

        if errors.len() == queried {
            return Err(errors.swap_remove(0));
        }

        signals.is_threat = signals.vt_detections.is_some_and(|n| n > 0)
            || signals.urlhaus_status == Some(UrlhausStatus::Malicious)
            || signals.otx_pulses.is_some_and(|n| n > 0);

        Ok(signals)
    }
}
