use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Orchestrator settings. The DNS stage is not listed: it always runs.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Candidates processed concurrently.
    pub workers: usize,
    /// Hard ceiling on one candidate's whole pipeline.
    pub task_timeout: Duration,
    pub http_check: bool,
    pub ssl_check: bool,
    pub whois_check: bool,
    pub threat_intel: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            task_timeout: Duration::from_secs(30),
            http_check: true,
            ssl_check: true,
            whois_check: true,
            threat_intel: true,
        }
    }
}

/// Per-probe deadlines and endpoints.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub dns_timeout: Duration,
    pub http_timeout: Duration,
    pub tls_timeout: Duration,
    pub whois_timeout: Duration,
    pub intel_timeout: Duration,
    pub user_agent: String,
    pub vt_api_key: Option<String>,
    /// Minimum spacing between two VirusTotal calls across the whole scan.
    pub vt_cooldown: Duration,
    pub virustotal_url: String,
    pub urlhaus_url: String,
    pub otx_url: String,
    /// `host:port` used for every WHOIS query instead of the per-TLD table.
    pub whois_server: Option<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            dns_timeout: Duration::from_secs(5),
            http_timeout: Duration::from_secs(8),
            tls_timeout: Duration::from_secs(5),
            whois_timeout: Duration::from_secs(10),
            intel_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            vt_api_key: None,
            vt_cooldown: Duration::from_secs(15),
            virustotal_url: "https://www.virustotal.com/api/v3".to_string(),
            urlhaus_url: "https://urlhaus-api.abuse.ch/v1".to_string(),
            otx_url: "https://otx.alienvault.com/api/v1".to_string(),
            whois_server: None,
        }
    }
}
