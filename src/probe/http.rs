use super::{Probe, ProbeError};
use crate::config::ProbeConfig;
use crate::signals::HttpSignals;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::header::{LOCATION, SERVER};
use reqwest::redirect::Policy;
use reqwest::Client;
use std::error::Error as StdError;
use std::time::Duration;
use tracing::debug;
use url::Url;

const MAX_REDIRECTS: usize = 10;
const TITLE_SCAN_CHARS: usize = 5000;
/// Non-standard "SSL certificate error" status recorded when a scheme fails at the TLS layer.
pub const TLS_FAILURE_STATUS: u16 = 495;

const PARKED_INDICATORS: &[&str] = &[
    "domain for sale",
    "this domain is for sale",
    "buy this domain",
    "domain parking",
    "parked domain",
    "sedo.com",
    "godaddy.com/parking",
    "dan.com",
    "afternic.com",
    "undeveloped.com",
    "hugedomains.com",
    "domainnameshop",
    "this domain may be for sale",
];

lazy_static! {
    static ref TITLE_RE: Regex = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap();
}

/// Fetches `https://` then `http://`, following redirects by hand so the
/// chain can be recorded. Certificates are not verified here; the TLS probe
/// owns that signal.
pub struct HttpProbe {
    client: Client,
    timeout: Duration,
}

struct Fetched {
    status: u16,
    final_url: Url,
    redirect_chain: Vec<String>,
    server_header: Option<String>,
    body: String,
    content_length: usize,
}

impl HttpProbe {
    pub fn new(config: &ProbeConfig) -> crate::error::Result<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(config.user_agent.clone())
            .danger_accept_invalid_certs(true)
            .redirect(Policy::none())
            .build()?;
        Ok(Self {
            client,
            timeout: config.http_timeout,
        })
    }

    async fn fetch(&self, start: Url) -> Result<Fetched, reqwest::Error> {
        let mut current = start;
        let mut redirect_chain = Vec::new();

        loop {
            let response = self.client.get(current.clone()).send().await?;

            if response.status().is_redirection() && redirect_chain.len() < MAX_REDIRECTS {
                let next = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|location| current.join(location).ok());
                if let Some(next) = next {
                    redirect_chain.push(current.to_string());
                    current = next;
                    continue;
                }
            }

            let status = response.status().as_u16();
            let server_header = response
                .headers()
                .get(SERVER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let bytes = response.bytes().await?;

            return Ok(Fetched {
                status,
                final_url: current,
                redirect_chain,
                server_header,
                content_length: bytes.len(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    type Output = HttpSignals;

    async fn probe(&self, domain: &str) -> Result<HttpSignals, ProbeError> {
        let mut signals = HttpSignals::default();
        let mut last_error = None;

        for scheme in ["https", "http"] {
            let url = Url::parse(&format!("{}://{}/", scheme, domain))
                .map_err(|e| ProbeError::Malformed(format!("{}: {}", domain, e)))?;

            match self.fetch(url).await {
                Ok(fetched) => {
                    if scheme == "https" {
                        signals.https_status = Some(fetched.status);
                    }
                    signals.http_status = Some(fetched.status);
                    signals.page_title = extract_title(&fetched.body);
                    signals.is_parked = is_parked(&fetched.body, fetched.final_url.as_str());
                    signals.final_url = Some(fetched.final_url.to_string());
                    signals.redirect_chain = fetched.redirect_chain;
                    signals.server_header = fetched.server_header;
                    signals.content_length = Some(fetched.content_length);
                    return Ok(signals);
                }
                Err(e) if is_tls_failure(&e) => {
                    debug!("{}://{} failed at TLS layer: {}", scheme, domain, e);
                    if scheme == "https" {
                        signals.https_status = Some(TLS_FAILURE_STATUS);
                    } else {
                        signals.http_status = Some(TLS_FAILURE_STATUS);
                    }
                }
                Err(e) => {
                    debug!("{}://{} failed: {}", scheme, domain, e);
                    last_error = Some(ProbeError::from_reqwest(&e, self.timeout));
                }
            }
        }

        match last_error {
            Some(e) if signals == HttpSignals::default() => Err(e),
            _ => Ok(signals),
        }
    }
}

fn is_tls_failure(error: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(err) = source {
        let message = err.to_string().to_lowercase();
        if ["tls", "ssl", "certificate", "handshake"]
            .iter()
            .any(|needle| message.contains(needle))
        {
            return true;
        }
        source = err.source();
    }
    false
}

pub fn extract_title(body: &str) -> Option<String> {
    let head: String = body.chars().take(TITLE_SCAN_CHARS).collect();
    TITLE_RE
        .captures(&head)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|title| !title.is_empty())
}

pub fn is_parked(body: &str, url: &str) -> bool {
    let body = body.to_lowercase();
    let url = url.to_lowercase();
    PARKED_INDICATORS
        .iter()
        .any(|indicator| body.contains(indicator) || url.contains(indicator))
}
