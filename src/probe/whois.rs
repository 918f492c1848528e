use super::{Probe, ProbeError};
use crate::config::ProbeConfig;
use crate::signals::WhoisSignals;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

const IANA_SERVER: &str = "whois.iana.org:43";
const RECENT_REGISTRATION_DAYS: i64 = 90;

const NOT_FOUND_MARKERS: &[&str] = &[
    "no match",
    "not found",
    "no entries found",
    "domain status: available",
    "domain not found",
    "no data found",
];

const REGISTRAR_KEYS: &[&str] = &["registrar", "sponsoring registrar", "registrar name"];
const CREATION_KEYS: &[&str] = &[
    "creation date",
    "created",
    "created on",
    "registered on",
    "registration time",
    "domain registration date",
];
const EXPIRY_KEYS: &[&str] = &[
    "registry expiry date",
    "registrar registration expiration date",
    "expiration date",
    "expiry date",
    "expires on",
    "paid-till",
];
const COUNTRY_KEYS: &[&str] = &["registrant country", "country"];
const NAME_SERVER_KEYS: &[&str] = &["name server", "nserver", "nameserver"];

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").unwrap();
}

/// WHOIS over TCP port 43, following one IANA referral.
pub struct WhoisProbe {
    timeout: Duration,
    server_override: Option<String>,
}

impl WhoisProbe {
    pub fn new(config: &ProbeConfig) -> Self {
        Self {
            timeout: config.whois_timeout,
            server_override: config.whois_server.clone(),
        }
    }

    async fn query(&self, server: &str, domain: &str) -> Result<String, ProbeError> {
        let mut stream = timeout(self.timeout, TcpStream::connect(server))
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))?
            .map_err(|e| ProbeError::Network(format!("{}: {}", server, e)))?;

        let query = format!("{}\r\n", domain);
        timeout(self.timeout, stream.write_all(query.as_bytes()))
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))?
            .map_err(|e| ProbeError::Network(format!("{}: {}", server, e)))?;

        let mut response = Vec::new();
        timeout(self.timeout, stream.read_to_end(&mut response))
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))?
            .map_err(|e| ProbeError::Network(format!("{}: {}", server, e)))?;

        Ok(String::from_utf8_lossy(&response).into_owned())
    }
}

#[async_trait]
impl Probe for WhoisProbe {
    type Output = WhoisSignals;

    async fn probe(&self, domain: &str) -> Result<WhoisSignals, ProbeError> {
        let server = match &self.server_override {
            Some(server) => server.clone(),
            None => whois_server(domain.rsplit('.').next().unwrap_or("")).to_string(),
        };

        let mut response = self.query(&server, domain).await?;

        if self.server_override.is_none() && server == IANA_SERVER {
            if let Some(referral) = find_referral(&response) {
                debug!("WHOIS for {} referred to {}", domain, referral);
                response = self.query(&format!("{}:43", referral), domain).await?;
            }
        }

        Ok(parse_whois(&response, Utc::now()))
    }
}

pub fn whois_server(tld: &str) -> &'static str {
    match tld {
        "com" | "net" => "whois.verisign-grs.com:43",
        "org" => "whois.pir.org:43",
        "info" => "whois.afilias.net:43",
        "biz" => "whois.neulevel.biz:43",
        "us" => "whois.nic.us:43",
        "co" => "whois.nic.co:43",
        "io" => "whois.nic.io:43",
        "me" => "whois.nic.me:43",
        "uk" => "whois.nic.uk:43",
        "ca" => "whois.cira.ca:43",
        "de" => "whois.denic.de:43",
        "fr" => "whois.afnic.fr:43",
        "ru" => "whois.tcinet.ru:43",
        "cn" => "whois.cnnic.net.cn:43",
        "jp" => "whois.jprs.jp:43",
        "au" => "whois.auda.org.au:43",
        "br" => "whois.registro.br:43",
        "app" | "dev" => "whois.nic.google:43",
        "tech" => "whois.nic.tech:43",
        "xyz" => "whois.nic.xyz:43",
        "online" => "whois.nic.online:43",
        "site" => "whois.nic.site:43",
        "store" => "whois.nic.store:43",
        _ => IANA_SERVER,
    }
}

fn find_referral(response: &str) -> Option<String> {
    fields(response)
        .find(|(key, _)| key == "refer" || key == "whois")
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// `key: value` pairs with lower-cased keys; comment lines skipped.
fn fields(response: &str) -> impl Iterator<Item = (String, &str)> {
    response.lines().filter_map(|line| {
        let line = line.trim();
        if line.starts_with('%') || line.starts_with('#') || line.starts_with(">>>") {
            return None;
        }
        let (key, value) = line.split_once(':')?;
        Some((key.trim().to_lowercase(), value.trim()))
    })
}

fn first_value(response: &str, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|wanted| {
        fields(response)
            .find(|(key, value)| key == wanted && !value.is_empty())
            .map(|(_, value)| value.to_string())
    })
}

pub fn parse_whois(response: &str, now: DateTime<Utc>) -> WhoisSignals {
    let lower = response.to_lowercase();
    if NOT_FOUND_MARKERS.iter().any(|marker| lower.contains(marker)) {
        return WhoisSignals::default();
    }

    let mut signals = WhoisSignals {
        whois_registrar: first_value(response, REGISTRAR_KEYS),
        whois_creation_date: first_value(response, CREATION_KEYS),
        whois_expiry_date: first_value(response, EXPIRY_KEYS),
        whois_country: first_value(response, COUNTRY_KEYS),
        ..Default::default()
    };

    for m in EMAIL_RE.find_iter(response) {
        let email = m.as_str().to_string();
        if !signals.whois_emails.contains(&email) {
            signals.whois_emails.push(email);
        }
    }

    for (key, value) in fields(response) {
        if NAME_SERVER_KEYS.contains(&key.as_str()) && !value.is_empty() {
            let ns = value
                .split_whitespace()
                .next()
                .unwrap_or(value)
                .to_lowercase();
            if !signals.whois_name_servers.contains(&ns) {
                signals.whois_name_servers.push(ns);
            }
        }
    }

    if let Some(created) = signals.whois_creation_date.as_deref().and_then(parse_date) {
        signals.recently_registered = (now - created).num_days() < RECENT_REGISTRATION_DAYS;
    }

    signals
}

pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.fZ"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc());
        }
    }

    let first = raw.split_whitespace().next().unwrap_or(raw);
    for format in ["%Y-%m-%d", "%d-%b-%Y", "%Y.%m.%d", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(first, format) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}
