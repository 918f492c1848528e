use super::{Probe, ProbeError};
use crate::config::ProbeConfig;
use crate::signals::{SslGrade, TlsSignals};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::redirect::Policy;
use reqwest::tls::TlsInfo;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use x509_parser::extensions::GeneralName;
use x509_parser::parse_x509_certificate;

const KNOWN_ISSUERS: &[&str] = &[
    "Let's Encrypt",
    "DigiCert",
    "GlobalSign",
    "Comodo",
    "Sectigo",
    "Amazon",
];

/// Certificate probe on port 443.
///
/// A verified handshake is tried first. If only an unverified one succeeds,
/// the certificate is still parsed but reported as invalid and self-signed.
pub struct TlsProbe {
    verified: Client,
    unverified: Client,
    timeout: Duration,
}

impl TlsProbe {
    pub fn new(config: &ProbeConfig) -> crate::error::Result<Self> {
        let build = |accept_invalid: bool| {
            Client::builder()
                .timeout(config.tls_timeout)
                .user_agent(config.user_agent.clone())
                .redirect(Policy::none())
                .tls_info(true)
                .danger_accept_invalid_certs(accept_invalid)
                .build()
        };
        Ok(Self {
            verified: build(false)?,
            unverified: build(true)?,
            timeout: config.tls_timeout,
        })
    }

    async fn peer_certificate(
        &self,
        client: &Client,
        domain: &str,
    ) -> Result<Option<Vec<u8>>, reqwest::Error> {
        let response = client.head(format!("https://{}/", domain)).send().await?;
        Ok(response
            .extensions()
            .get::<TlsInfo>()
            .and_then(TlsInfo::peer_certificate)
            .map(<[u8]>::to_vec))
    }
}

#[async_trait]
impl Probe for TlsProbe {
    type Output = TlsSignals;

    async fn probe(&self, domain: &str) -> Result<TlsSignals, ProbeError> {
        let (der, verified) = match self.peer_certificate(&self.verified, domain).await {
            Ok(der) => (der, true),
            Err(verify_error) => {
                debug!("verified TLS handshake with {} failed: {}", domain, verify_error);
                match self.peer_certificate(&self.unverified, domain).await {
                    Ok(der) => (der, false),
                    Err(_) => return Err(ProbeError::from_reqwest(&verify_error, self.timeout)),
                }
            }
        };

        let der = der.ok_or_else(|| {
            ProbeError::Protocol(format!("{} presented no certificate", domain))
        })?;
        parse_certificate(&der, verified, Utc::now())
    }
}

pub fn parse_certificate(
    der: &[u8],
    verified: bool,
    now: DateTime<Utc>,
) -> Result<TlsSignals, ProbeError> {
    let (_, cert) = parse_x509_certificate(der)
        .map_err(|e| ProbeError::Malformed(format!("certificate: {}", e)))?;

    let subject_cn = cert
        .subject()
        .iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map(str::to_string);
    let issuer_cn = cert
        .issuer()
        .iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map(str::to_string);
    let issuer_org = cert
        .issuer()
        .iter_organization()
        .next()
        .and_then(|o| o.as_str().ok())
        .map(str::to_string);

    let ssl_san: Vec<String> = match cert.subject_alternative_name() {
        Ok(Some(ext)) => ext
            .value
            .general_names
            .iter()
            .filter_map(|name| match name {
                GeneralName::DNSName(dns) => Some(dns.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };

    let expiry = DateTime::<Utc>::from_timestamp(cert.validity().not_after.timestamp(), 0);

    let mut signals = TlsSignals {
        ssl_valid: verified,
        ssl_self_signed: !verified || subject_cn == issuer_cn,
        ssl_wildcard: ssl_san.iter().any(|name| name.starts_with("*.")),
        ssl_issuer: issuer_org.or_else(|| issuer_cn.clone()),
        ssl_subject: subject_cn,
        ssl_days_remaining: expiry.map(|e| (e - now).num_days()),
        ssl_expiry: expiry,
        ssl_san,
        ssl_grade: None,
    };
    signals.ssl_grade = Some(grade(&signals));
    Ok(signals)
}

pub fn grade(signals: &TlsSignals) -> SslGrade {
    if signals.ssl_self_signed {
        return SslGrade::F;
    }
    match signals.ssl_days_remaining {
        Some(days) if days < 0 => return SslGrade::F,
        Some(days) if days < 30 => return SslGrade::C,
        _ => {}
    }
    let issuer = signals.ssl_issuer.as_deref().unwrap_or_default();
    if KNOWN_ISSUERS.iter().any(|known| issuer.contains(known)) {
        SslGrade::A
    } else {
        SslGrade::B
    }
}
