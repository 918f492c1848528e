//! Risk scoring: a fixed additive point table over a candidate's signals.

use crate::generator::VariationType;
use crate::signals::SignalRecord;
use serde::Serialize;
use std::fmt;

pub const MAX_SCORE: u8 = 100;

const REDIRECT_STATUSES: [u16; 4] = [301, 302, 307, 308];

pub const HIGH_RISK_COMBO_KEYWORDS: &[&str] = &[
    "login",
    "signin",
    "account",
    "secure",
    "verify",
    "update",
    "password",
    "bank",
    "pay",
    "wallet",
    "crypto",
    "support",
    "official",
    "confirm",
    "authenticate",
];

pub const SUSPICIOUS_TITLE_PHRASES: &[&str] =
    &["login", "sign in", "account", "verify", "secure", "bank", "paypal"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskClass {
    Minimal,
    Low,
    Medium,
    High,
}

impl RiskClass {
    pub fn from_score(score: u8) -> Self {
        match score {
            70..=u8::MAX => RiskClass::High,
            40..=69 => RiskClass::Medium,
            10..=39 => RiskClass::Low,
            _ => RiskClass::Minimal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskClass::High => "HIGH",
            RiskClass::Medium => "MEDIUM",
            RiskClass::Low => "LOW",
            RiskClass::Minimal => "MINIMAL",
        }
    }
}

impl fmt::Display for RiskClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores one candidate. Pure and deterministic; absent signals add nothing.
pub fn score(domain: &str, variation_type: VariationType, signals: &SignalRecord) -> u8 {
    let mut score: u32 = 0;

    if signals.registered() {
        score += 20;
    }

    if let Some(status) = signals.http_status() {
        if status < 400 {
            score += 15;
        } else if REDIRECT_STATUSES.contains(&status) {
            // Never taken: every redirect status is below 400.
            score += 8;
        }
    }

    if !signals.mx_records().is_empty() {
        score += 20;
    }

    if signals.ssl_valid() {
        score += 10;
    }
    if signals.ssl_self_signed() {
        score += 5;
    }

    if signals.recently_registered() {
        score += 15;
    }

    if signals.is_threat() {
        score += 30;
    } else if let Some(detections) = signals.vt_detections().filter(|&n| n > 0) {
        score += detections.saturating_mul(3).min(25);
    }
    if let Some(pulses) = signals.otx_pulses().filter(|&n| n > 0) {
        score += pulses.saturating_mul(2).min(15);
    }

    if signals.is_parked() {
        score = score.saturating_sub(5);
    }

    // Variation modifiers need a DNS answer, registered or not.
    match variation_type {
        _ if signals.dns.collected().is_none() => {}
        VariationType::Homoglyph => score += 5,
        VariationType::SubdomainAbuse => score += 3,
        VariationType::Combosquatting => {
            if HIGH_RISK_COMBO_KEYWORDS.iter().any(|kw| domain.contains(kw)) {
                score += 5;
            }
        }
        _ => {}
    }

    if let Some(title) = signals.page_title() {
        let title = title.to_lowercase();
        if SUSPICIOUS_TITLE_PHRASES.iter().any(|phrase| title.contains(phrase)) {
            score += 5;
        }
    }

    score.min(MAX_SCORE as u32) as u8
}
