use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use typosquatch::probe::{Probe, ProbeError, ProbeSet};
use typosquatch::signals::{
    DnsSignals, HttpSignals, Signals, ThreatSignals, TlsSignals, WhoisSignals,
};
use typosquatch::{
    Candidate, GeneratorOptions, RiskClass, ScanConfig, Scanner, VariationGenerator, VariationType,
};

/// Returns a fixed answer per domain and counts its calls.
struct MockProbe<T> {
    answer: Box<dyn Fn(&str) -> Result<T, ProbeError> + Send + Sync>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl<T: Signals> MockProbe<T> {
    fn new(answer: impl Fn(&str) -> Result<T, ProbeError> + Send + Sync + 'static) -> Self {
        Self {
            answer: Box::new(answer),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn failing() -> Self {
        Self::new(|_| Err(ProbeError::Network("connection refused".to_string())))
    }

    fn ok() -> Self {
        Self::new(|_| Ok(T::default()))
    }
}

#[async_trait]
impl<T: Signals> Probe for MockProbe<T> {
    type Output = T;

    async fn probe(&self, domain: &str) -> Result<T, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        (self.answer)(domain)
    }
}

struct PanickingProbe;

#[async_trait]
impl Probe for PanickingProbe {
    type Output = HttpSignals;

    async fn probe(&self, domain: &str) -> Result<HttpSignals, ProbeError> {
        panic!("probe blew up on {}", domain);
    }
}

fn registered_dns() -> DnsSignals {
    DnsSignals {
        registered: true,
        ip_address: Some("192.0.2.10".to_string()),
        mx_records: vec!["mx.example.net.".to_string()],
        ..Default::default()
    }
}

fn failing_set() -> ProbeSet {
    ProbeSet {
        dns: Arc::new(MockProbe::<DnsSignals>::failing()),
        http: Arc::new(MockProbe::<HttpSignals>::failing()),
        tls: Arc::new(MockProbe::<TlsSignals>::failing()),
        whois: Arc::new(MockProbe::<WhoisSignals>::failing()),
        threat: Arc::new(MockProbe::<ThreatSignals>::failing()),
    }
}

fn candidates(domains: &[&str]) -> Vec<Candidate> {
    domains
        .iter()
        .map(|d| Candidate {
            domain: d.to_string(),
            variation_type: VariationType::MissingChar,
        })
        .collect()
}

fn config() -> ScanConfig {
    ScanConfig {
        workers: 4,
        task_timeout: Duration::from_secs(5),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_every_probe_failing_still_yields_one_minimal_result_per_candidate() {
    let generated = VariationGenerator::new("paypal.com")
        .unwrap()
        .generate(&GeneratorOptions::all());
    let expected: HashSet<String> = generated.iter().map(|c| c.domain.clone()).collect();
    assert!(!generated.is_empty());

    let scanner = Scanner::new(failing_set(), config());
    let results = scanner.scan_all(generated.clone()).await;

    assert_eq!(results.len(), generated.len());
    let got: HashSet<String> = results.iter().map(|r| r.domain.clone()).collect();
    assert_eq!(got, expected);
    for r in &results {
        assert_eq!(r.risk_score, 0, "{} scored {}", r.domain, r.risk_score);
        assert_eq!(r.risk_class, RiskClass::Minimal);
        assert!(!r.registered);
        assert!(r.signals.dns.error().is_some());
    }
}

#[tokio::test]
async fn test_unregistered_candidates_skip_later_stages() {
    let http = MockProbe::<HttpSignals>::ok();
    let http_calls = http.calls.clone();
    let probes = ProbeSet {
        dns: Arc::new(MockProbe::<DnsSignals>::ok()),
        http: Arc::new(http),
        ..failing_set()
    };

    let results = Scanner::new(probes, config())
        .scan_all(candidates(&["gogle.com", "googl.com"]))
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(http_calls.load(Ordering::SeqCst), 0);
    for r in &results {
        assert!(!r.registered);
        assert!(r.signals.dns.collected().is_some());
        assert!(r.signals.http.is_skipped());
        assert!(r.signals.threat.is_skipped());
    }
}

#[tokio::test]
async fn test_registered_candidate_runs_enabled_stages_only() {
    let whois = MockProbe::<WhoisSignals>::ok();
    let whois_calls = whois.calls.clone();
    let probes = ProbeSet {
        dns: Arc::new(MockProbe::new(|_| Ok(registered_dns()))),
        http: Arc::new(MockProbe::new(|_| {
            Ok(HttpSignals {
                http_status: Some(200),
                ..Default::default()
            })
        })),
        tls: Arc::new(MockProbe::<TlsSignals>::failing()),
        whois: Arc::new(whois),
        threat: Arc::new(MockProbe::new(|_| {
            Ok(ThreatSignals {
                is_threat: true,
                ..Default::default()
            })
        })),
    };
    let config = ScanConfig {
        whois_check: false,
        ..config()
    };

    let results = Scanner::new(probes, config)
        .scan_all(candidates(&["paypa1.com"]))
        .await;
    let r = &results[0];

    assert!(r.registered);
    assert_eq!(whois_calls.load(Ordering::SeqCst), 0);
    assert!(r.signals.whois.is_skipped());
    assert!(r.signals.tls.error().is_some());
    // registered 20 + http 15 + mx 20 + threat 30
    assert_eq!(r.risk_score, 85);
    assert_eq!(r.risk_class, RiskClass::High);
    assert!(r.error.is_none());
}

#[tokio::test]
async fn test_stage_failure_does_not_stop_other_stages() {
    let threat = MockProbe::<ThreatSignals>::ok();
    let threat_calls = threat.calls.clone();
    let probes = ProbeSet {
        dns: Arc::new(MockProbe::new(|_| Ok(registered_dns()))),
        threat: Arc::new(threat),
        ..failing_set()
    };

    let results = Scanner::new(probes, config())
        .scan_all(candidates(&["paypa1.com"]))
        .await;

    assert_eq!(threat_calls.load(Ordering::SeqCst), 1);
    assert_eq!(results[0].signals.failed_stages().len(), 3);
    assert!(results[0].signals.threat.collected().is_some());
}

#[tokio::test]
async fn test_timed_out_task_is_degraded() {
    let probes = ProbeSet {
        dns: Arc::new(MockProbe::new(|d: &str| {
            if d == "slow.com" {
                Ok(registered_dns())
            } else {
                Ok(DnsSignals::default())
            }
        })),
        http: Arc::new(MockProbe::<HttpSignals>::ok().with_delay(Duration::from_secs(10))),
        ..failing_set()
    };
    let config = ScanConfig {
        task_timeout: Duration::from_millis(200),
        ..config()
    };

    let started = std::time::Instant::now();
    let results = Scanner::new(probes, config)
        .scan_all(candidates(&["slow.com", "fast.com"]))
        .await;
    assert!(started.elapsed() < Duration::from_secs(5));

    assert_eq!(results.len(), 2);
    let slow = results.iter().find(|r| r.domain == "slow.com").unwrap();
    assert!(slow.error.as_deref().unwrap().contains("timed out"));
    assert_eq!(slow.risk_score, 0);
    assert_eq!(slow.risk_class, RiskClass::Minimal);
    assert!(!slow.registered);

    let fast = results.iter().find(|r| r.domain == "fast.com").unwrap();
    assert!(fast.error.is_none());
}

#[tokio::test]
async fn test_panicking_task_is_degraded_and_scan_continues() {
    let probes = ProbeSet {
        dns: Arc::new(MockProbe::new(|_| Ok(registered_dns()))),
        http: Arc::new(PanickingProbe),
        ..failing_set()
    };

    let results = Scanner::new(probes, config())
        .scan_all(candidates(&["a1.com", "a2.com", "a3.com"]))
        .await;

    assert_eq!(results.len(), 3);
    for r in &results {
        assert!(r.is_degraded());
        assert!(r.error.as_deref().unwrap().starts_with("task failed"));
        assert_eq!(r.risk_score, 0);
    }
}

#[tokio::test]
async fn test_worker_bound_is_respected() {
    let dns = MockProbe::<DnsSignals>::ok().with_delay(Duration::from_millis(30));
    let max_in_flight = dns.max_in_flight.clone();
    let probes = ProbeSet {
        dns: Arc::new(dns),
        ..failing_set()
    };
    let config = ScanConfig {
        workers: 3,
        ..config()
    };

    let domains: Vec<String> = (0..12).map(|i| format!("d{}.com", i)).collect();
    let names: Vec<&str> = domains.iter().map(String::as_str).collect();
    let results = Scanner::new(probes, config).scan_all(candidates(&names)).await;

    assert_eq!(results.len(), 12);
    let peak = max_in_flight.load(Ordering::SeqCst);
    assert!(peak <= 3, "peak concurrency {}", peak);
    assert!(peak >= 2, "expected parallelism, got {}", peak);
}
