use super::{Probe, ProbeError};
use crate::signals::DnsSignals;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::proto::rr::RecordType;
use trust_dns_resolver::TokioAsyncResolver;

/// Registration probe: A, AAAA, MX, NS, CNAME and TXT lookups.
pub struct DnsProbe {
    resolver: TokioAsyncResolver,
    timeout: Duration,
}

enum Answer<T> {
    Found(T),
    NoRecords,
    Failed(ProbeError),
}

impl DnsProbe {
    pub fn new(lookup_timeout: Duration) -> Self {
        let mut opts = ResolverOpts::default();
        opts.timeout = lookup_timeout;
        let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), opts);
        Self {
            resolver,
            timeout: lookup_timeout,
        }
    }

    async fn answer<T, F>(&self, lookup: F) -> Answer<T>
    where
        F: Future<Output = Result<T, ResolveError>>,
    {
        match timeout(self.timeout, lookup).await {
            Ok(Ok(found)) => Answer::Found(found),
            Ok(Err(e)) if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) => {
                Answer::NoRecords
            }
            Ok(Err(e)) => Answer::Failed(ProbeError::Protocol(e.to_string())),
            Err(_) => Answer::Failed(ProbeError::Timeout(self.timeout)),
        }
    }
}

/// Records a lookup failure and yields the found value, if any.
fn take<T>(answer: Answer<T>, errors: &mut Vec<ProbeError>) -> Option<T> {
    match answer {
        Answer::Found(found) => Some(found),
        Answer::NoRecords => None,
        Answer::Failed(e) => {
            errors.push(e);
            None
        }
    }
}

const LOOKUPS: usize = 6;

#[async_trait]
impl Probe for DnsProbe {
    type Output = DnsSignals;

    async fn probe(&self, domain: &str) -> Result<DnsSignals, ProbeError> {
        let mut signals = DnsSignals::default();
        let mut errors = Vec::new();

        if let Some(lookup) = take(self.answer(self.resolver.ipv4_lookup(domain)).await, &mut errors) {
            signals.a_records = lookup.iter().map(|a| a.to_string()).collect();
            signals.ip_address = signals.a_records.first().cloned();
            signals.registered = true;
        }

        if let Some(lookup) = take(self.answer(self.resolver.ipv6_lookup(domain)).await, &mut errors) {
            signals.ipv6_address = lookup.iter().next().map(|aaaa| aaaa.to_string());
            signals.registered = true;
        }

        if let Some(lookup) = take(self.answer(self.resolver.mx_lookup(domain)).await, &mut errors) {
            signals.mx_records = lookup.iter().map(|mx| mx.exchange().to_string()).collect();
            signals.registered |= !signals.mx_records.is_empty();
        }

        if let Some(lookup) = take(self.answer(self.resolver.ns_lookup(domain)).await, &mut errors) {
            signals.ns_records = lookup.iter().map(|ns| ns.to_string()).collect();
            signals.registered |= !signals.ns_records.is_empty();
        }

        let cname = self.resolver.lookup(domain, RecordType::CNAME);
        if let Some(lookup) = take(self.answer(cname).await, &mut errors) {
            signals.cname_record = lookup
                .iter()
                .find_map(|rdata| rdata.as_cname())
                .map(|cname| cname.0.to_string());
            signals.registered |= signals.cname_record.is_some();
        }

        // TXT alone does not mark a domain as registered.
        if let Some(lookup) = take(self.answer(self.resolver.txt_lookup(domain)).await, &mut errors) {
            signals.txt_records = lookup.iter().map(|txt| txt.to_string()).collect();
        }

        if errors.len() == LOOKUPS {
            debug!("all DNS lookups failed for {}: {}", domain, errors[0]);
            return Err(errors.swap_remove(0));
        }

        Ok(signals)
    }
}
