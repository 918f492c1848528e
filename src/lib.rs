//! Typosquatting domain hunter.
//!
//! [`VariationGenerator`] turns a target domain into look-alike candidates;
//! [`Scanner`] probes each one (DNS, HTTP, TLS, WHOIS, threat intel) and
//! scores it; [`report`] writes the results out.

pub mod config;
pub mod error;
pub mod gate;
pub mod generator;
pub mod probe;
pub mod report;
pub mod scanner;
pub mod scorer;
pub mod signals;

pub use config::{ProbeConfig, ScanConfig};
pub use error::{Error, Result};
pub use generator::{Candidate, GeneratorOptions, VariationGenerator, VariationType};
pub use probe::{Probe, ProbeError, ProbeSet};
pub use scanner::{ScoredResult, Scanner};
pub use scorer::RiskClass;
pub use signals::SignalRecord;
