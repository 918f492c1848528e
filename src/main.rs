use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use typosquatch::report::{self, ReportFormat, Summary};
use typosquatch::{
    GeneratorOptions, ProbeConfig, ProbeSet, RiskClass, ScanConfig, Scanner, ScoredResult,
    VariationGenerator, VariationType,
};

#[derive(Parser)]
#[command(name = "typosquatch")]
#[command(about = "Hunt typosquatting domains: generate look-alikes, probe them and score the risk")]
struct Cli {
    /// Target domain (e.g. paypal.com)
    domain: String,

    /// Number of candidates scanned concurrently
    #[arg(short = 't', long, default_value_t = 10)]
    threads: usize,

    /// Per-candidate timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Report formats, comma-separated (html, json, csv)
    #[arg(short = 'o', long, default_value = "html")]
    output: String,

    /// Directory the reports are written to
    #[arg(long, default_value = "reports")]
    output_dir: PathBuf,

    /// VirusTotal API key
    #[arg(long, env = "VT_API_KEY", hide_env_values = true)]
    vt_key: Option<String>,

    /// Extra combosquatting keywords, comma-separated
    #[arg(long)]
    keywords: Option<String>,

    /// Show unregistered domains in the results table as well
    #[arg(long)]
    show_all: bool,

    /// Enable bitsquatting variations
    #[arg(long)]
    bitsquatting: bool,

    /// Enable combosquatting variations
    #[arg(long)]
    combosquatting: bool,

    /// Skip the HTTP check
    #[arg(long)]
    no_http: bool,

    /// Skip the SSL certificate check
    #[arg(long)]
    no_ssl: bool,

    /// Skip the WHOIS lookup
    #[arg(long)]
    no_whois: bool,

    /// Skip threat-intelligence lookups
    #[arg(long)]
    no_intel: bool,

    /// Disable homoglyph variations
    #[arg(long)]
    no_homoglyphs: bool,

    /// Disable typo variations
    #[arg(long)]
    no_typos: bool,

    /// Disable TLD variations
    #[arg(long)]
    no_tld: bool,

    /// Disable subdomain-abuse variations
    #[arg(long)]
    no_subdomains: bool,

    /// Maximum number of variations to scan (unlimited if not specified)
    #[arg(long)]
    max_variations: Option<usize>,

    /// Print the generated variations and exit without scanning
    #[arg(long)]
    list_only: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn generator_options(&self) -> GeneratorOptions {
        let mut options = GeneratorOptions::default();
        options
            .set_all(&VariationType::TYPOS, !self.no_typos)
            .set_all(&VariationType::TLD, !self.no_tld)
            .set(VariationType::Homoglyph, !self.no_homoglyphs)
            .set(VariationType::SubdomainAbuse, !self.no_subdomains)
            .set(VariationType::Bitsquatting, self.bitsquatting)
            .set(VariationType::Combosquatting, self.combosquatting);
        options.extra_keywords = self
            .keywords
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|kw| kw.trim().to_lowercase())
            .filter(|kw| !kw.is_empty())
            .collect();
        options
    }

    fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            workers: self.threads.max(1),
            task_timeout: Duration::from_secs(self.timeout),
            http_check: !self.no_http,
            ssl_check: !self.no_ssl,
            whois_check: !self.no_whois,
            threat_intel: !self.no_intel,
        }
    }

    fn probe_config(&self) -> ProbeConfig {
        ProbeConfig {
            vt_api_key: self.vt_key.clone(),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let formats = ReportFormat::parse_list(&cli.output)?;
    let generator = VariationGenerator::new(&cli.domain)?;
    let target = format!("{}.{}", generator.name(), generator.tld());

    let mut candidates = generator.generate(&cli.generator_options());
    let generated = candidates.len();
    if let Some(max) = cli.max_variations {
        candidates.truncate(max);
    }

    if cli.list_only {
        for candidate in &candidates {
            println!("{}, {}", candidate.domain, candidate.variation_type);
        }
        eprintln!("Generated {} variations", generated);
        return Ok(());
    }

    eprintln!("Generated {} variations for {}", generated, target);

    let probes = ProbeSet::from_config(&cli.probe_config()).context("failed to set up probes")?;
    let scanner = Scanner::new(probes, cli.scan_config());

    info!(
        "scanning {} candidates with {} workers",
        candidates.len(),
        scanner.config().workers
    );
    let started = Instant::now();
    let progress = ScanProgress::new(candidates.len());
    let mut results = Vec::with_capacity(candidates.len());

    let mut stream = Box::pin(scanner.scan(candidates));
    while let Some(result) = stream.next().await {
        if result.registered {
            progress.println(format!(
                "  * {:<40} Risk: {:>3} {}",
                result.domain, result.risk_score, result.risk_class
            ));
        }
        progress.inc();
        results.push(result);
    }
    progress.finish();
    info!("scan finished in {:.1}s", started.elapsed().as_secs_f64());

    print_summary(&Summary::from_results(&results));
    print_table(&results, cli.show_all);

    let written = report::write_reports(&cli.output_dir, &target, &results, &formats)
        .with_context(|| format!("failed to write reports to {}", cli.output_dir.display()))?;
    for path in written {
        println!("Report saved: {}", path.display());
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Hidden when stderr is not a terminal.
struct ScanProgress {
    bar: ProgressBar,
}

impl ScanProgress {
    fn new(total: usize) -> Self {
        let bar = if std::io::stderr().is_terminal() {
            ProgressBar::new(total as u64)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner} Scanning {bar:40.cyan/blue} {pos:>4}/{len:4} [{elapsed_precise}]",
        ) {
            bar.set_style(style.progress_chars("█▉ "));
        }
        Self { bar }
    }

    fn println(&self, line: String) {
        if self.bar.is_hidden() {
            println!("{}", line);
        } else {
            self.bar.println(line);
        }
    }

    fn inc(&self) {
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

fn print_summary(summary: &Summary) {
    println!();
    println!("Scan summary");
    println!("  Variations:   {}", summary.total);
    println!("  Registered:   {}", summary.registered);
    println!("  Active web:   {}", summary.active_web);
    println!("  MX records:   {}", summary.with_mx);
    println!("  Valid SSL:    {}", summary.with_ssl);
    println!("  High risk:    {}", summary.high_risk);
    println!();
}

fn print_table(results: &[ScoredResult], show_all: bool) {
    let rows: Vec<&ScoredResult> = report::sorted_by_risk(results)
        .into_iter()
        .filter(|r| show_all || r.registered)
        .collect();
    if rows.is_empty() {
        println!("No registered look-alike domains found.");
        return;
    }

    println!(
        "{:<40} {:<16} {:<4} {:<6} {:<3} {:<4} {:<7} {:>5}",
        "DOMAIN", "TYPE", "REG", "HTTP", "MX", "SSL", "THREAT", "RISK"
    );
    for r in rows {
        let s = &r.signals;
        let http = s
            .http_status()
            .map(|status| status.to_string())
            .unwrap_or_else(|| "-".to_string());
        let threat = if s.is_threat() {
            "THREAT"
        } else if r.registered {
            "clean"
        } else {
            "-"
        };
        println!(
            "{:<40} {:<16} {:<4} {:<6} {:<3} {:<4} {:<7} {:>5} {}",
            r.domain,
            r.variation_type.as_str(),
            mark(r.registered),
            http,
            mark(!s.mx_records().is_empty()),
            mark(s.ssl_valid()),
            threat,
            r.risk_score,
            risk_label(r.risk_class),
        );
    }
    println!();
}

fn mark(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn risk_label(class: RiskClass) -> &'static str {
    match class {
        RiskClass::High => "HIGH",
        RiskClass::Medium => "MED",
        RiskClass::Low => "LOW",
        RiskClass::Minimal => "",
    }
}
