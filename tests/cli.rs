use std::collections::HashSet;
use std::process::Command;

#[derive(Debug, Clone)]
struct Variation {
    domain: String,
    transformation: String,
}

fn run_typosquatch(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_typosquatch"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute typosquatch");

    let code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (code, stdout, stderr)
}

/// Lines of the form "<domain>, <transformation>".
fn parse_output(stdout: &str) -> Vec<Variation> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let (domain, transformation) = line.split_once(',')?;
            Some(Variation {
                domain: domain.trim().to_string(),
                transformation: transformation.trim().to_string(),
            })
        })
        .collect()
}

fn generated_count(stderr: &str) -> Option<usize> {
    stderr
        .lines()
        .find_map(|line| line.strip_prefix("Generated "))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|n| n.parse().ok())
}

fn assert_contains(variants: &[Variation], domain: &str, transformation: &str) -> Result<(), String> {
    if variants
        .iter()
        .any(|v| v.domain == domain && v.transformation == transformation)
    {
        Ok(())
    } else {
        Err(format!("Expected '{}, {}' not found in output", domain, transformation))
    }
}

fn assert_no_original(variants: &[Variation], original: &str) -> Result<(), String> {
    if variants.iter().any(|v| v.domain == original) {
        Err(format!("Original domain '{}' was included in output", original))
    } else {
        Ok(())
    }
}

fn assert_transform_subset(variants: &[Variation], allowed: &[&str]) -> Result<(), String> {
    let allowed: HashSet<&str> = allowed.iter().copied().collect();
    for v in variants {
        if !allowed.contains(v.transformation.as_str()) {
            return Err(format!("Unexpected transformation label: {}", v.transformation));
        }
    }
    Ok(())
}

fn assert_unique(variants: &[Variation]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for v in variants {
        if !seen.insert(&v.domain) {
            return Err(format!("Duplicate domain in output: {}", v.domain));
        }
    }
    Ok(())
}

#[test]
fn test_list_only_default_strategies() {
    let (code, stdout, stderr) = run_typosquatch(&["google.com", "--list-only"]);
    assert_eq!(code, 0, "stderr: {}", stderr);

    let variants = parse_output(&stdout);
    assert!(!variants.is_empty());
    assert_contains(&variants, "gogle.com", "missing-char").unwrap();
    assert_contains(&variants, "googel.com", "transposition").unwrap();
    assert_contains(&variants, "google.net", "tld-variation").unwrap();
    assert_contains(&variants, "login.google.com", "subdomain-abuse").unwrap();
    assert_no_original(&variants, "google.com").unwrap();
    assert_unique(&variants).unwrap();
    assert!(!variants.iter().any(|v| v.transformation == "bitsquatting"));
    assert!(!variants.iter().any(|v| v.transformation == "combosquatting"));
    assert_eq!(generated_count(&stderr), Some(variants.len()));
}

#[test]
fn test_group_toggles_limit_labels() {
    let (code, stdout, _) = run_typosquatch(&[
        "paypal.com",
        "--list-only",
        "--no-homoglyphs",
        "--no-tld",
        "--no-subdomains",
    ]);
    assert_eq!(code, 0);

    let variants = parse_output(&stdout);
    assert_transform_subset(
        &variants,
        &[
            "missing-char",
            "extra-char",
            "transposition",
            "keyboard-typo",
            "double-char",
            "missing-dot",
            "hyphenation",
        ],
    )
    .unwrap();
    assert!(variants.iter().all(|v| v.domain.ends_with(".com")));
}

#[test]
fn test_opt_in_strategies() {
    let (code, stdout, _) = run_typosquatch(&[
        "paypal.com",
        "--list-only",
        "--bitsquatting",
        "--combosquatting",
        "--keywords",
        "refund",
    ]);
    assert_eq!(code, 0);

    let variants = parse_output(&stdout);
    assert!(variants.iter().any(|v| v.transformation == "bitsquatting"));
    assert_contains(&variants, "paypal-login.com", "combosquatting").unwrap();
    assert_contains(&variants, "paypal-refund.com", "combosquatting").unwrap();
}

#[test]
fn test_max_variations_limit() {
    let (code, stdout, stderr) = run_typosquatch(&["google.com", "--list-only", "--max-variations", "5"]);
    assert_eq!(code, 0);

    let variants = parse_output(&stdout);
    assert_eq!(variants.len(), 5);
    assert!(generated_count(&stderr).unwrap() > 5);
}

#[test]
fn test_output_is_deterministic() {
    let (_, first, _) = run_typosquatch(&["example.org", "--list-only"]);
    let (_, second, _) = run_typosquatch(&["example.org", "--list-only"]);
    assert_eq!(first, second);
}

#[test]
fn test_invalid_target_fails_before_scanning() {
    let (code, stdout, stderr) = run_typosquatch(&["bad_domain!.com", "--list-only"]);
    assert_ne!(code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("invalid target domain"), "stderr: {}", stderr);
}

#[test]
fn test_unknown_report_format_is_rejected() {
    let (code, _, stderr) = run_typosquatch(&["google.com", "--list-only", "-o", "pdf"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown report format"), "stderr: {}", stderr);
}
