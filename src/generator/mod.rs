//! Look-alike domain generation.
//!
//! Every strategy is a pure function of `(name, tld)` returning raw candidate
//! strings. [`VariationGenerator`] applies the enabled strategies in a fixed
//! order and keeps the first occurrence of each valid, lower-cased domain.

pub mod tables;

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use tables::{
    COMBO_PREFIXES, COMBO_SUFFIXES, HOMOGLYPHS, INSERTION_ALPHABET, KEYBOARD_ADJACENT,
    MAX_GLYPHS_PER_CHAR, SUBDOMAIN_KEYWORDS, TLDS_COMMON,
};

/// Mutation strategy that produced a candidate.
///
/// Declaration order is application order; `Ord` follows it so a
/// `BTreeSet<VariationType>` iterates strategies deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VariationType {
    MissingChar,
    ExtraChar,
    Transposition,
    KeyboardTypo,
    DoubleChar,
    MissingDot,
    Hyphenation,
    Homoglyph,
    TldVariation,
    TldTypo,
    SubdomainAbuse,
    Bitsquatting,
    Combosquatting,
}

impl VariationType {
    pub const ALL: [VariationType; 13] = [
        VariationType::MissingChar,
        VariationType::ExtraChar,
        VariationType::Transposition,
        VariationType::KeyboardTypo,
        VariationType::DoubleChar,
        VariationType::MissingDot,
        VariationType::Hyphenation,
        VariationType::Homoglyph,
        VariationType::TldVariation,
        VariationType::TldTypo,
        VariationType::SubdomainAbuse,
        VariationType::Bitsquatting,
        VariationType::Combosquatting,
    ];

    /// Strategies grouped under the `typos` toggle.
    pub const TYPOS: [VariationType; 7] = [
        VariationType::MissingChar,
        VariationType::ExtraChar,
        VariationType::Transposition,
        VariationType::KeyboardTypo,
        VariationType::DoubleChar,
        VariationType::MissingDot,
        VariationType::Hyphenation,
    ];

    /// Strategies grouped under the `tld` toggle.
    pub const TLD: [VariationType; 2] = [VariationType::TldVariation, VariationType::TldTypo];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariationType::MissingChar => "missing-char",
            VariationType::ExtraChar => "extra-char",
            VariationType::Transposition => "transposition",
            VariationType::KeyboardTypo => "keyboard-typo",
            VariationType::DoubleChar => "double-char",
            VariationType::MissingDot => "missing-dot",
            VariationType::Hyphenation => "hyphenation",
            VariationType::Homoglyph => "homoglyph",
            VariationType::TldVariation => "tld-variation",
            VariationType::TldTypo => "tld-typo",
            VariationType::SubdomainAbuse => "subdomain-abuse",
            VariationType::Bitsquatting => "bitsquatting",
            VariationType::Combosquatting => "combosquatting",
        }
    }
}

impl fmt::Display for VariationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated look-alike domain. Unique within one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub domain: String,
    pub variation_type: VariationType,
}

/// Which strategies to run, plus caller keywords for combosquatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub strategies: BTreeSet<VariationType>,
    pub extra_keywords: Vec<String>,
}

impl Default for GeneratorOptions {
    /// Everything except bitsquatting and combosquatting, which are opt-in.
    fn default() -> Self {
        let strategies = VariationType::ALL
            .into_iter()
            .filter(|v| !matches!(v, VariationType::Bitsquatting | VariationType::Combosquatting))
            .collect();
        Self {
            strategies,
            extra_keywords: Vec::new(),
        }
    }
}

impl GeneratorOptions {
    pub fn all() -> Self {
        Self {
            strategies: VariationType::ALL.into_iter().collect(),
            extra_keywords: Vec::new(),
        }
    }

    pub fn only<I: IntoIterator<Item = VariationType>>(strategies: I) -> Self {
        Self {
            strategies: strategies.into_iter().collect(),
            extra_keywords: Vec::new(),
        }
    }

    pub fn set(&mut self, strategy: VariationType, enabled: bool) -> &mut Self {
        if enabled {
            self.strategies.insert(strategy);
        } else {
            self.strategies.remove(&strategy);
        }
        self
    }

    pub fn set_all(&mut self, strategies: &[VariationType], enabled: bool) -> &mut Self {
        for s in strategies {
            self.set(*s, enabled);
        }
        self
    }
}

/// Split on the last dot; a bare name gets `com`.
pub fn parse_domain(input: &str) -> (String, String) {
    if let Some(dot_pos) = input.rfind('.') {
        let domain = input[..dot_pos].to_string();
        let tld = input[dot_pos + 1..].to_string();
        (domain, tld)
    } else {
        (input.to_string(), "com".to_string())
    }
}

/// Length, charset, hyphen and dot constraints every emitted candidate meets.
pub fn is_valid_candidate(domain: &str) -> bool {
    (4..=253).contains(&domain.len())
        && domain
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'.')
        && !domain.starts_with('-')
        && !domain.ends_with('-')
        && domain.contains('.')
}

pub struct VariationGenerator {
    name: String,
    tld: String,
    seen: HashSet<String>,
    variations: Vec<Candidate>,
}

impl VariationGenerator {
    /// Normalises the target (trim, lower-case, IDNA to ASCII) and rejects
    /// anything that cannot be split into a non-empty name and TLD.
    pub fn new(target: &str) -> Result<Self> {
        let trimmed = target.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidDomain {
                domain: target.to_string(),
                reason: "target domain is empty".to_string(),
            });
        }

        let normalized = idna::domain_to_ascii(trimmed).map_err(|e| Error::InvalidDomain {
            domain: target.to_string(),
            reason: format!("not a valid domain name: {e}"),
        })?;

        if !normalized
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'.')
        {
            return Err(Error::InvalidDomain {
                domain: target.to_string(),
                reason: "only letters, digits, '-' and '.' are allowed".to_string(),
            });
        }

        let (name, tld) = parse_domain(&normalized);
        if name.is_empty() || tld.is_empty() || name.split('.').any(str::is_empty) {
            return Err(Error::InvalidDomain {
                domain: target.to_string(),
                reason: "empty label".to_string(),
            });
        }

        let mut seen = HashSet::new();
        seen.insert(normalized.clone());
        seen.insert(format!("{}.{}", name, tld));

        Ok(Self {
            name,
            tld,
            seen,
            variations: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tld(&self) -> &str {
        &self.tld
    }

    pub fn generate(mut self, options: &GeneratorOptions) -> Vec<Candidate> {
        for &strategy in &options.strategies {
            let raw = raw_variations(strategy, &self.name, &self.tld, &options.extra_keywords);
            for domain in raw {
                self.add(&domain, strategy);
            }
        }
        self.variations
    }

    /// First writer wins; invalid candidates are dropped silently.
    fn add(&mut self, domain: &str, variation_type: VariationType) {
        let domain = domain.to_lowercase();
        if self.seen.contains(&domain) || !is_valid_candidate(&domain) {
            return;
        }
        self.seen.insert(domain.clone());
        self.variations.push(Candidate {
            domain,
            variation_type,
        });
    }
}

/// Raw output of one strategy, before deduplication and validity filtering.
pub fn raw_variations(
    strategy: VariationType,
    name: &str,
    tld: &str,
    extra_keywords: &[String],
) -> Vec<String> {
    match strategy {
        VariationType::MissingChar => generate_missing_char(name, tld),
        VariationType::ExtraChar => generate_extra_char(name, tld),
        VariationType::Transposition => generate_transposition(name, tld),
        VariationType::KeyboardTypo => generate_keyboard_typos(name, tld),
        VariationType::DoubleChar => generate_double_char(name, tld),
        VariationType::MissingDot => generate_missing_dot(name, tld),
        VariationType::Hyphenation => generate_hyphenation(name, tld),
        VariationType::Homoglyph => generate_homoglyphs(name, tld),
        VariationType::TldVariation => generate_tld_variations(name, tld),
        VariationType::TldTypo => generate_tld_typos(name, tld),
        VariationType::SubdomainAbuse => generate_subdomain_abuse(name, tld),
        VariationType::Bitsquatting => generate_bitsquatting(name, tld),
        VariationType::Combosquatting => generate_combosquatting(name, tld, extra_keywords),
    }
}

fn generate_missing_char(domain: &str, tld: &str) -> Vec<String> {
    let chars: Vec<char> = domain.chars().collect();
    let mut variations = Vec::new();

    for i in 0..chars.len() {
        let new_domain: String = chars
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, c)| *c)
            .collect();
        if !new_domain.is_empty() {
            variations.push(format!("{}.{}", new_domain, tld));
        }
    }

    variations
}

fn generate_extra_char(domain: &str, tld: &str) -> Vec<String> {
    let chars: Vec<char> = domain.chars().collect();
    let mut variations = Vec::with_capacity(INSERTION_ALPHABET.len() * (chars.len() + 1));

    for i in 0..=chars.len() {
        for ch in INSERTION_ALPHABET.chars() {
            let mut new_domain = chars.clone();
            new_domain.insert(i, ch);
            variations.push(format!("{}.{}", new_domain.into_iter().collect::<String>(), tld));
        }
    }

    variations
}

fn generate_transposition(domain: &str, tld: &str) -> Vec<String> {
    let chars: Vec<char> = domain.chars().collect();
    let mut variations = Vec::new();

    for i in 0..chars.len().saturating_sub(1) {
        let mut swapped = chars.clone();
        swapped.swap(i, i + 1);
        variations.push(format!("{}.{}", swapped.into_iter().collect::<String>(), tld));
    }

    variations
}

fn generate_keyboard_typos(domain: &str, tld: &str) -> Vec<String> {
    let chars: Vec<char> = domain.chars().collect();
    let mut variations = Vec::new();

    for (i, ch) in chars.iter().enumerate() {
        if let Some(adjacent) = KEYBOARD_ADJACENT.get(ch) {
            for adj in adjacent.chars() {
                let mut new_domain = chars.clone();
                new_domain[i] = adj;
                variations.push(format!("{}.{}", new_domain.into_iter().collect::<String>(), tld));
            }
        }
    }

    variations
}

fn generate_double_char(domain: &str, tld: &str) -> Vec<String> {
    let chars: Vec<char> = domain.chars().collect();
    let mut variations = Vec::new();

    for (i, &ch) in chars.iter().enumerate() {
        let mut new_domain = chars.clone();
        new_domain.insert(i + 1, ch);
        variations.push(format!("{}.{}", new_domain.into_iter().collect::<String>(), tld));
    }

    variations
}

fn generate_missing_dot(domain: &str, tld: &str) -> Vec<String> {
    vec![
        format!("www{}.{}", domain, tld),
        format!("www-{}.{}", domain, tld),
    ]
}

fn generate_hyphenation(domain: &str, tld: &str) -> Vec<String> {
    let chars: Vec<char> = domain.chars().collect();
    let mut variations = Vec::new();

    for i in 1..chars.len() {
        let mut new_domain = chars.clone();
        new_domain.insert(i, '-');
        variations.push(format!("{}.{}", new_domain.into_iter().collect::<String>(), tld));
    }

    if domain.contains('-') {
        variations.push(format!("{}.{}", domain.replace('-', ""), tld));
        variations.push(format!("{}.{}", domain.replace('-', "."), tld));
    }

    variations
}

fn generate_homoglyphs(domain: &str, tld: &str) -> Vec<String> {
    substitute_glyphs(domain, tld, &HOMOGLYPHS)
}

/// Each substituted name goes through IDNA; a name that fails to encode
/// is skipped on its own.
fn substitute_glyphs(domain: &str, tld: &str, table: &HashMap<char, &'static [char]>) -> Vec<String> {
    let chars: Vec<char> = domain.chars().collect();
    let mut variations = Vec::new();

    for (i, ch) in chars.iter().enumerate() {
        let Some(glyphs) = table.get(ch) else {
            continue;
        };
        for &glyph in glyphs.iter().take(MAX_GLYPHS_PER_CHAR) {
            let mut new_domain = chars.clone();
            new_domain[i] = glyph;
            let unicode: String = new_domain.into_iter().collect();
            match idna::domain_to_ascii(&unicode) {
                Ok(ascii) if !ascii.is_empty() => variations.push(format!("{}.{}", ascii, tld)),
                _ => {}
            }
        }
    }

    variations
}

fn generate_tld_variations(domain: &str, tld: &str) -> Vec<String> {
    let mut variations: Vec<String> = TLDS_COMMON
        .iter()
        .filter(|&&new_tld| new_tld != tld)
        .map(|new_tld| format!("{}.{}", domain, new_tld))
        .collect();

    if tld == "com" {
        variations.push(format!("{}.co", domain));
        variations.push(format!("{}.com.co", domain));
    }

    variations
}

fn generate_tld_typos(domain: &str, tld: &str) -> Vec<String> {
    let chars: Vec<char> = tld.chars().collect();
    let mut variations = Vec::new();

    for i in 0..chars.len().saturating_sub(1) {
        let mut swapped = chars.clone();
        swapped.swap(i, i + 1);
        variations.push(format!("{}.{}", domain, swapped.into_iter().collect::<String>()));
    }

    variations
}

fn generate_subdomain_abuse(domain: &str, tld: &str) -> Vec<String> {
    let mut variations = Vec::with_capacity(SUBDOMAIN_KEYWORDS.len() * 2);

    for kw in SUBDOMAIN_KEYWORDS {
        variations.push(format!("{}.{}.{}", kw, domain, tld));
        variations.push(format!("{}.{}.{}", domain, kw, tld));
    }

    variations
}

/// Flip each of the 8 low bits of every character; keep alphanumeric or `-`.
fn generate_bitsquatting(domain: &str, tld: &str) -> Vec<String> {
    let chars: Vec<char> = domain.chars().collect();
    let mut variations = Vec::new();

    for (i, &ch) in chars.iter().enumerate() {
        let code = ch as u32;
        for bit_pos in 0..8 {
            let Some(flipped) = char::from_u32(code ^ (1 << bit_pos)) else {
                continue;
            };
            if flipped.is_alphanumeric() || flipped == '-' {
                let mut new_domain = chars.clone();
                new_domain[i] = flipped;
                variations.push(format!("{}.{}", new_domain.into_iter().collect::<String>(), tld));
            }
        }
    }

    variations
}

fn generate_combosquatting(domain: &str, tld: &str, extra_keywords: &[String]) -> Vec<String> {
    let keywords = COMBO_PREFIXES
        .iter()
        .chain(COMBO_SUFFIXES.iter())
        .copied()
        .chain(extra_keywords.iter().map(String::as_str));

    let mut variations = Vec::new();
    for word in keywords {
        variations.push(format!("{}{}.{}", domain, word, tld));
        variations.push(format!("{}{}.{}", word, domain, tld));
        variations.push(format!("{}-{}.{}", domain, word, tld));
        variations.push(format!("{}-{}.{}", word, domain, tld));
    }

    variations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.domain.as_str()).collect()
    }

    #[test]
    fn test_parse_domain() {
        assert_eq!(parse_domain("example.com"), ("example".into(), "com".into()));
        assert_eq!(parse_domain("login.example.co"), ("login.example".into(), "co".into()));
        assert_eq!(parse_domain("example"), ("example".into(), "com".into()));
    }

    #[test]
    fn test_rejects_malformed_targets() {
        assert!(VariationGenerator::new("").is_err());
        assert!(VariationGenerator::new("   ").is_err());
        assert!(VariationGenerator::new(".com").is_err());
        assert!(VariationGenerator::new("example.").is_err());
        assert!(VariationGenerator::new("exa mple.com").is_err());
    }

    #[test]
    fn test_target_is_normalised() {
        let generator = VariationGenerator::new("  PayPal.COM ").unwrap();
        assert_eq!(generator.name(), "paypal");
        assert_eq!(generator.tld(), "com");

        let bare = VariationGenerator::new("example").unwrap();
        assert_eq!(bare.tld(), "com");
    }

    #[test]
    fn test_raw_counts_for_two_letter_name() {
        let missing = raw_variations(VariationType::MissingChar, "ab", "com", &[]);
        assert_eq!(missing, vec!["b.com", "a.com"]);

        let extra = raw_variations(VariationType::ExtraChar, "ab", "com", &[]);
        assert_eq!(extra.len(), 26 * 3);
    }

    #[test]
    fn test_validity_filter() {
        assert!(is_valid_candidate("b.com"));
        assert!(is_valid_candidate("ex-ample.com"));
        assert!(!is_valid_candidate("a.c"));
        assert!(!is_valid_candidate("-example.com"));
        assert!(!is_valid_candidate("example.com-"));
        assert!(!is_valid_candidate("examplecom"));
        assert!(!is_valid_candidate("exa$mple.com"));
        assert!(!is_valid_candidate("exämple.com"));
        assert!(!is_valid_candidate(&format!("{}.com", "a".repeat(250))));
    }

    #[test]
    fn test_missing_char_keeps_valid_only() {
        let out = VariationGenerator::new("ab.com")
            .unwrap()
            .generate(&GeneratorOptions::only([VariationType::MissingChar]));
        assert_eq!(domains(&out), vec!["b.com", "a.com"]);
        assert!(out.iter().all(|c| c.variation_type == VariationType::MissingChar));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let options = GeneratorOptions::all();
        let first = VariationGenerator::new("paypal.com").unwrap().generate(&options);
        let second = VariationGenerator::new("paypal.com").unwrap().generate(&options);
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_duplicates_and_no_original() {
        let mut options = GeneratorOptions::all();
        options.extra_keywords = vec!["bank".to_string(), "login".to_string()];
        let out = VariationGenerator::new("google.com").unwrap().generate(&options);

        let unique: HashSet<&str> = out.iter().map(|c| c.domain.as_str()).collect();
        assert_eq!(unique.len(), out.len());
        assert!(!unique.contains("google.com"));
        assert!(out.iter().all(|c| is_valid_candidate(&c.domain)));
    }

    #[test]
    fn test_first_strategy_wins_on_collision() {
        // "googgle.com" is both an extra-char insertion and a double-char; extra-char runs first.
        let out = VariationGenerator::new("google.com")
            .unwrap()
            .generate(&GeneratorOptions::only([
                VariationType::ExtraChar,
                VariationType::DoubleChar,
            ]));
        let googgle = out.iter().find(|c| c.domain == "googgle.com").unwrap();
        assert_eq!(googgle.variation_type, VariationType::ExtraChar);
    }

    #[test]
    fn test_transposition_and_keyboard() {
        let out = VariationGenerator::new("test.com")
            .unwrap()
            .generate(&GeneratorOptions::only([
                VariationType::Transposition,
                VariationType::KeyboardTypo,
            ]));
        let d = domains(&out);
        assert!(d.contains(&"etst.com"));
        assert!(d.contains(&"tset.com"));
        assert!(d.contains(&"trst.com"));
        assert!(d.contains(&"rest.com"));
    }

    #[test]
    fn test_missing_dot_and_hyphenation() {
        let out = VariationGenerator::new("my-bank.com")
            .unwrap()
            .generate(&GeneratorOptions::only([
                VariationType::MissingDot,
                VariationType::Hyphenation,
            ]));
        let d = domains(&out);
        assert_eq!(&d[..2], &["wwwmy-bank.com", "www-my-bank.com"]);
        assert!(d.contains(&"m-y-bank.com"));
        assert!(d.contains(&"mybank.com"));
        assert!(d.contains(&"my.bank.com"));
        assert!(!d.iter().any(|x| x.starts_with('-')));
    }

    #[test]
    fn test_hyphen_removal_only_when_present() {
        let raw = raw_variations(VariationType::Hyphenation, "abc", "com", &[]);
        assert_eq!(raw, vec!["a-bc.com", "ab-c.com"]);
    }

    #[test]
    fn test_homoglyphs_are_punycode() {
        let out = VariationGenerator::new("apple.com")
            .unwrap()
            .generate(&GeneratorOptions::only([VariationType::Homoglyph]));
        assert!(!out.is_empty());
        assert!(out.iter().any(|c| c.domain.starts_with("xn--")));
        assert!(out.iter().all(|c| c.domain.is_ascii()));
        // 'à' is the top-ranked confusable for 'a'
        let expected = format!("{}.com", idna::domain_to_ascii("àpple").unwrap());
        assert!(domains(&out).contains(&expected.as_str()));
    }

    #[test]
    fn test_homoglyph_limit_per_char() {
        // 'q' has a single confusable, 'j' too: at most one candidate per position
        let raw = raw_variations(VariationType::Homoglyph, "jq", "com", &[]);
        assert_eq!(raw.len(), 2);
        // 'a' has eleven ranked confusables, only three are tried
        let raw = raw_variations(VariationType::Homoglyph, "a", "com", &[]);
        assert_eq!(raw.len(), MAX_GLYPHS_PER_CHAR);
    }

    #[test]
    fn test_unencodable_glyph_drops_only_its_candidate() {
        // U+FFFF is disallowed by UTS #46
        let glyphs: &'static [char] = &['à', '\u{FFFF}', 'á'];
        let table = HashMap::from([('a', glyphs)]);
        let raw = substitute_glyphs("pay", "com", &table);

        let expected: Vec<String> = ["pày", "páy"]
            .iter()
            .map(|name| format!("{}.com", idna::domain_to_ascii(name).unwrap()))
            .collect();
        assert_eq!(raw, expected);
    }

    #[test]
    fn test_tld_variation_for_com() {
        let out = VariationGenerator::new("example.com")
            .unwrap()
            .generate(&GeneratorOptions::only(VariationType::TLD));
        let d = domains(&out);
        assert!(d.contains(&"example.net"));
        assert!(d.contains(&"example.co.uk"));
        assert!(d.contains(&"example.com.co"));
        assert!(!d.contains(&"example.com"));
        assert!(d.contains(&"example.ocm"));
        assert!(d.contains(&"example.cmo"));
        let typo = out.iter().find(|c| c.domain == "example.ocm").unwrap();
        assert_eq!(typo.variation_type, VariationType::TldTypo);
    }

    #[test]
    fn test_tld_variation_non_com_has_no_co_extras() {
        let raw = raw_variations(VariationType::TldVariation, "example", "org", &[]);
        assert!(!raw.contains(&"example.com.co".to_string()));
        assert!(raw.contains(&"example.com".to_string()));
        assert!(!raw.contains(&"example.org".to_string()));
    }

    #[test]
    fn test_subdomain_abuse() {
        let raw = raw_variations(VariationType::SubdomainAbuse, "bank", "com", &[]);
        assert_eq!(raw.len(), SUBDOMAIN_KEYWORDS.len() * 2);
        assert_eq!(&raw[..2], &["www.bank.com", "bank.www.com"]);
    }

    #[test]
    fn test_bitsquatting_stays_in_charset() {
        let out = VariationGenerator::new("cnn.com")
            .unwrap()
            .generate(&GeneratorOptions::only([VariationType::Bitsquatting]));
        let d = domains(&out);
        // 'c' (0x63) ^ 0x01 = 'b'
        assert!(d.contains(&"bnn.com"));
        // 'n' (0x6e) ^ 0x40 = '.', not kept
        assert!(out.iter().all(|c| is_valid_candidate(&c.domain)));
    }

    #[test]
    fn test_combosquatting_patterns_and_extra_keywords() {
        let raw = raw_variations(
            VariationType::Combosquatting,
            "acme",
            "com",
            &["payroll".to_string()],
        );
        let per_kw = 4;
        assert_eq!(
            raw.len(),
            (COMBO_PREFIXES.len() + COMBO_SUFFIXES.len() + 1) * per_kw
        );
        assert_eq!(&raw[..4], &["acmemy.com", "myacme.com", "acme-my.com", "my-acme.com"]);
        assert!(raw.contains(&"acme-payroll.com".to_string()));
    }

    #[test]
    fn test_default_options_exclude_opt_in_strategies() {
        let options = GeneratorOptions::default();
        assert!(!options.strategies.contains(&VariationType::Bitsquatting));
        assert!(!options.strategies.contains(&VariationType::Combosquatting));
        assert!(options.strategies.contains(&VariationType::Homoglyph));
    }

    #[test]
    fn test_strategy_order_is_fixed() {
        let mut options = GeneratorOptions::only([VariationType::TldVariation]);
        options.set(VariationType::MissingChar, true);
        let out = VariationGenerator::new("example.com").unwrap().generate(&options);
        assert_eq!(out[0].variation_type, VariationType::MissingChar);
        assert_eq!(out.last().unwrap().variation_type, VariationType::TldVariation);
    }
}
