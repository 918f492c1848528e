use lazy_static::lazy_static;
use std::collections::HashMap;

/// Only the first few confusables per character are used; the table is ranked.
pub const MAX_GLYPHS_PER_CHAR: usize = 3;

pub const INSERTION_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

pub const TLDS_COMMON: &[&str] = &[
    "com", "net", "org", "info", "biz", "co", "io", "app",
    "online", "site", "web", "store", "shop", "tech", "digital",
    "cloud", "services", "solutions", "group", "global", "co.uk",
    "de", "fr", "es", "it", "ru", "cn", "jp", "br", "in",
    "xyz", "club", "live", "media", "email", "support", "help",
];

pub const SUBDOMAIN_KEYWORDS: &[&str] = &[
    "www", "login", "secure", "account", "signin", "verify", "update", "mail",
];

pub const COMBO_PREFIXES: &[&str] = &[
    "my", "get", "the", "go", "try", "use", "best", "top", "real", "official", "secure",
];

pub const COMBO_SUFFIXES: &[&str] = &[
    "login", "signin", "account", "support", "help", "service", "services",
    "online", "app", "web", "portal", "secure", "safe", "official", "verify",
];

lazy_static! {
    /// Ranked visual confusables per ASCII character.
    pub static ref HOMOGLYPHS: HashMap<char, &'static [char]> = {
        let entries: [(char, &'static [char]); 28] = [
            ('a', &['à', 'á', 'â', 'ã', 'ä', 'å', 'ā', 'ă', 'ą', 'α', 'а']),
            ('b', &['ḃ', 'ḅ', 'ƀ', 'ɓ']),
            ('c', &['ć', 'ĉ', 'ċ', 'č', 'ç', 'с']),
            ('d', &['ď', 'đ', 'ḋ', 'ḍ', 'ḏ', 'ḑ']),
            ('e', &['è', 'é', 'ê', 'ë', 'ē', 'ĕ', 'ė', 'ę', 'ě', 'е', 'ε']),
            ('f', &['ƒ', 'ḟ']),
            ('g', &['ĝ', 'ğ', 'ġ', 'ģ', 'ǵ']),
            ('h', &['ĥ', 'ħ', 'ḣ', 'ḥ', 'ḧ', 'ḩ']),
            ('i', &['ì', 'í', 'î', 'ï', 'ĩ', 'ī', 'ĭ', 'į', 'ı', 'і', '1', 'l']),
            ('j', &['ĵ']),
            ('k', &['ķ', 'ǩ', 'ḱ', 'ḳ', 'ḵ']),
            ('l', &['ĺ', 'ļ', 'ľ', 'ŀ', 'ł', 'ḷ', '1', 'i']),
            ('m', &['ḿ', 'ṁ', 'ṃ', 'м']),
            ('n', &['ñ', 'ń', 'ņ', 'ň', 'ŋ', 'ṅ', 'ṇ', 'ṉ', 'η']),
            ('o', &['ò', 'ó', 'ô', 'õ', 'ö', 'ø', 'ō', 'ŏ', 'ő', 'о', '0']),
            ('p', &['р', 'ṕ', 'ṗ']),
            ('q', &['ǫ']),
            ('r', &['ŕ', 'ŗ', 'ř', 'ṙ', 'ṛ', 'ṝ', 'г']),
            ('s', &['ś', 'ŝ', 'ş', 'š', 'ṡ', 'ṣ', '$', '5']),
            ('t', &['ţ', 'ť', 'ŧ', 'ṭ', 'ṯ', 'ṱ']),
            ('u', &['ù', 'ú', 'û', 'ü', 'ũ', 'ū', 'ŭ', 'ů', 'ű', 'ų', 'υ']),
            ('v', &['ν', 'ṿ', 'ṽ']),
            ('w', &['ŵ', 'ẁ', 'ẃ', 'ẅ', 'ẇ', 'ẉ', 'ω']),
            ('x', &['χ', 'ẋ', 'ẍ']),
            ('y', &['ý', 'ÿ', 'ŷ', 'ẏ', 'ỳ', 'ỵ', 'γ']),
            ('z', &['ź', 'ż', 'ž', 'ẑ', 'ẓ', 'ẕ', 'ζ']),
            ('0', &['o', 'ο']),
            ('1', &['l', 'i', 'I']),
        ];
        entries.into_iter().collect()
    };

    /// QWERTY neighbours, in the order they are tried.
    pub static ref KEYBOARD_ADJACENT: HashMap<char, &'static str> = {
        let entries = [
            ('a', "qwsz"), ('b', "vghn"), ('c', "xdfv"), ('d', "serfcx"),
            ('e', "wrds"), ('f', "drtgvc"), ('g', "ftyhbv"), ('h', "gyujnb"),
            ('i', "uokj"), ('j', "huikmn"), ('k', "jiolm"), ('l', "kop"),
            ('m', "njk"), ('n', "bhjm"), ('o', "iplk"), ('p', "ol"),
            ('q', "wa"), ('r', "etfd"), ('s', "awedxz"), ('t', "rygf"),
            ('u', "yijh"), ('v', "cfgb"), ('w', "qesa"), ('x', "zsdc"),
            ('y', "tuhg"), ('z', "asx"),
        ];
        entries.into_iter().collect()
    };
}
