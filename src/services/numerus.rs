//! Plural rule table for numerus messages.
//!
//! Each rule lists the plural categories a locale distinguishes, in the order
//! translators fill the `<numerusform>` slots.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PluralRule {
    pub style: &'static str,
    pub forms: &'static [&'static str],
}

impl PluralRule {
    pub fn form_count(&self) -> usize {
        self.forms.len()
    }
}

const SINGLE: PluralRule = PluralRule {
    style: "single",
    forms: &["other"],
};
const ENGLISH: PluralRule = PluralRule {
    style: "english",
    forms: &["one", "other"],
};
const FRENCH: PluralRule = PluralRule {
    style: "french",
    forms: &["one", "other"],
};
const ICELANDIC: PluralRule = PluralRule {
    style: "icelandic",
    forms: &["one", "other"],
};
const TAGALOG: PluralRule = PluralRule {
    style: "tagalog",
    forms: &["one", "other"],
};
const LATVIAN: PluralRule = PluralRule {
    style: "latvian",
    forms: &["zero", "one", "other"],
};
const IRISH: PluralRule = PluralRule {
    style: "irish",
    forms: &["one", "two", "other"],
};
const ROMANIAN: PluralRule = PluralRule {
    style: "romanian",
    forms: &["one", "few", "other"],
};
const LITHUANIAN: PluralRule = PluralRule {
    style: "lithuanian",
    forms: &["one", "few", "other"],
};
const RUSSIAN: PluralRule = PluralRule {
    style: "russian",
    forms: &["one", "few", "many"],
};
const CZECH: PluralRule = PluralRule {
    style: "czech",
    forms: &["one", "few", "other"],
};
const POLISH: PluralRule = PluralRule {
    style: "polish",
    forms: &["one", "few", "many"],
};
const MACEDONIAN: PluralRule = PluralRule {
    style: "macedonian",
    forms: &["one", "two", "other"],
};
const SLOVENIAN: PluralRule = PluralRule {
    style: "slovenian",
    forms: &["one", "two", "few", "other"],
};
const MALTESE: PluralRule = PluralRule {
    style: "maltese",
    forms: &["one", "few", "many", "other"],
};
const WELSH: PluralRule = PluralRule {
    style: "welsh",
    forms: &["one", "two", "many", "other"],
};
const ARABIC: PluralRule = PluralRule {
    style: "arabic",
    forms: &["zero", "one", "two", "few", "many", "other"],
};

const TABLE: &[(&[&str], PluralRule)] = &[
    (
        &[
            "bi", "bo", "dz", "fa", "fj", "gn", "hu", "id", "ja", "jv", "ko", "lo", "ms", "my", "na", "su",
            "th", "tr", "tt", "vi", "yo", "za", "zh",
        ],
        SINGLE,
    ),
    (
        &[
            "ab", "aa", "af", "am", "as", "ay", "az", "ba", "bg", "bh", "bn", "ca", "co", "da", "de", "el",
            "en", "eo", "es", "et", "eu", "fi", "fo", "fy", "fur", "gl", "gu", "ha", "he", "hi", "ia",
            "ie", "it", "ka", "kk", "kl", "kn", "ks", "ku", "ky", "lb", "ln", "mg", "ml", "mn", "mr", "nb",
            "ne", "nl", "nn", "no", "nso", "oc", "or", "pa", "ps", "pt", "qu", "rm", "rn", "rw", "sd", "si",
            "sn", "so", "sq", "ss", "st", "sv", "sw", "ta", "te", "tg", "tk", "tn", "ug", "ur", "uz", "vo",
            "xh", "yi", "zu",
        ],
        ENGLISH,
    ),
    (&["fr", "hy", "om", "ti", "wa", "pt_br"], FRENCH),
    (&["is"], ICELANDIC),
    (&["tl", "fil"], TAGALOG),
    (&["lv"], LATVIAN),
    (&["ga"], IRISH),
    (&["ro", "mo"], ROMANIAN),
    (&["lt"], LITHUANIAN),
    (&["ru", "uk", "be", "sr", "hr", "bs", "sh"], RUSSIAN),
    (&["cs", "sk"], CZECH),
    (&["pl"], POLISH),
    (&["mk"], MACEDONIAN),
    (&["sl"], SLOVENIAN),
    (&["mt"], MALTESE),
    (&["cy"], WELSH),
    (&["ar"], ARABIC),
];

/// Looks up the rule for a locale code such as `uk`, `uk_UA` or `pt-BR`.
///
/// A language+territory match wins over the bare language.
pub fn rule_for(language: &str) -> Option<PluralRule> {
    let normalized = language.trim().replace('-', "_").to_lowercase();
    if normalized.is_empty() || normalized == "c" {
        return None;
    }

    let lang = normalized.split('_').next().unwrap_or("");
    let with_territory = normalized.split('.').next().unwrap_or(&normalized);

    lookup(with_territory).or_else(|| lookup(lang))
}

pub fn form_count(language: &str) -> Option<usize> {
    rule_for(language).map(|r| r.form_count())
}

fn lookup(code: &str) -> Option<PluralRule> {
    TABLE
        .iter()
        .find(|(codes, _)| codes.contains(&code))
        .map(|(_, rule)| *rule)
}
