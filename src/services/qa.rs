use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::catalog::Catalog;
use crate::model::entry::{EntryStatus, TsEntry, LENGTH_VARIANT_SEPARATOR};
use crate::services::numerus;

/// `entry_id` used for issues that concern the whole catalog.
pub const CATALOG_ISSUE_ID: &str = "catalog";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct QaIssue {
    pub entry_id: String,
    pub code: String,
    pub severity: Severity,
    pub message: String,
}

impl QaIssue {
    fn error(entry_id: &str, code: &str, message: impl Into<String>) -> Self {
        QaIssue {
            entry_id: entry_id.to_string(),
            code: code.to_string(),
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(entry_id: &str, code: &str, message: impl Into<String>) -> Self {
        QaIssue {
            entry_id: entry_id.to_string(),
            code: code.to_string(),
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

pub fn run(catalog: &Catalog) -> Vec<QaIssue> {
    let mut issues: Vec<QaIssue> = Vec::new();

    let language = catalog.language.as_deref().unwrap_or("");
    let expected_forms = numerus::form_count(language);

    if expected_forms.is_none() && catalog.entries.iter().any(|e| e.numerus) {
        issues.push(QaIssue::error(
            CATALOG_ISSUE_ID,
            "UNKNOWN_LANGUAGE",
            format!("No plural rule for target language '{language}'"),
        ));
    }

    // (context, source, comment) -> first entry_id
    let mut seen: HashMap<(&str, &str, &str), &str> = HashMap::new();

    for e in &catalog.entries {
        if e.context.trim().is_empty() {
            issues.push(QaIssue::error(&e.entry_id, "EMPTY_CONTEXT", "Message has no context name"));
        }

        if e.source.is_empty() && !e.is_context_comment() {
            issues.push(QaIssue::error(&e.entry_id, "EMPTY_SOURCE", "Message has an empty source text"));
        }

        let key = (e.context.as_str(), e.source.as_str(), e.comment_str());
        if let Some(first) = seen.get(&key) {
            issues.push(QaIssue::error(
                &e.entry_id,
                "DUPLICATE_MESSAGE",
                format!("Same context, source and comment as {first}"),
            ));
        } else {
            seen.insert(key, &e.entry_id);
        }

        if e.numerus {
            if let Some(expected) = expected_forms {
                if e.numerus_forms.len() != expected {
                    issues.push(QaIssue::error(
                        &e.entry_id,
                        "NUMERUS_FORM_COUNT",
                        format!(
                            "Expected {expected} numerus form(s) for '{language}', found {}",
                            e.numerus_forms.len()
                        ),
                    ));
                }
            }
        } else if !e.numerus_forms.is_empty() {
            issues.push(QaIssue::warning(
                &e.entry_id,
                "NUMERUS_FORMS_ON_SINGULAR",
                "Numerus forms present on a message without numerus=\"yes\"",
            ));
        }

        if e.status == EntryStatus::Finished && !e.is_context_comment() {
            check_finished(e, &mut issues);
        }
    }

    issues
}

/// Translation-quality checks; only meaningful once a translator marked the entry done.
fn check_finished(e: &TsEntry, issues: &mut Vec<QaIssue>) {
    let translations = e.translations();

    if translations.is_empty() || translations.iter().any(|t| t.trim().is_empty()) {
        issues.push(QaIssue::warning(
            &e.entry_id,
            "FINISHED_BUT_EMPTY",
            "Marked finished, but a translation is empty",
        ));
        return;
    }

    let source_trim = e.source.trim();

    if !e.numerus && e.translation.trim() == source_trim {
        issues.push(QaIssue::warning(
            &e.entry_id,
            "SAME_AS_SOURCE",
            "Translation is identical to the source text",
        ));
    }

    let source_places = placeholders(&e.source);
    let accel = !is_rich_text(&e.source) && has_accelerator(&e.source);
    let source_end = ending_punctuation(&e.source);

    for text in translations {
        for variant in text.split(LENGTH_VARIANT_SEPARATOR) {
            if placeholders(variant) != source_places {
                issues.push(QaIssue::warning(
                    &e.entry_id,
                    "PLACEHOLDER_MISMATCH",
                    "Translation does not use the same %N placeholders as the source",
                ));
            }

            if accel && !has_accelerator(variant) {
                issues.push(QaIssue::warning(
                    &e.entry_id,
                    "ACCELERATOR_MISMATCH",
                    "Source has a keyboard accelerator (&), translation does not",
                ));
            }

            if source_end != ending_punctuation(variant) {
                issues.push(QaIssue::warning(
                    &e.entry_id,
                    "ENDING_PUNCTUATION_MISMATCH",
                    "Translation does not end with the same punctuation as the source",
                ));
            }
        }
    }
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"%L?(\d{1,2})").expect("placeholder pattern"))
}

/// Numbered arguments (`%1`, `%L2`); `%n` is excluded since singular forms may drop it.
fn placeholders(text: &str) -> BTreeSet<u32> {
    placeholder_re()
        .captures_iter(text)
        .filter_map(|c| c.get(1).and_then(|m| m.as_str().parse().ok()))
        .collect()
}

fn is_rich_text(text: &str) -> bool {
    let t = text.trim_start().to_ascii_lowercase();
    t.starts_with("<html") || t.starts_with("<!doctype") || t.starts_with("<qt") || t.contains("<br")
}

/// `&x` marks an accelerator; `&&` is a literal ampersand.
fn has_accelerator(text: &str) -> bool {
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '&' {
            continue;
        }
        match chars.peek() {
            Some('&') => {
                chars.next();
            }
            Some(n) if !n.is_whitespace() => return true,
            _ => {}
        }
    }
    false
}

fn ending_punctuation(text: &str) -> Option<char> {
    let last = text.trim_end().chars().last()?;
    let normalized = match last {
        '。' | '．' => '.',
        '？' => '?',
        '！' => '!',
        '：' => ':',
        '…' => '.',
        c => c,
    };
    matches!(normalized, '.' | '?' | '!' | ':').then_some(normalized)
}
