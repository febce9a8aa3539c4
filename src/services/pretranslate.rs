use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{CoreError, Result};
use crate::model::catalog::Catalog;
use crate::model::entry::{EntryStatus, TsEntry};
use crate::services::numerus;
use crate::services::translation_memory::{hash, matcher, model::TMEntry, store};

const DEFAULT_SOURCE_LANG: &str = "en";

pub struct MemoryLanguages<'a> {
    pub source_lang: &'a str,
    pub target_lang: &'a str,
}

impl<'a> MemoryLanguages<'a> {
    /// Languages declared by the catalog; the target language is required.
    pub fn of(catalog: &'a Catalog) -> Result<Self> {
        let target_lang = catalog
            .language
            .as_deref()
            .filter(|l| !l.is_empty())
            .ok_or_else(|| CoreError::InvalidRequest("catalog has no target language".into()))?;

        Ok(MemoryLanguages {
            source_lang: catalog.source_language.as_deref().unwrap_or(DEFAULT_SOURCE_LANG),
            target_lang,
        })
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ImportReport {
    pub harvested: usize,
    pub total: usize,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PretranslateReport {
    pub candidates: usize,
    pub filled: usize,
    pub filled_ids: Vec<String>,
}

/// Memory records for every finished, non-empty entry.
pub fn harvest(catalog: &Catalog, langs: &MemoryLanguages) -> Vec<TMEntry> {
    catalog
        .entries
        .iter()
        .filter(|e| e.status == EntryStatus::Finished && !e.is_context_comment() && !e.is_untranslated())
        .map(|e| {
            let (normalized, h) = hash::key_for(&e.source);
            TMEntry {
                source_lang: langs.source_lang.to_string(),
                target_lang: langs.target_lang.to_string(),
                source: e.source.clone(),
                translation: if e.numerus { String::new() } else { e.translation.clone() },
                forms: if e.numerus { e.numerus_forms.clone() } else { Vec::new() },
                normalized,
                hash: h,
            }
        })
        .collect()
}

pub fn import(tm_path: &Path, catalog: &Catalog) -> Result<ImportReport> {
    let langs = MemoryLanguages::of(catalog)?;
    let mut tm_entries = store::load(tm_path);

    let harvested = harvest(catalog, &langs);
    let count = harvested.len();
    tm_entries.extend(harvested);

    store::save(tm_path, &tm_entries)?;
    let total = store::load(tm_path).len();

    info!(harvested = count, total, "imported catalog into translation memory");
    Ok(ImportReport { harvested: count, total })
}

/// Same-text heuristic: fills empty unfinished entries from exact memory matches.
///
/// Filled entries stay unfinished so a translator reviews them.
pub fn run(catalog: &mut Catalog, tm_entries: &[TMEntry]) -> Result<PretranslateReport> {
    let langs = MemoryLanguages::of(catalog)?;
    let source_lang = langs.source_lang.to_string();
    let target_lang = langs.target_lang.to_string();
    let plural_forms = numerus::form_count(&target_lang);

    let mut report = PretranslateReport {
        candidates: 0,
        filled: 0,
        filled_ids: Vec::new(),
    };

    for e in catalog.entries.iter_mut() {
        if !needs_translation(e) {
            continue;
        }
        report.candidates += 1;

        let shape = match (e.numerus, plural_forms) {
            (false, _) => None,
            (true, Some(n)) => Some(n),
            (true, None) if !e.numerus_forms.is_empty() => Some(e.numerus_forms.len()),
            (true, None) => {
                debug!(id = %e.entry_id, language = %target_lang, "plural form count unknown, skipped");
                continue;
            }
        };

        if let Some(tm) = matcher::exact_match(tm_entries, &source_lang, &target_lang, &e.source, shape) {
            if e.numerus {
                e.numerus_forms = tm.forms.clone();
            } else {
                e.translation = tm.translation.clone();
            }
            report.filled += 1;
            report.filled_ids.push(e.entry_id.clone());
        }
    }

    info!(
        candidates = report.candidates,
        filled = report.filled,
        "same-text heuristic applied"
    );
    Ok(report)
}

pub fn apply(tm_path: &Path, catalog: &mut Catalog) -> Result<PretranslateReport> {
    let tm_entries = store::load(tm_path);
    run(catalog, &tm_entries)
}

fn needs_translation(e: &TsEntry) -> bool {
    e.status == EntryStatus::Unfinished && !e.is_context_comment() && e.is_untranslated()
}
