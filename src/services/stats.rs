use serde::Serialize;

use crate::model::catalog::Catalog;
use crate::model::entry::{EntryStatus, TsEntry};

#[derive(Debug, Serialize, Default, Clone, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub finished: usize,
    pub unfinished: usize,
    pub untranslated: usize,
    pub obsolete: usize,
    pub vanished: usize,
    pub numerus: usize,
}

impl Counts {
    fn add(&mut self, e: &TsEntry) {
        self.total += 1;
        if e.numerus {
            self.numerus += 1;
        }
        match e.status {
            EntryStatus::Finished => self.finished += 1,
            EntryStatus::Unfinished => {
                if e.is_untranslated() {
                    self.untranslated += 1;
                } else {
                    self.unfinished += 1;
                }
            }
            EntryStatus::Obsolete => self.obsolete += 1,
            EntryStatus::Vanished => self.vanished += 1,
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ContextStats {
    pub name: String,
    #[serde(flatten)]
    pub counts: Counts,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct CatalogStats {
    pub language: Option<String>,
    pub contexts: usize,
    #[serde(flatten)]
    pub counts: Counts,
    pub per_context: Vec<ContextStats>,
}

/// Counts entries the way lrelease reports them. Context comments are left out.
pub fn collect(catalog: &Catalog) -> CatalogStats {
    let mut counts = Counts::default();
    let mut per_context: Vec<ContextStats> = Vec::new();

    for e in catalog.entries.iter().filter(|e| !e.is_context_comment()) {
        counts.add(e);

        match per_context.iter_mut().find(|c| c.name == e.context) {
            Some(c) => c.counts.add(e),
            None => {
                let mut c = ContextStats {
                    name: e.context.clone(),
                    counts: Counts::default(),
                };
                c.counts.add(e);
                per_context.push(c);
            }
        }
    }

    CatalogStats {
        language: catalog.language.clone(),
        contexts: per_context.len(),
        counts,
        per_context,
    }
}

impl CatalogStats {
    /// lrelease-style summary lines.
    pub fn summary(&self) -> Vec<String> {
        let c = &self.counts;
        let mut lines = vec![format!(
            "Generated {} translation(s) ({} finished and {} unfinished)",
            c.finished + c.unfinished,
            c.finished,
            c.unfinished
        )];
        if c.untranslated > 0 {
            lines.push(format!("Ignored {} untranslated source text(s)", c.untranslated));
        }
        lines
    }
}
