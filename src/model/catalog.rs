use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::entry::TsEntry;

fn default_version() -> String {
    "2.0".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Catalog {
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub source_language: Option<String>,

    #[serde(default)]
    pub context_comments: BTreeMap<String, String>,

    #[serde(default)]
    pub entries: Vec<TsEntry>,
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog {
            version: default_version(),
            language: None,
            source_language: None,
            context_comments: BTreeMap::new(),
            entries: Vec::new(),
        }
    }
}

impl Catalog {
    /// Consecutive runs of entries sharing a context, in file order.
    pub fn context_groups(&self) -> Vec<(&str, &[TsEntry])> {
        let mut groups: Vec<(&str, &[TsEntry])> = Vec::new();
        let mut start = 0usize;

        for i in 1..=self.entries.len() {
            let boundary = i == self.entries.len() || self.entries[i].context != self.entries[start].context;
            if boundary {
                groups.push((self.entries[start].context.as_str(), &self.entries[start..i]));
                start = i;
            }
        }

        groups
    }

    pub fn find(&self, entry_id: &str) -> Option<&TsEntry> {
        self.entries.iter().find(|e| e.entry_id == entry_id)
    }
}
