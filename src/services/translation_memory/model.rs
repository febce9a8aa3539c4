use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TMEntry {
    pub source_lang: String,
    pub target_lang: String,

    pub source: String,

    /// Translation of a non-numerus message.
    #[serde(default)]
    pub translation: String,

    /// Translations of a numerus message, one per plural form.
    #[serde(default)]
    pub forms: Vec<String>,

    #[serde(default)]
    pub normalized: String,

    #[serde(default)]
    pub hash: String,
}

impl TMEntry {
    pub fn is_numerus(&self) -> bool {
        !self.forms.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        if self.is_numerus() {
            self.forms.iter().all(|f| f.trim().is_empty())
        } else {
            self.translation.trim().is_empty()
        }
    }

    /// Total translated length; used to prefer the richer of two duplicates.
    pub fn weight(&self) -> usize {
        self.translation.len() + self.forms.iter().map(String::len).sum::<usize>()
    }
}
