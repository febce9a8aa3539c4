use serde::{Deserialize, Serialize};

/// Separator between length variants of one translation.
pub const LENGTH_VARIANT_SEPARATOR: char = '\u{9c}';

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TsEntry {
    pub entry_id: String,

    #[serde(default)]
    pub context: String,

    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub comment: Option<String>,

    #[serde(default)]
    pub old_source: Option<String>,

    #[serde(default)]
    pub old_comment: Option<String>,

    #[serde(default)]
    pub extra_comment: Option<String>,

    #[serde(default)]
    pub translator_comment: Option<String>,

    #[serde(default)]
    pub translation: String,

    #[serde(default)]
    pub numerus: bool,

    #[serde(default)]
    pub numerus_forms: Vec<String>,

    #[serde(default)]
    pub status: EntryStatus,

    #[serde(default)]
    pub locations: Vec<Location>,

    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Finished,
    #[default]
    Unfinished,
    Obsolete,
    Vanished,
}

impl EntryStatus {
    /// Value of the `type` attribute on `<translation>`, `None` for finished.
    pub fn type_attr(self) -> Option<&'static str> {
        match self {
            EntryStatus::Finished => None,
            EntryStatus::Unfinished => Some("unfinished"),
            EntryStatus::Obsolete => Some("obsolete"),
            EntryStatus::Vanished => Some("vanished"),
        }
    }

    pub fn from_type_attr(value: Option<&str>) -> Self {
        match value {
            None | Some("") => EntryStatus::Finished,
            Some("obsolete") => EntryStatus::Obsolete,
            Some("vanished") => EntryStatus::Vanished,
            Some(_) => EntryStatus::Unfinished,
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, EntryStatus::Finished | EntryStatus::Unfinished)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Location {
    #[serde(default)]
    pub filename: Option<String>,

    /// Verbatim `line` attribute: absolute (`"12"`) or relative (`"+3"`, `"-7"`).
    #[serde(default)]
    pub line: Option<String>,
}

impl TsEntry {
    pub fn new(entry_id: impl Into<String>, context: impl Into<String>, source: impl Into<String>) -> Self {
        TsEntry {
            entry_id: entry_id.into(),
            context: context.into(),
            source: source.into(),
            comment: None,
            old_source: None,
            old_comment: None,
            extra_comment: None,
            translator_comment: None,
            translation: String::new(),
            numerus: false,
            numerus_forms: Vec::new(),
            status: EntryStatus::Unfinished,
            locations: Vec::new(),
            id: None,
        }
    }

    /// Legacy context description: empty source carrying only a comment.
    pub fn is_context_comment(&self) -> bool {
        self.source.is_empty() && self.comment.as_deref().is_some_and(|c| !c.is_empty())
    }

    /// Translated texts as displayed: every numerus form, or the single translation.
    pub fn translations(&self) -> Vec<&str> {
        if self.numerus {
            self.numerus_forms.iter().map(String::as_str).collect()
        } else {
            vec![self.translation.as_str()]
        }
    }

    /// True when no translated text has been entered yet.
    pub fn is_untranslated(&self) -> bool {
        self.translations().iter().all(|t| t.trim().is_empty())
    }

    pub fn comment_str(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }
}
