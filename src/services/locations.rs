use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::catalog::Catalog;
use crate::model::entry::{Location, TsEntry};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LocationStyle {
    Absolute,
    Relative,
    None,
}

impl FromStr for LocationStyle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "absolute" => Ok(LocationStyle::Absolute),
            "relative" => Ok(LocationStyle::Relative),
            "none" => Ok(LocationStyle::None),
            other => Err(CoreError::InvalidRequest(format!(
                "invalid location style '{other}' (expected absolute, relative or none)"
            ))),
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    pub filename: String,
    pub line: Option<i64>,
}

/// Resolves every location to a file name and an absolute line.
///
/// A missing filename repeats the previous one; a `+N`/`-N` line is an offset
/// from the last line seen in the same file (0 before the first). An offset that
/// overflows resolves to no line and leaves the file's last line unchanged.
pub fn resolve(entries: &[TsEntry]) -> Vec<Vec<ResolvedLocation>> {
    let mut last_file = String::new();
    let mut last_lines: HashMap<String, i64> = HashMap::new();

    entries
        .iter()
        .map(|e| {
            e.locations
                .iter()
                .map(|loc| {
                    if let Some(f) = loc.filename.as_deref() {
                        last_file = f.to_string();
                    }
                    let file = last_file.clone();

                    let line = loc.line.as_deref().and_then(|raw| {
                        let value: i64 = raw.parse().ok()?;
                        let current = last_lines.entry(file.clone()).or_insert(0);
                        if raw.starts_with('+') || raw.starts_with('-') {
                            *current = current.checked_add(value)?;
                        } else {
                            *current = value;
                        }
                        Some(*current)
                    });

                    ResolvedLocation { filename: file, line }
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Rewrites all locations in the requested style.
pub fn apply(catalog: &mut Catalog, style: LocationStyle) {
    let resolved = resolve(&catalog.entries);

    let mut last_file = String::new();
    let mut last_lines: HashMap<String, i64> = HashMap::new();

    for (e, locs) in catalog.entries.iter_mut().zip(resolved) {
        e.locations = match style {
            LocationStyle::None => Vec::new(),
            LocationStyle::Absolute => locs
                .into_iter()
                .map(|r| Location {
                    filename: (!r.filename.is_empty()).then_some(r.filename),
                    line: r.line.map(|l| l.to_string()),
                })
                .collect(),
            LocationStyle::Relative => locs
                .into_iter()
                .map(|r| {
                    let line = r.line.and_then(|l| {
                        let current = last_lines.entry(r.filename.clone()).or_insert(0);
                        let delta = l.checked_sub(*current)?;
                        *current = l;
                        if delta >= 0 {
                            Some(format!("+{delta}"))
                        } else {
                            Some(delta.to_string())
                        }
                    });
                    let filename = if r.filename != last_file {
                        last_file = r.filename.clone();
                        Some(r.filename)
                    } else {
                        None
                    };
                    Location { filename, line }
                })
                .collect(),
        };
    }
}
