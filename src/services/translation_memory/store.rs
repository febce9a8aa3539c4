use super::hash;
use super::model::TMEntry;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

use crate::error::Result;

/// Loads the memory at `path`; a missing or unreadable file yields an empty memory.
pub fn load(path: &Path) -> Vec<TMEntry> {
    if !path.exists() {
        return Vec::new();
    }

    let data = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read translation memory");
            return Vec::new();
        }
    };

    let mut entries: Vec<TMEntry> = match serde_json::from_str(&data) {
        Ok(v) => v,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to parse translation memory");
            return Vec::new();
        }
    };

    let mut migrated = false;

    for e in entries.iter_mut() {
        migrated |= ensure_norm_hash(e);
    }

    let (deduped, removed) = dedup(entries);
    if removed > 0 {
        migrated = true;
    }

    let mut final_entries = deduped;
    sort_entries(&mut final_entries);

    if migrated {
        if let Err(e) = save(path, &final_entries) {
            warn!(path = %path.display(), error = %e, "failed to persist translation memory migration");
        }
    }

    debug!(path = %path.display(), records = final_entries.len(), "loaded translation memory");
    final_entries
}

pub fn save(path: &Path, entries: &[TMEntry]) -> Result<()> {
    let mut v: Vec<TMEntry> = entries.to_vec();

    for e in v.iter_mut() {
        ensure_norm_hash(e);
    }

    let (mut v, _removed) = dedup(v);
    sort_entries(&mut v);

    let json = serde_json::to_string_pretty(&v)?;

    write_atomic(path, json.as_bytes())?;

    Ok(())
}

fn ensure_norm_hash(e: &mut TMEntry) -> bool {
    if !e.normalized.is_empty() && !e.hash.is_empty() {
        return false;
    }

    let (norm, h) = hash::key_for(&e.source);
    e.normalized = norm;
    e.hash = h;
    true
}

fn dedup(entries: Vec<TMEntry>) -> (Vec<TMEntry>, usize) {
    let mut map: HashMap<(String, String, String, usize), TMEntry> = HashMap::new();
    let mut removed = 0usize;

    for mut e in entries {
        ensure_norm_hash(&mut e);

        let key = (
            e.source_lang.clone(),
            e.target_lang.clone(),
            e.source.clone(),
            e.forms.len(),
        );

        match map.get_mut(&key) {
            None => {
                map.insert(key, e);
            }
            Some(existing) => {
                if pick_better(existing, &e) {
                    *existing = e;
                }
                removed += 1;
            }
        }
    }

    let out: Vec<TMEntry> = map.into_values().collect();
    (out, removed)
}

/// Newer non-empty records win over empty ones, then the longer translation wins.
fn pick_better(current: &TMEntry, candidate: &TMEntry) -> bool {
    let cur_empty = current.is_empty();
    let cand_empty = candidate.is_empty();

    if cur_empty && !cand_empty {
        return true;
    }
    if !cur_empty && cand_empty {
        return false;
    }

    candidate.weight() > current.weight()
}

fn sort_entries(entries: &mut [TMEntry]) {
    entries.sort_by(|a, b| {
        (
            a.source_lang.as_str(),
            a.target_lang.as_str(),
            a.hash.as_str(),
            a.forms.len(),
            a.source.as_str(),
            a.translation.as_str(),
        )
            .cmp(&(
                b.source_lang.as_str(),
                b.target_lang.as_str(),
                b.hash.as_str(),
                b.forms.len(),
                b.source.as_str(),
                b.translation.as_str(),
            ))
    });
}

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);

    if let Some(parent) = tmp.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&tmp, bytes)?;

    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&tmp, path)?;

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(n) => n.to_string(),
        None => "tm".to_string(),
    };
    p.set_file_name(format!("{file_name}.tmp"));
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(source: &str, translation: &str) -> TMEntry {
        TMEntry {
            source_lang: "en".into(),
            target_lang: "uk".into(),
            source: source.into(),
            translation: translation.into(),
            forms: Vec::new(),
            normalized: String::new(),
            hash: String::new(),
        }
    }

    #[test]
    fn save_then_load_dedups_and_fills_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tm.json");

        save(
            &path,
            &[
                record("Open", ""),
                record("Open", "Відкрити"),
                record("open", "відкрити"),
                record("Close", "Закрити"),
            ],
        )
        .unwrap();

        let loaded = load(&path);
        assert_eq!(loaded.len(), 3);
        assert!(loaded.iter().all(|e| e.hash.len() == 64));
        let open = loaded.iter().find(|e| e.source == "Open").unwrap();
        assert_eq!(open.translation, "Відкрити");
        let lower = loaded.iter().find(|e| e.source == "open").unwrap();
        assert_eq!(lower.translation, "відкрити");
        assert!(!path.with_file_name("tm.json.tmp").exists());
    }

    #[test]
    fn missing_or_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tm.json");
        assert!(load(&path).is_empty());

        fs::write(&path, "not json").unwrap();
        assert!(load(&path).is_empty());
    }
}
