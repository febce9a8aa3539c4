use super::hash;
use super::model::TMEntry;

/// Exact match for a source text. The normalized hash only narrows the lookup;
/// the stored source must equal `source` byte for byte.
///
/// Numerus messages only match numerus records with the same number of forms,
/// singular messages only singular records.
pub fn exact_match<'a>(
    entries: &'a [TMEntry],
    source_lang: &str,
    target_lang: &str,
    source: &str,
    numerus_forms: Option<usize>,
) -> Option<&'a TMEntry> {
    if source.trim().is_empty() {
        return None;
    }

    let (norm, h) = hash::key_for(source);

    entries.iter().find(|e| {
        e.source_lang == source_lang
            && e.target_lang == target_lang
            && e.hash == h
            && e.normalized == norm
            && e.source == source
            && !e.is_empty()
            && match numerus_forms {
                Some(n) => e.is_numerus() && e.forms.len() == n,
                None => !e.is_numerus(),
            }
    })
}
