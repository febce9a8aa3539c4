/// Normalized form of a source text for memory lookups.
///
/// Case, runs of whitespace and typographic quotes are folded. Placeholders,
/// accelerators and punctuation are kept: they change what a translation must contain.
pub fn normalize(text: &str) -> String {
    let mut s = text.trim().to_lowercase();

    s = s.split_whitespace().collect::<Vec<_>>().join(" ");

    for (from, to) in [('“', '"'), ('”', '"'), ('’', '\''), ('‘', '\'')] {
        s = s.replace(from, &to.to_string());
    }

    s
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn folds_case_whitespace_and_quotes() {
        assert_eq!(normalize("  Open   ‘%1’\n"), "open '%1'");
        assert_ne!(normalize("&Open"), normalize("Open"));
    }
}
