//! Text normalization shared by trigger matching and sentence recognition.

/// Normalize an utterance for matching: trim, drop trailing punctuation,
/// lowercase, and collapse internal whitespace. Apostrophes are significant
/// ("it's party time") and are kept.
pub(crate) fn normalize(text: &str) -> String {
    let trimmed = text
        .trim()
        .trim_end_matches(['.', ',', '!', '?', ';', ':'])
        .to_lowercase();
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}
