//! Text normalization primitives shared by canonicalization and matching.

/// Titles and fillers ignored when comparing person names.
pub const STOPWORDS: [&str; 7] = ["the", "mr", "mrs", "ms", "sir", "maam", "ma'am"];

/// Trim, lowercase, and collapse internal whitespace to single spaces.
pub fn normalize_text(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split into a sorted, deduplicated set of lowercase alphanumeric tokens.
/// Punctuation acts as a token boundary.
pub fn normalize_token_set(s: &str, drop_stopwords: bool) -> Vec<String> {
    let lowered = normalize_text(s);
    let mut tokens: Vec<String> = lowered
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    if drop_stopwords {
        tokens.retain(|t| !STOPWORDS.contains(&t.as_str()));
    }
    tokens.sort();
    tokens.dedup();
    tokens
}

/// Strip everything non-alphanumeric and uppercase, e.g. "ka-05 ab 1234"
/// becomes "KA05AB1234".
pub fn normalize_plate(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_uppercase()
}

/// Keep digits only; tolerates separators and a leading country code.
pub fn normalize_phone(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}
