/// Outcome of resolving a free-text sub-scale name against a canonical key
/// table. `Unmapped` is not an error: questionnaire pages evolve their field
/// sets faster than this table, and unknown names are skipped by policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaleLookup {
    Mapped(&'static str),
    Unmapped,
}

/// Normalize a free-text sub-scale name for table lookup: lower-case, fold
/// dashes (including the multi-byte variants) to spaces, drop remaining
/// punctuation, collapse whitespace, trim.
///
/// `"Burn's Anxiety (BAI)"` normalizes to `"burns anxiety bai"`.
pub fn normalize_label(raw: &str) -> String {
    let mut folded = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            // ASCII hyphen, unicode hyphens/dashes (‐ ‑ ‒ – — ―), minus sign
            '-' | '\u{2010}'..='\u{2015}' | '\u{2212}' => folded.push(' '),
            c if c.is_alphanumeric() => folded.extend(c.to_lowercase()),
            c if c.is_whitespace() => folded.push(' '),
            _ => {}
        }
    }
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve a raw name via `normalize_label` against an alias table of
/// (normalized name, canonical key) pairs.
pub fn lookup(raw: &str, aliases: &[(&'static str, &'static str)]) -> ScaleLookup {
    let normalized = normalize_label(raw);
    aliases
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, key)| ScaleLookup::Mapped(key))
        .unwrap_or(ScaleLookup::Unmapped)
}
