//! Lexical variant normalization (base forms).

use super::{parse_pairs, read_resource};
use crate::Result;
use std::collections::HashMap;
use std::path::Path;

const BUILTIN_EXCEPTIONS: &[(&str, &str)] = &[
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("has", "have"),
    ("had", "have"),
    ("does", "do"),
    ("did", "do"),
    ("denies", "deny"),
    ("denied", "deny"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("children", "child"),
    ("women", "woman"),
    ("men", "man"),
    ("diabetes", "diabetes"),
    ("status", "status"),
    ("mellitus", "mellitus"),
    ("pelvis", "pelvis"),
    ("stenosis", "stenosis"),
];

/// Maps inflected words to a lower-case base form.
#[derive(Debug, Clone)]
pub struct LexicalNormalizer {
    exceptions: HashMap<String, String>,
}

impl LexicalNormalizer {
    /// Built-in exception list.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            exceptions: BUILTIN_EXCEPTIONS
                .iter()
                .map(|(w, b)| ((*w).to_string(), (*b).to_string()))
                .collect(),
        }
    }

    /// Built-in list extended by a `word<TAB>base` file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = read_resource(path)?;
        let mut normalizer = Self::builtin();
        for (word, base) in parse_pairs(&raw, path)? {
            normalizer
                .exceptions
                .insert(word.to_lowercase(), base.to_lowercase());
        }
        Ok(normalizer)
    }

    /// Base form of `word`.
    #[must_use]
    pub fn normalize(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if let Some(base) = self.exceptions.get(&lower) {
            return base.clone();
        }
        strip_suffix(&lower).unwrap_or(lower)
    }
}

impl Default for LexicalNormalizer {
    fn default() -> Self {
        Self::builtin()
    }
}

fn strip_suffix(lower: &str) -> Option<String> {
    let n = lower.chars().count();
    if n > 4 && lower.ends_with("ies") {
        return Some(format!("{}y", &lower[..lower.len() - 3]));
    }
    if n > 4 && lower.ends_with("sses") {
        return Some(lower[..lower.len() - 2].to_string());
    }
    if n > 4 && ["ches", "shes", "xes"].iter().any(|s| lower.ends_with(s)) {
        return Some(lower[..lower.len() - 2].to_string());
    }
    if n > 3 && lower.ends_with('s') && !["ss", "us", "is"].iter().any(|s| lower.ends_with(s)) {
        return Some(lower[..lower.len() - 1].to_string());
    }
    if n > 5 && lower.ends_with("ing") {
        return Some(lower[..lower.len() - 3].to_string());
    }
    if n > 4 && lower.ends_with("ed") && !lower.ends_with("eed") {
        return Some(lower[..lower.len() - 2].to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        let lvg = LexicalNormalizer::builtin();
        assert_eq!(lvg.normalize("Denies"), "deny");
        assert_eq!(lvg.normalize("lungs"), "lung");
        assert_eq!(lvg.normalize("arteries"), "artery");
        assert_eq!(lvg.normalize("masses"), "mass");
        assert_eq!(lvg.normalize("swelling"), "swell");
        assert_eq!(lvg.normalize("Diabetes"), "diabetes");
        assert_eq!(lvg.normalize("pain"), "pain");
    }

    #[test]
    fn test_exception_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lvg.tsv");
        std::fs::write(&path, "Lying\tlie\n").unwrap();
        let lvg = LexicalNormalizer::from_file(&path).unwrap();
        assert_eq!(lvg.normalize("lying"), "lie");
    }
}
