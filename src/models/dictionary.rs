//! Term dictionary resolver.
//!
//! # Resource format
//!
//! One term per line, pipe-separated:
//!
//! ```text
//! # CUI|TUI|term|extra codes
//! C0008031|T184|chest pain|SNOMEDCT=29857009
//! C0011849|T047|diabetes mellitus|SNOMEDCT=73211009;ICD10CM=E11
//! C0004057|T121|aspirin|RXNORM=1191
//! ```
//!
//! The TUI may be empty. Each line yields one UMLS concept plus one coded
//! concept per `SCHEME=code` pair. Lines sharing the same (normalized) term
//! text are attached to the same mention.
//!
//! Matching is longest-first over the live tokens of a lookup window, so
//! "chest pain" wins over "pain" when both are listed.

use super::{
    read_resource, resource_lines, AssertionContext, DictionaryResolver, LookupRequest,
    ResolvedTerm,
};
use crate::{Error, Result};
use clinanno_core::{MentionType, OntologyConcept, Polarity, Span};
use std::collections::HashMap;
use std::path::Path;

/// One dictionary line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermEntry {
    /// UMLS CUI
    pub cui: String,
    /// UMLS semantic type
    pub tui: Option<String>,
    /// Term text as written in the resource
    pub term: String,
    /// Additional `(scheme, code)` pairs
    pub codes: Vec<(String, String)>,
}

impl TermEntry {
    fn concepts(&self) -> impl Iterator<Item = OntologyConcept> + '_ {
        let umls = OntologyConcept::Umls {
            cui: self.cui.clone(),
            tui: self.tui.clone(),
            preferred_text: Some(self.term.clone()),
        };
        std::iter::once(umls).chain(
            self.codes
                .iter()
                .map(|(scheme, code)| OntologyConcept::coded(scheme.clone(), code.clone())),
        )
    }
}

/// Map a UMLS semantic type to a mention subtype.
#[must_use]
pub fn mention_type_for_tui(tui: Option<&str>) -> MentionType {
    match tui {
        Some(
            "T019" | "T020" | "T037" | "T046" | "T047" | "T048" | "T049" | "T050" | "T190"
            | "T191",
        ) => MentionType::DiseaseDisorder,
        Some("T033" | "T184") => MentionType::SignSymptom,
        Some("T059" | "T060" | "T061") => MentionType::Procedure,
        Some("T034") => MentionType::Lab,
        Some(
            "T109" | "T110" | "T114" | "T115" | "T116" | "T118" | "T119" | "T121" | "T122"
            | "T123" | "T124" | "T125" | "T126" | "T127" | "T129" | "T130" | "T131" | "T195"
            | "T196" | "T197" | "T200" | "T203",
        ) => MentionType::Medication,
        Some(
            "T017" | "T021" | "T022" | "T023" | "T024" | "T025" | "T026" | "T029" | "T030",
        ) => MentionType::AnatomicalSite,
        _ => MentionType::Entity,
    }
}

/// Lower-case and collapse whitespace.
fn term_key(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// In-memory term dictionary with cue-based assertion.
#[derive(Debug, Clone, Default)]
pub struct TermDictionary {
    terms: HashMap<String, Vec<TermEntry>>,
    assertion: AssertionContext,
}

impl TermDictionary {
    /// Empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a pipe-separated dictionary file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = read_resource(path)?;
        Self::parse(&raw)
            .map_err(|e| Error::model_init(format!("{}: {}", path.display(), e)))
    }

    /// Parse dictionary text.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut dictionary = Self::new();
        for (lineno, line) in resource_lines(raw) {
            let entry = parse_line(line)
                .ok_or_else(|| Error::invalid_input(format!("line {lineno}: malformed entry")))?;
            dictionary.insert(entry);
        }
        Ok(dictionary)
    }

    /// Replace the assertion cue matcher.
    #[must_use]
    pub fn with_assertion(mut self, assertion: AssertionContext) -> Self {
        self.assertion = assertion;
        self
    }

    /// Add an entry.
    pub fn insert(&mut self, entry: TermEntry) {
        self.terms.entry(term_key(&entry.term)).or_default().push(entry);
    }

    /// Number of distinct terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True when no term is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Entries for a term, case- and spacing-insensitive.
    #[must_use]
    pub fn lookup(&self, text: &str) -> Option<&[TermEntry]> {
        self.terms.get(&term_key(text)).map(Vec::as_slice)
    }
}

fn parse_line(line: &str) -> Option<TermEntry> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    let (cui, tui, term, codes) = match fields.as_slice() {
        [cui, tui, term] => (*cui, *tui, *term, ""),
        [cui, tui, term, codes] => (*cui, *tui, *term, *codes),
        _ => return None,
    };
    if cui.is_empty() || term.is_empty() {
        return None;
    }
    let codes = codes
        .split(';')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|pair| {
            let (scheme, code) = pair.split_once('=')?;
            let (scheme, code) = (scheme.trim(), code.trim());
            (!scheme.is_empty() && !code.is_empty())
                .then(|| (scheme.to_string(), code.to_string()))
        })
        .collect::<Option<Vec<_>>>()?;
    Some(TermEntry {
        cui: cui.to_string(),
        tui: (!tui.is_empty()).then(|| tui.to_string()),
        term: term.to_string(),
        codes,
    })
}

impl DictionaryResolver for TermDictionary {
    fn resolve(&self, request: &LookupRequest<'_>) -> Result<Vec<ResolvedTerm>> {
        let tokens = request.window_tokens;
        let words: Vec<String> = request
            .sentence_tokens
            .iter()
            .map(|t| request.text.get(t.range()).unwrap_or("").to_lowercase())
            .collect();

        let mut resolved = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let hit = (i + 1..=tokens.len()).rev().find_map(|j| {
                let span = Span::new(tokens[i].begin, tokens[j - 1].end);
                let text = request.text.get(span.range())?;
                self.lookup(text).map(|entries| (j, span, entries))
            });
            let Some((j, span, entries)) = hit else {
                i += 1;
                continue;
            };

            let polarity = match request.sentence_tokens.iter().position(|t| *t == tokens[i]) {
                Some(first) => self.assertion.polarity(&words, first..first + (j - i)),
                None => Polarity::Positive,
            };
            let tui = entries.iter().find_map(|e| e.tui.as_deref());
            resolved.push(ResolvedTerm {
                span,
                mention_type: mention_type_for_tui(tui),
                polarity,
                concepts: entries.iter().flat_map(TermEntry::concepts).collect(),
            });
            i = j;
        }
        Ok(resolved)
    }

    fn name(&self) -> &'static str {
        "term-dictionary"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DICT: &str = "\
# test dictionary
C0008031||chest pain|SNOMEDCT=12345
C0030193|T184|pain
C0011849|T047|Diabetes  Mellitus
";

    fn spans_of(text: &str, words: &[&str]) -> Vec<Span> {
        let mut from = 0;
        words
            .iter()
            .map(|w| {
                let begin = from + text[from..].find(w).unwrap();
                from = begin + w.len();
                Span::new(begin, from)
            })
            .collect()
    }

    #[test]
    fn test_parse_fields() {
        let dict = TermDictionary::parse(DICT).unwrap();
        assert_eq!(dict.len(), 3);
        let entries = dict.lookup("CHEST   pain").unwrap();
        assert_eq!(entries[0].codes, vec![("SNOMEDCT".into(), "12345".into())]);
        assert!(entries[0].tui.is_none());
        assert!(dict.lookup("diabetes mellitus").is_some());
    }

    #[test]
    fn test_malformed_lines_rejected() {
        assert!(TermDictionary::parse("C1|T1").is_err());
        assert!(TermDictionary::parse("|T1|term").is_err());
        assert!(TermDictionary::parse("C1|T1|term|SNOMEDCT").is_err());
    }

    #[test]
    fn test_longest_match_and_negation() {
        let dict = TermDictionary::parse(DICT).unwrap();
        let text = "Patient denies chest pain.";
        let sentence = spans_of(text, &["Patient", "denies", "chest", "pain", "."]);
        let window = &sentence[2..4];
        let request = LookupRequest {
            text,
            window: Span::new(15, 25),
            window_tokens: window,
            sentence_tokens: &sentence,
        };

        let hits = dict.resolve(&request).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(&text[hits[0].span.range()], "chest pain");
        assert_eq!(hits[0].polarity, Polarity::Negated);
        assert_eq!(hits[0].mention_type, MentionType::Entity);
        let codes: Vec<_> = hits[0].concepts.iter().map(OntologyConcept::code_string).collect();
        assert_eq!(codes, vec!["C0008031", "SNOMEDCT12345"]);
    }

    #[test]
    fn test_tui_mapping() {
        assert_eq!(mention_type_for_tui(Some("T047")), MentionType::DiseaseDisorder);
        assert_eq!(mention_type_for_tui(Some("T184")), MentionType::SignSymptom);
        assert_eq!(mention_type_for_tui(Some("T121")), MentionType::Medication);
        assert_eq!(mention_type_for_tui(Some("T023")), MentionType::AnatomicalSite);
        assert_eq!(mention_type_for_tui(Some("T999")), MentionType::Entity);
        assert_eq!(mention_type_for_tui(None), MentionType::Entity);
    }

    #[test]
    fn test_from_file_error_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.bsv");
        std::fs::write(&path, "not a dictionary line\n").unwrap();
        let err = TermDictionary::from_file(&path).unwrap_err();
        assert!(err.is_startup_fatal());
    }
}
