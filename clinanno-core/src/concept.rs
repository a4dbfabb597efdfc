//! Ontology concepts attached to mentions.

use serde::{Deserialize, Serialize};

/// Coding scheme name used for UMLS concepts.
pub const UMLS_SCHEME: &str = "UMLS";

/// A normalized ontology code attached to a [`crate::Mention`].
///
/// UMLS concepts are keyed by CUI; every other scheme (SNOMED CT, RxNorm,
/// ICD, ...) is a scheme name plus a scheme-local code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OntologyConcept {
    /// UMLS Metathesaurus concept.
    Umls {
        /// Concept Unique Identifier, e.g. `C0008031`
        cui: String,
        /// Semantic type identifier, e.g. `T184`
        tui: Option<String>,
        /// Preferred term for the concept
        preferred_text: Option<String>,
    },
    /// Concept from any other coding scheme.
    Coded {
        /// Scheme identifier, e.g. `SNOMEDCT_US`, `RXNORM`
        scheme: String,
        /// Scheme-local code
        code: String,
    },
}

impl OntologyConcept {
    /// Create a UMLS concept with only a CUI.
    #[must_use]
    pub fn umls(cui: impl Into<String>) -> Self {
        Self::Umls {
            cui: cui.into(),
            tui: None,
            preferred_text: None,
        }
    }

    /// Create a concept from a non-UMLS scheme.
    #[must_use]
    pub fn coded(scheme: impl Into<String>, code: impl Into<String>) -> Self {
        Self::Coded {
            scheme: scheme.into(),
            code: code.into(),
        }
    }

    /// The code emitted for this concept: the CUI for UMLS, otherwise the
    /// scheme identifier immediately followed by the code value.
    #[must_use]
    pub fn code_string(&self) -> String {
        match self {
            Self::Umls { cui, .. } => cui.clone(),
            Self::Coded { scheme, code } => format!("{scheme}{code}"),
        }
    }

    /// Coding scheme name.
    #[must_use]
    pub fn scheme(&self) -> &str {
        match self {
            Self::Umls { .. } => UMLS_SCHEME,
            Self::Coded { scheme, .. } => scheme,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_string() {
        assert_eq!(OntologyConcept::umls("C0008031").code_string(), "C0008031");
        assert_eq!(
            OntologyConcept::coded("SNOMEDCT", "12345").code_string(),
            "SNOMEDCT12345"
        );
    }
}
