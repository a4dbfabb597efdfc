//! XMI graph files.
//!
//! # Layout
//!
//! ```text
//! <xmi:XMI xmi:version="2.0" xmlns:...>
//!   <cas:NULL xmi:id="0"/>
//!   <cas:Sofa xmi:id="1" sofaNum="1" sofaID="_InitialView" mimeType="text"
//!             sofaString="..."/>
//!   <textspan:Segment xmi:id="2" sofa="1" begin="0" end="26" id="SIMPLE_SEGMENT"/>
//!   <syntax:WordToken ... partOfSpeech="NN" normalizedForm="pain"/>
//!   <textsem:EntityMention ... polarity="-1" ontologyConceptArr="9"/>
//!   <cas:FSArray xmi:id="9" elements="10"/>
//!   <refsem:UmlsConcept xmi:id="10" cui="C0008031" codingScheme="UMLS"/>
//!   <cas:View sofa="1" members="2 3 ..."/>
//! </xmi:XMI>
//! ```
//!
//! `begin`/`end` are Unicode character offsets into `sofaString`; the
//! in-memory graph uses byte offsets. Only live annotations are written.

pub mod reader;
pub mod writer;

pub use reader::read_xmi;
pub use writer::write_xmi;

use crate::{Error, Result};
use clinanno_core::Polarity;

pub(crate) const NS_XMI: &str = "http://www.omg.org/XMI";
pub(crate) const NS_CAS: &str = "http:///uima/cas.ecore";
pub(crate) const NS_TEXTSPAN: &str = "http:///org/apache/ctakes/typesystem/type/textspan.ecore";
pub(crate) const NS_SYNTAX: &str = "http:///org/apache/ctakes/typesystem/type/syntax.ecore";
pub(crate) const NS_TEXTSEM: &str = "http:///org/apache/ctakes/typesystem/type/textsem.ecore";
pub(crate) const NS_REFSEM: &str = "http:///org/apache/ctakes/typesystem/type/refsem.ecore";

pub(crate) const ROOT: &str = "xmi:XMI";
pub(crate) const NULL: &str = "cas:NULL";
pub(crate) const SOFA: &str = "cas:Sofa";
pub(crate) const VIEW: &str = "cas:View";
pub(crate) const FS_ARRAY: &str = "cas:FSArray";
pub(crate) const SEGMENT: &str = "textspan:Segment";
pub(crate) const SENTENCE: &str = "textspan:Sentence";
pub(crate) const LOOKUP_WINDOW: &str = "textspan:LookupWindowAnnotation";
pub(crate) const CHUNK: &str = "syntax:Chunk";
pub(crate) const UMLS_CONCEPT: &str = "refsem:UmlsConcept";
pub(crate) const ONTOLOGY_CONCEPT: &str = "refsem:OntologyConcept";
pub(crate) const SYNTAX_PREFIX: &str = "syntax:";
pub(crate) const TEXTSEM_PREFIX: &str = "textsem:";

pub(crate) const SOFA_ID: &str = "1";

/// `polarity` and `uncertainty` attribute values.
pub(crate) fn polarity_attrs(polarity: Polarity) -> (&'static str, &'static str) {
    match polarity {
        Polarity::Positive => ("1", "0"),
        Polarity::Negated => ("-1", "0"),
        Polarity::Uncertain => ("1", "1"),
    }
}

/// Read `polarity`/`uncertainty` back. Only a polarity above zero is
/// asserted; `0`, negative, unparsable or absent values read as negated.
pub(crate) fn polarity_from_attrs(polarity: Option<&str>, uncertainty: Option<&str>) -> Polarity {
    match polarity.and_then(|p| p.trim().parse::<i32>().ok()) {
        Some(p) if p > 0 && uncertainty == Some("1") => Polarity::Uncertain,
        Some(p) if p > 0 => Polarity::Positive,
        _ => Polarity::Negated,
    }
}

/// True for characters XML 1.0 can carry.
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// Escape an attribute value, keeping line breaks and tabs as character
/// references so they survive attribute-value normalization.
pub(crate) fn escape_attr(value: &str) -> Result<String> {
    let mut out = String::with_capacity(value.len());
    for (i, c) in value.char_indices() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            c if is_xml_char(c) => out.push(c),
            c => {
                return Err(Error::xmi(format!(
                    "character U+{:04X} at byte {} cannot be represented in XML",
                    c as u32, i
                )))
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_attr() {
        assert_eq!(
            escape_attr("a<b & \"c\"\nd").unwrap(),
            "a&lt;b &amp; &quot;c&quot;&#10;d"
        );
    }

    #[test]
    fn test_control_chars_rejected() {
        let err = escape_attr("page\u{000C}break").unwrap_err();
        assert!(matches!(err, Error::Xmi(_)));
        assert!(escape_attr("bad\u{FFFE}").is_err());
    }

    #[test]
    fn test_polarity_attrs_roundtrip() {
        for p in [Polarity::Positive, Polarity::Negated, Polarity::Uncertain] {
            let (pol, unc) = polarity_attrs(p);
            assert_eq!(polarity_from_attrs(Some(pol), Some(unc)), p);
        }
    }

    #[test]
    fn test_unset_polarity_is_negated() {
        assert_eq!(polarity_from_attrs(Some("0"), Some("0")), Polarity::Negated);
        assert_eq!(polarity_from_attrs(None, None), Polarity::Negated);
        assert_eq!(polarity_from_attrs(Some("x"), None), Polarity::Negated);
        assert_eq!(polarity_from_attrs(Some("2"), None), Polarity::Positive);
    }
}
