//! Graph → XMI.

use super::{
    escape_attr, polarity_attrs, CHUNK, FS_ARRAY, LOOKUP_WINDOW, NS_CAS, NS_REFSEM, NS_SYNTAX,
    NS_TEXTSEM, NS_TEXTSPAN, NS_XMI, NULL, ONTOLOGY_CONCEPT, ROOT, SEGMENT, SENTENCE, SOFA,
    SOFA_ID, SYNTAX_PREFIX, TEXTSEM_PREFIX, UMLS_CONCEPT, VIEW,
};
use crate::{Error, Result};
use clinanno_core::{AnnotationGraph, AnnotationKind, OffsetConverter, OntologyConcept};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

type Attrs = Vec<(&'static str, String)>;

/// Serialize every live annotation of `graph` as an XMI document.
pub fn write_xmi(graph: &AnnotationGraph) -> Result<String> {
    let mut out = XmiWriter::new();
    let offsets = OffsetConverter::new(graph.text());

    out.decl()?;
    out.start(
        ROOT,
        vec![
            ("xmlns:xmi", NS_XMI.to_string()),
            ("xmlns:cas", NS_CAS.to_string()),
            ("xmlns:textspan", NS_TEXTSPAN.to_string()),
            ("xmlns:syntax", NS_SYNTAX.to_string()),
            ("xmlns:textsem", NS_TEXTSEM.to_string()),
            ("xmlns:refsem", NS_REFSEM.to_string()),
            ("xmi:version", "2.0".to_string()),
        ],
    )?;
    out.empty(NULL, vec![("xmi:id", "0".to_string())])?;
    out.empty(
        SOFA,
        vec![
            ("xmi:id", SOFA_ID.to_string()),
            ("sofaNum", "1".to_string()),
            ("sofaID", "_InitialView".to_string()),
            ("mimeType", "text".to_string()),
            ("sofaString", graph.text().to_string()),
        ],
    )?;

    let mut next_id: u64 = 2;
    let mut members = Vec::new();
    let mut deferred: Vec<(&'static str, Attrs)> = Vec::new();

    for annotation in graph.annotations_in_order() {
        let id = next_id;
        next_id += 1;
        members.push(id.to_string());

        let (begin, end) = offsets.to_chars(annotation.span);
        let mut attrs: Attrs = vec![
            ("xmi:id", id.to_string()),
            ("sofa", SOFA_ID.to_string()),
            ("begin", begin.to_string()),
            ("end", end.to_string()),
        ];

        let name = match &annotation.kind {
            AnnotationKind::Segment { id } => {
                attrs.push(("id", id.clone()));
                SEGMENT.to_string()
            }
            AnnotationKind::Sentence { number } => {
                attrs.push(("sentenceNumber", number.to_string()));
                SENTENCE.to_string()
            }
            AnnotationKind::Token(token) => {
                if let Some(pos) = &token.pos {
                    attrs.push(("partOfSpeech", pos.clone()));
                }
                if let Some(form) = &token.normalized {
                    attrs.push(("normalizedForm", form.clone()));
                }
                format!("{SYNTAX_PREFIX}{}", token.class.type_name())
            }
            AnnotationKind::Chunk { chunk_type } => {
                attrs.push(("chunkType", chunk_type.clone()));
                CHUNK.to_string()
            }
            AnnotationKind::LookupWindow => LOOKUP_WINDOW.to_string(),
            AnnotationKind::Mention(mention) => {
                let (polarity, uncertainty) = polarity_attrs(mention.polarity);
                attrs.push(("polarity", polarity.to_string()));
                attrs.push(("uncertainty", uncertainty.to_string()));
                if !mention.concepts.is_empty() {
                    let array_id = next_id;
                    next_id += 1;
                    let mut elements = Vec::with_capacity(mention.concepts.len());
                    for concept in &mention.concepts {
                        let concept_id = next_id;
                        next_id += 1;
                        elements.push(concept_id.to_string());
                        deferred.push(concept_element(concept_id, concept));
                    }
                    deferred.push((
                        FS_ARRAY,
                        vec![
                            ("xmi:id", array_id.to_string()),
                            ("elements", elements.join(" ")),
                        ],
                    ));
                    attrs.push(("ontologyConceptArr", array_id.to_string()));
                }
                format!("{TEXTSEM_PREFIX}{}", mention.mention_type.type_name())
            }
        };
        out.empty(&name, attrs)?;
    }

    for (name, attrs) in deferred {
        out.empty(name, attrs)?;
    }
    out.empty(
        VIEW,
        vec![("sofa", SOFA_ID.to_string()), ("members", members.join(" "))],
    )?;
    out.end(ROOT)?;
    out.finish()
}

fn concept_element(id: u64, concept: &OntologyConcept) -> (&'static str, Attrs) {
    match concept {
        OntologyConcept::Umls {
            cui,
            tui,
            preferred_text,
        } => {
            let mut attrs: Attrs = vec![
                ("xmi:id", id.to_string()),
                ("codingScheme", concept.scheme().to_string()),
                ("cui", cui.clone()),
            ];
            if let Some(tui) = tui {
                attrs.push(("tui", tui.clone()));
            }
            if let Some(text) = preferred_text {
                attrs.push(("preferredText", text.clone()));
            }
            (UMLS_CONCEPT, attrs)
        }
        OntologyConcept::Coded { scheme, code } => (
            ONTOLOGY_CONCEPT,
            vec![
                ("xmi:id", id.to_string()),
                ("codingScheme", scheme.clone()),
                ("code", code.clone()),
            ],
        ),
    }
}

fn xml_err(e: impl std::fmt::Display) -> Error {
    Error::xmi(e.to_string())
}

struct XmiWriter {
    writer: Writer<Vec<u8>>,
}

impl XmiWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn decl(&mut self) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_err)
    }

    fn element(&mut self, name: &str, attrs: Attrs, empty: bool) -> Result<()> {
        let escaped = attrs
            .into_iter()
            .map(|(key, value)| escape_attr(&value).map(|v| (key, v)))
            .collect::<Result<Vec<_>>>()?;
        let mut elem = BytesStart::new(name);
        for (key, value) in &escaped {
            elem.push_attribute((key.as_bytes(), value.as_bytes()));
        }
        let event = if empty {
            Event::Empty(elem)
        } else {
            Event::Start(elem)
        };
        self.writer.write_event(event).map_err(xml_err)
    }

    fn start(&mut self, name: &str, attrs: Attrs) -> Result<()> {
        self.element(name, attrs, false)
    }

    fn empty(&mut self, name: &str, attrs: Attrs) -> Result<()> {
        self.element(name, attrs, true)
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_err)
    }

    fn finish(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner()).map_err(xml_err)
    }
}
