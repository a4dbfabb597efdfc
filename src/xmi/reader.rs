//! XMI → graph.

use super::{
    polarity_from_attrs, CHUNK, FS_ARRAY, LOOKUP_WINDOW, ONTOLOGY_CONCEPT, SEGMENT, SENTENCE,
    SOFA, SYNTAX_PREFIX, TEXTSEM_PREFIX, UMLS_CONCEPT,
};
use crate::{Error, Result};
use clinanno_core::{
    AnnotationGraph, AnnotationKind, Mention, MentionType, OffsetConverter, OntologyConcept,
    Span, Token, TokenClass, SIMPLE_SEGMENT,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// One start or empty tag with unescaped attributes.
#[derive(Debug)]
struct Element {
    name: String,
    attrs: HashMap<String, String>,
}

impl Element {
    fn from_tag(tag: &BytesStart<'_>) -> Result<Self> {
        let name = std::str::from_utf8(tag.name().into_inner())
            .map_err(|e| Error::xmi(e.to_string()))?
            .to_string();
        let mut attrs = HashMap::new();
        for attr in tag.attributes() {
            let attr = attr.map_err(|e| Error::xmi(e.to_string()))?;
            let key = std::str::from_utf8(attr.key.into_inner())
                .map_err(|e| Error::xmi(e.to_string()))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| Error::xmi(e.to_string()))?
                .into_owned();
            attrs.insert(key, value);
        }
        Ok(Self { name, attrs })
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| Error::xmi(format!("<{}> is missing attribute '{}'", self.name, key)))
    }

    fn number(&self, key: &str) -> Result<usize> {
        let raw = self.require(key)?;
        raw.parse()
            .map_err(|_| Error::xmi(format!("<{}> {}=\"{}\" is not a number", self.name, key, raw)))
    }

    fn span(&self, offsets: &OffsetConverter) -> Result<Span> {
        let (begin, end) = (self.number("begin")?, self.number("end")?);
        offsets.from_chars(begin, end).ok_or_else(|| {
            Error::xmi(format!("<{}> span {}..{} is outside the text", self.name, begin, end))
        })
    }
}

fn parse_elements(xml: &str) -> Result<Vec<Element>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut elements = Vec::new();
    loop {
        match reader.read_event().map_err(|e| Error::xmi(e.to_string()))? {
            Event::Start(tag) | Event::Empty(tag) => elements.push(Element::from_tag(&tag)?),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(elements)
}

/// Rebuild a graph from an XMI document.
///
/// Elements of unknown types are skipped.
pub fn read_xmi(xml: &str) -> Result<AnnotationGraph> {
    let elements = parse_elements(xml)?;

    let text = elements
        .iter()
        .find(|e| e.name == SOFA)
        .ok_or_else(|| Error::xmi("no <cas:Sofa> element"))?
        .require("sofaString")?
        .to_string();
    let offsets = OffsetConverter::new(&text);
    let mut graph = AnnotationGraph::new(text);

    let mut concepts: HashMap<&str, OntologyConcept> = HashMap::new();
    let mut arrays: HashMap<&str, Vec<&str>> = HashMap::new();
    for element in &elements {
        let concept = match element.name.as_str() {
            UMLS_CONCEPT => OntologyConcept::Umls {
                cui: element.require("cui")?.to_string(),
                tui: element.get("tui").map(str::to_string),
                preferred_text: element.get("preferredText").map(str::to_string),
            },
            ONTOLOGY_CONCEPT => OntologyConcept::coded(
                element.require("codingScheme")?,
                element.require("code")?,
            ),
            FS_ARRAY => {
                let members = element.get("elements").unwrap_or("").split_whitespace().collect();
                arrays.insert(element.require("xmi:id")?, members);
                continue;
            }
            _ => continue,
        };
        concepts.insert(element.require("xmi:id")?, concept);
    }

    for element in &elements {
        let name = element.name.as_str();
        let kind = match name {
            SEGMENT => AnnotationKind::Segment {
                id: element.get("id").unwrap_or(SIMPLE_SEGMENT).to_string(),
            },
            SENTENCE => AnnotationKind::Sentence {
                number: element.number("sentenceNumber").unwrap_or(0),
            },
            CHUNK => AnnotationKind::Chunk {
                chunk_type: element.get("chunkType").unwrap_or_default().to_string(),
            },
            LOOKUP_WINDOW => AnnotationKind::LookupWindow,
            _ => {
                if let Some(class) = name
                    .strip_prefix(SYNTAX_PREFIX)
                    .and_then(TokenClass::from_type_name)
                {
                    AnnotationKind::Token(Token {
                        class,
                        pos: element.get("partOfSpeech").map(str::to_string),
                        normalized: element.get("normalizedForm").map(str::to_string),
                    })
                } else if let Some(mention_type) = name
                    .strip_prefix(TEXTSEM_PREFIX)
                    .and_then(MentionType::from_type_name)
                {
                    AnnotationKind::Mention(read_mention(element, mention_type, &concepts, &arrays)?)
                } else {
                    continue;
                }
            }
        };
        graph.add(element.span(&offsets)?, kind)?;
    }
    Ok(graph)
}

fn read_mention(
    element: &Element,
    mention_type: MentionType,
    concepts: &HashMap<&str, OntologyConcept>,
    arrays: &HashMap<&str, Vec<&str>>,
) -> Result<Mention> {
    let polarity = polarity_from_attrs(element.get("polarity"), element.get("uncertainty"));
    let mut attached = Vec::new();
    if let Some(array_id) = element.get("ontologyConceptArr") {
        let members = arrays
            .get(array_id)
            .ok_or_else(|| Error::xmi(format!("unknown concept array {array_id}")))?;
        for member in members {
            let concept = concepts
                .get(member)
                .ok_or_else(|| Error::xmi(format!("unknown concept {member}")))?;
            attached.push(concept.clone());
        }
    }
    Ok(Mention::new(mention_type, polarity).with_concepts(attached))
}
