//! RDF/XML format implementation

use super::rio::{collect_triples, format_triples};
use super::{parse_base_iri, ParseResult, RdfParser, RdfSerializer, SerializeResult};
use crate::rdf::Graph;
use rio_xml::{RdfXmlFormatter, RdfXmlParser};
use std::io::Cursor;

/// RDF/XML parser
pub struct RdfXmlParserWrapper;

impl RdfParser for RdfXmlParserWrapper {
    fn parse(&self, input: &[u8]) -> ParseResult<Graph> {
        self.parse_with_base(input, None)
    }

    fn parse_with_base(&self, input: &[u8], base_iri: Option<&str>) -> ParseResult<Graph> {
        let mut parser = RdfXmlParser::new(Cursor::new(input), parse_base_iri(base_iri)?);
        collect_triples(&mut parser)
    }
}

/// RDF/XML serializer
pub struct RdfXmlSerializerWrapper;

impl RdfSerializer for RdfXmlSerializerWrapper {
    fn serialize(&self, graph: &Graph) -> SerializeResult<Vec<u8>> {
        let mut formatter = RdfXmlFormatter::new(Vec::new())?;
        format_triples(&mut formatter, graph)?;
        Ok(formatter.finish()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::{Literal, NamedNode, Triple};

    #[test]
    fn test_rdfxml_roundtrip() {
        let mut graph = Graph::new();
        graph.add(Triple::new(
            NamedNode::new("http://example.org/alice"),
            NamedNode::new("http://xmlns.com/foaf/0.1/name"),
            Literal::new_simple_literal("Alice"),
        ));

        let xml = RdfXmlSerializerWrapper.serialize(&graph).unwrap();
        let text = String::from_utf8(xml.clone()).unwrap();
        assert!(text.contains("rdf:RDF"));
        assert!(text.contains("http://example.org/alice"));

        let parsed = RdfXmlParserWrapper.parse(&xml).unwrap();
        assert_eq!(parsed, graph);
    }

    #[test]
    fn test_rdfxml_relative_about_resolves_against_base() {
        let xml = br#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:foaf="http://xmlns.com/foaf/0.1/">
  <rdf:Description rdf:about="/people/alice">
    <foaf:name>Alice</foaf:name>
  </rdf:Description>
</rdf:RDF>"#;

        let graph = RdfXmlParserWrapper
            .parse_with_base(xml, Some("http://example.org/graph"))
            .unwrap();
        assert!(graph.contains(&Triple::new(
            NamedNode::new("http://example.org/people/alice"),
            NamedNode::new("http://xmlns.com/foaf/0.1/name"),
            Literal::new_simple_literal("Alice"),
        )));
    }

    #[test]
    fn test_rdfxml_parse_error() {
        assert!(RdfXmlParserWrapper.parse(b"<rdf:RDF").is_err());
    }
}
