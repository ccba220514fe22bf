//! Turtle and N-Triples format implementation

use super::rio::{collect_triples, format_triples};
use super::{parse_base_iri, ParseResult, RdfParser, RdfSerializer, SerializeResult};
use crate::rdf::Graph;
use rio_turtle::{NTriplesFormatter, NTriplesParser, TurtleFormatter, TurtleParser};
use std::io::Cursor;

/// Turtle parser
pub struct TurtleParserWrapper;

impl RdfParser for TurtleParserWrapper {
    fn parse(&self, input: &[u8]) -> ParseResult<Graph> {
        self.parse_with_base(input, None)
    }

    fn parse_with_base(&self, input: &[u8], base_iri: Option<&str>) -> ParseResult<Graph> {
        let mut parser = TurtleParser::new(Cursor::new(input), parse_base_iri(base_iri)?);
        collect_triples(&mut parser)
    }
}

/// Turtle serializer
pub struct TurtleSerializerWrapper;

impl RdfSerializer for TurtleSerializerWrapper {
    fn serialize(&self, graph: &Graph) -> SerializeResult<Vec<u8>> {
        let mut formatter = TurtleFormatter::new(Vec::new());
        format_triples(&mut formatter, graph)?;
        Ok(formatter.finish()?)
    }
}

/// N-Triples parser
pub struct NTriplesParserWrapper;

impl RdfParser for NTriplesParserWrapper {
    fn parse(&self, input: &[u8]) -> ParseResult<Graph> {
        let mut parser = NTriplesParser::new(Cursor::new(input));
        collect_triples(&mut parser)
    }
}

/// N-Triples serializer. Every IRI is written as-is, so callers must hand it a graph
/// without relative references.
pub struct NTriplesSerializerWrapper;

impl RdfSerializer for NTriplesSerializerWrapper {
    fn serialize(&self, graph: &Graph) -> SerializeResult<Vec<u8>> {
        let mut formatter = NTriplesFormatter::new(Vec::new());
        format_triples(&mut formatter, graph)?;
        Ok(formatter.finish()?)
    }
}
