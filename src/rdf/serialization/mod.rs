//! RDF serialization formats
//!
//! Supports:
//! - N-Triples (NT)
//! - Turtle (TTL)
//! - RDF/XML
//! - JSON-LD (expanded form)
//!
//! Codecs are looked up by media type through [`CodecRegistry`]. The default
//! [`FormatRegistry`] is built once at startup and shared read-only between requests.

mod jsonld;
mod rio;
mod rdfxml;
mod turtle;

use jsonld::{JsonLdParserWrapper, JsonLdSerializerWrapper};
use rdfxml::{RdfXmlParserWrapper, RdfXmlSerializerWrapper};
use turtle::{
    NTriplesParserWrapper, NTriplesSerializerWrapper, TurtleParserWrapper,
    TurtleSerializerWrapper,
};

use super::Graph;
use crate::media_type::{self, MediaType};
use indexmap::IndexMap;
use oxiri::Iri;
use std::sync::Arc;
use thiserror::Error;

/// RDF serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RdfFormat {
    /// N-Triples format (.nt)
    NTriples,
    /// Turtle format (.ttl)
    Turtle,
    /// RDF/XML format (.rdf)
    RdfXml,
    /// JSON-LD format (.jsonld)
    JsonLd,
}

impl RdfFormat {
    /// All built-in formats, in default registration order
    pub const ALL: [RdfFormat; 4] = [
        RdfFormat::NTriples,
        RdfFormat::Turtle,
        RdfFormat::RdfXml,
        RdfFormat::JsonLd,
    ];

    /// Media type served for this format
    pub fn media_type(self) -> &'static str {
        match self {
            RdfFormat::NTriples => media_type::N_TRIPLES,
            RdfFormat::Turtle => media_type::TURTLE,
            RdfFormat::RdfXml => media_type::RDF_XML,
            RdfFormat::JsonLd => media_type::JSON_LD,
        }
    }

    /// Look up a built-in format by media type
    pub fn from_media_type(media_type: &MediaType) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.media_type() == media_type.as_str())
    }

    fn parser(self) -> Arc<dyn RdfParser> {
        match self {
            RdfFormat::NTriples => Arc::new(NTriplesParserWrapper),
            RdfFormat::Turtle => Arc::new(TurtleParserWrapper),
            RdfFormat::RdfXml => Arc::new(RdfXmlParserWrapper),
            RdfFormat::JsonLd => Arc::new(JsonLdParserWrapper),
        }
    }

    fn serializer(self) -> Arc<dyn RdfSerializer> {
        match self {
            RdfFormat::NTriples => Arc::new(NTriplesSerializerWrapper),
            RdfFormat::Turtle => Arc::new(TurtleSerializerWrapper),
            RdfFormat::RdfXml => Arc::new(RdfXmlSerializerWrapper),
            RdfFormat::JsonLd => Arc::new(JsonLdSerializerWrapper),
        }
    }
}

/// Parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// No parser registered for the media type
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),
}

impl From<rio_turtle::TurtleError> for ParseError {
    fn from(e: rio_turtle::TurtleError) -> Self {
        ParseError::Parse(e.to_string())
    }
}

impl From<rio_xml::RdfXmlError> for ParseError {
    fn from(e: rio_xml::RdfXmlError) -> Self {
        ParseError::Parse(e.to_string())
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Serialization errors
#[derive(Error, Debug)]
pub enum SerializeError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// No serializer registered for the media type
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),
}

pub type SerializeResult<T> = Result<T, SerializeError>;

/// Parses a request body into a graph
pub trait RdfParser: Send + Sync {
    fn parse(&self, input: &[u8]) -> ParseResult<Graph>;

    /// Parse with relative references resolved against `base_iri`.
    ///
    /// Formats without relative references ignore the base.
    fn parse_with_base(&self, input: &[u8], _base_iri: Option<&str>) -> ParseResult<Graph> {
        self.parse(input)
    }
}

/// Parse an optional base IRI for the rio parsers
pub(crate) fn parse_base_iri(base_iri: Option<&str>) -> ParseResult<Option<Iri<String>>> {
    base_iri
        .map(|base| {
            Iri::parse(base.to_string())
                .map_err(|e| ParseError::Parse(format!("Invalid base IRI '{}': {}", base, e)))
        })
        .transpose()
}

/// Writes a graph as bytes
pub trait RdfSerializer: Send + Sync {
    fn serialize(&self, graph: &Graph) -> SerializeResult<Vec<u8>>;
}

/// Codec lookup by media type
pub trait CodecRegistry: Send + Sync {
    /// Media types that can be produced, in registration order
    fn serializer_media_types(&self) -> Vec<MediaType>;

    /// Serialize a graph with the codec registered for `media_type`
    fn serialize(&self, media_type: &MediaType, graph: &Graph) -> SerializeResult<Vec<u8>>;

    /// Parse bytes with the codec registered for `media_type`
    fn parse(&self, media_type: &MediaType, input: &[u8]) -> ParseResult<Graph>;

    /// Like [`parse`](CodecRegistry::parse), resolving relative references against
    /// `base_iri`
    fn parse_with_base(
        &self,
        media_type: &MediaType,
        input: &[u8],
        _base_iri: Option<&str>,
    ) -> ParseResult<Graph> {
        self.parse(media_type, input)
    }
}

/// Registry of parsers and serializers keyed on media type
#[derive(Clone, Default)]
pub struct FormatRegistry {
    parsers: IndexMap<MediaType, Arc<dyn RdfParser>>,
    serializers: IndexMap<MediaType, Arc<dyn RdfSerializer>>,
}

impl FormatRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in format
    pub fn with_default_formats() -> Self {
        let mut registry = Self::new();
        for format in RdfFormat::ALL {
            registry.register_format(format);
        }
        registry
    }

    /// Register both directions of a built-in format
    pub fn register_format(&mut self, format: RdfFormat) -> &mut Self {
        let media_type = MediaType::new(format.media_type());
        self.parsers.insert(media_type.clone(), format.parser());
        self.serializers.insert(media_type, format.serializer());
        self
    }

    /// Register (or replace) a parser
    pub fn register_parser(
        &mut self,
        media_type: impl Into<MediaType>,
        parser: Arc<dyn RdfParser>,
    ) -> &mut Self {
        self.parsers.insert(media_type.into(), parser);
        self
    }

    /// Register (or replace) a serializer
    pub fn register_serializer(
        &mut self,
        media_type: impl Into<MediaType>,
        serializer: Arc<dyn RdfSerializer>,
    ) -> &mut Self {
        self.serializers.insert(media_type.into(), serializer);
        self
    }

    /// Media types that can be parsed
    pub fn parser_media_types(&self) -> Vec<MediaType> {
        self.parsers.keys().cloned().collect()
    }
}

impl CodecRegistry for FormatRegistry {
    fn serializer_media_types(&self) -> Vec<MediaType> {
        self.serializers.keys().cloned().collect()
    }

    fn serialize(&self, media_type: &MediaType, graph: &Graph) -> SerializeResult<Vec<u8>> {
        let serializer = self
            .serializers
            .get(media_type)
            .ok_or_else(|| SerializeError::UnsupportedMediaType(media_type.to_string()))?;
        serializer.serialize(graph)
    }

    fn parse(&self, media_type: &MediaType, input: &[u8]) -> ParseResult<Graph> {
        self.parse_with_base(media_type, input, None)
    }

    fn parse_with_base(
        &self,
        media_type: &MediaType,
        input: &[u8],
        base_iri: Option<&str>,
    ) -> ParseResult<Graph> {
        let parser = self
            .parsers
            .get(media_type)
            .ok_or_else(|| ParseError::UnsupportedMediaType(media_type.to_string()))?;
        parser.parse_with_base(input, base_iri)
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("parsers", &self.parsers.keys().collect::<Vec<_>>())
            .field("serializers", &self.serializers.keys().collect::<Vec<_>>())
            .finish()
    }
}
