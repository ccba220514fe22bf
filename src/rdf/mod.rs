//! RDF data model and codecs
//!
//! This module provides the minimal graph shape the transcoder works on:
//! - Terms (named nodes, blank nodes, literals)
//! - Triples (subject-predicate-object), shared behind `Arc`
//! - Graphs (unordered collections of triples)
//! - Parsers and serializers for N-Triples, Turtle, RDF/XML and JSON-LD
//!
//! # Example
//!
//! ```rust
//! use samyama_rdf_http::rdf::{CodecRegistry, FormatRegistry, Graph, Literal, NamedNode, Triple};
//! use samyama_rdf_http::MediaType;
//!
//! let mut graph = Graph::new();
//! graph.add(Triple::new(
//!     NamedNode::new("http://example.org/alice"),
//!     NamedNode::new("http://xmlns.com/foaf/0.1/name"),
//!     Literal::new_simple_literal("Alice"),
//! ));
//!
//! let registry = FormatRegistry::with_default_formats();
//! let bytes = registry.serialize(&MediaType::new("text/turtle"), &graph).unwrap();
//! assert!(!bytes.is_empty());
//! ```

mod graph;
mod serialization;
mod types;

pub use types::{
    BlankNode, Literal, NamedNode, RdfError, RdfResult, Term, Triple, TriplePosition, XSD_STRING,
};

pub use graph::Graph;

pub use serialization::{
    CodecRegistry, FormatRegistry, ParseError, ParseResult, RdfFormat, RdfParser, RdfSerializer,
    SerializeError, SerializeResult,
};
