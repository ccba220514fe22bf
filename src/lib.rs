//! Samyama RDF HTTP
//!
//! Content-negotiated RDF transcoding for HTTP services. Request bodies in any
//! registered RDF media type are decoded into a [`Graph`](rdf::Graph); response
//! graphs are encoded in the media type the client accepts.
//!
//! # Components
//!
//! - [`negotiate`]: picks the response media type from the server's preference and
//!   the client's `Accept` header
//! - [`transcode`]: decode and encode paths, including resolution of relative IRIs
//!   against the request URI for N-Triples output
//! - [`rdf`]: the graph model and the N-Triples, Turtle, RDF/XML and JSON-LD codecs
//! - [`http`]: axum middleware and extractors
//!
//! ## Example Usage
//!
//! ```rust
//! use samyama_rdf_http::negotiate::AcceptHeader;
//! use samyama_rdf_http::rdf::{FormatRegistry, Graph, NamedNode, Triple};
//! use samyama_rdf_http::transcode::Transcoder;
//! use std::sync::Arc;
//!
//! let transcoder = Transcoder::new(Arc::new(FormatRegistry::with_default_formats()));
//!
//! let mut graph = Graph::new();
//! graph.add(Triple::new(
//!     NamedNode::new("/people/alice"),
//!     NamedNode::new("http://xmlns.com/foaf/0.1/knows"),
//!     NamedNode::new("/people/bob"),
//! ));
//!
//! let accept = AcceptHeader::parse("application/n-triples");
//! let encoded = transcoder
//!     .encode(&graph, None, &accept, || "http://example.org/people".to_string())
//!     .unwrap();
//!
//! assert_eq!(encoded.media_type.as_str(), "application/n-triples");
//! let body = std::str::from_utf8(&encoded.body).unwrap();
//! assert!(body.contains("<http://example.org/people/alice>"));
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod http;
pub mod media_type;
pub mod negotiate;
pub mod rdf;
pub mod transcode;

// Re-export main types for convenience
pub use config::{ConfigError, ConfigResult, ServerConfig, TranscodeConfig};

pub use error::{ErrorResponse, TranscodeError, TranscodeResult};

pub use http::{
    decode_graph, router, GraphCodec, GraphServer, HttpError, RequestContext, RequestGraph,
    SendGraph,
};

pub use media_type::MediaType;

pub use negotiate::{negotiate, AcceptHeader, AcceptMatcher};

pub use transcode::{resolve_relative_iris, Encoded, RequestBody, Transcoder};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.1.0");
    }
}
