//! HTTP glue for axum
//!
//! - [`decode_graph`] middleware turns RDF request bodies into a [`RequestGraph`]
//! - [`SendGraph`] answers with a graph in the media type the client accepts
//! - [`GraphServer`] serves one in-memory graph at `/graph`

pub mod handler;
pub mod layer;
pub mod server;

pub use handler::SharedGraph;
pub use layer::{decode_graph, GraphCodec, HttpError, RequestContext, RequestGraph, SendGraph};
pub use server::{router, GraphServer};
