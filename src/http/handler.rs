//! HTTP handlers for the demo graph endpoint

use super::layer::{GraphCodec, HttpError, RequestGraph, SendGraph};
use crate::rdf::Graph;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Shared in-memory graph
pub type SharedGraph = Arc<RwLock<Graph>>;

/// Response for the status endpoint
#[derive(Serialize)]
pub struct StatusResponse {
    status: String,
    version: String,
    triples: usize,
    serializers: Vec<String>,
}

/// GET /graph: the stored graph in the negotiated media type
pub async fn get_graph(
    State(store): State<SharedGraph>,
    send: SendGraph,
) -> Result<Response, HttpError> {
    let graph = store.read().await;
    send.send(&graph, None)
}

/// PUT /graph: replace the stored graph
pub async fn put_graph(
    State(store): State<SharedGraph>,
    RequestGraph(graph): RequestGraph,
) -> StatusCode {
    let mut store = store.write().await;
    *store = graph.as_ref().clone();
    info!(triples = store.len(), "graph replaced");
    StatusCode::NO_CONTENT
}

/// POST /graph: add the request triples to the stored graph
pub async fn post_graph(
    State(store): State<SharedGraph>,
    RequestGraph(graph): RequestGraph,
) -> StatusCode {
    let mut store = store.write().await;
    for triple in graph.iter() {
        store.add_shared(Arc::clone(triple));
    }
    info!(added = graph.len(), triples = store.len(), "graph extended");
    StatusCode::NO_CONTENT
}

/// GET /status
pub async fn status_handler(
    State(store): State<SharedGraph>,
    Extension(codec): Extension<GraphCodec>,
) -> impl IntoResponse {
    let registry = codec.transcoder().registry();
    let response = StatusResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        triples: store.read().await.len(),
        serializers: registry
            .serializer_media_types()
            .iter()
            .map(|m| m.to_string())
            .collect(),
    };
    Json(response)
}
