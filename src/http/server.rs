//! HTTP server for the demo graph endpoint

use super::handler::{get_graph, post_graph, put_graph, status_handler, SharedGraph};
use super::layer::{decode_graph, GraphCodec};
use crate::config::ServerConfig;
use crate::rdf::Graph;
use axum::middleware;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Build the application router.
///
/// Every route runs behind [`decode_graph`], so handlers can use the
/// [`RequestGraph`](super::RequestGraph) and [`SendGraph`](super::SendGraph) extractors.
pub fn router(store: SharedGraph, codec: GraphCodec) -> Router {
    Router::new()
        .route("/graph", get(get_graph).put(put_graph).post(post_graph))
        .route("/status", get(status_handler))
        .layer(middleware::from_fn_with_state(codec, decode_graph))
        .layer(CorsLayer::permissive())
        .with_state(store)
}

/// HTTP server holding one graph in memory
pub struct GraphServer {
    store: SharedGraph,
    config: ServerConfig,
}

impl GraphServer {
    /// Create a server with an empty graph
    pub fn new(config: ServerConfig) -> Self {
        Self::with_graph(Graph::new(), config)
    }

    /// Create a server seeded with `graph`
    pub fn with_graph(graph: Graph, config: ServerConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(graph)),
            config,
        }
    }

    pub fn store(&self) -> SharedGraph {
        Arc::clone(&self.store)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Start the HTTP server
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error>> {
        let codec = GraphCodec::with_default_formats(self.config.transcode.clone());
        let app = router(Arc::clone(&self.store), codec);

        let addr = self.config.bind_address();
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!("Graph endpoint available at http://{}/graph", addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}
