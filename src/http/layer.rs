//! axum integration: body decoding middleware and graph extractors
//!
//! [`decode_graph`] runs before handlers. It decodes RDF request bodies into a
//! [`RequestGraph`] and records what the encode side needs later (accept header and
//! base URI) in a [`RequestContext`]. Handlers reply through [`SendGraph`].

use crate::config::TranscodeConfig;
use crate::error::TranscodeError;
use crate::media_type::MediaType;
use crate::negotiate::AcceptHeader;
use crate::rdf::{CodecRegistry, FormatRegistry, Graph};
use crate::transcode::{Encoded, RequestBody, Transcoder};
use axum::async_trait;
use axum::body::Body;
use axum::extract::{FromRequestParts, OriginalUri, Request, State};
use axum::http::header::{ACCEPT, CONTENT_TYPE, HOST, VARY};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http_body_util::LengthLimitError;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::ErrorResponse;

/// HTTP errors
#[derive(Error, Debug)]
pub enum HttpError {
    /// Request body over the configured limit
    #[error("Request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// Request body could not be read
    #[error("Failed to read request body: {0}")]
    Body(String),

    /// Extractor used on a route without the decoding middleware
    #[error("RDF transcoding middleware is not installed on this route")]
    MissingLayer,

    /// Handler expected a graph but the request had no body
    #[error("Request has no RDF body")]
    MissingGraph,

    /// Negotiation or transcoding failure
    #[error(transparent)]
    Transcode(#[from] TranscodeError),
}

impl HttpError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            HttpError::Body(_) => StatusCode::BAD_REQUEST,
            HttpError::MissingLayer => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::MissingGraph => StatusCode::BAD_REQUEST,
            HttpError::Transcode(e) => e.status_code(),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

/// Shared transcoding state, cloned into every request
#[derive(Clone, Debug)]
pub struct GraphCodec {
    transcoder: Transcoder,
    config: Arc<TranscodeConfig>,
}

impl GraphCodec {
    /// Create from a registry and configuration
    pub fn new(registry: Arc<dyn CodecRegistry>, config: TranscodeConfig) -> Self {
        let transcoder = Transcoder::new(registry).with_default_media_type(config.default_media_type());
        Self {
            transcoder,
            config: Arc::new(config),
        }
    }

    /// Create with the built-in formats
    pub fn with_default_formats(config: TranscodeConfig) -> Self {
        Self::new(Arc::new(FormatRegistry::with_default_formats()), config)
    }

    pub fn transcoder(&self) -> &Transcoder {
        &self.transcoder
    }

    pub fn config(&self) -> &TranscodeConfig {
        &self.config
    }
}

/// Graph decoded from the request body
#[derive(Debug, Clone)]
pub struct RequestGraph(pub Arc<Graph>);

#[async_trait]
impl<S> FromRequestParts<S> for RequestGraph
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestGraph>()
            .cloned()
            .ok_or(HttpError::MissingGraph)
    }
}

/// What the encode side needs to know about the request
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Client preferences
    pub accept: AcceptHeader,
    /// URI the client used: scheme, host and original path
    pub base_uri: String,
}

impl RequestContext {
    /// Build from request parts
    pub fn from_parts(parts: &Parts, config: &TranscodeConfig) -> Self {
        let accept = header_str(&parts.headers, ACCEPT.as_str())
            .map(AcceptHeader::parse)
            .unwrap_or_default();
        Self {
            accept,
            base_uri: base_uri(parts, config),
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Reconstruct the URI the client requested
fn base_uri(parts: &Parts, config: &TranscodeConfig) -> String {
    let uri = parts
        .extensions
        .get::<OriginalUri>()
        .map(|original| &original.0)
        .unwrap_or(&parts.uri);

    let forwarded = config
        .trust_forwarded_proto
        .then(|| header_str(&parts.headers, "x-forwarded-proto"))
        .flatten()
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    let scheme = forwarded
        .or(uri.scheme_str())
        .unwrap_or(config.scheme.as_str());

    let host = header_str(&parts.headers, HOST.as_str())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or("localhost");

    let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");

    format!("{}://{}{}", scheme, host, path)
}

/// Decoding middleware, installed with `axum::middleware::from_fn_with_state`.
///
/// Relative references in the body resolve against the request URI. An empty body
/// passes through with no [`RequestGraph`]. A body that fails to decode ends the
/// request with an error response.
pub async fn decode_graph(State(codec): State<GraphCodec>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let context = RequestContext::from_parts(&parts, &codec.config);
    let base_uri = context.base_uri.clone();
    parts.extensions.insert(context);
    parts.extensions.insert(codec.clone());

    // Already decoded by an outer layer
    if parts.extensions.get::<RequestGraph>().is_some() {
        return next.run(Request::from_parts(parts, body)).await;
    }

    let limit = codec.config.body_limit;
    let bytes = match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let err = if is_length_limit(&e) {
                HttpError::BodyTooLarge { limit }
            } else {
                HttpError::Body(e.to_string())
            };
            warn!(error = %err, "rejecting request body");
            return err.into_response();
        }
    };

    let declared = header_str(&parts.headers, CONTENT_TYPE.as_str()).map(MediaType::new);
    match codec
        .transcoder
        .decode_with_base(
            declared.as_ref(),
            &RequestBody::from_bytes(bytes.clone()),
            Some(&base_uri),
        )
    {
        Ok(Some(graph)) => {
            parts.extensions.insert(RequestGraph(Arc::new(graph)));
        }
        Ok(None) => debug!("empty request body, no graph attached"),
        Err(e) => {
            warn!(error = %e, "failed to decode request graph");
            return HttpError::from(e).into_response();
        }
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn is_length_limit(error: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = std::error::Error::source(error);
    while let Some(err) = source {
        if err.is::<LengthLimitError>() {
            return true;
        }
        source = err.source();
    }
    false
}

/// Responds with a graph in the negotiated media type
#[derive(Debug, Clone)]
pub struct SendGraph {
    codec: GraphCodec,
    context: RequestContext,
}

impl SendGraph {
    /// Encode `graph`. `preferred` overrides the configured default media type.
    pub fn send(&self, graph: &Graph, preferred: Option<&str>) -> Result<Response, HttpError> {
        let preferred = preferred.map(MediaType::new);
        let base_uri = &self.context.base_uri;
        let encoded = self
            .codec
            .transcoder
            .encode(graph, preferred.as_ref(), &self.context.accept, || base_uri.clone())
            .inspect_err(|e| warn!(error = %e, "failed to encode response graph"))?;
        Ok(encoded.into_response())
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SendGraph
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let codec = parts
            .extensions
            .get::<GraphCodec>()
            .cloned()
            .ok_or(HttpError::MissingLayer)?;
        let context = parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or(HttpError::MissingLayer)?;
        Ok(Self { codec, context })
    }
}

impl IntoResponse for Encoded {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        if let Ok(value) = HeaderValue::from_str(self.media_type.as_str()) {
            response.headers_mut().insert(CONTENT_TYPE, value);
        }
        response
            .headers_mut()
            .insert(VARY, HeaderValue::from_static("accept"));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    fn parts(uri: &str, headers: &[(&str, &str)]) -> Parts {
        let mut builder = HttpRequest::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_base_uri_from_host_and_path() {
        let config = TranscodeConfig::default();
        let parts = parts("/people/alice?rev=2", &[("host", "example.org:8080")]);
        assert_eq!(base_uri(&parts, &config), "http://example.org:8080/people/alice?rev=2");
    }

    #[test]
    fn test_base_uri_prefers_original_uri() {
        let config = TranscodeConfig::default();
        let mut parts = parts("/alice", &[("host", "example.org")]);
        parts
            .extensions
            .insert(OriginalUri("/api/people/alice".parse().unwrap()));
        assert_eq!(base_uri(&parts, &config), "http://example.org/api/people/alice");
    }

    #[test]
    fn test_forwarded_proto_only_when_trusted() {
        let parts = parts("/a", &[("host", "example.org"), ("x-forwarded-proto", "https, http")]);

        let config = TranscodeConfig::default();
        assert_eq!(base_uri(&parts, &config), "http://example.org/a");

        let config = TranscodeConfig {
            trust_forwarded_proto: true,
            ..TranscodeConfig::default()
        };
        assert_eq!(base_uri(&parts, &config), "https://example.org/a");
    }

    #[test]
    fn test_configured_scheme_and_missing_host() {
        let config = TranscodeConfig {
            scheme: "https".to_string(),
            ..TranscodeConfig::default()
        };
        let parts = parts("/a", &[]);
        assert_eq!(base_uri(&parts, &config), "https://localhost/a");
    }

    #[test]
    fn test_context_reads_accept() {
        let parts = parts("/a", &[("accept", "text/turtle")]);
        let context = RequestContext::from_parts(&parts, &TranscodeConfig::default());
        assert_eq!(context.accept.quality(&MediaType::new("text/turtle")), 1.0);
        assert_eq!(context.accept.quality(&MediaType::new("application/n-triples")), 0.0);

        let parts = self::parts("/a", &[]);
        let context = RequestContext::from_parts(&parts, &TranscodeConfig::default());
        assert_eq!(context.accept.quality(&MediaType::new("application/n-triples")), 1.0);
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(
            HttpError::BodyTooLarge { limit: 1 }.status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(HttpError::MissingLayer.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let err: HttpError = TranscodeError::NotAcceptable { offered: vec![] }.into();
        assert_eq!(err.status_code(), StatusCode::NOT_ACCEPTABLE);
    }
}
