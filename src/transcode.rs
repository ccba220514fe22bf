//! Graph transcoding
//!
//! Decoding turns a request body into a graph with the parser registered for its
//! media type. Encoding negotiates a media type, fixes up the graph where the output
//! format demands it, and serializes.
//!
//! N-Triples cannot express relative IRI references, so graphs encoded as N-Triples
//! first have every relative named node resolved against the URI the client used to
//! reach the resource.

use crate::error::{TranscodeError, TranscodeResult};
use crate::media_type::MediaType;
use crate::negotiate::{negotiate, AcceptMatcher};
use crate::rdf::{CodecRegistry, Graph, ParseError, Term, Triple, TriplePosition};
use bytes::Bytes;
use oxiri::Iri;
use std::sync::Arc;
use tracing::{debug, trace};

const POSITIONS: [TriplePosition; 3] = [
    TriplePosition::Subject,
    TriplePosition::Predicate,
    TriplePosition::Object,
];

/// Request body as seen by the decoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// No body was sent
    Empty,
    /// Raw body bytes
    Bytes(Bytes),
}

impl RequestBody {
    /// Wrap raw bytes, treating a zero-length body as no body
    pub fn from_bytes(bytes: Bytes) -> Self {
        if bytes.is_empty() {
            RequestBody::Empty
        } else {
            RequestBody::Bytes(bytes)
        }
    }
}

/// Serialized graph together with the media type it was written in
#[derive(Debug, Clone)]
pub struct Encoded {
    pub media_type: MediaType,
    pub body: Bytes,
}

/// Decodes request bodies and encodes response graphs against a codec registry
#[derive(Clone)]
pub struct Transcoder {
    registry: Arc<dyn CodecRegistry>,
    default_media_type: Option<MediaType>,
}

impl Transcoder {
    /// Create a transcoder with no default media type
    pub fn new(registry: Arc<dyn CodecRegistry>) -> Self {
        Self {
            registry,
            default_media_type: None,
        }
    }

    /// Media type used when a request declares none, and the server preference when
    /// an encode call names none
    pub fn with_default_media_type(mut self, media_type: Option<MediaType>) -> Self {
        self.default_media_type = media_type;
        self
    }

    pub fn default_media_type(&self) -> Option<&MediaType> {
        self.default_media_type.as_ref()
    }

    pub fn registry(&self) -> &Arc<dyn CodecRegistry> {
        &self.registry
    }

    /// Decode a request body.
    ///
    /// Returns `Ok(None)` for an empty body without touching the registry.
    pub fn decode(
        &self,
        declared: Option<&MediaType>,
        body: &RequestBody,
    ) -> TranscodeResult<Option<Graph>> {
        self.decode_with_base(declared, body, None)
    }

    /// Decode a request body, resolving relative references in formats that allow
    /// them against `base_uri` (normally the request URI).
    pub fn decode_with_base(
        &self,
        declared: Option<&MediaType>,
        body: &RequestBody,
        base_uri: Option<&str>,
    ) -> TranscodeResult<Option<Graph>> {
        let bytes = match body {
            RequestBody::Empty => return Ok(None),
            RequestBody::Bytes(bytes) => bytes,
        };

        let media_type = declared
            .or(self.default_media_type.as_ref())
            .ok_or_else(|| TranscodeError::ParseFailed {
                media_type: "(none)".to_string(),
                source: ParseError::Parse(
                    "request has no Content-Type and no default media type is configured"
                        .to_string(),
                ),
            })?;

        let graph = self
            .registry
            .parse_with_base(media_type, bytes, base_uri)
            .map_err(|source| TranscodeError::ParseFailed {
                media_type: media_type.to_string(),
                source,
            })?;

        debug!(%media_type, triples = graph.len(), "decoded request graph");
        Ok(Some(graph))
    }

    /// Encode a graph for the client.
    ///
    /// `base_uri` is only called when the graph holds relative references that the
    /// negotiated format cannot carry.
    pub fn encode<F>(
        &self,
        graph: &Graph,
        preferred: Option<&MediaType>,
        client: &dyn AcceptMatcher,
        base_uri: F,
    ) -> TranscodeResult<Encoded>
    where
        F: FnOnce() -> String,
    {
        let preferred = preferred.or(self.default_media_type.as_ref());
        let available = self.registry.serializer_media_types();
        let media_type = negotiate(preferred, &available, client)?;

        let resolved;
        let graph = if media_type.is_n_triples() {
            resolved = resolve_relative_iris(graph, base_uri)?;
            &resolved
        } else {
            graph
        };

        let body = self
            .registry
            .serialize(&media_type, graph)
            .map_err(|source| TranscodeError::SerializeFailed {
                media_type: media_type.clone(),
                source,
            })?;

        debug!(%media_type, bytes = body.len(), "encoded response graph");
        Ok(Encoded {
            media_type,
            body: Bytes::from(body),
        })
    }
}

impl std::fmt::Debug for Transcoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transcoder")
            .field("default_media_type", &self.default_media_type)
            .finish_non_exhaustive()
    }
}

/// True for named nodes that are not `http://` or `https://` IRIs.
///
/// Any other scheme counts as relative too; `urn:` or `ftp://` identifiers are sent
/// through resolution.
pub fn needs_resolution(term: &Term) -> bool {
    term.as_named_node()
        .is_some_and(|node| !node.is_absolute_http())
}

/// Base IRI computed on first use
struct LazyBase<F> {
    init: Option<F>,
    iri: Option<Result<Iri<String>, String>>,
}

impl<F: FnOnce() -> String> LazyBase<F> {
    fn new(init: F) -> Self {
        Self {
            init: Some(init),
            iri: None,
        }
    }

    fn get(&mut self) -> Result<&Iri<String>, String> {
        let init = &mut self.init;
        self.iri
            .get_or_insert_with(|| {
                let raw = init.take().map(|f| f()).unwrap_or_default();
                Iri::parse(raw.clone()).map_err(|e| format!("invalid base IRI '{}': {}", raw, e))
            })
            .as_ref()
            .map_err(Clone::clone)
    }
}

/// Build a new graph where every relative named node is resolved against the base
/// IRI. Triples with nothing to resolve are shared with the input graph.
///
/// Any failure aborts the whole transform.
pub fn resolve_relative_iris<F>(graph: &Graph, base_uri: F) -> TranscodeResult<Graph>
where
    F: FnOnce() -> String,
{
    let mut base = LazyBase::new(base_uri);
    let mut resolved = Graph::with_capacity(graph.len());
    let mut rewritten = 0usize;

    for triple in graph {
        if !POSITIONS.iter().any(|p| needs_resolution(triple.get(*p))) {
            resolved.add_shared(Arc::clone(triple));
            continue;
        }

        let subject = resolve_position(triple, TriplePosition::Subject, &mut base)?;
        let predicate = resolve_position(triple, TriplePosition::Predicate, &mut base)?;
        let object = resolve_position(triple, TriplePosition::Object, &mut base)?;
        resolved.add(Triple::new(subject, predicate, object));
        rewritten += 1;
    }

    trace!(total = graph.len(), rewritten, "resolved relative IRIs");
    Ok(resolved)
}

fn resolve_position<F>(
    triple: &Triple,
    position: TriplePosition,
    base: &mut LazyBase<F>,
) -> TranscodeResult<Term>
where
    F: FnOnce() -> String,
{
    let term = triple.get(position);
    if !needs_resolution(term) {
        return Ok(term.clone());
    }

    let fail = |cause: String| TranscodeError::UriResolutionFailed {
        triple: triple.clone(),
        position,
        cause,
    };

    let relative = term.as_named_node().map(|n| n.as_str()).unwrap_or_default();
    let base_iri = base.get().map_err(fail)?;
    base_iri
        .resolve(relative)
        .map(|iri| Term::named(iri.into_inner()))
        .map_err(|e| fail(e.to_string()))
}
