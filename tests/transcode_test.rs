use samyama_rdf_http::negotiate::AcceptHeader;
use samyama_rdf_http::rdf::{
    CodecRegistry, FormatRegistry, Graph, Literal, NamedNode, RdfFormat, RdfSerializer,
    SerializeResult, Triple,
};
use samyama_rdf_http::transcode::RequestBody;
use samyama_rdf_http::{MediaType, ServerConfig, TranscodeError, Transcoder};
use std::io::Write;
use std::sync::Arc;

fn people() -> Graph {
    let mut graph = Graph::new();
    graph.add(Triple::new(
        NamedNode::new("alice"),
        NamedNode::new("http://xmlns.com/foaf/0.1/knows"),
        NamedNode::new("../bob"),
    ));
    graph.add(Triple::new(
        NamedNode::new("alice"),
        NamedNode::new("http://xmlns.com/foaf/0.1/name"),
        Literal::new_language_tagged_literal("Alice", "en").unwrap(),
    ));
    graph
}

#[test]
fn test_turtle_to_ntriples_pipeline() {
    let transcoder = Transcoder::new(Arc::new(FormatRegistry::with_default_formats()));

    let turtle = b"@prefix ex: <http://example.org/> .\nex:a ex:p ex:b, ex:c .\n";
    let graph = transcoder
        .decode(
            Some(&MediaType::new("text/turtle")),
            &RequestBody::from_bytes(turtle.to_vec().into()),
        )
        .unwrap()
        .unwrap();
    assert_eq!(graph.len(), 2);

    let encoded = transcoder
        .encode(&graph, None, &AcceptHeader::parse("application/n-triples"), || {
            panic!("absolute graph needs no base")
        })
        .unwrap();
    let text = std::str::from_utf8(&encoded.body).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("<http://example.org/a> <http://example.org/p> <http://example.org/c> ."));
}

#[test]
fn test_relative_references_resolve_against_request_path() {
    let transcoder = Transcoder::new(Arc::new(FormatRegistry::with_default_formats()));

    let encoded = transcoder
        .encode(
            &people(),
            None,
            &AcceptHeader::parse("application/n-triples"),
            || "http://example.org/people/index".to_string(),
        )
        .unwrap();
    let text = std::str::from_utf8(&encoded.body).unwrap();
    assert!(text.contains(
        "<http://example.org/people/alice> <http://xmlns.com/foaf/0.1/knows> <http://example.org/bob> ."
    ));
    assert!(text.contains("\"Alice\"@en"));
}

#[test]
fn test_rdfxml_roundtrip_through_transcoder() {
    let transcoder = Transcoder::new(Arc::new(FormatRegistry::with_default_formats()));
    let mut graph = Graph::new();
    graph.add(Triple::new(
        NamedNode::new("http://example.org/a"),
        NamedNode::new("http://example.org/p"),
        Literal::new_simple_literal("value"),
    ));

    let encoded = transcoder
        .encode(&graph, None, &AcceptHeader::parse("application/rdf+xml"), String::new)
        .unwrap();
    assert_eq!(encoded.media_type.as_str(), "application/rdf+xml");

    let decoded = transcoder
        .decode(
            Some(&encoded.media_type),
            &RequestBody::from_bytes(encoded.body.clone()),
        )
        .unwrap()
        .unwrap();
    assert_eq!(decoded, graph);
}

struct Summary;

impl RdfSerializer for Summary {
    fn serialize(&self, graph: &Graph) -> SerializeResult<Vec<u8>> {
        Ok(format!("{} triples", graph.len()).into_bytes())
    }
}

#[test]
fn test_custom_serializer_participates_in_negotiation() {
    let mut registry = FormatRegistry::new();
    registry
        .register_format(RdfFormat::Turtle)
        .register_serializer("text/plain", Arc::new(Summary));
    let transcoder = Transcoder::new(Arc::new(registry));

    let encoded = transcoder
        .encode(&people(), None, &AcceptHeader::parse("text/plain"), String::new)
        .unwrap();
    assert_eq!(&encoded.body[..], b"2 triples");

    let err = transcoder
        .encode(
            &people(),
            None,
            &AcceptHeader::parse("application/n-triples"),
            String::new,
        )
        .unwrap_err();
    match err {
        TranscodeError::NotAcceptable { offered } => {
            assert_eq!(offered, vec![MediaType::new("text/turtle"), MediaType::new("text/plain")]);
        }
        other => panic!("Expected NotAcceptable, got {:?}", other),
    }
}

#[test]
fn test_registry_trait_object() {
    let registry: Arc<dyn CodecRegistry> = Arc::new(FormatRegistry::with_default_formats());
    let graph = registry
        .parse(
            &MediaType::new("application/n-triples"),
            b"<http://example.org/a> <http://example.org/p> \"x\" .\n",
        )
        .unwrap();
    assert_eq!(graph.len(), 1);
}

#[test]
fn test_server_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "address: 127.0.0.1").unwrap();
    writeln!(file, "port: 3030").unwrap();
    writeln!(file, "transcode:").unwrap();
    writeln!(file, "  default_media_type: text/turtle").unwrap();
    writeln!(file, "  body_limit: 1024").unwrap();

    let config = ServerConfig::from_file(file.path()).unwrap();
    assert_eq!(config.bind_address(), "127.0.0.1:3030");
    assert_eq!(config.transcode.body_limit, 1024);
    assert_eq!(
        config.transcode.default_media_type(),
        Some(MediaType::new("text/turtle"))
    );
}
