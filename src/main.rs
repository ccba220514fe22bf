use samyama_rdf_http::rdf::{Graph, Literal, NamedNode, Triple};
use samyama_rdf_http::{GraphServer, ServerConfig};

const FOAF_NAME: &str = "http://xmlns.com/foaf/0.1/name";
const FOAF_KNOWS: &str = "http://xmlns.com/foaf/0.1/knows";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("Samyama RDF HTTP v{}", samyama_rdf_http::version());
    println!("==========================================");
    println!();

    let config = match std::env::args().nth(1) {
        Some(path) => ServerConfig::from_file(&path)?,
        None => ServerConfig::default(),
    };

    let server = GraphServer::with_graph(seed_graph(), config);

    println!("Try:");
    println!("  curl -H 'Accept: text/turtle' http://localhost:{}/graph", server_port(&server));
    println!("  curl -H 'Accept: application/n-triples' http://localhost:{}/graph", server_port(&server));
    println!();

    server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}

fn server_port(server: &GraphServer) -> u16 {
    server.config().port
}

/// Two people with relative identifiers, resolved per request for N-Triples
fn seed_graph() -> Graph {
    let mut graph = Graph::new();
    graph.add(Triple::new(
        NamedNode::new("/people/alice"),
        NamedNode::new(FOAF_NAME),
        Literal::new_simple_literal("Alice"),
    ));
    graph.add(Triple::new(
        NamedNode::new("/people/bob"),
        NamedNode::new(FOAF_NAME),
        Literal::new_simple_literal("Bob"),
    ));
    graph.add(Triple::new(
        NamedNode::new("/people/alice"),
        NamedNode::new(FOAF_KNOWS),
        NamedNode::new("/people/bob"),
    ));
    graph
}
