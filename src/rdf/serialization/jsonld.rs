//! JSON-LD format implementation (expanded form)
//!
//! Only expanded documents are understood: no `@context`, compact IRIs or framing.

use super::{ParseError, ParseResult, RdfParser, RdfSerializer, SerializeError, SerializeResult};
use crate::rdf::{BlankNode, Graph, Literal, Term, Triple};
use indexmap::IndexMap;
use serde_json::{json, Map, Value};

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";

/// JSON-LD parser
pub struct JsonLdParserWrapper;

impl RdfParser for JsonLdParserWrapper {
    fn parse(&self, input: &[u8]) -> ParseResult<Graph> {
        let document: Value =
            serde_json::from_slice(input).map_err(|e| ParseError::Parse(e.to_string()))?;

        let mut graph = Graph::new();
        for node in top_level_nodes(&document)? {
            parse_node(node, &mut graph)?;
        }
        Ok(graph)
    }
}

fn top_level_nodes(document: &Value) -> ParseResult<Vec<&Map<String, Value>>> {
    let items: Vec<&Value> = match document {
        Value::Array(items) => items.iter().collect(),
        Value::Object(obj) => match obj.get("@graph") {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(_) => return Err(ParseError::Parse("@graph must be an array".to_string())),
            None => vec![document],
        },
        _ => {
            return Err(ParseError::Parse(
                "JSON-LD document must be an object or an array".to_string(),
            ))
        }
    };

    items
        .into_iter()
        .map(|item| {
            item.as_object()
                .ok_or_else(|| ParseError::Parse("node must be a JSON object".to_string()))
        })
        .collect()
}

/// Emit the triples of a node object and return the term naming it
fn parse_node(node: &Map<String, Value>, graph: &mut Graph) -> ParseResult<Term> {
    if node.contains_key("@context") {
        return Err(ParseError::Parse(
            "@context is not supported, send expanded JSON-LD".to_string(),
        ));
    }

    let subject = match node.get("@id") {
        Some(Value::String(id)) => id_to_term(id)?,
        Some(_) => return Err(ParseError::Parse("@id must be a string".to_string())),
        None => Term::BlankNode(BlankNode::new()),
    };

    for (key, values) in node {
        match key.as_str() {
            "@id" => {}
            "@type" => {
                for value in as_list(values) {
                    let type_iri = value
                        .as_str()
                        .ok_or_else(|| ParseError::Parse("@type must be a string".to_string()))?;
                    graph.add(Triple::new(
                        subject.clone(),
                        Term::named(RDF_TYPE),
                        id_to_term(type_iri)?,
                    ));
                }
            }
            k if k.starts_with('@') => {
                return Err(ParseError::Parse(format!("unsupported keyword {}", k)));
            }
            predicate => {
                for value in as_list(values) {
                    let object = parse_value(value, graph)?;
                    graph.add(Triple::new(subject.clone(), Term::named(predicate), object));
                }
            }
        }
    }

    Ok(subject)
}

fn parse_value(value: &Value, graph: &mut Graph) -> ParseResult<Term> {
    match value {
        Value::String(s) => Ok(Term::Literal(Literal::new_simple_literal(s.as_str()))),
        Value::Bool(b) => typed(&b.to_string(), XSD_BOOLEAN),
        Value::Number(n) if n.is_i64() || n.is_u64() => typed(&n.to_string(), XSD_INTEGER),
        Value::Number(n) => typed(&n.to_string(), XSD_DOUBLE),
        Value::Object(obj) => {
            if let Some(literal) = obj.get("@value") {
                parse_value_object(literal, obj)
            } else {
                parse_node(obj, graph)
            }
        }
        Value::Null | Value::Array(_) => {
            Err(ParseError::Parse(format!("unsupported property value {}", value)))
        }
    }
}

fn parse_value_object(literal: &Value, obj: &Map<String, Value>) -> ParseResult<Term> {
    let lexical = match literal {
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) => literal.to_string(),
        _ => return Err(ParseError::Parse("@value must be a scalar".to_string())),
    };

    let literal = if let Some(language) = obj.get("@language").and_then(Value::as_str) {
        Literal::new_language_tagged_literal(lexical, language)
    } else if let Some(datatype) = obj.get("@type").and_then(Value::as_str) {
        Literal::new_typed_literal(lexical, datatype)
    } else {
        Ok(Literal::new_simple_literal(lexical))
    };
    literal
        .map(Term::Literal)
        .map_err(|e| ParseError::Parse(e.to_string()))
}

fn typed(lexical: &str, datatype: &str) -> ParseResult<Term> {
    Literal::new_typed_literal(lexical, datatype)
        .map(Term::Literal)
        .map_err(|e| ParseError::Parse(e.to_string()))
}

fn id_to_term(id: &str) -> ParseResult<Term> {
    match id.strip_prefix("_:") {
        Some(label) => BlankNode::from_str(label)
            .map(Term::BlankNode)
            .map_err(|e| ParseError::Parse(e.to_string())),
        None => Ok(Term::named(id)),
    }
}

fn as_list(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

/// JSON-LD serializer
pub struct JsonLdSerializerWrapper;

impl RdfSerializer for JsonLdSerializerWrapper {
    /// Writes expanded JSON-LD: one node object per subject, in first-seen order.
    fn serialize(&self, graph: &Graph) -> SerializeResult<Vec<u8>> {
        let mut nodes: IndexMap<String, IndexMap<String, Vec<Value>>> = IndexMap::new();

        for triple in graph {
            let subject = match &triple.subject {
                Term::NamedNode(n) => n.as_str().to_string(),
                Term::BlankNode(b) => b.to_string(),
                Term::Literal(l) => {
                    return Err(SerializeError::Serialize(format!(
                        "literal {} cannot be a subject",
                        l
                    )))
                }
            };

            let predicate = triple
                .predicate
                .as_named_node()
                .ok_or_else(|| {
                    SerializeError::Serialize(format!("{} cannot be a predicate", triple.predicate))
                })?
                .as_str()
                .to_string();

            let object = match &triple.object {
                Term::NamedNode(n) => json!({ "@id": n.as_str() }),
                Term::BlankNode(b) => json!({ "@id": b.to_string() }),
                Term::Literal(l) => {
                    if let Some(lang) = l.language() {
                        json!({ "@value": l.value(), "@language": lang })
                    } else if l.is_plain() {
                        json!({ "@value": l.value() })
                    } else {
                        json!({ "@value": l.value(), "@type": l.datatype() })
                    }
                }
            };

            nodes
                .entry(subject)
                .or_default()
                .entry(predicate)
                .or_default()
                .push(object);
        }

        let output: Vec<Value> = nodes
            .into_iter()
            .map(|(subject, props)| {
                let mut node = Map::new();
                node.insert("@id".to_string(), Value::String(subject));
                for (predicate, objects) in props {
                    node.insert(predicate, Value::Array(objects));
                }
                Value::Object(node)
            })
            .collect();

        serde_json::to_vec_pretty(&output).map_err(|e| SerializeError::Serialize(e.to_string()))
    }
}
