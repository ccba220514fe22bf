//! Conversions between crate triples and the borrowed `rio_api` model

use super::{ParseError, ParseResult, SerializeError, SerializeResult};
use crate::rdf::{BlankNode, Graph, Literal, Term, Triple, XSD_STRING};
use rio_api::formatter::TriplesFormatter;
use rio_api::model;
use rio_api::parser::TriplesParser;

/// Collect every triple produced by a rio parser into a graph
pub(super) fn collect_triples<P>(parser: &mut P) -> ParseResult<Graph>
where
    P: TriplesParser,
    ParseError: From<P::Error>,
{
    let mut graph = Graph::new();
    parser.parse_all(&mut |t| -> ParseResult<()> {
        graph.add(from_rio(&t)?);
        Ok(())
    })?;
    Ok(graph)
}

/// Feed every triple of a graph to a rio formatter
pub(super) fn format_triples<F>(formatter: &mut F, graph: &Graph) -> SerializeResult<()>
where
    F: TriplesFormatter<Error = std::io::Error>,
{
    for triple in graph {
        let subject = subject_to_rio(&triple.subject)?;
        let predicate = named_to_rio(&triple.predicate)?;
        let object = term_to_rio(&triple.object);
        formatter.format(&model::Triple {
            subject,
            predicate,
            object,
        })?;
    }
    Ok(())
}

fn subject_to_rio(term: &Term) -> SerializeResult<model::Subject<'_>> {
    match term {
        Term::NamedNode(n) => Ok(model::Subject::NamedNode(model::NamedNode { iri: n.as_str() })),
        Term::BlankNode(b) => Ok(model::Subject::BlankNode(model::BlankNode { id: b.as_str() })),
        Term::Literal(l) => Err(SerializeError::Serialize(format!(
            "literal {} cannot be a subject",
            l
        ))),
    }
}

fn named_to_rio(term: &Term) -> SerializeResult<model::NamedNode<'_>> {
    match term {
        Term::NamedNode(n) => Ok(model::NamedNode { iri: n.as_str() }),
        other => Err(SerializeError::Serialize(format!(
            "{} cannot be a predicate",
            other
        ))),
    }
}

fn term_to_rio(term: &Term) -> model::Term<'_> {
    match term {
        Term::NamedNode(n) => model::Term::NamedNode(model::NamedNode { iri: n.as_str() }),
        Term::BlankNode(b) => model::Term::BlankNode(model::BlankNode { id: b.as_str() }),
        Term::Literal(l) => model::Term::Literal(literal_to_rio(l)),
    }
}

fn literal_to_rio(l: &Literal) -> model::Literal<'_> {
    if let Some(language) = l.language() {
        model::Literal::LanguageTaggedString {
            value: l.value(),
            language,
        }
    } else if l.datatype() == XSD_STRING {
        model::Literal::Simple { value: l.value() }
    } else {
        model::Literal::Typed {
            value: l.value(),
            datatype: model::NamedNode { iri: l.datatype() },
        }
    }
}

fn from_rio(t: &model::Triple<'_>) -> ParseResult<Triple> {
    let subject = match t.subject {
        model::Subject::NamedNode(n) => Term::named(n.iri),
        model::Subject::BlankNode(b) => blank(b.id)?,
        #[allow(unreachable_patterns)]
        _ => return Err(ParseError::Parse("Unsupported subject type".to_string())),
    };
    let predicate = Term::named(t.predicate.iri);
    let object = match t.object {
        model::Term::NamedNode(n) => Term::named(n.iri),
        model::Term::BlankNode(b) => blank(b.id)?,
        model::Term::Literal(l) => Term::Literal(literal_from_rio(l)?),
        #[allow(unreachable_patterns)]
        _ => return Err(ParseError::Parse("Unsupported object type".to_string())),
    };
    Ok(Triple::new(subject, predicate, object))
}

fn blank(id: &str) -> ParseResult<Term> {
    BlankNode::from_str(id)
        .map(Term::BlankNode)
        .map_err(|e| ParseError::Parse(e.to_string()))
}

fn literal_from_rio(l: model::Literal<'_>) -> ParseResult<Literal> {
    match l {
        model::Literal::Simple { value } => Ok(Literal::new_simple_literal(value)),
        model::Literal::LanguageTaggedString { value, language } => {
            Literal::new_language_tagged_literal(value, language)
                .map_err(|e| ParseError::Parse(e.to_string()))
        }
        model::Literal::Typed { value, datatype } => Literal::new_typed_literal(value, datatype.iri)
            .map_err(|e| ParseError::Parse(e.to_string())),
    }
}
