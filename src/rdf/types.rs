//! RDF type definitions
//!
//! Blank nodes and literals wrap the oxrdf primitives. Named nodes keep their raw
//! identifier because graphs handed to the transcoder may carry relative references
//! that only become valid IRIs once resolved against a request URI.

use oxrdf::{
    BlankNode as OxBlankNode,
    Literal as OxLiteral,
    NamedNode as OxNamedNode,
};
use std::fmt;
use thiserror::Error;

/// RDF errors
#[derive(Error, Debug)]
pub enum RdfError {
    /// Invalid blank node
    #[error("Invalid blank node: {0}")]
    InvalidBlankNode(String),

    /// Invalid literal
    #[error("Invalid literal: {0}")]
    InvalidLiteral(String),
}

pub type RdfResult<T> = Result<T, RdfError>;

/// Named node (IRI or relative IRI reference)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedNode(String);

impl NamedNode {
    /// Create a named node from an identifier. Relative references are allowed.
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    /// Get the identifier string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identifier starts with `http://` or `https://`, ignoring case.
    ///
    /// Other absolute schemes (`urn:`, `ftp://`, ...) report false.
    pub fn is_absolute_http(&self) -> bool {
        has_prefix_ignore_case(&self.0, "http://") || has_prefix_ignore_case(&self.0, "https://")
    }
}

fn has_prefix_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

impl fmt::Display for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.as_str())
    }
}

/// Blank node (anonymous node)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlankNode(OxBlankNode);

impl BlankNode {
    /// Create a new blank node with a unique identifier
    pub fn new() -> Self {
        Self(OxBlankNode::default())
    }

    /// Create a blank node from a string identifier
    pub fn from_str(s: &str) -> RdfResult<Self> {
        OxBlankNode::new(s)
            .map(Self)
            .map_err(|e| RdfError::InvalidBlankNode(e.to_string()))
    }

    /// Get the blank node identifier
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for BlankNode {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.as_str())
    }
}

/// XSD string datatype, implied by simple literals
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// RDF literal value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal(OxLiteral);

impl Literal {
    /// Create a simple literal (plain string)
    pub fn new_simple_literal(value: impl Into<String>) -> Self {
        Self(OxLiteral::new_simple_literal(value))
    }

    /// Create a literal with language tag
    pub fn new_language_tagged_literal(
        value: impl Into<String>,
        language: impl Into<String>,
    ) -> RdfResult<Self> {
        OxLiteral::new_language_tagged_literal(value, language)
            .map(Self)
            .map_err(|e| RdfError::InvalidLiteral(e.to_string()))
    }

    /// Create a typed literal. The datatype must be an absolute IRI.
    pub fn new_typed_literal(value: impl Into<String>, datatype: &str) -> RdfResult<Self> {
        let datatype =
            OxNamedNode::new(datatype).map_err(|e| RdfError::InvalidLiteral(e.to_string()))?;
        Ok(Self(OxLiteral::new_typed_literal(value, datatype)))
    }

    /// Get the lexical value
    pub fn value(&self) -> &str {
        self.0.value()
    }

    /// Get the language tag if present
    pub fn language(&self) -> Option<&str> {
        self.0.language()
    }

    /// Get the datatype IRI
    pub fn datatype(&self) -> &str {
        self.0.datatype().as_str()
    }

    /// True for plain `xsd:string` literals without a language tag
    pub fn is_plain(&self) -> bool {
        self.language().is_none() && self.datatype() == XSD_STRING
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(lang) = self.language() {
            write!(f, "\"{}\"@{}", self.value(), lang)
        } else {
            write!(f, "\"{}\"^^<{}>", self.value(), self.datatype())
        }
    }
}

/// RDF term. Every triple position holds one, so predicates and subjects are not
/// narrowed to the kinds a strict RDF 1.1 graph would allow.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// Named node (IRI)
    NamedNode(NamedNode),
    /// Blank node
    BlankNode(BlankNode),
    /// Literal value
    Literal(Literal),
}

impl Term {
    /// Shorthand for a named node term
    pub fn named(iri: impl Into<String>) -> Self {
        Term::NamedNode(NamedNode::new(iri))
    }

    /// Check if this is a named node
    pub fn is_named_node(&self) -> bool {
        matches!(self, Term::NamedNode(_))
    }

    /// Check if this is a blank node
    pub fn is_blank_node(&self) -> bool {
        matches!(self, Term::BlankNode(_))
    }

    /// Check if this is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal(_))
    }

    /// The named node, if this term is one
    pub fn as_named_node(&self) -> Option<&NamedNode> {
        match self {
            Term::NamedNode(n) => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::NamedNode(n) => write!(f, "{}", n),
            Term::BlankNode(b) => write!(f, "{}", b),
            Term::Literal(l) => write!(f, "{}", l),
        }
    }
}

impl From<NamedNode> for Term {
    fn from(node: NamedNode) -> Self {
        Term::NamedNode(node)
    }
}

impl From<BlankNode> for Term {
    fn from(node: BlankNode) -> Self {
        Term::BlankNode(node)
    }
}

impl From<Literal> for Term {
    fn from(lit: Literal) -> Self {
        Term::Literal(lit)
    }
}

/// Position of a term within a triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriplePosition {
    Subject,
    Predicate,
    Object,
}

impl fmt::Display for TriplePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriplePosition::Subject => f.write_str("subject"),
            TriplePosition::Predicate => f.write_str("predicate"),
            TriplePosition::Object => f.write_str("object"),
        }
    }
}

/// RDF triple (subject-predicate-object)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    /// Subject
    pub subject: Term,
    /// Predicate
    pub predicate: Term,
    /// Object
    pub object: Term,
}

impl Triple {
    /// Create a new triple
    pub fn new(subject: impl Into<Term>, predicate: impl Into<Term>, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    /// Get the term at a position
    pub fn get(&self, position: TriplePosition) -> &Term {
        match position {
            TriplePosition::Subject => &self.subject,
            TriplePosition::Predicate => &self.predicate,
            TriplePosition::Object => &self.object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_node_allows_relative() {
        let node = NamedNode::new("/foo");
        assert_eq!(node.as_str(), "/foo");
        assert_eq!(node.to_string(), "</foo>");
    }

    #[test]
    fn test_absolute_http_check() {
        assert!(NamedNode::new("http://example.org/a").is_absolute_http());
        assert!(NamedNode::new("HTTPS://example.org/a").is_absolute_http());
        assert!(NamedNode::new("HtTp://example.org/a").is_absolute_http());
        assert!(!NamedNode::new("/a").is_absolute_http());
        assert!(!NamedNode::new("http:/a").is_absolute_http());
        assert!(!NamedNode::new("").is_absolute_http());
        // Absolute, but not http(s)
        assert!(!NamedNode::new("urn:isbn:0451450523").is_absolute_http());
        assert!(!NamedNode::new("ftp://example.org/file").is_absolute_http());
    }

    #[test]
    fn test_blank_node() {
        let node1 = BlankNode::new();
        let node2 = BlankNode::new();
        assert_ne!(node1, node2);
        assert_eq!(BlankNode::from_str("b0").unwrap().to_string(), "_:b0");
    }

    #[test]
    fn test_literal() {
        let lit = Literal::new_simple_literal("Alice");
        assert_eq!(lit.value(), "Alice");
        assert!(lit.is_plain());

        let lit = Literal::new_language_tagged_literal("Alice", "en").unwrap();
        assert_eq!(lit.language(), Some("en"));
        assert!(!lit.is_plain());

        let lit = Literal::new_typed_literal("42", "http://www.w3.org/2001/XMLSchema#integer").unwrap();
        assert_eq!(lit.datatype(), "http://www.w3.org/2001/XMLSchema#integer");
        assert!(Literal::new_typed_literal("42", "integer").is_err());
    }

    #[test]
    fn test_triple_positions() {
        let triple = Triple::new(
            NamedNode::new("/alice"),
            NamedNode::new("http://xmlns.com/foaf/0.1/name"),
            Literal::new_simple_literal("Alice"),
        );

        assert!(triple.get(TriplePosition::Subject).is_named_node());
        assert!(triple.get(TriplePosition::Object).is_literal());
        assert_eq!(TriplePosition::Predicate.to_string(), "predicate");
    }
}
