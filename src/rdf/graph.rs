//! In-memory RDF graph
//!
//! Triples are immutable once built and stored behind `Arc`, so a derived graph can
//! reuse the triples it does not change.

use super::types::Triple;
use std::collections::HashMap;
use std::sync::Arc;

/// Unordered collection of triples
#[derive(Debug, Clone, Default)]
pub struct Graph {
    triples: Vec<Arc<Triple>>,
}

impl Graph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with room for `capacity` triples
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triples: Vec::with_capacity(capacity),
        }
    }

    /// Add a triple
    pub fn add(&mut self, triple: Triple) {
        self.triples.push(Arc::new(triple));
    }

    /// Add an already shared triple without copying it
    pub fn add_shared(&mut self, triple: Arc<Triple>) {
        self.triples.push(triple);
    }

    /// Iterate over the triples
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Triple>> {
        self.triples.iter()
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Membership test by value
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.iter().any(|t| t.as_ref() == triple)
    }
}

impl FromIterator<Triple> for Graph {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self {
            triples: iter.into_iter().map(Arc::new).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Graph {
    type Item = &'a Arc<Triple>;
    type IntoIter = std::slice::Iter<'a, Arc<Triple>>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

/// Graphs compare as multisets; order of insertion does not matter.
impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        let mut counts: HashMap<&Triple, isize> = HashMap::with_capacity(self.len());
        for triple in &self.triples {
            *counts.entry(triple.as_ref()).or_default() += 1;
        }
        for triple in &other.triples {
            match counts.get_mut(triple.as_ref()) {
                Some(count) if *count > 0 => *count -= 1,
                _ => return false,
            }
        }
        true
    }
}

impl Eq for Graph {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::{Literal, NamedNode};

    fn triple(s: &str, o: &str) -> Triple {
        Triple::new(
            NamedNode::new(s),
            NamedNode::new("http://example.org/p"),
            Literal::new_simple_literal(o),
        )
    }

    #[test]
    fn test_add_and_iterate() {
        let mut graph = Graph::new();
        assert!(graph.is_empty());

        graph.add(triple("/a", "1"));
        graph.add(triple("/b", "2"));

        assert_eq!(graph.len(), 2);
        assert!(graph.contains(&triple("/a", "1")));
        assert!(!graph.contains(&triple("/c", "3")));
        assert_eq!(graph.iter().count(), 2);
    }

    #[test]
    fn test_add_shared_keeps_identity() {
        let shared = Arc::new(triple("/a", "1"));
        let mut graph = Graph::new();
        graph.add_shared(Arc::clone(&shared));

        let stored = graph.iter().next().unwrap();
        assert!(Arc::ptr_eq(stored, &shared));
    }

    #[test]
    fn test_equality_ignores_order() {
        let g1: Graph = vec![triple("/a", "1"), triple("/b", "2")].into_iter().collect();
        let g2: Graph = vec![triple("/b", "2"), triple("/a", "1")].into_iter().collect();
        let g3: Graph = vec![triple("/a", "1"), triple("/a", "1")].into_iter().collect();

        assert_eq!(g1, g2);
        assert_ne!(g1, g3);
    }

    #[test]
    fn test_equality_counts_duplicates() {
        let g1: Graph = vec![triple("/a", "1"), triple("/a", "1"), triple("/b", "2")]
            .into_iter()
            .collect();
        let g2: Graph = vec![triple("/b", "2"), triple("/a", "1"), triple("/b", "2")]
            .into_iter()
            .collect();
        let g3: Graph = vec![triple("/b", "2"), triple("/a", "1"), triple("/a", "1")]
            .into_iter()
            .collect();

        assert_ne!(g1, g2);
        assert_eq!(g1, g3);
    }
}
