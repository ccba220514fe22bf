//! Media type identifiers
//!
//! A media type is compared by its essence: lower-cased `type/subtype` with any
//! parameters dropped, so `text/turtle; charset=utf-8` and `text/turtle` select the
//! same codec.

use std::fmt;

/// N-Triples, the only output format that cannot carry relative IRI references
pub const N_TRIPLES: &str = "application/n-triples";
/// Turtle
pub const TURTLE: &str = "text/turtle";
/// RDF/XML
pub const RDF_XML: &str = "application/rdf+xml";
/// JSON-LD
pub const JSON_LD: &str = "application/ld+json";

/// Media type essence used as a codec key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaType(String);

impl MediaType {
    /// Build a media type from a raw string, normalizing it to its essence.
    ///
    /// Strings that are not `type/subtype` are kept verbatim (trimmed and lower-cased)
    /// so that codec lookups report them as unsupported instead of failing here.
    pub fn new(raw: &str) -> Self {
        match raw.trim().parse::<mime::Mime>() {
            Ok(parsed) => Self(parsed.essence_str().to_ascii_lowercase()),
            Err(_) => Self(raw.trim().to_ascii_lowercase()),
        }
    }

    /// True if this is a syntactically valid `type/subtype` without wildcards
    pub fn is_valid(&self) -> bool {
        match self.0.parse::<mime::Mime>() {
            Ok(parsed) => parsed.type_().as_str() != "*" && parsed.subtype().as_str() != "*",
            Err(_) => false,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for N-Triples
    pub fn is_n_triples(&self) -> bool {
        self.0 == N_TRIPLES
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MediaType {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for MediaType {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl AsRef<str> for MediaType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
