//! Content negotiation
//!
//! The server offers its serializer media types in preference order (an explicit
//! preferred type first, then registration order) and the client picks through an
//! [`AcceptMatcher`]. Between candidates the client values equally, the one the
//! server offered first wins.

use crate::error::{TranscodeError, TranscodeResult};
use crate::media_type::MediaType;
use tracing::{debug, trace};

/// Client-side acceptance check
pub trait AcceptMatcher {
    /// Pick the candidate the client prefers. `candidates` are in server preference
    /// order; ties must go to the earliest one. `None` if nothing is acceptable.
    fn best_match(&self, candidates: &[MediaType]) -> Option<String>;
}

impl<F> AcceptMatcher for F
where
    F: Fn(&[MediaType]) -> Option<String>,
{
    fn best_match(&self, candidates: &[MediaType]) -> Option<String> {
        self(candidates)
    }
}

/// One entry of an `Accept` header
#[derive(Debug, Clone, PartialEq)]
struct MediaRange {
    type_: String,
    subtype: String,
    q: f32,
}

impl MediaRange {
    /// 2 for an exact match, 1 for `type/*`, 0 for `*/*`, `None` if no match
    fn specificity(&self, candidate: &mime::Mime) -> Option<u8> {
        let type_matches = self.type_ == "*" || self.type_ == candidate.type_().as_str();
        let subtype_matches = self.subtype == "*" || self.subtype == candidate.subtype().as_str();
        if !(type_matches && subtype_matches) {
            return None;
        }
        Some(match (self.type_.as_str(), self.subtype.as_str()) {
            ("*", _) => 0,
            (_, "*") => 1,
            _ => 2,
        })
    }
}

/// Parsed `Accept` header
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptHeader {
    ranges: Vec<MediaRange>,
}

impl AcceptHeader {
    /// Accepts every media type, as when the header is absent
    pub fn any() -> Self {
        Self {
            ranges: vec![MediaRange {
                type_: "*".to_string(),
                subtype: "*".to_string(),
                q: 1.0,
            }],
        }
    }

    /// Parse a header value. Entries that are not media ranges are skipped.
    pub fn parse(header: &str) -> Self {
        let ranges = header
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .filter_map(parse_range)
            .collect();
        Self { ranges }
    }

    /// Client weight for a media type, 0.0 if unacceptable.
    ///
    /// The most specific matching range decides.
    pub fn quality(&self, media_type: &MediaType) -> f32 {
        let Ok(candidate) = media_type.as_str().parse::<mime::Mime>() else {
            return 0.0;
        };
        self.ranges
            .iter()
            .filter_map(|range| range.specificity(&candidate).map(|s| (s, range.q)))
            .fold(None, |best: Option<(u8, f32)>, (s, q)| match best {
                Some((best_s, _)) if best_s >= s => best,
                _ => Some((s, q)),
            })
            .map_or(0.0, |(_, q)| q)
    }
}

fn parse_range(item: &str) -> Option<MediaRange> {
    // Some clients send a bare `*`
    let item = if item == "*" || item.starts_with("*;") {
        format!("*/{}", item)
    } else {
        item.to_string()
    };
    let parsed: mime::Mime = item.parse().ok()?;
    // A range with an unreadable weight is dropped
    let q = match parsed.params().find(|(name, _)| name.as_str() == "q") {
        Some((_, value)) => value.as_str().parse::<f32>().ok().filter(|q| q.is_finite())?,
        None => 1.0,
    }
    .clamp(0.0, 1.0);
    Some(MediaRange {
        type_: parsed.type_().as_str().to_ascii_lowercase(),
        subtype: parsed.subtype().as_str().to_ascii_lowercase(),
        q,
    })
}

impl Default for AcceptHeader {
    fn default() -> Self {
        Self::any()
    }
}

impl AcceptMatcher for AcceptHeader {
    fn best_match(&self, candidates: &[MediaType]) -> Option<String> {
        let mut best: Option<(&MediaType, f32)> = None;
        for candidate in candidates {
            let q = self.quality(candidate);
            trace!(media_type = %candidate, q, "accept quality");
            if q <= 0.0 {
                continue;
            }
            // Strictly greater: equal weights keep the earlier (server-preferred) one
            if best.map_or(true, |(_, best_q)| q > best_q) {
                best = Some((candidate, q));
            }
        }
        best.map(|(media_type, _)| media_type.to_string())
    }
}

/// Order `available` for the client: `preferred` first, the rest in their original
/// order, duplicates dropped.
///
/// Fails with [`TranscodeError::ServerMisconfigured`] if `preferred` is not available.
pub fn order_candidates(
    preferred: Option<&MediaType>,
    available: &[MediaType],
) -> TranscodeResult<Vec<MediaType>> {
    let mut candidates: Vec<MediaType> = Vec::with_capacity(available.len());

    if let Some(preferred) = preferred {
        if !available.contains(preferred) {
            return Err(TranscodeError::ServerMisconfigured {
                media_type: preferred.clone(),
            });
        }
        candidates.push(preferred.clone());
    }

    for media_type in available {
        if !candidates.contains(media_type) {
            candidates.push(media_type.clone());
        }
    }
    Ok(candidates)
}

/// Select the response media type.
///
/// A server preference the server cannot serve is a configuration error and is
/// reported before the client is consulted.
pub fn negotiate(
    preferred: Option<&MediaType>,
    available: &[MediaType],
    client: &dyn AcceptMatcher,
) -> TranscodeResult<MediaType> {
    let candidates = order_candidates(preferred, available)?;

    let selected = client
        .best_match(&candidates)
        .map(|raw| MediaType::new(&raw))
        .filter(|media_type| media_type.is_valid() && candidates.contains(media_type));

    match selected {
        Some(media_type) => {
            debug!(%media_type, preferred = ?preferred.map(MediaType::as_str), "negotiated media type");
            Ok(media_type)
        }
        None => Err(TranscodeError::NotAcceptable {
            offered: candidates,
        }),
    }
}
