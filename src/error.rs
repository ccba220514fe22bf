//! Transcoding errors and their HTTP mapping

use crate::media_type::MediaType;
use crate::rdf::{ParseError, SerializeError, Triple, TriplePosition};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Errors raised while negotiating, decoding or encoding a graph
#[derive(Error, Debug)]
pub enum TranscodeError {
    /// The server prefers a media type it has no serializer for
    #[error("No serializer registered for preferred media type {media_type}")]
    ServerMisconfigured { media_type: MediaType },

    /// Client and server share no media type
    #[error("None of the offered media types are acceptable: {}", join(.offered))]
    NotAcceptable { offered: Vec<MediaType> },

    /// The request body could not be decoded
    #[error("Failed to parse {media_type} body: {source}")]
    ParseFailed {
        media_type: String,
        #[source]
        source: ParseError,
    },

    /// The graph could not be encoded
    #[error("Failed to serialize graph as {media_type}: {source}")]
    SerializeFailed {
        media_type: MediaType,
        #[source]
        source: SerializeError,
    },

    /// A relative reference could not be made absolute
    #[error("Cannot resolve {position} of triple {triple}: {cause}")]
    UriResolutionFailed {
        triple: Triple,
        position: TriplePosition,
        cause: String,
    },
}

fn join(media_types: &[MediaType]) -> String {
    media_types
        .iter()
        .map(MediaType::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub type TranscodeResult<T> = Result<T, TranscodeError>;

impl TranscodeError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            TranscodeError::ServerMisconfigured { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            TranscodeError::NotAcceptable { .. } => StatusCode::NOT_ACCEPTABLE,
            TranscodeError::ParseFailed { .. } => StatusCode::BAD_REQUEST,
            TranscodeError::SerializeFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            TranscodeError::UriResolutionFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// HTTP status code
    pub status: u16,
}

impl IntoResponse for TranscodeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}
