//! Error taxonomy shared across the dispatch pipeline.
//!
//! Helper-local failures (file stat, body decode) are converted to an HTTP
//! status at the call site and never propagate further; anything uncaught is
//! intercepted once by the dispatcher's containment boundary.

use std::io;
use thiserror::Error;

/// Failure while decoding a JSON request body via [`crate::Context::json_body`].
#[derive(Debug, Error)]
pub enum BodyError {
    /// The request carried no body at all.
    #[error("body is missing")]
    Missing,
    /// The body was present but not valid JSON for the target type.
    #[error("invalid json body: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure while parsing query string / urlencoded form data.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("form body is not valid utf-8")]
    BodyEncoding,
}

/// Map a filesystem error onto the HTTP status the client should see.
///
/// Nonexistence is a 404, permission denial a 403, anything else a 500.
pub fn status_for_io_error(err: &io::Error) -> u16 {
    match err.kind() {
        io::ErrorKind::NotFound => 404,
        io::ErrorKind::PermissionDenied => 403,
        _ => 500,
    }
}
