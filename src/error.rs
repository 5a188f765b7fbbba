//! Structured error types for the pagination core.
//!
//! Recoverable layout conditions (unsplittable overflow, shaping
//! failures, degenerate column widths, the page ceiling) never surface
//! here — they are logged and worked around locally. Errors are reserved
//! for caller contract violations: trees that are not documents, pages
//! with impossible geometry.

use thiserror::Error;

/// The unified error type returned by the public pagination API.
#[derive(Debug, Error)]
pub enum PaginateError {
    /// The root node handed to `paginate` is not a `Document`.
    #[error("pagination requires a Document root, got a {0} node")]
    NotADocument(&'static str),

    /// A direct child of the document is not a `Page`.
    #[error("document child {index} is a {kind} node, expected Page")]
    ExpectedPage { index: usize, kind: &'static str },

    /// A page's usable content height came out negative — its padding
    /// exceeds its height, or a negative height was supplied.
    #[error("page {index} has a negative content height ({height})")]
    InvalidContentHeight { index: usize, height: f64 },
}
