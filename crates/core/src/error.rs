//! Typed validation failures.
//!
//! Every variant names the offending asset id or page index so the message
//! can be shown to an end user as-is.

use thiserror::Error;

/// A placement field that must hold a finite number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementField {
    X,
    Y,
    Rotation,
}

impl std::fmt::Display for PlacementField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PlacementField::X => "x",
            PlacementField::Y => "y",
            PlacementField::Rotation => "rotation",
        })
    }
}

/// Reasons an asset pool or a task is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("duplicate stamp asset id(s): {}", .0.join(", "))]
    DuplicateAssetId(Vec<String>),

    #[error("stamp asset(s) with non-positive width or height: {}", .0.join(", "))]
    InvalidDimensions(Vec<String>),

    #[error("stamp asset(s) with empty image payload: {}", .0.join(", "))]
    EmptyPayload(Vec<String>),

    #[error("stamp asset(s) with image payload over {limit} bytes: {}", .ids.join(", "))]
    PayloadTooLarge { ids: Vec<String>, limit: usize },

    #[error("task sets both a PDF path and in-memory PDF bytes")]
    AmbiguousSource,

    #[error("task sets neither a PDF path nor in-memory PDF bytes")]
    MissingSource,

    #[error("page(s) assigned more than once: {}", join_indices(.0))]
    DuplicatePageIndex(Vec<u32>),

    #[error("page {page_index} is out of range (document has {page_count} page(s))")]
    PageOutOfRange { page_index: u32, page_count: u32 },

    #[error("stamp '{stamp_id}' referenced on page {page_index} does not exist")]
    UnknownStampReference { page_index: u32, stamp_id: String },

    #[error("stamp '{stamp_id}' on page {page_index} has invalid scale {scale} (must be > 0)")]
    InvalidScale {
        page_index: u32,
        stamp_id: String,
        scale: f64,
    },

    #[error("stamp '{stamp_id}' on page {page_index} has a non-finite {field}")]
    NonFiniteValue {
        page_index: u32,
        stamp_id: String,
        field: PlacementField,
    },
}

fn join_indices(indices: &[u32]) -> String {
    indices
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Malformed base64 or data URL payloads.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("data URL is missing the ',' separator")]
    MissingDataSeparator,

    #[error("data URL is not base64-encoded (expected ';base64' before ',')")]
    NotBase64DataUrl,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}
