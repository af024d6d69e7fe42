//! Core stamp placement primitives: asset and task validation, rotation
//! normalization, and projection into ordered render instructions.
//!
//! This crate has no CLI or UI dependencies and performs no I/O.

pub mod digest;
pub mod error;
pub mod payload;
pub mod render;
pub mod types;
pub mod validate;

pub use digest::{DigestAlgorithm, compute_digest, encode_sri, payload_sri};
pub use error::{PayloadError, PlacementField, ValidationError};
pub use payload::decode_payload;
pub use render::{AssetPool, RenderOp, to_render_instructions};
pub use types::*;
pub use validate::{
    DEFAULT_MAX_PAYLOAD_BYTES, ValidationConfig, normalize_rotation, validate_assets,
    validate_assets_with, validate_task, validate_task_with,
};
