//! Stamp assets, placements and signing tasks.
//!
//! Field names on the wire follow the camelCase shape produced by the stamp
//! capture front end (`stampId`, `pageIndex`, `createAt`, ...).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::payload::serde_base64;

/// Millimeters to PDF points (1 pt = 1/72 inch).
pub const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Visual category of a stamp asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StampKind {
    Signature,
    Seal,
}

/// A captured signature or seal image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StampAsset {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: StampKind,
    pub name: String,
    /// Image bytes (PNG in practice). Carried as base64 or a data URL.
    #[serde(rename = "base64", with = "serde_base64")]
    pub image: Vec<u8>,
    #[serde(rename = "width")]
    pub width_mm: f64,
    #[serde(rename = "height")]
    pub height_mm: f64,
    /// Certificate handle attached by the capture step. Never inspected here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert: Option<serde_json::Value>,
    /// Caller-supplied wall-clock milliseconds.
    #[serde(rename = "createAt")]
    pub created_at: i64,
}

impl StampAsset {
    /// Rendered size in points at the given scale.
    pub fn size_pt(&self, scale: f64) -> (f64, f64) {
        (
            self.width_mm * POINTS_PER_MM * scale,
            self.height_mm * POINTS_PER_MM * scale,
        )
    }
}

/// One positioned instance of a stamp on a page.
///
/// `x`/`y` are the bottom-left anchor in PDF points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub stamp_id: String,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    /// Degrees; any value before validation, `[0, 360)` after.
    pub rotation: f64,
}

/// Placements for a single page, in paint order (later entries on top).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAssignment {
    pub page_index: u32,
    #[serde(rename = "signs", default)]
    pub placements: Vec<Placement>,
}

/// A signing task as received from the caller.
///
/// Exactly one of `pdf_path` / `pdf_bytes` must be set; this is checked by
/// [`crate::validate_task`], which turns it into a [`DocumentSource`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_path: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_base64::option"
    )]
    pub pdf_bytes: Option<Vec<u8>>,
    #[serde(default)]
    pub pages: Vec<PageAssignment>,
}

/// The document a validated task applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// Non-fatal findings recorded while normalizing a task.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementWarning {
    /// The anchor has a negative coordinate and starts off the page.
    OffPage {
        page_index: u32,
        stamp_id: String,
        x: f64,
        y: f64,
    },
}

impl std::fmt::Display for PlacementWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacementWarning::OffPage {
                page_index,
                stamp_id,
                x,
                y,
            } => write!(
                f,
                "stamp '{stamp_id}' on page {page_index} is anchored off-page at ({x}, {y})"
            ),
        }
    }
}

/// A task that passed validation, with rotations reduced into `[0, 360)`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTask {
    pub source: DocumentSource,
    pub pages: Vec<PageAssignment>,
    pub warnings: Vec<PlacementWarning>,
}

impl NormalizedTask {
    /// Total number of placements across all pages.
    pub fn placement_count(&self) -> usize {
        self.pages.iter().map(|p| p.placements.len()).sum()
    }

    /// Convert back into the caller-facing task shape.
    pub fn to_task(&self) -> Task {
        let (pdf_path, pdf_bytes) = match &self.source {
            DocumentSource::Path(p) => (Some(p.to_string_lossy().into_owned()), None),
            DocumentSource::Bytes(b) => (None, Some(b.clone())),
        };
        Task {
            pdf_path,
            pdf_bytes,
            pages: self.pages.clone(),
        }
    }
}
