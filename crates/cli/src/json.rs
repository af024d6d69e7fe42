//! JSON output formats.

use pdf_stamp_core::{PlacementWarning, RenderOp};
use serde::Serialize;

#[derive(Serialize)]
pub struct ValidateJson<'a> {
    pub status: &'a str,
    pub command: &'a str,
    pub task: String,
    pub source: String,
    pub assets: usize,
    pub pages: usize,
    pub placements: usize,
    pub warnings: &'a [PlacementWarning],
}

#[derive(Serialize)]
pub struct RenderOpJson {
    pub page_index: u32,
    pub stamp_id: String,
    pub asset_sri: String,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub rotation_degrees: f64,
    pub width_pt: f64,
    pub height_pt: f64,
}

impl RenderOpJson {
    pub fn new(op: &RenderOp<'_>, asset_sri: String) -> Self {
        Self {
            page_index: op.page_index,
            stamp_id: op.asset.id.clone(),
            asset_sri,
            x: op.x,
            y: op.y,
            scale: op.scale,
            rotation_degrees: op.rotation_degrees,
            width_pt: op.width_pt,
            height_pt: op.height_pt,
        }
    }
}

#[derive(Serialize)]
pub struct PlanJson<'a> {
    pub status: &'a str,
    pub command: &'a str,
    pub task: String,
    pub source: String,
    pub digest_algorithm: &'a str,
    pub ops: Vec<RenderOpJson>,
    pub warnings: &'a [PlacementWarning],
}

#[derive(Serialize)]
pub struct ErrorJson<'a> {
    pub status: &'a str,
    pub error: String,
    pub causes: Vec<String>,
}
