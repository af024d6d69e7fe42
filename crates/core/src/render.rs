//! Projection of a normalized task into ordered render instructions.

use std::collections::HashMap;

use crate::error::ValidationError;
use crate::types::{NormalizedTask, StampAsset};

/// Id-indexed view over an asset pool.
#[derive(Debug, Clone, Default)]
pub struct AssetPool<'a> {
    by_id: HashMap<&'a str, &'a StampAsset>,
}

impl<'a> AssetPool<'a> {
    /// Index the given assets by id. Later duplicates shadow earlier ones;
    /// run [`crate::validate_assets`] first to rule them out.
    pub fn new(assets: &'a [StampAsset]) -> Self {
        Self {
            by_id: assets.iter().map(|a| (a.id.as_str(), a)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&'a StampAsset> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// One stamp to paint, with its asset resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOp<'a> {
    pub page_index: u32,
    pub asset: &'a StampAsset,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    /// In `[0, 360)`.
    pub rotation_degrees: f64,
    /// Asset width in points after scaling.
    pub width_pt: f64,
    /// Asset height in points after scaling.
    pub height_pt: f64,
}

/// Flatten a normalized task into render instructions.
///
/// Output order is page order, then placement order within each page; the
/// renderer must paint in exactly this order. Fails only when `pool` lacks
/// an asset the task references, i.e. it is not the pool the task was
/// validated against.
#[tracing::instrument(skip_all, fields(pages = task.pages.len(), assets = pool.len()))]
pub fn to_render_instructions<'a>(
    task: &NormalizedTask,
    pool: &AssetPool<'a>,
) -> Result<Vec<RenderOp<'a>>, ValidationError> {
    let mut ops = Vec::with_capacity(task.placement_count());
    for page in &task.pages {
        for placement in &page.placements {
            let asset = pool.get(&placement.stamp_id).ok_or_else(|| {
                ValidationError::UnknownStampReference {
                    page_index: page.page_index,
                    stamp_id: placement.stamp_id.clone(),
                }
            })?;
            let (width_pt, height_pt) = asset.size_pt(placement.scale);
            ops.push(RenderOp {
                page_index: page.page_index,
                asset,
                x: placement.x,
                y: placement.y,
                scale: placement.scale,
                rotation_degrees: placement.rotation,
                width_pt,
                height_pt,
            });
        }
    }
    tracing::debug!(ops = ops.len(), "Built render instructions");
    Ok(ops)
}
