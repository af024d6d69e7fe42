//! Asset pool and task validation, and placement normalization.

use std::collections::{BTreeSet, HashSet};
use std::hash::Hash;
use std::path::PathBuf;

use crate::error::{PlacementField, ValidationError};
use crate::types::{
    DocumentSource, NormalizedTask, PageAssignment, Placement, PlacementWarning, StampAsset, Task,
};

/// Default upper bound on a single stamp image payload (8 MiB).
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 8 * 1024 * 1024;

/// Tunables for validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Page count of the source document, when the caller knows it.
    pub page_count: Option<u32>,
    /// Largest accepted image payload, in bytes.
    pub max_payload_bytes: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            page_count: None,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }
}

/// Validate an asset pool with the default configuration.
pub fn validate_assets(pool: &[StampAsset]) -> Result<BTreeSet<String>, ValidationError> {
    validate_assets_with(pool, &ValidationConfig::default())
}

/// Validate an asset pool and return the set of its ids.
///
/// Checks run class by class: duplicate ids, then dimensions, then empty
/// payloads, then oversized payloads. The first failing class is reported
/// with every offending id in it.
#[tracing::instrument(skip_all, fields(assets = pool.len()))]
pub fn validate_assets_with(
    pool: &[StampAsset],
    config: &ValidationConfig,
) -> Result<BTreeSet<String>, ValidationError> {
    let duplicates = repeated(pool.iter().map(|a| a.id.as_str()));
    if !duplicates.is_empty() {
        return Err(ValidationError::DuplicateAssetId(
            duplicates.into_iter().map(str::to_owned).collect(),
        ));
    }

    let bad_dimensions = offending_ids(pool, |a| {
        !(is_positive(a.width_mm) && is_positive(a.height_mm))
    });
    if !bad_dimensions.is_empty() {
        return Err(ValidationError::InvalidDimensions(bad_dimensions));
    }

    let empty = offending_ids(pool, |a| a.image.is_empty());
    if !empty.is_empty() {
        return Err(ValidationError::EmptyPayload(empty));
    }

    let oversized = offending_ids(pool, |a| a.image.len() > config.max_payload_bytes);
    if !oversized.is_empty() {
        return Err(ValidationError::PayloadTooLarge {
            ids: oversized,
            limit: config.max_payload_bytes,
        });
    }

    tracing::debug!("Asset pool is valid");
    Ok(pool.iter().map(|a| a.id.clone()).collect())
}

/// Validate a task with the default configuration.
pub fn validate_task(
    task: &Task,
    asset_ids: &BTreeSet<String>,
) -> Result<NormalizedTask, ValidationError> {
    validate_task_with(task, asset_ids, &ValidationConfig::default())
}

/// Validate a task against a validated asset id set and normalize it.
///
/// On success every rotation lies in `[0, 360)`, placement order is
/// untouched, and anchors with a negative coordinate are reported as
/// [`PlacementWarning::OffPage`].
#[tracing::instrument(skip_all, fields(pages = task.pages.len()))]
pub fn validate_task_with(
    task: &Task,
    asset_ids: &BTreeSet<String>,
    config: &ValidationConfig,
) -> Result<NormalizedTask, ValidationError> {
    // An empty path or an empty byte buffer counts as unset.
    let path = task.pdf_path.as_ref().filter(|p| !p.is_empty());
    let bytes = task.pdf_bytes.as_ref().filter(|b| !b.is_empty());
    let source = match (path, bytes) {
        (Some(_), Some(_)) => return Err(ValidationError::AmbiguousSource),
        (None, None) => return Err(ValidationError::MissingSource),
        (Some(path), None) => DocumentSource::Path(PathBuf::from(path)),
        (None, Some(bytes)) => DocumentSource::Bytes(bytes.clone()),
    };

    let duplicates = repeated(task.pages.iter().map(|p| p.page_index));
    if !duplicates.is_empty() {
        return Err(ValidationError::DuplicatePageIndex(duplicates));
    }

    if let Some(page_count) = config.page_count
        && let Some(page) = task.pages.iter().find(|p| p.page_index >= page_count)
    {
        return Err(ValidationError::PageOutOfRange {
            page_index: page.page_index,
            page_count,
        });
    }

    for page in &task.pages {
        if let Some(placement) = page
            .placements
            .iter()
            .find(|p| !asset_ids.contains(&p.stamp_id))
        {
            return Err(ValidationError::UnknownStampReference {
                page_index: page.page_index,
                stamp_id: placement.stamp_id.clone(),
            });
        }
    }

    for page in &task.pages {
        if let Some(placement) = page.placements.iter().find(|p| !is_positive(p.scale)) {
            return Err(ValidationError::InvalidScale {
                page_index: page.page_index,
                stamp_id: placement.stamp_id.clone(),
                scale: placement.scale,
            });
        }
    }

    for page in &task.pages {
        for placement in &page.placements {
            let field = if !placement.x.is_finite() {
                Some(PlacementField::X)
            } else if !placement.y.is_finite() {
                Some(PlacementField::Y)
            } else if !placement.rotation.is_finite() {
                Some(PlacementField::Rotation)
            } else {
                None
            };
            if let Some(field) = field {
                return Err(ValidationError::NonFiniteValue {
                    page_index: page.page_index,
                    stamp_id: placement.stamp_id.clone(),
                    field,
                });
            }
        }
    }

    let mut warnings = Vec::new();
    let mut pages = Vec::with_capacity(task.pages.len());
    for page in &task.pages {
        let mut placements = Vec::with_capacity(page.placements.len());
        for placement in &page.placements {
            if placement.x < 0.0 || placement.y < 0.0 {
                tracing::warn!(
                    page_index = page.page_index,
                    stamp_id = %placement.stamp_id,
                    x = placement.x,
                    y = placement.y,
                    "Placement anchored off-page"
                );
                warnings.push(PlacementWarning::OffPage {
                    page_index: page.page_index,
                    stamp_id: placement.stamp_id.clone(),
                    x: placement.x,
                    y: placement.y,
                });
            }
            placements.push(Placement {
                rotation: normalize_rotation(placement.rotation),
                ..placement.clone()
            });
        }
        pages.push(PageAssignment {
            page_index: page.page_index,
            placements,
        });
    }

    tracing::debug!(warnings = warnings.len(), "Task is valid");
    Ok(NormalizedTask {
        source,
        pages,
        warnings,
    })
}

/// Reduce a rotation in degrees into `[0, 360)`.
///
/// Values already in range are returned unchanged, bit for bit.
pub fn normalize_rotation(degrees: f64) -> f64 {
    let r = degrees % 360.0;
    let r = if r < 0.0 { r + 360.0 } else { r };
    // Tiny negative inputs round up to exactly 360.0; -0.0 folds to 0.0.
    if r >= 360.0 || r == 0.0 { 0.0 } else { r }
}

/// Values seen more than once, each listed once in order of first repeat.
fn repeated<T: Copy + Eq + Hash>(items: impl Iterator<Item = T>) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if !seen.insert(item) && reported.insert(item) {
            out.push(item);
        }
    }
    out
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn offending_ids(pool: &[StampAsset], pred: impl Fn(&StampAsset) -> bool) -> Vec<String> {
    pool.iter()
        .filter(|a| pred(a))
        .map(|a| a.id.clone())
        .collect()
}
