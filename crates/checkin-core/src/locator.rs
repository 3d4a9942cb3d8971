use std::path::Path;

use tracing::{info, warn};

use crate::geometry::BoundingBox;
use crate::ocr::OcrEngine;
use crate::Result;

/// How a pattern is compared against recognized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Whole-string equality.
    Exact,
    /// Pattern is a substring of the recognized text.
    #[default]
    Contains,
}

impl MatchMode {
    /// `true` selects [`MatchMode::Exact`].
    pub fn from_precise(precise: bool) -> Self {
        if precise {
            Self::Exact
        } else {
            Self::Contains
        }
    }

    pub fn matches(&self, pattern: &str, text: &str) -> bool {
        match self {
            Self::Exact => text == pattern,
            Self::Contains => text.contains(pattern),
        }
    }
}

/// Find the box of the first recognized region in `screenshot` matching
/// `pattern`.
///
/// Regions are scanned in detection order and the first match wins. A
/// matching region with malformed geometry is skipped. `Ok(None)` means the
/// pattern is not on this screenshot.
pub async fn locate(
    ocr: &dyn OcrEngine,
    screenshot: &Path,
    pattern: &str,
    mode: MatchMode,
) -> Result<Option<BoundingBox>> {
    let regions = ocr.detect_text(screenshot).await?;
    if regions.is_empty() {
        info!("ocr recognized no text in {}", screenshot.display());
        return Ok(None);
    }

    let mut found = None;
    for (idx, region) in regions.iter().enumerate() {
        if !mode.matches(pattern, &region.text) {
            continue;
        }
        match region.bounding_box() {
            Some(bbox) => {
                found = Some((idx, bbox));
                break;
            }
            None => warn!(
                "skipping match '{}' at index {}: malformed geometry {:?} -> {:?}",
                region.text, idx, region.top_left, region.bottom_right
            ),
        }
    }

    let texts: Vec<&str> = regions.iter().map(|r| r.text.as_str()).collect();
    let match_idx = found.map(|(idx, _)| idx as i64).unwrap_or(-1);
    info!(
        "ocr done, recognized: {:?}, pattern: '{}' ({:?}), match index: {}",
        texts, pattern, mode, match_idx
    );

    Ok(found.map(|(_, bbox)| bbox))
}
