use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::geometry::BoundingBox;

/// One text region recognized in an image.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedText {
    /// Top-left corner of the detection polygon, `[x, y]`.
    pub top_left: [f32; 2],
    /// Bottom-right corner of the detection polygon, `[x, y]`.
    pub bottom_right: [f32; 2],
    pub text: String,
    /// Recognition confidence, informational only.
    pub confidence: Option<f32>,
}

impl DetectedText {
    pub fn new(text: impl Into<String>, top_left: [f32; 2], bottom_right: [f32; 2]) -> Self {
        Self {
            top_left,
            bottom_right,
            text: text.into(),
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Pixel box of this region, or `None` when a corner is not finite,
    /// does not fit in `i32` pixels, or the corners are inverted.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let [l, t] = self.top_left;
        let [r, b] = self.bottom_right;
        BoundingBox::new(pixel(l)?, pixel(r)?, pixel(t)?, pixel(b)?)
    }
}

fn pixel(v: f32) -> Option<i32> {
    let v = f64::from(v).floor();
    if v.is_finite() && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX) {
        Some(v as i32)
    } else {
        None
    }
}

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("engine error: {0}")]
    Engine(String),
    #[error("ocr engine unavailable: {0}")]
    Unavailable(String),
}

/// Text detection capability.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Detect text regions in the image at `image`, in detection order.
    ///
    /// May return an empty list. Repeated calls on similar images are not
    /// guaranteed to agree.
    async fn detect_text(&self, image: &Path) -> Result<Vec<DetectedText>, OcrError>;
}
