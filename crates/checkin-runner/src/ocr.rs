//! OCR engines for the screen search.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use checkin_core::{DetectedText, OcrEngine, OcrError};

use crate::config::OcrConfig;

/// TSV row level of a single recognized word.
const WORD_LEVEL: u32 = 5;

/// Name of the OCR backend compiled into this build, if any.
pub fn backend() -> Option<&'static str> {
    if cfg!(feature = "tesseract") {
        Some("tesseract")
    } else {
        None
    }
}

/// Build the engine for this binary's feature set.
pub fn default_engine(config: &OcrConfig) -> Arc<dyn OcrEngine> {
    #[cfg(feature = "tesseract")]
    {
        Arc::new(TesseractOcr::new(config.clone()))
    }
    #[cfg(not(feature = "tesseract"))]
    {
        let _ = config;
        Arc::new(NoOcr)
    }
}

/// Placeholder used when no OCR backend was compiled in.
pub struct NoOcr;

#[async_trait]
impl OcrEngine for NoOcr {
    async fn detect_text(&self, _image: &Path) -> Result<Vec<DetectedText>, OcrError> {
        Err(OcrError::Unavailable(
            "built without the `tesseract` feature".into(),
        ))
    }
}

#[cfg(feature = "tesseract")]
pub use self::tesseract_engine::TesseractOcr;

#[cfg(feature = "tesseract")]
mod tesseract_engine {
    use super::*;
    use tesseract::Tesseract;
    use tracing::debug;

    /// Tesseract wrapper, one engine instance per image.
    pub struct TesseractOcr {
        config: OcrConfig,
    }

    impl TesseractOcr {
        pub fn new(config: OcrConfig) -> Self {
            Self { config }
        }
    }

    fn engine_err(e: impl std::fmt::Display) -> OcrError {
        OcrError::Engine(e.to_string())
    }

    fn recognize(config: &OcrConfig, image: &str) -> Result<String, OcrError> {
        let mut tess = Tesseract::new(config.datapath.as_deref(), Some(&config.language))
            .map_err(|e| OcrError::Unavailable(e.to_string()))?
            .set_image(image)
            .map_err(|e| OcrError::InvalidInput(e.to_string()))?
            .recognize()
            .map_err(engine_err)?;
        tess.get_tsv_text(0).map_err(engine_err)
    }

    #[async_trait]
    impl OcrEngine for TesseractOcr {
        async fn detect_text(&self, image: &Path) -> Result<Vec<DetectedText>, OcrError> {
            let image = image
                .to_str()
                .ok_or_else(|| OcrError::InvalidInput(format!("non-utf8 path {:?}", image)))?
                .to_string();
            let config = self.config.clone();
            let tsv = tokio::task::spawn_blocking(move || recognize(&config, &image))
                .await
                .map_err(engine_err)??;
            let regions = parse_tsv(&tsv);
            debug!("tesseract: {} line(s)", regions.len());
            Ok(regions)
        }
    }
}

struct Line {
    key: (u32, u32, u32, u32),
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
    text: String,
    conf_sum: f32,
    words: u32,
}

impl Line {
    fn push(&mut self, word: &str, left: f32, top: f32, right: f32, bottom: f32, conf: f32) {
        if needs_space(&self.text, word) {
            self.text.push(' ');
        }
        self.text.push_str(word);
        self.left = self.left.min(left);
        self.top = self.top.min(top);
        self.right = self.right.max(right);
        self.bottom = self.bottom.max(bottom);
        self.conf_sum += conf;
        self.words += 1;
    }
}

/// Words are separated only between ASCII letters/digits, so CJK labels
/// split into single glyphs come back whole.
fn needs_space(prev: &str, next: &str) -> bool {
    match (prev.chars().last(), next.chars().next()) {
        (Some(a), Some(b)) => a.is_ascii_alphanumeric() && b.is_ascii_alphanumeric(),
        _ => false,
    }
}

/// Group Tesseract TSV word rows into one region per text line, in the
/// order the lines were detected.
pub fn parse_tsv(tsv: &str) -> Vec<DetectedText> {
    let mut lines: Vec<Line> = Vec::new();

    for row in tsv.lines() {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() < 12 {
            continue;
        }
        let Ok(level) = cols[0].parse::<u32>() else {
            // header row
            continue;
        };
        if level != WORD_LEVEL {
            continue;
        }
        let ints: Option<Vec<u32>> = cols[1..5].iter().map(|c| c.parse().ok()).collect();
        let nums: Option<Vec<f32>> = cols[6..11].iter().map(|c| c.parse().ok()).collect();
        let (Some(ints), Some(nums)) = (ints, nums) else {
            continue;
        };
        let word = cols[11..].join("\t");
        let word = word.trim();
        let [left, top, width, height, conf] = [nums[0], nums[1], nums[2], nums[3], nums[4]];
        if word.is_empty() || conf < 0.0 {
            continue;
        }

        let key = (ints[0], ints[1], ints[2], ints[3]);
        let (right, bottom) = (left + width, top + height);
        match lines.last_mut() {
            Some(line) if line.key == key => line.push(word, left, top, right, bottom, conf),
            _ => lines.push(Line {
                key,
                left,
                top,
                right,
                bottom,
                text: word.to_string(),
                conf_sum: conf,
                words: 1,
            }),
        }
    }

    lines
        .into_iter()
        .map(|l| {
            DetectedText::new(l.text, [l.left, l.top], [l.right, l.bottom])
                .with_confidence(l.conf_sum / l.words as f32)
        })
        .collect()
}
