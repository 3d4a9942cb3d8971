use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::driver::Driver;
use crate::geometry::BoundingBox;
use crate::locator::{locate, MatchMode};
use crate::ocr::OcrEngine;
use crate::{Error, Result};

/// One "find this text on screen" step.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub pattern: String,
    pub mode: MatchMode,
    /// Screenshots to try before giving up.
    pub max_attempts: u32,
    /// Pause between a miss and the next screenshot.
    pub retry_delay: Duration,
    /// Label used in logs and in [`Error::LocatorExhausted`].
    pub step: String,
}

impl SearchRequest {
    pub fn new(pattern: impl Into<String>, mode: MatchMode) -> Self {
        Self {
            pattern: pattern.into(),
            mode,
            max_attempts: 1,
            retry_delay: Duration::ZERO,
            step: String::new(),
        }
    }

    pub fn exact(pattern: impl Into<String>) -> Self {
        Self::new(pattern, MatchMode::Exact)
    }

    pub fn contains(pattern: impl Into<String>) -> Self {
        Self::new(pattern, MatchMode::Contains)
    }

    pub fn attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn step(mut self, step: impl Into<String>) -> Self {
        self.step = step.into();
        self
    }
}

/// Screenshot + locate, retried with a fixed delay.
pub struct ScreenSearch {
    ocr: Arc<dyn OcrEngine>,
    scratch_dir: PathBuf,
}

impl ScreenSearch {
    /// Search using the system temp directory for screenshots.
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self::with_scratch_dir(ocr, std::env::temp_dir())
    }

    pub fn with_scratch_dir(ocr: Arc<dyn OcrEngine>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            ocr,
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Create the scratch directory if it does not exist yet.
    pub fn prepare(&self) -> Result<()> {
        std::fs::create_dir_all(&self.scratch_dir).map_err(|e| {
            warn!(
                "cannot use scratch directory {}: {}",
                self.scratch_dir.display(),
                e
            );
            Error::Io(e)
        })
    }

    /// Take fresh screenshots until `request.pattern` is found or the
    /// attempts run out.
    ///
    /// Each attempt writes its own screenshot file and deletes it before the
    /// attempt ends, whatever the outcome. Driver and OCR failures abort the
    /// search immediately.
    pub async fn search<D>(&self, driver: &D, request: &SearchRequest) -> Result<BoundingBox>
    where
        D: Driver + ?Sized,
    {
        let label = if request.step.is_empty() {
            request.pattern.as_str()
        } else {
            request.step.as_str()
        };

        for attempt in 1..=request.max_attempts {
            info!(
                "[{}] ocr attempt {}/{} for '{}'",
                label, attempt, request.max_attempts, request.pattern
            );

            if let Some(bbox) = self.attempt(driver, request).await? {
                info!("[{}] located '{}' at {}", label, request.pattern, bbox);
                return Ok(bbox);
            }

            if attempt < request.max_attempts {
                info!(
                    "[{}] '{}' not found, retrying in {:?}",
                    label, request.pattern, request.retry_delay
                );
                if !request.retry_delay.is_zero() {
                    tokio::time::sleep(request.retry_delay).await;
                }
            }
        }

        warn!(
            "[{}] giving up on '{}' after {} attempt(s)",
            label, request.pattern, request.max_attempts
        );
        Err(Error::LocatorExhausted {
            pattern: request.pattern.clone(),
            step: request.step.clone(),
            attempts: request.max_attempts,
        })
    }

    async fn attempt<D>(&self, driver: &D, request: &SearchRequest) -> Result<Option<BoundingBox>>
    where
        D: Driver + ?Sized,
    {
        let shot = ScratchFile::new(&self.scratch_dir);
        driver.capture_screenshot(shot.path()).await?;
        locate(self.ocr.as_ref(), shot.path(), &request.pattern, request.mode).await
    }
}

/// A uniquely named screenshot path, deleted on drop.
struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{}.png", Uuid::new_v4())),
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("removed {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("failed to remove {}: {}", self.path.display(), e),
        }
    }
}
