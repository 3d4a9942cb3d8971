mod scenario;
#[cfg(test)]
pub(crate) mod testing;

pub use scenario::{CheckIn, CheckInReport};

use crate::config::Config;
use crate::driver::EokaDriver;
use crate::i18n::Labels;
use crate::{ocr, Error, Result};
use checkin_core::{Driver, OcrEngine, ScreenSearch};
use checkin_mail::FailureReport;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Result of a check-in run.
#[derive(Debug)]
pub struct RunResult {
    /// Whether the run succeeded.
    pub success: bool,
    /// Error message if failed.
    pub error: Option<String>,
    /// Whether the failure came from the browser or OCR backend rather than
    /// from the game screen.
    pub capability_failure: bool,
    /// Number of scenario steps completed.
    pub steps_completed: usize,
    /// Whether the reward was claimed.
    pub claimed: bool,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
    /// Where the final screenshot was written, if it could be captured.
    pub final_screenshot: Option<PathBuf>,
}

/// Runs the check-in against a driver.
pub struct Runner<D: Driver = EokaDriver> {
    driver: D,
    search: ScreenSearch,
}

impl Runner<EokaDriver> {
    /// Launch Chrome and pick the compiled-in OCR engine.
    pub async fn launch(config: &Config) -> Result<Self> {
        if ocr::backend().is_none() {
            return Err(Error::Config(
                "no OCR backend compiled in, rebuild with `--features tesseract`".into(),
            ));
        }
        // Scratch directory first, so a bad path never leaves Chrome running.
        let search = scratch_search(ocr::default_engine(&config.ocr), config)?;
        let driver = EokaDriver::launch(&config.browser).await?;
        Ok(Self { driver, search })
    }
}

fn scratch_search(ocr: Arc<dyn OcrEngine>, config: &Config) -> Result<ScreenSearch> {
    let search = match config.screenshot_dir {
        Some(ref dir) => ScreenSearch::with_scratch_dir(ocr, dir),
        None => ScreenSearch::new(ocr),
    };
    search.prepare()?;
    Ok(search)
}

impl<D: Driver> Runner<D> {
    pub fn new(driver: D, ocr: Arc<dyn OcrEngine>, config: &Config) -> Result<Self> {
        let search = scratch_search(ocr, config)?;
        Ok(Self { driver, search })
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Run the check-in once.
    ///
    /// The final screenshot is taken whatever the outcome. On failure the
    /// operator is mailed when `on_failure.mail` is configured. Neither of
    /// these can turn a run into an error; only config problems do.
    pub async fn run(&mut self, config: &Config) -> Result<RunResult> {
        let start = Instant::now();
        let labels = config.labels()?;
        info!("Starting check-in: {}", config.name);

        let mut checkin = CheckIn::new(config, labels.clone());
        let outcome = checkin.run(&mut self.driver, &self.search).await;

        let screenshot_path = config.on_failure.screenshot_path();
        let final_screenshot = self.capture_final(&screenshot_path).await;

        let result = match outcome {
            Ok(report) => {
                info!(
                    "Check-in finished in {:.1}s (claimed: {})",
                    report.duration.as_secs_f64(),
                    report.claimed
                );
                RunResult {
                    success: true,
                    error: None,
                    capability_failure: false,
                    steps_completed: report.steps_completed,
                    claimed: report.claimed,
                    duration_ms: start.elapsed().as_millis() as u64,
                    final_screenshot,
                }
            }
            Err(e) => {
                let capability_failure = e.is_capability_failure();
                error!("Check-in failed: {}", e);
                self.notify(config, &labels, &e.to_string(), final_screenshot.as_deref())
                    .await;
                RunResult {
                    success: false,
                    error: Some(e.to_string()),
                    capability_failure,
                    steps_completed: checkin.steps_completed(),
                    claimed: false,
                    duration_ms: start.elapsed().as_millis() as u64,
                    final_screenshot,
                }
            }
        };
        Ok(result)
    }

    async fn capture_final(&self, path: &Path) -> Option<PathBuf> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = std::fs::create_dir_all(parent) {
                error!("Failed to create {}: {}", parent.display(), e);
                return None;
            }
        }
        match self.driver.capture_screenshot(path).await {
            Ok(()) => {
                info!("Final screenshot saved to: {}", path.display());
                Some(path.to_path_buf())
            }
            Err(e) => {
                error!("Failed to capture final screenshot: {}", e);
                None
            }
        }
    }

    async fn notify(
        &self,
        config: &Config,
        labels: &Labels,
        message: &str,
        screenshot: Option<&Path>,
    ) {
        let Some(ref settings) = config.on_failure.mail else {
            return;
        };
        let report = FailureReport {
            subject: labels.failure_subject.clone(),
            content: format!("{}: {}", config.name, message),
            screenshot_caption: labels.screenshot_caption.clone(),
            screenshot: screenshot.map(Path::to_path_buf),
        };
        info!("Sending failure report to {}", settings.receiver);
        if let Err(e) = checkin_mail::async_client::send_report(&settings.into(), &report).await {
            error!("Failed to send failure report: {}", e);
        }
    }

    /// Close the browser session.
    pub async fn close(mut self) -> Result<()> {
        if let Err(e) = self.driver.close().await {
            warn!("Failed to close browser: {}", e);
            return Err(checkin_core::Error::from(e).into());
        }
        Ok(())
    }
}
