//! # checkin-core
//!
//! Find text on screen, turn it into a clickable point, act on it.
//!
//! The browser and the OCR engine are capabilities injected through the
//! [`Driver`] and [`OcrEngine`] traits, so everything here can run against
//! scripted fakes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use checkin_core::{anchored, execute, Action, Driver, OcrEngine, ScreenSearch, SearchRequest};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # async fn demo<D: Driver>(driver: &mut D, ocr: Arc<dyn OcrEngine>) -> checkin_core::Result<()> {
//! let search = ScreenSearch::new(ocr);
//! let request = SearchRequest::exact("Login")
//!     .attempts(4)
//!     .retry_delay(Duration::from_secs(2))
//!     .step("login");
//! let pos = search.search(driver, &request).await?;
//! execute(driver, &anchored(pos.center(), vec![Action::click().with_delay_secs(1)])).await?;
//! # Ok(())
//! # }
//! ```

mod action;
mod driver;
mod geometry;
mod locator;
mod ocr;
mod search;
mod sequencer;

pub use action::{anchored, Action};
pub use driver::{Driver, DriverError};
pub use geometry::{BoundingBox, Point};
pub use locator::{locate, MatchMode};
pub use ocr::{DetectedText, OcrEngine, OcrError};
pub use search::{ScreenSearch, SearchRequest};
pub use sequencer::execute;

/// Result type for checkin-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the locator, the search loop and the sequencer.
///
/// A single screenshot that does not contain the pattern is not an error;
/// [`locate`] reports it as `Ok(None)` and [`ScreenSearch`] retries it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("[{step}] could not locate '{pattern}' after {attempts} attempt(s)")]
    LocatorExhausted {
        pattern: String,
        step: String,
        attempts: u32,
    },

    #[error("driver error: {0}")]
    Driver(#[from] DriverError),

    #[error("ocr error: {0}")]
    Ocr(#[from] OcrError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the automation backend itself broke (browser or OCR), as
    /// opposed to the UI never showing the expected text.
    pub fn is_capability_failure(&self) -> bool {
        matches!(self, Self::Driver(_) | Self::Ocr(_))
    }
}

#[cfg(test)]
pub(crate) mod testing;
