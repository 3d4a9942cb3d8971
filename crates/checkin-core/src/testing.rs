//! Scripted fakes for the capability traits.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{DetectedText, Driver, DriverError, OcrEngine, OcrError};

/// OCR engine that replays queued responses, then returns nothing.
#[derive(Default)]
pub struct ScriptedOcr {
    responses: Mutex<VecDeque<Result<Vec<DetectedText>, OcrError>>>,
    seen: Mutex<Vec<(PathBuf, bool)>>,
}

impl ScriptedOcr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, regions: Vec<DetectedText>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(regions));
        self
    }

    pub fn then_fail(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(OcrError::Engine(message.into())));
        self
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// Paths handed to the engine, and whether each existed at that moment.
    pub fn seen(&self) -> Vec<(PathBuf, bool)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl OcrEngine for ScriptedOcr {
    async fn detect_text(&self, image: &Path) -> Result<Vec<DetectedText>, OcrError> {
        self.seen
            .lock()
            .unwrap()
            .push((image.to_path_buf(), image.exists()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// OCR engine that always answers with the same regions.
pub struct FixedOcr(pub Vec<DetectedText>);

#[async_trait]
impl OcrEngine for FixedOcr {
    async fn detect_text(&self, _image: &Path) -> Result<Vec<DetectedText>, OcrError> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Navigate(String),
    Screenshot(PathBuf),
    Move(i32, i32),
    Click,
    SendKeys(Vec<String>),
    Close,
}

/// Driver that records every call and writes a stub PNG on screenshot.
#[derive(Default)]
pub struct RecordingDriver {
    pub calls: Mutex<Vec<Call>>,
    pub fail_screenshots: bool,
    pub fail_clicks: bool,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Driver for RecordingDriver {
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.record(Call::Navigate(url.into()));
        Ok(())
    }

    async fn capture_screenshot(&self, path: &Path) -> Result<(), DriverError> {
        self.record(Call::Screenshot(path.to_path_buf()));
        if self.fail_screenshots {
            return Err(DriverError::Screenshot("session crashed".into()));
        }
        std::fs::write(path, b"\x89PNG\r\n\x1a\n")?;
        Ok(())
    }

    async fn move_pointer_by(&mut self, dx: i32, dy: i32) -> Result<(), DriverError> {
        self.record(Call::Move(dx, dy));
        Ok(())
    }

    async fn click(&mut self) -> Result<(), DriverError> {
        self.record(Call::Click);
        if self.fail_clicks {
            return Err(DriverError::Input("click rejected".into()));
        }
        Ok(())
    }

    async fn send_keys(&mut self, keys: &[String]) -> Result<(), DriverError> {
        self.record(Call::SendKeys(keys.to_vec()));
        Ok(())
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        self.record(Call::Close);
        Ok(())
    }
}

pub fn region(text: &str, left: f32, top: f32, right: f32, bottom: f32) -> DetectedText {
    DetectedText::new(text, [left, top], [right, bottom])
}
