//! In-memory driver and OCR used by the runner tests.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use checkin_core::{DetectedText, Driver, DriverError, OcrEngine, OcrError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Navigate(String),
    Screenshot,
    Move(i32, i32),
    Click,
    SendKeys(Vec<String>),
    Close,
}

#[derive(Default)]
pub struct FakeDriver {
    calls: Arc<Mutex<Vec<Call>>>,
    pointer: (i32, i32),
    fail_screenshots: bool,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_screenshots() -> Self {
        Self {
            fail_screenshots: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Handle to the call log that outlives the driver.
    pub fn call_log(&self) -> Arc<Mutex<Vec<Call>>> {
        Arc::clone(&self.calls)
    }

    pub fn pointer(&self) -> (i32, i32) {
        self.pointer
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Driver for FakeDriver {
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.record(Call::Navigate(url.into()));
        Ok(())
    }

    async fn capture_screenshot(&self, path: &Path) -> Result<(), DriverError> {
        self.record(Call::Screenshot);
        if self.fail_screenshots {
            return Err(DriverError::Screenshot("target closed".into()));
        }
        std::fs::write(path, b"\x89PNG\r\n\x1a\n")?;
        Ok(())
    }

    async fn move_pointer_by(&mut self, dx: i32, dy: i32) -> Result<(), DriverError> {
        self.record(Call::Move(dx, dy));
        self.pointer = (self.pointer.0 + dx, self.pointer.1 + dy);
        Ok(())
    }

    async fn click(&mut self) -> Result<(), DriverError> {
        self.record(Call::Click);
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

/// Replays `screens` one per call, then keeps answering with `rest`.
pub struct ScreenOcr {
    screens: Mutex<VecDeque<Vec<DetectedText>>>,
    rest: Vec<DetectedText>,
}

impl ScreenOcr {
    pub fn always(regions: Vec<DetectedText>) -> Self {
        Self::sequence(Vec::new(), regions)
    }

    pub fn sequence(screens: Vec<Vec<DetectedText>>, rest: Vec<DetectedText>) -> Self {
        Self {
            screens: Mutex::new(screens.into()),
            rest,
        }
    }
}

#[async_trait]
impl OcrEngine for ScreenOcr {
    async fn detect_text(&self, _image: &Path) -> Result<Vec<DetectedText>, OcrError> {
        let next = self.screens.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| self.rest.clone()))
    }
}

fn region(text: &str, left: f32, top: f32, right: f32, bottom: f32) -> DetectedText {
    DetectedText::new(text, [left, top], [right, bottom]).with_confidence(90.0)
}

/// Every zh-CN label the check-in looks for, plus some noise.
pub fn game_screen() -> Vec<DetectedText> {
    vec![
        region("雀魂", 20.0, 10.0, 80.0, 30.0),
        region("账号/邮箱", 100.0, 100.0, 200.0, 120.0),
        region("密码", 100.0, 200.0, 200.0, 220.0),
        region("进入游戏", 550.0, 400.0, 650.0, 440.0),
        region("月势御守", 850.0, 40.0, 950.0, 80.0),
        region("领取辉玉", 450.0, 580.0, 550.0, 620.0),
    ]
}
