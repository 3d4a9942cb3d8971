use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("browser session error: {0}")]
    Session(String),
    #[error("navigation failed: {0}")]
    Navigation(String),
    #[error("input dispatch failed: {0}")]
    Input(String),
    #[error("screenshot failed: {0}")]
    Screenshot(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Browser automation capability.
///
/// The pointer is addressed by relative offsets only: implementations keep
/// the running position themselves.
#[async_trait]
pub trait Driver: Send {
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError>;

    /// Write a PNG screenshot of the viewport to `path`.
    async fn capture_screenshot(&self, path: &Path) -> Result<(), DriverError>;

    async fn move_pointer_by(&mut self, dx: i32, dy: i32) -> Result<(), DriverError>;

    async fn click(&mut self) -> Result<(), DriverError>;

    async fn send_keys(&mut self, keys: &[String]) -> Result<(), DriverError>;

    async fn close(&mut self) -> Result<(), DriverError>;
}
