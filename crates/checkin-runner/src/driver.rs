use std::path::Path;

use async_trait::async_trait;
use checkin_core::{Driver, DriverError};
use eoka::{Browser, Page};
use tracing::{debug, info};

use crate::config::BrowserConfig;
use crate::Result;

/// Dispatch a full click at viewport coordinates `(x, y)`.
///
/// Games render into a canvas, so the events go to whatever element sits
/// under the point rather than to a DOM control.
const CLICK_AT_JS: &str = r#"(() => {
    const x = arguments[0], y = arguments[1];
    const el = document.elementFromPoint(x, y) || document.body;
    const opts = { bubbles: true, cancelable: true, view: window, clientX: x, clientY: y, button: 0 };
    el.dispatchEvent(new PointerEvent('pointerdown', { ...opts, pointerType: 'mouse', isPrimary: true }));
    el.dispatchEvent(new MouseEvent('mousedown', opts));
    el.dispatchEvent(new PointerEvent('pointerup', { ...opts, pointerType: 'mouse', isPrimary: true }));
    el.dispatchEvent(new MouseEvent('mouseup', opts));
    el.dispatchEvent(new MouseEvent('click', opts));
})()"#;

/// [`Driver`] backed by a Chrome session.
///
/// The pointer starts at the viewport origin and is tracked as a running
/// offset, the same way relative moves are expressed by the scenario.
pub struct EokaDriver {
    browser: Option<Browser>,
    page: Page,
    pointer: (i32, i32),
}

impl EokaDriver {
    /// Launch Chrome with the configured viewport and open a blank page.
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let viewport = config.viewport();
        let stealth = eoka::StealthConfig {
            headless: config.headless,
            proxy: config.proxy.clone(),
            user_agent: config.user_agent.clone(),
            viewport_width: viewport.width,
            viewport_height: viewport.height,
            ..Default::default()
        };

        debug!(
            "Launching browser (headless: {}, viewport: {}x{}, proxy: {:?})",
            config.headless, viewport.width, viewport.height, config.proxy
        );
        let browser = Browser::launch_with_config(stealth).await?;
        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser: Some(browser),
            page,
            pointer: (0, 0),
        })
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Current pointer position relative to the viewport origin.
    pub fn pointer(&self) -> (i32, i32) {
        self.pointer
    }
}

fn session_err(e: eoka::Error) -> DriverError {
    DriverError::Session(e.to_string())
}

fn input_err(e: eoka::Error) -> DriverError {
    DriverError::Input(e.to_string())
}

#[async_trait]
impl Driver for EokaDriver {
    async fn navigate(&mut self, url: &str) -> std::result::Result<(), DriverError> {
        info!("Navigating to: {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|e| DriverError::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn capture_screenshot(&self, path: &Path) -> std::result::Result<(), DriverError> {
        let data = self
            .page
            .screenshot()
            .await
            .map_err(|e| DriverError::Screenshot(e.to_string()))?;
        std::fs::write(path, data)?;
        debug!("screenshot: {}", path.display());
        Ok(())
    }

    async fn move_pointer_by(&mut self, dx: i32, dy: i32) -> std::result::Result<(), DriverError> {
        let (x, y) = (self.pointer.0 + dx, self.pointer.1 + dy);
        self.page
            .session()
            .dispatch_mouse_event(
                eoka::cdp::MouseEventType::MouseMoved,
                f64::from(x),
                f64::from(y),
                None,
                None,
            )
            .await
            .map_err(input_err)?;
        self.pointer = (x, y);
        Ok(())
    }

    async fn click(&mut self) -> std::result::Result<(), DriverError> {
        let (x, y) = self.pointer;
        debug!("click at ({}, {})", x, y);
        let js = CLICK_AT_JS
            .replace("arguments[0]", &x.to_string())
            .replace("arguments[1]", &y.to_string());
        self.page.execute(&js).await.map_err(input_err)?;
        Ok(())
    }

    async fn send_keys(&mut self, keys: &[String]) -> std::result::Result<(), DriverError> {
        for text in keys {
            self.page.type_text(text).await.map_err(input_err)?;
        }
        Ok(())
    }

    async fn close(&mut self) -> std::result::Result<(), DriverError> {
        if let Some(browser) = self.browser.take() {
            info!("Closing browser");
            browser.close().await.map_err(session_err)?;
        }
        Ok(())
    }
}
