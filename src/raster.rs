//! Headless-Chrome rasterization engine (uses the `headless_chrome` crate).
//!
//! One engine instance per poster: launch, load the constructed document,
//! capture, close. The API is synchronous; [`crate::poster`] runs it on a
//! dedicated worker thread.

use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions};

use crate::{Error, RasterConfig, Result};

// Awaited in the page after navigation so the capture does not race the
// hero image download
const WAIT_FOR_IMAGES: &str = r#"
(async function() {
    const pending = Array.from(document.images)
        .filter(img => !img.complete)
        .map(img => new Promise(resolve => {
            img.addEventListener('load', resolve, { once: true });
            img.addEventListener('error', resolve, { once: true });
        }));
    await Promise.all(pending);
    return true;
})()
"#;

/// A single-use rasterization engine backed by a headless Chrome instance.
///
/// The browser child process is released when the engine is closed or
/// dropped; callers must make sure one of the two happens on every exit
/// path.
pub struct RasterEngine {
    browser: Browser,
    tab: Arc<Tab>,
    config: RasterConfig,
}

impl RasterEngine {
    /// Launch a fresh headless browser sized to the configured viewport
    pub fn new(config: RasterConfig) -> Result<Self> {
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some((config.viewport.width, config.viewport.height)))
            .build()
            .map_err(|e| Error::Initialization(format!("Failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::Initialization(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| Error::Initialization(format!("Failed to create tab: {}", e)))?;

        tab.set_default_timeout(Duration::from_millis(config.timeout_ms));

        tab.set_user_agent(&config.user_agent, None, None)
            .map_err(|e| Error::Initialization(format!("Failed to set user agent: {}", e)))?;

        Ok(Self {
            browser,
            tab,
            config,
        })
    }

    /// Load an HTML document into the tab and wait until it and its image
    /// resources have finished loading.
    ///
    /// The document is embedded in a base64 `data:` URL, so it needs no
    /// origin server of its own; only resources it references (the hero
    /// image) hit the network.
    pub fn load_html(&mut self, html: &str) -> Result<()> {
        let data_url = format!("data:text/html;base64,{}", BASE64.encode(html));

        self.tab
            .navigate_to(&data_url)
            .map_err(|e| Error::Load(format!("Navigation failed: {}", e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| Error::Load(format!("Wait for navigation failed: {}", e)))?;

        self.tab
            .evaluate(WAIT_FOR_IMAGES, true)
            .map_err(|e| Error::Load(format!("Wait for images failed: {}", e)))?;

        Ok(())
    }

    /// Capture a PNG snapshot clipped to exactly the configured viewport
    pub fn capture_png(&self) -> Result<Vec<u8>> {
        let clip = Page::Viewport {
            x: 0.0,
            y: 0.0,
            width: self.config.viewport.width as f64,
            height: self.config.viewport.height as f64,
            scale: 1.0,
        };

        let screenshot_data = self
            .tab
            .capture_screenshot(
                Page::CaptureScreenshotFormatOption::Png,
                None,
                Some(clip),
                true,
            )
            .map_err(|e| Error::Render(format!("Screenshot failed: {}", e)))?;

        Ok(screenshot_data)
    }

    /// Close the engine and release the browser process
    pub fn close(self) -> Result<()> {
        // Drop tab before browser so the child process terminates promptly
        drop(self.tab);
        drop(self.browser);
        Ok(())
    }
}
