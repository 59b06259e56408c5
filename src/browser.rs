//! Headless Chrome launch and the production [`PanelPage`] implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use headless_chrome::{Browser, Element, LaunchOptions, Tab};

use crate::login::PanelPage;

/// Env var pointing at the Chrome binary, for hosts where it is not on the
/// default search path.
pub const CHROME_PATH_ENV: &str = "CHROME_PATH";

/// Env var forcing container mode when /.dockerenv is absent.
pub const CONTAINER_ENV: &str = "PANELKEEPER_CONTAINER";

/// Launch a fresh headless Chrome instance. The sandbox is disabled when
/// running inside a container (detected via /.dockerenv or the
/// PANELKEEPER_CONTAINER env var). The Chrome process is killed when the
/// returned `Browser` is dropped, which is what guarantees per-account
/// teardown on every exit path.
pub fn create_browser() -> Result<Browser> {
    let is_container =
        std::env::var(CONTAINER_ENV).is_ok() || Path::new("/.dockerenv").exists();

    let chrome_path: Option<PathBuf> = std::env::var(CHROME_PATH_ENV).ok().map(PathBuf::from);

    let mut builder = LaunchOptions::default_builder();
    builder.headless(true);
    if is_container {
        builder.sandbox(false);
    }
    if let Some(path) = chrome_path {
        builder.path(Some(path));
    }

    let options = builder
        .build()
        .map_err(|e| anyhow!("Failed to build Chrome launch options: {}", e))?;

    Browser::new(options).map_err(|e| anyhow!("Failed to launch headless Chrome: {}", e))
}

/// [`PanelPage`] backed by a headless Chrome tab.
pub struct ChromePage {
    tab: Arc<Tab>,
}

impl ChromePage {
    /// Open a new tab in the given browser.
    pub fn open(browser: &Browser) -> Result<Self> {
        let tab = browser
            .new_tab()
            .map_err(|e| anyhow!("Failed to create browser tab: {}", e))?;
        Ok(Self { tab })
    }

    fn element(&self, selector: &str) -> Result<Element<'_>> {
        self.tab
            .find_element(selector)
            .map_err(|e| anyhow!("Failed to locate element {}: {}", selector, e))
    }
}

impl PanelPage for ChromePage {
    fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| anyhow!("Failed to navigate to {}: {}", url, e))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| anyhow!("Page failed to load for {}: {}", url, e))?;
        Ok(())
    }

    fn element_exists(&self, selector: &str) -> Result<bool> {
        Ok(self.tab.find_element(selector).is_ok())
    }

    fn clear(&self, selector: &str) -> Result<()> {
        // Setting the value directly is the idempotent equivalent of
        // select-all-then-delete against autofilled content.
        self.element(selector)?
            .call_js_fn("function() { this.value = ''; }", vec![], false)
            .map_err(|e| anyhow!("Failed to clear element {}: {}", selector, e))?;
        Ok(())
    }

    fn type_text(&self, selector: &str, text: &str) -> Result<()> {
        self.tab
            .wait_for_element(selector)
            .map_err(|e| anyhow!("Failed to locate element {}: {}", selector, e))?
            .type_into(text)
            .map_err(|e| anyhow!("Failed to type into element {}: {}", selector, e))?;
        Ok(())
    }

    fn click(&self, selector: &str) -> Result<()> {
        self.element(selector)?
            .click()
            .map_err(|e| anyhow!("Failed to click element {}: {}", selector, e))?;
        Ok(())
    }

    fn wait_for_navigation(&self) -> Result<()> {
        self.tab
            .wait_until_navigated()
            .map_err(|e| anyhow!("Post-login navigation failed: {}", e))?;
        Ok(())
    }

    fn probe(&self, selector: &str) -> Result<bool> {
        let expression = format!(
            "document.querySelector('{}') !== null",
            selector.replace('\\', "\\\\").replace('\'', "\\'")
        );
        let result = self
            .tab
            .evaluate(&expression, false)
            .map_err(|e| anyhow!("Failed to evaluate page probe: {}", e))?;
        Ok(matches!(result.value, Some(serde_json::Value::Bool(true))))
    }
}
