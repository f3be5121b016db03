use std::process::Child;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};
use rand::Rng;
use thirtyfour::prelude::*;

const DRIVER_STARTUP_DELAY: Duration = Duration::from_secs(2);
const ELEMENT_POLL_INTERVAL: Duration = Duration::from_millis(500);
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// The one exclusively-owned browsing context of a run. Its current document
/// and navigation position are shared state, so everything reads and
/// mutates it serially.
pub struct Session {
    driver: WebDriver,
    chromedriver: Child,
    base_url: String,
}

impl Session {
    /// Spawns chromedriver from PATH on a random port and opens a visible
    /// Chrome window; the operator drives the initial navigation in it.
    pub async fn start(base_url: &str) -> Result<Self> {
        let port: usize = rand::thread_rng().gen_range(5000..9000);
        let mut chromedriver = std::process::Command::new("chromedriver")
            .arg(format!("--port={port}"))
            .spawn()
            .context("failed to spawn chromedriver (is it on PATH?)")?;
        tokio::time::sleep(DRIVER_STARTUP_DELAY).await;

        let driver = match Self::connect(port).await {
            Ok(driver) => driver,
            Err(err) => {
                let _ = chromedriver.kill();
                return Err(err);
            }
        };

        Ok(Self {
            driver,
            chromedriver,
            base_url: base_url.to_string(),
        })
    }

    async fn connect(port: usize) -> Result<WebDriver> {
        let mut caps = DesiredCapabilities::chrome();
        caps.set_no_sandbox()?;
        caps.set_disable_dev_shm_usage()?;
        caps.add_arg(&format!("user-agent={USER_AGENT}"))?;

        WebDriver::new(&format!("http://localhost:{port}"), caps)
            .await
            .context("failed to connect to chromedriver")
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn open_catalog(&self) -> Result<()> {
        info!("opening {}", self.base_url);
        self.goto(&self.base_url).await
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        self.driver.goto(url).await?;
        Ok(())
    }

    /// Snapshot of the currently rendered document.
    pub async fn page_source(&self) -> Result<String> {
        Ok(self.driver.source().await?)
    }

    /// First element matching `css`, or `None` when the lookup fails.
    /// Missing elements are an expected condition here, not an error.
    pub async fn find(&self, css: &str) -> Option<WebElement> {
        self.driver.find(By::Css(css)).await.ok()
    }

    /// Polls until at least one element matches `css`, failing on timeout.
    pub async fn wait_for_element(&self, css: &str, timeout: Duration) -> Result<()> {
        self.driver
            .query(By::Css(css))
            .wait(timeout, ELEMENT_POLL_INTERVAL)
            .first()
            .await
            .with_context(|| format!("timed out waiting for `{css}`"))?;
        Ok(())
    }

    /// Releases the browser and the chromedriver process. Best-effort: a
    /// failed quit must not keep the child alive.
    pub async fn close(mut self) {
        if let Err(err) = self.driver.quit().await {
            warn!("failed to quit webdriver session: {err}");
        }
        if let Err(err) = self.chromedriver.kill() {
            warn!("failed to kill chromedriver: {err}");
        }
    }
}
