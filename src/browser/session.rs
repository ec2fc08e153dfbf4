use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;

use super::launcher;
use crate::config::E2eConfig;

/// One Chrome process with its own throwaway profile.
///
/// Each test owns a session, which keeps browser contexts isolated when tests
/// run concurrently.
pub struct BrowserSession {
    browser: Browser,
    handler_task: tokio::task::JoinHandle<()>,
    _profile_dir: tempfile::TempDir,
}

impl BrowserSession {
    /// Launch a new browser and establish the CDP connection.
    pub async fn launch(config: &E2eConfig) -> Result<Self> {
        let chrome = launcher::find_chrome_binary()?;
        let profile_dir = tempfile::tempdir().context("Failed to create Chrome profile dir")?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome)
            .user_data_dir(profile_dir.path())
            .window_size(1280, 720);

        if config.headless {
            builder = builder.arg("--headless=new");
        } else {
            builder = builder.with_head();
        }
        for arg in launcher::default_chrome_args() {
            builder = builder.arg(arg);
        }
        if config.no_sandbox {
            builder = builder.arg("--no-sandbox");
        }

        let browser_config = builder.build().map_err(|e| anyhow::anyhow!("{}", e))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .context("Failed to launch Chrome")?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler error: {}", e);
                }
            }
        });

        tracing::info!("Browser session started (headless: {})", config.headless);

        Ok(Self {
            browser,
            handler_task,
            _profile_dir: profile_dir,
        })
    }

    /// Open a new tab at `url`.
    pub async fn new_page(&self, url: &str) -> Result<Page> {
        self.browser
            .new_page(url)
            .await
            .with_context(|| format!("Failed to open page at {}", url))
    }

    /// Close Chrome and wait for the process to exit.
    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await.context("Failed to close browser")?;
        self.browser.wait().await.context("Failed to wait for browser exit")?;
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}
