use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::interaction::readiness::{DEFAULT_HIDDEN_TIMEOUT, DEFAULT_PRESENCE_TIMEOUT};

pub const DEFAULT_BASE_URL: &str = "http://localhost:4200/";
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Settings shared by every page object in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct E2eConfig {
    /// Root URL of the dashboard under test.
    pub base_url: String,
    pub headless: bool,
    /// Default for presence/clickability checks and action auto-waits.
    pub presence_timeout: Duration,
    /// Default for hidden-state checks.
    pub hidden_timeout: Duration,
    /// Bound for page loads and network-idle waits.
    pub navigation_timeout: Duration,
    pub screenshot_dir: PathBuf,
    /// Pass `--no-sandbox` to Chrome (containers, root users).
    pub no_sandbox: bool,
}

impl Default for E2eConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headless: true,
            presence_timeout: DEFAULT_PRESENCE_TIMEOUT,
            hidden_timeout: DEFAULT_HIDDEN_TIMEOUT,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            screenshot_dir: PathBuf::from("screenshots"),
            no_sandbox: false,
        }
    }
}

impl E2eConfig {
    /// Defaults overridden by `E2E_BASE_URL`, `E2E_HEADED`, `E2E_TIMEOUT_MS`,
    /// `E2E_SCREENSHOT_DIR` and `E2E_NO_SANDBOX`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("E2E_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(headed) = lookup("E2E_HEADED") {
            config.headless = !parse_flag(&headed)
                .with_context(|| format!("Invalid E2E_HEADED value: {:?}", headed))?;
        }
        if let Some(ms) = lookup("E2E_TIMEOUT_MS") {
            let ms: u64 = ms
                .trim()
                .parse()
                .with_context(|| format!("Invalid E2E_TIMEOUT_MS value: {:?}", ms))?;
            config.presence_timeout = Duration::from_millis(ms);
        }
        if let Some(dir) = lookup("E2E_SCREENSHOT_DIR").filter(|v| !v.trim().is_empty()) {
            config.screenshot_dir = PathBuf::from(dir);
        }
        if let Some(flag) = lookup("E2E_NO_SANDBOX") {
            config.no_sandbox = parse_flag(&flag)
                .with_context(|| format!("Invalid E2E_NO_SANDBOX value: {:?}", flag))?;
        }

        Ok(config)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
