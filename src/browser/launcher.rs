use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

/// Environment variable pointing at an explicit Chrome/Chromium binary.
pub const CHROME_ENV: &str = "CHROME_PATH";

/// Executable names tried on `PATH` when no install location matches.
const PATH_NAMES: &[&str] = &[
    "google-chrome",
    "google-chrome-stable",
    "chromium-browser",
    "chromium",
];

#[cfg(target_os = "linux")]
const INSTALL_PATHS: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium-browser",
    "/usr/bin/chromium",
    "/snap/bin/chromium",
];

#[cfg(target_os = "macos")]
const INSTALL_PATHS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
];

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
const INSTALL_PATHS: &[&str] = &[];

/// Resolve the browser for a test run: `CHROME_PATH`, then the usual install
/// locations, then `PATH`.
pub fn find_chrome_binary() -> Result<PathBuf> {
    let explicit = std::env::var_os(CHROME_ENV).map(PathBuf::from);
    let candidates = install_candidates();

    if let Some(path) = pick_installed(explicit.as_deref(), &candidates) {
        tracing::info!("Using Chrome at {}", path.display());
        return Ok(path);
    }
    if let Some(path) = PATH_NAMES.iter().find_map(|name| which::which(name).ok()) {
        tracing::info!("Using Chrome from PATH: {}", path.display());
        return Ok(path);
    }

    let searched: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
    bail!(
        "Could not find Chrome or Chromium (set {} to override). Searched:\n{}",
        CHROME_ENV,
        searched.join("\n")
    )
}

/// First existing file, preferring the explicit override.
fn pick_installed(explicit: Option<&Path>, candidates: &[PathBuf]) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        tracing::warn!("{} points at missing file: {}", CHROME_ENV, path.display());
    }
    candidates.iter().find(|path| path.is_file()).cloned()
}

fn install_candidates() -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = INSTALL_PATHS.iter().map(PathBuf::from).collect();

    // Per-user installs
    #[cfg(target_os = "macos")]
    if let Some(home) = std::env::var_os("HOME") {
        candidates.push(
            PathBuf::from(home).join("Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
        );
    }
    #[cfg(target_os = "windows")]
    for var in ["PROGRAMFILES", "PROGRAMFILES(X86)", "LOCALAPPDATA"] {
        if let Some(dir) = std::env::var_os(var) {
            candidates.push(PathBuf::from(dir).join(r"Google\Chrome\Application\chrome.exe"));
        }
    }

    candidates
}

/// Chrome switches applied to every test browser.
pub fn default_chrome_args() -> Vec<&'static str> {
    vec![
        "--no-first-run",
        "--no-default-browser-check",
        "--disable-background-networking",
        "--disable-client-side-phishing-detection",
        "--disable-default-apps",
        "--disable-extensions",
        "--disable-hang-monitor",
        "--disable-popup-blocking",
        "--disable-prompt-on-repost",
        "--disable-sync",
        "--disable-translate",
        "--metrics-recording-only",
        "--safebrowsing-disable-auto-update",
    ]
}
