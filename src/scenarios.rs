use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{ensure, Result};

use crate::browser::BrowserSession;
use crate::config::E2eConfig;
use crate::pages::{BasePage, FormComponent, HeaderComponent, LoginPage, PageObject};

/// Flows the binary can run against a live dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Scenario {
    /// Open the dashboard and walk Forms > Form Layouts.
    Smoke,
    /// Fill and submit the grid sign-in form.
    Login,
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Smoke => f.write_str("smoke"),
            Self::Login => f.write_str("login"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub elapsed: Duration,
    /// `None` on success, the error chain otherwise.
    pub failure: Option<String>,
    /// Screenshot taken when the scenario failed.
    pub screenshot: Option<PathBuf>,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

pub async fn run_smoke(base: &BasePage) -> Result<()> {
    base.goto(&base.config().base_url).await?;

    let header = HeaderComponent::new(base.clone());
    header.wait_until_ready().await?;
    header.navigate_to_forms().await?;
    base.get_by_text("Form Layouts").click().await?;

    let form = FormComponent::new(base.clone());
    form.wait_until_ready().await?;
    base.assert_element_present(&base.get_by_exact_text("Using the Grid"), None)
        .await?;
    Ok(())
}

pub async fn run_login(base: &BasePage, credentials: &Credentials) -> Result<()> {
    let login = LoginPage::new(base.clone());
    login.navigate_to_login().await?;
    login.form.wait_until_ready().await?;
    login.sign_in(&credentials.email, &credentials.password).await?;

    // The sample app does not navigate on submit; the form keeps what was typed
    let email = login.form.email_value().await?;
    ensure!(
        email == credentials.email,
        "Email field holds {:?} after sign in, expected {:?}",
        email,
        credentials.email
    );
    ensure!(
        !login.has_error_message().await?,
        "Sign in showed an error: {}",
        login.error_message().await?
    );
    Ok(())
}

/// Run one scenario in a fresh tab, screenshotting the page if it fails.
pub async fn run(
    session: &BrowserSession,
    config: Arc<E2eConfig>,
    scenario: Scenario,
    credentials: &Credentials,
) -> Result<ScenarioReport> {
    let page = session.new_page("about:blank").await?;
    let base = BasePage::new(page, config);

    tracing::info!("Running scenario {}", scenario);
    let start = Instant::now();
    let result = match scenario {
        Scenario::Smoke => run_smoke(&base).await,
        Scenario::Login => run_login(&base, credentials).await,
    };
    let elapsed = start.elapsed();

    let (failure, screenshot) = match result {
        Ok(()) => (None, None),
        Err(e) => {
            tracing::error!("Scenario {} failed: {:#}", scenario, e);
            let screenshot = match base.take_screenshot(&format!("{}-failure", scenario)).await {
                Ok(path) => Some(path),
                Err(shot_err) => {
                    tracing::warn!("Could not capture failure screenshot: {:#}", shot_err);
                    None
                }
            };
            (Some(format!("{:#}", e)), screenshot)
        }
    };

    Ok(ScenarioReport {
        scenario,
        elapsed,
        failure,
        screenshot,
    })
}
