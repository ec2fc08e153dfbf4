use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use admin_e2e::browser::BrowserSession;
use admin_e2e::scenarios::{self, Credentials, Scenario};
use admin_e2e::E2eConfig;

/// admin-e2e: page-object UI checks for the admin dashboard
#[derive(Parser)]
#[command(name = "admin-e2e", version, about)]
struct Cli {
    /// Root URL of the dashboard under test
    #[arg(long, env = "E2E_BASE_URL")]
    base_url: Option<String>,

    /// Run Chrome with a visible window (default: headless)
    #[arg(long)]
    headed: bool,

    /// Launch Chrome with --no-sandbox (containers, root users)
    #[arg(long)]
    no_sandbox: bool,

    /// Default timeout for presence and clickability checks
    #[arg(long, env = "E2E_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Where failure screenshots are written
    #[arg(long, env = "E2E_SCREENSHOT_DIR")]
    screenshot_dir: Option<PathBuf>,

    /// Scenarios to run, in order (default: all)
    #[arg(long, value_enum)]
    scenario: Vec<Scenario>,

    #[arg(long, default_value = "test@test.com")]
    email: String,

    #[arg(long, default_value = "password")]
    password: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut config = E2eConfig::from_env()?;
    if let Some(url) = cli.base_url {
        config.base_url = url;
    }
    if cli.headed {
        config.headless = false;
    }
    if cli.no_sandbox {
        config.no_sandbox = true;
    }
    if let Some(ms) = cli.timeout_ms {
        config.presence_timeout = Duration::from_millis(ms);
    }
    if let Some(dir) = cli.screenshot_dir {
        config.screenshot_dir = dir;
    }
    let config = Arc::new(config);

    let selected = if cli.scenario.is_empty() {
        vec![Scenario::Smoke, Scenario::Login]
    } else {
        cli.scenario
    };
    let credentials = Credentials {
        email: cli.email,
        password: cli.password,
    };

    tracing::info!("Testing {} (headless: {})", config.base_url, config.headless);
    let session = BrowserSession::launch(&config).await?;

    let mut failed = 0;
    for scenario in selected {
        let report = scenarios::run(&session, config.clone(), scenario, &credentials).await?;
        match &report.failure {
            None => println!("PASS {} ({}ms)", report.scenario, report.elapsed.as_millis()),
            Some(reason) => {
                failed += 1;
                println!("FAIL {} ({}ms): {}", report.scenario, report.elapsed.as_millis(), reason);
                if let Some(path) = &report.screenshot {
                    println!("     screenshot: {}", path.display());
                }
            }
        }
    }

    // Always kill Chrome before exiting
    if let Err(e) = session.close().await {
        tracing::warn!("Browser did not shut down cleanly: {:#}", e);
    }

    if failed > 0 {
        anyhow::bail!("{} scenario(s) failed", failed);
    }
    Ok(())
}
