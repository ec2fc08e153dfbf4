use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use admin_e2e::browser::{launcher, BrowserSession};
use admin_e2e::interaction::click::ClickMethod;
use admin_e2e::pages::{BasePage, FormComponent, HeaderComponent, LoginPage, PageObject};
use admin_e2e::scenarios::{self, Credentials, Scenario};
use admin_e2e::{E2eConfig, ElementProbe, ElementState, ReadinessError};

struct Harness {
    base: BasePage,
    session: BrowserSession,
    config: Arc<E2eConfig>,
    _shots: tempfile::TempDir,
}

fn fixture_url(name: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = PathBuf::from(manifest_dir).join("fixtures").join(name);
    format!("file://{}", path.display())
}

/// Launch Chrome on the dashboard fixture, or `None` when no Chrome is installed.
async fn open_dashboard() -> Option<Harness> {
    if launcher::find_chrome_binary().is_err() {
        eprintln!("skipping: Chrome/Chromium not found");
        return None;
    }

    let shots = tempfile::tempdir().expect("Failed to create temp dir");
    let config = Arc::new(E2eConfig {
        base_url: fixture_url("dashboard.html"),
        presence_timeout: Duration::from_secs(3),
        hidden_timeout: Duration::from_secs(2),
        navigation_timeout: Duration::from_secs(10),
        screenshot_dir: shots.path().to_path_buf(),
        no_sandbox: true,
        ..E2eConfig::default()
    });

    let session = BrowserSession::launch(&config)
        .await
        .expect("Failed to launch browser");
    let page = session
        .new_page(&config.base_url)
        .await
        .expect("Failed to open fixture");
    let base = BasePage::new(page, config.clone());
    base.wait_for_page_load().await.expect("Fixture did not load");

    Some(Harness {
        base,
        session,
        config,
        _shots: shots,
    })
}

/// Reveal the Form Layouts section the way a user would.
async fn open_form_layouts(base: &BasePage) {
    base.get_by_text("Forms").first().click().await.unwrap();
    base.get_by_text("Form Layouts").click().await.unwrap();
    base.wait_for_element(&base.get_by_exact_text("Using the Grid"), None)
        .await
        .unwrap();
}

// ── Readiness helpers ───────────────────────────────────────────────────

#[tokio::test]
async fn test_visible_element_is_present_immediately() {
    let Some(h) = open_dashboard().await else { return };
    let logo = h.base.get_by_title("Iot Dashboard");

    let start = Instant::now();
    assert!(h.base.is_element_present(&logo, None).await);
    assert!(start.elapsed() < Duration::from_secs(2));
    h.base.assert_element_present(&logo, None).await.unwrap();
}

#[tokio::test]
async fn test_hidden_element_times_out_quickly() {
    let Some(h) = open_dashboard().await else { return };
    let hidden = h.base.locator("#never-shown");

    let start = Instant::now();
    assert!(!h.base.is_element_present(&hidden, Some(100)).await);
    assert!(start.elapsed() < Duration::from_millis(1000));

    let err = h
        .base
        .assert_element_present(&hidden, Some(100))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("100"));
    assert!(err.to_string().contains("#never-shown"));
}

#[tokio::test]
async fn test_transparent_element_is_not_present() {
    let Some(h) = open_dashboard().await else { return };
    assert!(!h.base.is_element_present(&h.base.locator("#transparent"), Some(200)).await);
}

#[tokio::test]
async fn test_disabled_button_is_visible_but_not_clickable() {
    let Some(h) = open_dashboard().await else { return };

    for selector in ["#archive", "#restore"] {
        let button = h.base.locator(selector);
        assert!(h.base.is_element_visible(&button).await.unwrap());
        assert!(!h.base.is_element_enabled(&button).await.unwrap());
        assert!(!h.base.is_element_clickable(&button, Some(300)).await);

        let err = h
            .base
            .assert_element_clickable(&button, Some(300))
            .await
            .unwrap_err();
        assert!(matches!(err, ReadinessError::Disabled { timeout_ms: 300, .. }));
    }

    let reveal = h.base.get_by_role("button", Some("Reveal"));
    assert!(h.base.is_element_clickable(&reveal, Some(300)).await);
}

#[tokio::test]
async fn test_missing_element_is_reported_as_not_found() {
    let Some(h) = open_dashboard().await else { return };
    let err = h
        .base
        .assert_element_clickable(&h.base.locator("#does-not-exist"), Some(150))
        .await
        .unwrap_err();
    assert!(matches!(err, ReadinessError::NotFound { .. }));
}

#[tokio::test]
async fn test_waits_for_delayed_element_and_hidden_spinner() {
    let Some(h) = open_dashboard().await else { return };
    let late = h.base.locator("#late");
    let spinner = h.base.locator("#spinner");

    assert!(!h.base.is_element_visible(&late).await.unwrap());
    h.base.locator("#reveal").click().await.unwrap();

    h.base.wait_for_element(&late, Some(3000)).await.unwrap();
    h.base.wait_for_element_hidden(&spinner, None).await.unwrap();
    assert!(late.wait_for(ElementState::Attached, Duration::from_millis(100)).await.is_ready());
    assert!(spinner.wait_for(ElementState::Detached, Duration::from_millis(100)).await.is_ready());
}

#[tokio::test]
async fn test_wait_for_hidden_fails_for_visible_element() {
    let Some(h) = open_dashboard().await else { return };
    let err = h
        .base
        .wait_for_element_hidden(&h.base.get_by_title("Iot Dashboard"), Some(200))
        .await
        .unwrap_err();
    assert!(matches!(err, ReadinessError::StillVisible { .. }));
}

// ── Locator strategies ──────────────────────────────────────────────────

#[tokio::test]
async fn test_css_xpath_and_text_selectors_resolve() {
    let Some(h) = open_dashboard().await else { return };
    open_form_layouts(&h.base).await;
    let base = &h.base;

    assert!(base.locator("input").first().is_visible().await.unwrap());
    assert!(base.locator("#inputEmail").is_visible().await.unwrap());
    assert!(base.locator(".shape-rectangle").first().is_visible().await.unwrap());
    assert!(base
        .locator("[class='input-full-width size-medium status-basic shape-rectangle nb-transition']")
        .is_visible()
        .await
        .unwrap());
    assert!(base.locator("[placeholder='Email']").is_visible().await.unwrap());
    assert!(base
        .locator("input[placeholder='Email'].shape-rectangle")
        .is_visible()
        .await
        .unwrap());
    assert!(base.locator("//*[@id='inputEmail1']").is_visible().await.unwrap());
    assert!(base.locator(r#":text("Using")"#).is_visible().await.unwrap());
    assert!(base.locator(r#":text-is("Using the Grid")"#).is_visible().await.unwrap());
}

#[tokio::test]
async fn test_user_facing_locators() {
    let Some(h) = open_dashboard().await else { return };
    open_form_layouts(&h.base).await;
    let base = &h.base;

    assert_eq!(base.get_by_role("textbox", Some("Email")).count().await.unwrap(), 2);
    assert_eq!(base.get_by_label("Email").count().await.unwrap(), 2);
    assert!(base.get_by_placeholder("Jane Doe").is_visible().await.unwrap());
    assert!(base.get_by_role("heading", Some("Sign In")).is_visible().await.unwrap());
    assert_eq!(
        base.get_by_test_id("SignIn").text_content().await.unwrap().as_deref(),
        Some("Test id target")
    );
    base.get_by_role("textbox", Some("Email")).first().click().await.unwrap();
    base.get_by_placeholder("Jane Doe").click().await.unwrap();
}

#[tokio::test]
async fn test_chained_and_filtered_locators() {
    let Some(h) = open_dashboard().await else { return };
    open_form_layouts(&h.base).await;
    let base = &h.base;

    let option_two = base
        .locator("nb-card")
        .locator("nb-radio")
        .locator(r#":text-is("Option 2")"#);
    option_two.click().await.unwrap();
    let checked = base.locator("input[value='2']").is_checked().await.unwrap();
    assert!(checked);

    let grid_email = base
        .locator("nb-card")
        .filter_has(&base.locator("#inputEmail1"))
        .get_by_role("textbox", Some("Email"));
    assert_eq!(grid_email.count().await.unwrap(), 1);

    let basic_email = base
        .locator("nb-card")
        .filter_has_text("Basic form")
        .get_by_role("textbox", Some("Email"));
    assert_eq!(basic_email.count().await.unwrap(), 1);

    let via_parent = base
        .locator(r#":text-is("Using the Grid")"#)
        .locator("..")
        .get_by_role("textbox", Some("Email"));
    assert_eq!(via_parent.count().await.unwrap(), 1);

    let last_card_button = base.locator("nb-card").nth(1).get_by_role("button", None);
    assert_eq!(
        last_card_button.text_content().await.unwrap().as_deref(),
        Some("Submit")
    );
    let last_card = base.locator("nb-card").last().get_by_role("button", None);
    assert_eq!(last_card.text_content().await.unwrap().as_deref(), Some("Submit"));

    let grid_form = base.locator("#inputEmail1").parent();
    assert_eq!(
        grid_form.get_by_role("button", Some("Sign in")).count().await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_ambiguous_locator_is_a_strict_mode_violation() {
    let Some(h) = open_dashboard().await else { return };
    open_form_layouts(&h.base).await;

    let err = h.base.locator("input[type=email]").is_visible().await.unwrap_err();
    assert!(err.to_string().contains("strict mode violation"), "{}", err);
    assert!(!h.base.is_element_present(&h.base.locator("input[type=email]"), Some(100)).await);
}

#[tokio::test]
async fn test_fill_and_read_back_value() {
    let Some(h) = open_dashboard().await else { return };
    open_form_layouts(&h.base).await;

    let basic_form = h.base.locator("nb-card").filter_has_text("Basic form");
    let email = basic_form.get_by_role("textbox", Some("Email"));
    email.fill("test@test.com").await.unwrap();
    assert_eq!(email.input_value().await.unwrap(), "test@test.com");

    email.clear().await.unwrap();
    assert_eq!(email.input_value().await.unwrap(), "");
}

// ── Page objects ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_page_sign_in_flow() {
    let Some(h) = open_dashboard().await else { return };
    let login = LoginPage::new(h.base.clone());

    login.navigate_to_login().await.unwrap();
    login.wait_until_ready().await.unwrap();
    assert_eq!(login.page_name(), "login");
    assert_eq!(login.login_title().await.unwrap(), "Sign In");

    login.sign_in("test@test.com", "password").await.unwrap();
    assert_eq!(login.form.email_value().await.unwrap(), "test@test.com");
    assert_eq!(login.form.password_value().await.unwrap(), "password");
    assert!(!login.has_error_message().await.unwrap());
    assert_eq!(login.error_message().await.unwrap(), "");
    assert!(login.form.has_success_message().await.unwrap());
    assert_eq!(login.form.success_message().await.unwrap(), "Signed in");
    assert!(login.is_sign_in_successful().await.unwrap());
}

#[tokio::test]
async fn test_empty_submit_shows_error() {
    let Some(h) = open_dashboard().await else { return };
    open_form_layouts(&h.base).await;
    let form = FormComponent::new(h.base.clone());

    form.wait_for_form_ready().await.unwrap();
    assert!(form.is_form_visible().await.unwrap());
    form.clear_form().await.unwrap();
    form.submit_form().await.unwrap();

    h.base.wait_for_element(&form.error_message, Some(2000)).await.unwrap();
    assert_eq!(form.error_message().await.unwrap(), "Email is required");
    assert!(!form.has_success_message().await.unwrap());
}

#[tokio::test]
async fn test_remember_me_toggles_checkbox() {
    let Some(h) = open_dashboard().await else { return };
    open_form_layouts(&h.base).await;
    let form = FormComponent::new(h.base.clone());

    assert!(!form.is_remember_me_checked().await.unwrap());
    form.submit_form_with_remember_me("test@test.com", "welcome")
        .await
        .unwrap();
    assert!(form.is_remember_me_checked().await.unwrap());
}

#[tokio::test]
async fn test_header_navigation_and_logout() {
    let Some(h) = open_dashboard().await else { return };
    let header = HeaderComponent::new(h.base.clone());

    header.wait_until_ready().await.unwrap();
    assert!(header.is_header_visible().await.unwrap());
    assert_eq!(header.dashboard_title().await.unwrap(), "IoT Dashboard");

    header.navigate_to_forms().await.unwrap();
    assert!(h.base.is_element_present(&h.base.get_by_text("Form Layouts"), None).await);

    assert!(header.is_user_logged_in().await.unwrap());
    header.logout().await.unwrap();
    h.base.wait_for_element_hidden(&header.user_menu, None).await.unwrap();
    assert!(!header.is_user_logged_in().await.unwrap());
}

#[tokio::test]
async fn test_header_menu_links() {
    let Some(h) = open_dashboard().await else { return };
    let header = HeaderComponent::new(h.base.clone());

    header.navigate_to_charts().await.unwrap();
    assert!(header.base().url().await.unwrap().ends_with("#charts"));
    header.navigate_to_tables().await.unwrap();
    assert!(header.base().url().await.unwrap().ends_with("#tables"));
}

#[tokio::test]
async fn test_login_page_remember_me_and_links() {
    let Some(h) = open_dashboard().await else { return };
    let login = LoginPage::new(h.base.clone());

    login.navigate_to_login().await.unwrap();
    login
        .sign_in_with_remember_me("test@test.com", "welcome")
        .await
        .unwrap();
    assert!(login.form.is_remember_me_checked().await.unwrap());
    assert!(login.form.has_success_message().await.unwrap());

    login.navigate_to_forgot_password().await.unwrap();
    assert!(h.base.url().await.unwrap().ends_with("#forgot"));
    login.navigate_to_create_account().await.unwrap();
    assert!(h.base.url().await.unwrap().ends_with("#create"));
}

#[tokio::test]
async fn test_click_on_unobscured_element_uses_mouse_events() {
    let Some(h) = open_dashboard().await else { return };
    let method = h.base.locator("#reveal").click().await.unwrap();
    assert_eq!(method, ClickMethod::MouseEvents);
}

#[tokio::test]
async fn test_title_and_screenshot() {
    let Some(h) = open_dashboard().await else { return };
    assert_eq!(h.base.title().await.unwrap(), "Admin Dashboard Fixture");
    assert!(h.base.url().await.unwrap().ends_with("dashboard.html"));

    let path = h.base.take_screenshot("dashboard").await.unwrap();
    assert!(path.starts_with(&h.base.config().screenshot_dir));
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("dashboard-"));
    assert!(name.ends_with(".png"));
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");
}

#[tokio::test]
async fn test_scroll_into_view() {
    let Some(h) = open_dashboard().await else { return };
    open_form_layouts(&h.base).await;
    h.base
        .scroll_into_view(&h.base.get_by_role("link", Some("Create Account")))
        .await
        .unwrap();
}

// ── Scenarios ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_scenarios_pass_against_fixture() {
    let Some(h) = open_dashboard().await else { return };
    let credentials = Credentials {
        email: "test@test.com".to_string(),
        password: "password".to_string(),
    };

    for scenario in [Scenario::Smoke, Scenario::Login] {
        let report = scenarios::run(&h.session, h.config.clone(), scenario, &credentials)
            .await
            .unwrap();
        assert!(report.passed(), "{} failed: {:?}", scenario, report.failure);
        assert!(report.screenshot.is_none());
    }
}

#[tokio::test]
async fn test_failed_scenario_leaves_screenshot() {
    let Some(h) = open_dashboard().await else { return };
    let config = Arc::new(E2eConfig {
        base_url: "about:blank".to_string(),
        presence_timeout: Duration::from_millis(300),
        ..(*h.config).clone()
    });
    let credentials = Credentials {
        email: String::new(),
        password: String::new(),
    };

    let report = scenarios::run(&h.session, config, Scenario::Smoke, &credentials)
        .await
        .unwrap();
    assert!(!report.passed());
    let failure = report.failure.unwrap();
    assert!(failure.contains("did not become visible"), "{}", failure);
    let shot = report.screenshot.expect("failure screenshot");
    assert!(shot.exists());
    assert!(shot
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("smoke-failure-"));
}
