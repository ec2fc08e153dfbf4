use anyhow::Result;
use async_trait::async_trait;

use crate::interaction::wait::ElementState;
use crate::locator::Locator;
use crate::pages::base::{BasePage, PageObject};
use crate::pages::components::{FormComponent, HeaderComponent};

/// Sign-in screen: the shared form and header plus its own links and heading.
#[derive(Debug, Clone)]
pub struct LoginPage {
    base: BasePage,
    pub form: FormComponent,
    pub header: HeaderComponent,
    pub forgot_password_link: Locator,
    pub create_account_link: Locator,
    pub login_title: Locator,
}

impl LoginPage {
    pub fn new(base: BasePage) -> Self {
        Self {
            form: FormComponent::new(base.clone()),
            header: HeaderComponent::new(base.clone()),
            forgot_password_link: base.get_by_role("link", Some("Forgot Password")),
            create_account_link: base.get_by_role("link", Some("Create Account")),
            login_title: base.get_by_role("heading", Some("Sign In")),
            base,
        }
    }

    /// Open the dashboard and walk the menu to Forms > Form Layouts.
    pub async fn navigate_to_login(&self) -> Result<()> {
        self.base.goto(&self.base.config().base_url).await?;
        self.header.navigate_to_forms().await?;
        self.base.get_by_text("Form Layouts").click().await?;
        self.base.wait_for_page_load().await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<()> {
        self.form.submit_form_with_credentials(email, password).await?;
        self.base.wait_for_network_idle().await
    }

    pub async fn sign_in_with_remember_me(&self, email: &str, password: &str) -> Result<()> {
        self.form.submit_form_with_remember_me(email, password).await?;
        self.base.wait_for_network_idle().await
    }

    /// Logged-in header, or a visible "Dashboard" marker.
    pub async fn is_sign_in_successful(&self) -> Result<bool> {
        if self.header.is_user_logged_in().await? {
            return Ok(true);
        }
        self.base.get_by_text("Dashboard").first().is_visible().await
    }

    pub async fn error_message(&self) -> Result<String> {
        self.form.error_message().await
    }

    pub async fn has_error_message(&self) -> Result<bool> {
        self.form.has_error_message().await
    }

    pub async fn clear_form(&self) -> Result<()> {
        self.form.clear_form().await
    }

    pub async fn navigate_to_forgot_password(&self) -> Result<()> {
        self.forgot_password_link.click().await?;
        Ok(())
    }

    pub async fn navigate_to_create_account(&self) -> Result<()> {
        self.create_account_link.click().await?;
        Ok(())
    }

    pub async fn wait_for_login_page_ready(&self) -> Result<()> {
        self.form.wait_for_form_ready().await?;
        self.base
            .wait_for_state(&self.login_title, ElementState::Visible)
            .await
    }

    pub async fn login_title(&self) -> Result<String> {
        self.base.element_text(&self.login_title).await
    }
}

#[async_trait]
impl PageObject for LoginPage {
    fn base(&self) -> &BasePage {
        &self.base
    }

    fn page_name(&self) -> &str {
        "login"
    }

    async fn wait_until_ready(&self) -> Result<()> {
        self.wait_for_login_page_ready().await
    }
}
