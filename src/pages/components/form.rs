use anyhow::Result;
use async_trait::async_trait;

use crate::interaction::wait::ElementState;
use crate::locator::Locator;
use crate::pages::base::{BasePage, PageObject};

/// The sign-in form on the Form Layouts screen, usable from any page that embeds it.
#[derive(Debug, Clone)]
pub struct FormComponent {
    base: BasePage,
    pub email_input: Locator,
    pub password_input: Locator,
    pub submit_button: Locator,
    pub remember_me_checkbox: Locator,
    pub error_message: Locator,
    pub success_message: Locator,
}

impl FormComponent {
    pub fn new(base: BasePage) -> Self {
        // Scoped to one card: several cards on the screen carry an Email field
        let email_input = base
            .locator("nb-card")
            .filter_has_text("Using the grid")
            .get_by_role("textbox", Some("Email"));
        let password_input = base.get_by_role("textbox", Some("Password")).first();
        let submit_button = base.get_by_role("button", Some("Sign in")).first();
        let remember_me_checkbox = base.locator("nb-checkbox").first();
        let error_message = base.locator(".error-message, .alert-danger");
        let success_message = base.locator(".success-message, .alert-success");

        Self {
            base,
            email_input,
            password_input,
            submit_button,
            remember_me_checkbox,
            error_message,
            success_message,
        }
    }

    pub async fn fill_email(&self, email: &str) -> Result<()> {
        self.email_input.fill(email).await
    }

    pub async fn fill_password(&self, password: &str) -> Result<()> {
        self.password_input.fill(password).await
    }

    pub async fn submit_form(&self) -> Result<()> {
        self.submit_button.click().await?;
        Ok(())
    }

    pub async fn submit_form_with_credentials(&self, email: &str, password: &str) -> Result<()> {
        self.fill_email(email).await?;
        self.fill_password(password).await?;
        self.submit_form().await
    }

    pub async fn submit_form_with_remember_me(&self, email: &str, password: &str) -> Result<()> {
        self.fill_email(email).await?;
        self.fill_password(password).await?;
        self.remember_me_checkbox.click().await?;
        self.submit_form().await
    }

    pub async fn clear_form(&self) -> Result<()> {
        self.email_input.clear().await?;
        self.password_input.clear().await
    }

    pub async fn is_form_visible(&self) -> Result<bool> {
        Ok(self.email_input.is_visible().await? && self.password_input.is_visible().await?)
    }

    pub async fn email_value(&self) -> Result<String> {
        self.email_input.input_value().await
    }

    pub async fn password_value(&self) -> Result<String> {
        self.password_input.input_value().await
    }

    pub async fn is_remember_me_checked(&self) -> Result<bool> {
        self.remember_me_checkbox.is_checked().await
    }

    /// Text of the error banner, or empty when none is shown.
    pub async fn error_message(&self) -> Result<String> {
        self.visible_text(&self.error_message).await
    }

    /// Text of the success banner, or empty when none is shown.
    pub async fn success_message(&self) -> Result<String> {
        self.visible_text(&self.success_message).await
    }

    pub async fn has_error_message(&self) -> Result<bool> {
        self.error_message.is_visible().await
    }

    pub async fn has_success_message(&self) -> Result<bool> {
        self.success_message.is_visible().await
    }

    pub async fn wait_for_form_ready(&self) -> Result<()> {
        for locator in [&self.email_input, &self.password_input, &self.submit_button] {
            self.base.wait_for_state(locator, ElementState::Visible).await?;
        }
        Ok(())
    }

    async fn visible_text(&self, locator: &Locator) -> Result<String> {
        if locator.is_visible().await? {
            self.base.element_text(locator).await
        } else {
            Ok(String::new())
        }
    }
}

#[async_trait]
impl PageObject for FormComponent {
    fn base(&self) -> &BasePage {
        &self.base
    }

    fn page_name(&self) -> &str {
        "form"
    }

    async fn wait_until_ready(&self) -> Result<()> {
        self.wait_for_form_ready().await
    }
}
