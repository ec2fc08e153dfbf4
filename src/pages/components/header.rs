use anyhow::Result;
use async_trait::async_trait;

use crate::interaction::wait::ElementState;
use crate::locator::Locator;
use crate::pages::base::{BasePage, PageObject};

/// Sidebar menu and header bar shared by every dashboard screen.
#[derive(Debug, Clone)]
pub struct HeaderComponent {
    base: BasePage,
    pub forms_menu: Locator,
    pub charts_menu: Locator,
    pub tables_menu: Locator,
    pub dashboard_title: Locator,
    pub user_menu: Locator,
    pub logout_button: Locator,
}

impl HeaderComponent {
    pub fn new(base: BasePage) -> Self {
        let forms_menu = base.get_by_role("link", Some("Forms"));
        let charts_menu = base.get_by_role("link", Some("Charts"));
        let tables_menu = base.get_by_role("link", Some("Tables"));
        let dashboard_title = base.get_by_title("Iot Dashboard");
        let user_menu = base.get_by_role("button", Some("User Menu"));
        let logout_button = base.get_by_role("button", Some("Logout"));

        Self {
            base,
            forms_menu,
            charts_menu,
            tables_menu,
            dashboard_title,
            user_menu,
            logout_button,
        }
    }

    pub async fn navigate_to_forms(&self) -> Result<()> {
        self.open_section(&self.forms_menu).await
    }

    pub async fn navigate_to_charts(&self) -> Result<()> {
        self.open_section(&self.charts_menu).await
    }

    pub async fn navigate_to_tables(&self) -> Result<()> {
        self.open_section(&self.tables_menu).await
    }

    async fn open_section(&self, menu: &Locator) -> Result<()> {
        menu.click().await?;
        self.base.wait_for_network_idle().await
    }

    pub async fn is_header_visible(&self) -> Result<bool> {
        self.dashboard_title.is_visible().await
    }

    pub async fn dashboard_title(&self) -> Result<String> {
        self.base.element_text(&self.dashboard_title).await
    }

    pub async fn open_user_menu(&self) -> Result<()> {
        self.user_menu.click().await?;
        Ok(())
    }

    pub async fn logout(&self) -> Result<()> {
        self.open_user_menu().await?;
        self.logout_button.click().await?;
        Ok(())
    }

    pub async fn is_user_logged_in(&self) -> Result<bool> {
        self.user_menu.is_visible().await
    }
}

#[async_trait]
impl PageObject for HeaderComponent {
    fn base(&self) -> &BasePage {
        &self.base
    }

    fn page_name(&self) -> &str {
        "header"
    }

    async fn wait_until_ready(&self) -> Result<()> {
        self.base
            .wait_for_state(&self.forms_menu, ElementState::Visible)
            .await
    }
}
