pub mod base;
pub mod components;
pub mod login;

pub use base::{BasePage, PageObject};
pub use components::{FormComponent, HeaderComponent};
pub use login::LoginPage;
