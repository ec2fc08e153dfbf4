pub mod browser;
pub mod config;
pub mod interaction;
pub mod locator;
pub mod pages;
pub mod scenarios;
pub mod selectors;

pub use config::E2eConfig;
pub use interaction::readiness::ReadinessError;
pub use interaction::wait::{ElementProbe, ElementState, PollOutcome};
pub use locator::Locator;
