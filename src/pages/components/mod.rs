pub mod form;
pub mod header;

pub use form::FormComponent;
pub use header::HeaderComponent;
