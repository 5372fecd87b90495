pub mod capture_provider;
pub mod encoder;
pub mod notifier;
pub mod session_delegate;
pub mod vault;
