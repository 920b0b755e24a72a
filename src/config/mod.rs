pub mod platform;
pub mod settings;
