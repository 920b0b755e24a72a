pub mod app;
pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod models;
pub mod render;

pub use error::{Error, Result};
