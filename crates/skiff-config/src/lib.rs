pub mod client;
pub mod error;

pub use client::ConfigClient;
pub use error::{ConfigError, Result};
