//! Config persistence and migration

mod config;
mod error;
mod migration;

pub use config::ConfigStore;
pub use error::ConfigError;
pub use migration::{convert_old_configs, convert_old_window};
