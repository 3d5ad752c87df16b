pub mod config;

pub use config::{KeyGenConfig, DEFAULT_MAX_ATTEMPTS};
