//! Configuration Module
//!
//! Client settings and loading them from files and the environment.

pub mod loader;
pub mod settings;

pub use loader::{ConfigFile, ConfigLoader};
pub use settings::{
    ClientConfig, ClientConfigBuilder, RateLimit, DEFAULT_API_VERSION, DEFAULT_HOST,
    DEFAULT_REQUESTS_PER_SECOND,
};
