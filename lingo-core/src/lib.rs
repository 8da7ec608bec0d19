pub mod error;
pub mod yaml;

pub use error::ConfigError;
