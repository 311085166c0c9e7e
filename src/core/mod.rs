pub mod config;
pub mod error;

pub use config::{GeneratorConfig, IntegrityPolicy};
pub use error::{CodexError, Result};
