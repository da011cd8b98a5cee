pub mod config;
pub mod count;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use count::{normalize_count, RawCount};
pub use error::TagScoutError;
pub use types::*;
