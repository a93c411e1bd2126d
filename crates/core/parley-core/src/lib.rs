//! Parley Core
//!
//! Shared foundation for the Parley support widget:
//!
//! - Error type and `Result` alias
//! - Environment-driven configuration
//! - Logging setup
//! - Domain types (ids, contact sessions, conversations, widget settings)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::{
    get_env_opt, get_env_parsed, get_required_env, load_env, load_env_from_path, WidgetConfig,
};
pub use error::{ParleyError, Result};
pub use types::*;
pub use utils::{init_logging, Logger};
