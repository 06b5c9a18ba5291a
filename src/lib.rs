pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use config::{toml_config::TomlConfig, RelayConfig};
pub use core::{dispatcher::MailChannelsDispatcher, handler::RegistrationHandler};
pub use domain::model::{HandlerResponse, InboundRequest};
pub use utils::error::{RelayError, Result};
