//! Command implementations for the `dispensa` binary.
//!
//! Each command loads what it needs through the library, performs one
//! action and prints the result to stdout.

pub mod inventory;
pub mod migrate;
pub mod recipe;
pub mod session;
pub mod shopping;

use std::error::Error;

use dispensa_cli::api::ApiClient;
use dispensa_cli::config::CliConfig;
use dispensa_cli::dashboard::Dashboard;
use dispensa_cli::session::SessionStore;

/// Configuration and session shared by every command.
pub struct Context {
    pub config: CliConfig,
    pub session: SessionStore,
}

impl Context {
    pub fn from_env() -> Result<Self, Box<dyn Error>> {
        let config = CliConfig::from_env()?;
        let session = SessionStore::new(config.session_file.clone());
        Ok(Self { config, session })
    }

    /// Dashboard for the logged-in user, not yet loaded.
    pub fn dashboard(&self) -> Result<Dashboard<ApiClient>, Box<dyn Error>> {
        let user = self.session.require()?;
        let api = ApiClient::new(&self.config.api)?;
        Ok(Dashboard::new(api, user))
    }
}
