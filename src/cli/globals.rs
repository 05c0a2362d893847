use crate::{
    api::{http_client, ApiClient},
    session::{FileTokenStore, SessionManager},
};
use anyhow::Result;
use std::{env, path::PathBuf, sync::Arc};
use url::Url;

/// Options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: Url,
    pub state_dir: PathBuf,
    pub json: bool,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: Url, state_dir: PathBuf) -> Self {
        Self {
            api_url,
            state_dir,
            json: false,
        }
    }

    #[must_use]
    pub fn token_store(&self) -> FileTokenStore {
        FileTokenStore::new(&self.state_dir)
    }

    /// Build the session manager and the API client around one HTTP client.
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn api(&self) -> Result<ApiClient> {
        let client = http_client()?;
        let session = SessionManager::new(
            client.clone(),
            self.api_url.clone(),
            Arc::new(self.token_store()),
        );
        Ok(ApiClient::new(client, Arc::new(session)))
    }
}

/// `$XDG_CONFIG_HOME/subadmin`, then `$HOME/.config/subadmin`, then `.subadmin`.
#[must_use]
pub fn default_state_dir() -> PathBuf {
    env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            env::var_os("HOME")
                .filter(|dir| !dir.is_empty())
                .map(|home| PathBuf::from(home).join(".config"))
        })
        .map_or_else(|| PathBuf::from(".subadmin"), |dir| dir.join("subadmin"))
}
