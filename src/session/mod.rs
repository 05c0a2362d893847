//! Session lifecycle: login against the API, keep the bearer token in a
//! [`TokenStore`] and hand it to every outgoing request. The manager never checks
//! token expiry; a stale token stays "authenticated" until the server rejects a call.

pub mod store;

pub use self::store::{FileTokenStore, MemoryTokenStore, TokenStore};

use crate::{
    api::endpoint_url,
    error::{Error, Result},
};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tracing::{debug, info, info_span, instrument, warn, Instrument};
use url::Url;

/// Store key holding the raw token string.
pub const TOKEN_KEY: &str = "auth_token";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} <{}>", self.email),
            None => write!(f, "{}", self.email),
        }
    }
}

/// Payload returned by `POST /users/login`.
#[derive(Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("user", &self.user)
            .finish()
    }
}

pub struct SessionManager {
    client: Client,
    base_url: Url,
    store: Arc<dyn TokenStore>,
    user: Mutex<Option<User>>,
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    #[must_use]
    pub fn new(client: Client, base_url: Url, store: Arc<dyn TokenStore>) -> Self {
        Self {
            client,
            base_url,
            store,
            user: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Exchange credentials for a token and persist it.
    /// # Errors
    /// Returns [`Error::InvalidCredentials`] when the API rejects the login,
    /// [`Error::LoginFailed`] on transport or decoding failures and [`Error::Store`]
    /// if the token cannot be written.
    #[instrument(skip(self, secret))]
    pub async fn login(&self, identifier: &str, secret: &SecretString) -> Result<LoginResponse> {
        let url = endpoint_url(&self.base_url, &["users", "login"])?;

        let payload = json!({
            "user": identifier,
            "password": secret.expose_secret(),
        });

        let span = info_span!(
            "session.login",
            http.method = "POST",
            url = %url
        );
        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .instrument(span)
            .await
            .map_err(Error::LoginFailed)?;

        if !response.status().is_success() {
            warn!("login rejected: {}", response.status());
            return Err(Error::InvalidCredentials);
        }

        let login: LoginResponse = response.json().await.map_err(Error::LoginFailed)?;

        match login.token.as_deref().filter(|token| !token.is_empty()) {
            Some(token) => {
                self.store.set(TOKEN_KEY, token)?;
                *self.user_slot() = login.user.clone();
                info!("session stored");
            }
            None => warn!("login response carried no token, nothing stored"),
        }

        Ok(login)
    }

    /// Drop the stored token. Calling this without a session is a no-op.
    /// # Errors
    /// Returns an error if the store cannot remove the token.
    pub fn logout(&self) -> Result<()> {
        self.store.remove(TOKEN_KEY)?;
        *self.user_slot() = None;
        debug!("session cleared");
        Ok(())
    }

    /// Currently stored token, if any.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token
                .filter(|token| !token.is_empty())
                .map(SecretString::from),
            Err(e) => {
                warn!("Error reading session token: {}", e);
                None
            }
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// User returned by the last successful login in this process.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.user_slot().clone()
    }

    /// Value for the `Authorization` header; empty when there is no session.
    pub(crate) fn authorization(&self) -> String {
        self.token()
            .map(|token| format!("Bearer {}", token.expose_secret()))
            .unwrap_or_default()
    }

    fn user_slot(&self) -> MutexGuard<'_, Option<User>> {
        self.user.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
