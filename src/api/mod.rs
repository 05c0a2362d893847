//! Typed access to the subscription API. One [`ApiClient`] is built per process and
//! cloned into each [`ResourceClient`]; every request reads the bearer token from the
//! shared [`SessionManager`] at send time.

pub mod catalog;
pub mod models;
pub mod resource;
pub mod subscription;

pub use self::catalog::{Catalog, SubscriptionSummary};
pub use self::models::{
    FeatureFlag, FeatureFlagPatch, NewFeatureFlag, NewSetting, Setting, SettingPatch,
    Subscription, SubscriptionStatus,
};
pub use self::resource::{FeatureFlags, Resource, ResourceClient, Settings, SingleFetch};
pub use self::subscription::SubscriptionClient;

use crate::{
    error::{Error, Result},
    session::SessionManager,
    APP_USER_AGENT,
};
use reqwest::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    Client, Method, RequestBuilder,
};
use std::sync::Arc;
use url::Url;

/// HTTP client shared by the session manager and the resource clients.
/// # Errors
/// Returns an error if the TLS backend cannot be initialized.
pub fn http_client() -> Result<Client> {
    Ok(Client::builder().user_agent(APP_USER_AGENT).build()?)
}

/// Append percent-encoded path segments to the API base URL.
/// # Errors
/// Returns [`Error::InvalidBaseUrl`] if the base URL cannot carry a path.
pub fn endpoint_url(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();

    url.path_segments_mut()
        .map_err(|()| Error::InvalidBaseUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    session: Arc<SessionManager>,
}

impl ApiClient {
    #[must_use]
    pub fn new(client: Client, session: Arc<SessionManager>) -> Self {
        Self { client, session }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    #[must_use]
    pub fn feature_flags(&self) -> ResourceClient<FeatureFlags> {
        ResourceClient::new(self.clone())
    }

    #[must_use]
    pub fn settings(&self) -> ResourceClient<Settings> {
        ResourceClient::new(self.clone())
    }

    #[must_use]
    pub fn subscriptions(&self, catalog: Catalog) -> SubscriptionClient {
        SubscriptionClient::new(self.clone(), catalog)
    }

    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url> {
        endpoint_url(self.session.base_url(), segments)
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(AUTHORIZATION, self.session.authorization())
            .header(CONTENT_TYPE, "application/json")
    }
}
