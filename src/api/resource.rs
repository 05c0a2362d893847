//! One generic CRUD client for every collection nested under a subscription.
//!
//! A [`Resource`] names the path segment and the payload shapes; the request,
//! status check and error mapping live once in [`ResourceClient`].

use super::{
    models::{FeatureFlag, FeatureFlagPatch, NewFeatureFlag, NewSetting, Setting, SettingPatch},
    ApiClient,
};
use crate::error::{Error, Result};
use reqwest::{Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::{fmt, marker::PhantomData};
use tracing::{debug, info_span, instrument, Instrument};
use url::Url;

/// A collection living at `/subscriptions/{id}/{PATH}`.
pub trait Resource {
    /// Path segment below the subscription.
    const PATH: &'static str;
    /// Label used in error messages about one entity.
    const SINGULAR: &'static str;
    /// Label used in error messages about the collection.
    const PLURAL: &'static str;

    type Entity: DeserializeOwned;
    type New: Serialize;
    type Patch: Serialize;
}

/// Resources whose entities can be fetched one at a time.
pub trait SingleFetch: Resource {}

#[derive(Debug, Clone, Copy)]
pub struct FeatureFlags;

impl Resource for FeatureFlags {
    const PATH: &'static str = "feature-flags";
    const SINGULAR: &'static str = "feature flag";
    const PLURAL: &'static str = "feature flags";

    type Entity = FeatureFlag;
    type New = NewFeatureFlag;
    type Patch = FeatureFlagPatch;
}

#[derive(Debug, Clone, Copy)]
pub struct Settings;

impl Resource for Settings {
    const PATH: &'static str = "settings";
    const SINGULAR: &'static str = "setting";
    const PLURAL: &'static str = "settings";

    type Entity = Setting;
    type New = NewSetting;
    type Patch = SettingPatch;
}

impl SingleFetch for Settings {}

pub struct ResourceClient<R> {
    api: ApiClient,
    resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self::new(self.api.clone())
    }
}

impl<R: Resource> fmt::Debug for ResourceClient<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("resource", &R::PATH)
            .finish_non_exhaustive()
    }
}

impl<R> ResourceClient<R> {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceClient<R> {
    /// # Errors
    /// Returns [`Error::FetchFailed`] on a non-success status and
    /// [`Error::Transport`] if the request or the body decoding fails.
    #[instrument(skip(self), fields(resource = R::PATH))]
    pub async fn list(&self, subscription_id: &str) -> Result<Vec<R::Entity>> {
        let url = self.collection_url(subscription_id)?;
        let response = self.send(Method::GET, url, None::<&()>).await?;

        if let Some(status) = failed(&response) {
            return Err(Error::FetchFailed {
                resource: R::PLURAL,
                status,
            });
        }

        let items: Vec<R::Entity> = response.json().await?;
        debug!("fetched {} {}", items.len(), R::PLURAL);

        Ok(items)
    }

    /// # Errors
    /// Returns [`Error::CreateFailed`] on a non-success status and
    /// [`Error::Transport`] if the request or the body decoding fails.
    #[instrument(skip(self, new), fields(resource = R::PATH))]
    pub async fn create(&self, subscription_id: &str, new: &R::New) -> Result<R::Entity> {
        let url = self.collection_url(subscription_id)?;
        let response = self.send(Method::POST, url, Some(new)).await?;

        if let Some(status) = failed(&response) {
            return Err(Error::CreateFailed {
                resource: R::SINGULAR,
                status,
            });
        }

        Ok(response.json().await?)
    }

    /// Send a partial update, the server answers with the full entity.
    /// # Errors
    /// Returns [`Error::UpdateFailed`] on a non-success status and
    /// [`Error::Transport`] if the request or the body decoding fails.
    #[instrument(skip(self, patch), fields(resource = R::PATH))]
    pub async fn update(
        &self,
        subscription_id: &str,
        id: &str,
        patch: &R::Patch,
    ) -> Result<R::Entity> {
        let url = self.entity_url(subscription_id, id)?;
        let response = self.send(Method::PUT, url, Some(patch)).await?;

        if let Some(status) = failed(&response) {
            return Err(Error::UpdateFailed {
                resource: R::SINGULAR,
                status,
            });
        }

        Ok(response.json().await?)
    }

    /// # Errors
    /// Returns [`Error::DeleteFailed`] on a non-success status and
    /// [`Error::Transport`] if the request fails.
    #[instrument(skip(self), fields(resource = R::PATH))]
    pub async fn delete(&self, subscription_id: &str, id: &str) -> Result<()> {
        let url = self.entity_url(subscription_id, id)?;
        let response = self.send(Method::DELETE, url, None::<&()>).await?;

        if let Some(status) = failed(&response) {
            return Err(Error::DeleteFailed {
                resource: R::SINGULAR,
                status,
            });
        }

        Ok(())
    }

    fn collection_url(&self, subscription_id: &str) -> Result<Url> {
        self.api.url(&["subscriptions", subscription_id, R::PATH])
    }

    fn entity_url(&self, subscription_id: &str, id: &str) -> Result<Url> {
        self.api.url(&["subscriptions", subscription_id, R::PATH, id])
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Response> {
        let span = info_span!(
            "api.request",
            http.method = %method,
            url = %url
        );

        let mut request = self.api.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().instrument(span).await?)
    }
}

impl<R: SingleFetch> ResourceClient<R> {
    /// # Errors
    /// Returns [`Error::FetchFailed`] on a non-success status and
    /// [`Error::Transport`] if the request or the body decoding fails.
    #[instrument(skip(self), fields(resource = R::PATH))]
    pub async fn get(&self, subscription_id: &str, id: &str) -> Result<R::Entity> {
        let url = self.entity_url(subscription_id, id)?;
        let response = self.send(Method::GET, url, None::<&()>).await?;

        if let Some(status) = failed(&response) {
            return Err(Error::FetchFailed {
                resource: R::SINGULAR,
                status,
            });
        }

        Ok(response.json().await?)
    }
}

fn failed(response: &Response) -> Option<StatusCode> {
    let status = response.status();
    (!status.is_success()).then_some(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::http_client,
        session::{MemoryTokenStore, SessionManager, TokenStore, TOKEN_KEY},
    };
    use anyhow::{anyhow, Result};
    use serde_json::json;
    use std::{net::TcpListener, sync::Arc};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn api(server: &MockServer, token: Option<&str>) -> Result<ApiClient> {
        let store = Arc::new(MemoryTokenStore::new());
        if let Some(token) = token {
            store.set(TOKEN_KEY, token)?;
        }
        let client = http_client()?;
        let session = SessionManager::new(client.clone(), Url::parse(&server.uri())?, store);
        Ok(ApiClient::new(client, Arc::new(session)))
    }

    #[tokio::test]
    async fn list_sends_bearer_and_keeps_order() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/subscriptions/sub-001/feature-flags"))
            .and(header("Authorization", "Bearer tok-1"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "f2", "name": "zeta", "enabled": true},
                {"id": "f1", "name": "alpha", "enabled": false, "description": "first"}
            ])))
            .mount(&server)
            .await;

        let flags = api(&server, Some("tok-1"))?
            .feature_flags()
            .list("sub-001")
            .await?;

        let ids: Vec<&str> = flags.iter().map(|flag| flag.id.as_str()).collect();
        assert_eq!(ids, ["f2", "f1"]);
        assert_eq!(flags[1].description.as_deref(), Some("first"));
        Ok(())
    }

    #[tokio::test]
    async fn list_without_session_sends_empty_authorization() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/subscriptions/sub-001/settings"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = api(&server, None)?
            .settings()
            .list("sub-001")
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;

        assert_eq!(err.to_string(), "Failed to fetch settings");
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));

        let requests = server
            .received_requests()
            .await
            .ok_or_else(|| anyhow!("request recording disabled"))?;
        let authorization = requests
            .first()
            .and_then(|request| request.headers.get("authorization"))
            .map(|value| value.as_bytes().to_vec());
        assert_eq!(authorization, Some(Vec::new()));
        Ok(())
    }

    #[tokio::test]
    async fn empty_collection_is_not_an_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/subscriptions/sub-001/feature-flags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let flags = api(&server, Some("tok"))?
            .feature_flags()
            .list("sub-001")
            .await?;
        assert!(flags.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn create_posts_fields_without_id() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/subscriptions/sub-001/settings"))
            .and(body_json(json!({"key": "max_users", "value": "50"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "s9", "key": "max_users", "value": "50"
            })))
            .mount(&server)
            .await;

        let setting = api(&server, Some("tok"))?
            .settings()
            .create(
                "sub-001",
                &NewSetting {
                    key: "max_users".to_string(),
                    value: "50".to_string(),
                    description: None,
                },
            )
            .await?;

        assert_eq!(setting.id, "s9");
        Ok(())
    }

    #[tokio::test]
    async fn update_enables_flag_and_keeps_other_fields() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/subscriptions/sub-001/feature-flags/f1"))
            .and(body_json(json!({"enabled": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "f1", "name": "beta", "enabled": true, "description": "beta ui"
            })))
            .mount(&server)
            .await;

        let flag = api(&server, Some("tok"))?
            .feature_flags()
            .update("sub-001", "f1", &FeatureFlagPatch::enabled(true))
            .await?;

        assert_eq!(
            flag,
            FeatureFlag {
                id: "f1".to_string(),
                name: "beta".to_string(),
                enabled: true,
                description: Some("beta ui".to_string()),
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn status_failures_map_to_operation_errors() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/subscriptions/sub-001/feature-flags/f1"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "errors": ["name taken"]
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/subscriptions/sub-001/feature-flags/f1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/subscriptions/sub-001/feature-flags"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let flags = api(&server, Some("tok"))?.feature_flags();

        let err = flags
            .update("sub-001", "f1", &FeatureFlagPatch::enabled(true))
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;
        assert!(matches!(err, Error::UpdateFailed { .. }));
        assert_eq!(err.to_string(), "Failed to update feature flag");

        let err = flags
            .delete("sub-001", "f1")
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;
        assert!(matches!(err, Error::DeleteFailed { .. }));

        let err = flags
            .create(
                "sub-001",
                &NewFeatureFlag {
                    name: "beta".to_string(),
                    enabled: false,
                    description: None,
                },
            )
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;
        assert!(matches!(err, Error::CreateFailed { .. }));
        assert_eq!(err.to_string(), "Failed to create feature flag");
        Ok(())
    }

    #[tokio::test]
    async fn malformed_body_is_transport_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/subscriptions/sub-001/settings/s1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{"))
            .mount(&server)
            .await;

        let err = api(&server, Some("tok"))?
            .settings()
            .get("sub-001", "s1")
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;
        assert!(matches!(err, Error::Transport(_)));
        Ok(())
    }

    #[tokio::test]
    async fn get_setting_by_id() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/subscriptions/sub-002/settings/s1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "s1", "key": "region", "value": "eu", "description": "data region"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/subscriptions/sub-002/settings/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let settings = api(&server, Some("tok"))?.settings();

        let setting = settings.get("sub-002", "s1").await?;
        assert_eq!(setting.value, "eu");

        let err = settings
            .get("sub-002", "missing")
            .await
            .err()
            .ok_or_else(|| anyhow!("expected error"))?;
        assert_eq!(err.to_string(), "Failed to fetch setting");
        Ok(())
    }
}
