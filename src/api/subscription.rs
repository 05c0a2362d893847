use super::{
    catalog::Catalog,
    models::Subscription,
    resource::{FeatureFlags, ResourceClient, Settings},
    ApiClient,
};
use crate::error::Result;
use tracing::instrument;

/// Assembles a [`Subscription`] from its two collections.
#[derive(Debug, Clone)]
pub struct SubscriptionClient {
    feature_flags: ResourceClient<FeatureFlags>,
    settings: ResourceClient<Settings>,
    catalog: Catalog,
}

impl SubscriptionClient {
    #[must_use]
    pub fn new(api: ApiClient, catalog: Catalog) -> Self {
        Self {
            feature_flags: ResourceClient::new(api.clone()),
            settings: ResourceClient::new(api),
            catalog,
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Fetch flags and settings concurrently; the first failure aborts the whole call.
    /// # Errors
    /// Returns the error of whichever collection fetch failed first.
    #[instrument(skip(self))]
    pub async fn get_subscription(&self, subscription_id: &str) -> Result<Subscription> {
        let (feature_flags, settings) = tokio::try_join!(
            self.feature_flags.list(subscription_id),
            self.settings.list(subscription_id),
        )?;

        let summary = self.catalog.summary(subscription_id);

        Ok(Subscription {
            id: summary.id,
            name: summary.name,
            status: summary.status,
            feature_flags,
            settings,
        })
    }
}
