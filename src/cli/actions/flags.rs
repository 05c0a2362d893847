use crate::{
    api::{FeatureFlag, FeatureFlagPatch, FeatureFlags, NewFeatureFlag, ResourceClient},
    cli::{
        actions::{authenticated, create_into, delete_from, print_list, print_one},
        globals::GlobalArgs,
    },
    view::{Collection, NO_FEATURE_FLAGS},
};
use anyhow::{Context, Result};

#[derive(Debug)]
pub enum Op {
    List,
    Create(NewFeatureFlag),
    Update { id: String, patch: FeatureFlagPatch },
    Toggle { id: String },
    Delete { id: String },
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub subscription: String,
    pub op: Op,
}

/// Handle the flags action
/// # Errors
/// Returns an error if there is no session or the API call fails.
pub async fn execute(args: Args) -> Result<()> {
    let api = authenticated(&args.globals)?;
    let flags = api.feature_flags();
    let subscription = args.subscription.as_str();

    match args.op {
        Op::List => {
            let items = flags.list(subscription).await?;
            print_list(&args.globals, &items, NO_FEATURE_FLAGS)
        }
        Op::Create(new) => {
            let view = create_into(&flags, subscription, &new).await?;
            print_list(&args.globals, view.as_slice(), NO_FEATURE_FLAGS)
        }
        Op::Update { id, patch } => {
            let flag = flags.update(subscription, &id, &patch).await?;
            print_one(&args.globals, &flag)
        }
        Op::Toggle { id } => {
            let view = toggle(&flags, subscription, &id).await?;
            print_list(&args.globals, view.as_slice(), NO_FEATURE_FLAGS)
        }
        Op::Delete { id } => {
            let view = delete_from(&flags, subscription, &id).await?;
            print_list(&args.globals, view.as_slice(), NO_FEATURE_FLAGS)
        }
    }
}

/// Flip one flag and merge the server's answer into the listed collection.
/// The list is fetched once; the update result replaces the entry in place.
/// # Errors
/// Returns an error if the flag is unknown or either API call fails.
pub async fn toggle(
    flags: &ResourceClient<FeatureFlags>,
    subscription: &str,
    id: &str,
) -> Result<Collection<FeatureFlag>> {
    let mut view = Collection::new(flags.list(subscription).await?);

    let enabled = view
        .get(id)
        .map(|flag| flag.enabled)
        .with_context(|| format!("feature flag {id} not found in {subscription}"))?;

    let updated = flags
        .update(subscription, id, &FeatureFlagPatch::enabled(!enabled))
        .await?;

    view.apply_update(updated);

    Ok(view)
}
