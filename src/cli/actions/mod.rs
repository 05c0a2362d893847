pub mod auth;
pub mod flags;
pub mod settings;
pub mod subscriptions;

// Internal "interpreter" for `Action`.
// We keep the match in a separate module so `mod.rs` stays small as more actions are added.
mod run;

use crate::{
    api::{ApiClient, Resource, ResourceClient},
    cli::globals::GlobalArgs,
    view::{render, Collection, Identified},
};
use anyhow::{bail, Result};
use serde::Serialize;
use std::fmt::Display;
use tracing::{info, warn};

#[derive(Debug)]
pub enum Action {
    Login(auth::LoginArgs),
    Logout(GlobalArgs),
    Status(GlobalArgs),
    Subscriptions(GlobalArgs),
    Show(subscriptions::ShowArgs),
    Flags(flags::Args),
    Settings(settings::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> Result<()> {
        run::execute(self).await
    }
}

/// API client for commands that need a session.
fn authenticated(globals: &GlobalArgs) -> Result<ApiClient> {
    let api = globals.api()?;

    if !api.session().is_authenticated() {
        bail!("not logged in, run `subadmin login` first");
    }

    Ok(api)
}

fn print_one<T: Serialize + Display>(globals: &GlobalArgs, item: &T) -> Result<()> {
    if globals.json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{item}");
    }
    Ok(())
}

fn print_list<T: Serialize + Display>(globals: &GlobalArgs, items: &[T], empty: &str) -> Result<()> {
    if globals.json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        print!("{}", render(items, empty));
    }
    Ok(())
}

/// List the collection, create one entity and merge it into the listed view.
/// # Errors
/// Returns an error if either API call fails.
async fn create_into<R>(
    client: &ResourceClient<R>,
    subscription: &str,
    new: &R::New,
) -> Result<Collection<R::Entity>>
where
    R: Resource,
    R::Entity: Identified,
{
    let mut view = Collection::new(client.list(subscription).await?);

    let created = client.create(subscription, new).await?;
    info!("created {} {} in {}", R::SINGULAR, created.id(), subscription);

    view.insert(created);

    Ok(view)
}

/// List the collection, delete one entity and drop it from the listed view.
/// # Errors
/// Returns an error if either API call fails.
async fn delete_from<R>(
    client: &ResourceClient<R>,
    subscription: &str,
    id: &str,
) -> Result<Collection<R::Entity>>
where
    R: Resource,
    R::Entity: Identified,
{
    let mut view = Collection::new(client.list(subscription).await?);

    client.delete(subscription, id).await?;
    info!("deleted {} {} in {}", R::SINGULAR, id, subscription);

    if view.remove(id).is_none() {
        warn!("{} {} was not in the listed {}", R::SINGULAR, id, R::PLURAL);
    }

    Ok(view)
}
