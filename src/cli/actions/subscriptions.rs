use crate::{
    api::Catalog,
    cli::{actions::authenticated, globals::GlobalArgs},
    view::render_subscription,
};
use anyhow::Result;

#[derive(Debug)]
pub struct ShowArgs {
    pub globals: GlobalArgs,
    pub subscription: String,
}

/// Handle the subscriptions action
/// # Errors
/// Returns an error if there is no session.
pub fn list(globals: &GlobalArgs) -> Result<()> {
    let client = authenticated(globals)?.subscriptions(Catalog::builtin());
    let catalog = client.catalog();

    if globals.json {
        println!("{}", serde_json::to_string_pretty(catalog.entries())?);
        return Ok(());
    }

    for entry in catalog.entries() {
        println!("{:<10} {:<20} {}", entry.id, entry.name, entry.status);
    }

    Ok(())
}

/// Handle the show action
/// # Errors
/// Returns an error if there is no session or either collection cannot be fetched.
pub async fn show(args: ShowArgs) -> Result<()> {
    let api = authenticated(&args.globals)?;

    let subscription = api
        .subscriptions(Catalog::builtin())
        .get_subscription(&args.subscription)
        .await?;

    if args.globals.json {
        println!("{}", serde_json::to_string_pretty(&subscription)?);
        return Ok(());
    }

    print!("{}", render_subscription(&subscription));

    Ok(())
}
