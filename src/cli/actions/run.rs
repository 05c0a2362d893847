use crate::cli::actions::{auth, flags, settings, subscriptions, Action};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Login(args) => auth::login(args).await,
        Action::Logout(globals) => auth::logout(&globals),
        Action::Status(globals) => auth::status(&globals),
        Action::Subscriptions(globals) => subscriptions::list(&globals),
        Action::Show(args) => subscriptions::show(args).await,
        Action::Flags(args) => flags::execute(args).await,
        Action::Settings(args) => settings::execute(args).await,
    }
}
