use crate::cli::globals::GlobalArgs;
use anyhow::Result;
use secrecy::SecretString;
use tracing::info;

#[derive(Debug)]
pub struct LoginArgs {
    pub globals: GlobalArgs,
    pub user: String,
    pub password: SecretString,
}

/// Handle the login action
/// # Errors
/// Returns an error if the credentials are rejected or the token cannot be stored.
pub async fn login(args: LoginArgs) -> Result<()> {
    let api = args.globals.api()?;
    let session = api.session();

    let response = session.login(&args.user, &args.password).await?;

    if !session.is_authenticated() {
        println!("Login accepted but no session token was returned");
        return Ok(());
    }

    info!("token stored in {}", args.globals.state_dir.display());

    match response.user {
        Some(user) => println!("Logged in as {user}"),
        None => println!("Logged in as {}", args.user),
    }

    Ok(())
}

/// Handle the logout action
/// # Errors
/// Returns an error if the stored token cannot be removed.
pub fn logout(globals: &GlobalArgs) -> Result<()> {
    globals.api()?.session().logout()?;

    println!("Logged out");

    Ok(())
}

/// Handle the status action
/// # Errors
/// Returns an error if the HTTP client cannot be built.
pub fn status(globals: &GlobalArgs) -> Result<()> {
    let api = globals.api()?;

    if api.session().is_authenticated() {
        println!("Authenticated against {}", globals.api_url);
    } else {
        println!("Not authenticated");
    }

    Ok(())
}
