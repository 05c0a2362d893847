use crate::{
    api::{FeatureFlagPatch, NewFeatureFlag, NewSetting, SettingPatch},
    cli::{
        actions::{auth, flags, settings, subscriptions, Action},
        globals::{default_state_dir, GlobalArgs},
    },
};
use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;
use std::path::PathBuf;
use url::Url;

fn required(matches: &ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: {name}"))
}

fn optional(matches: &ArgMatches, name: &str) -> Option<String> {
    matches.get_one::<String>(name).cloned()
}

/// # Errors
/// Returns an error if the global options cannot be parsed.
pub fn globals(matches: &ArgMatches) -> Result<GlobalArgs> {
    let api_url = required(matches, "api-url")?;
    let api_url = Url::parse(&api_url).context("invalid SUBADMIN_API_URL")?;

    let state_dir = matches
        .get_one::<String>("state-dir")
        .map_or_else(default_state_dir, PathBuf::from);

    Ok(GlobalArgs {
        api_url,
        state_dir,
        json: matches.get_flag("json"),
    })
}

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = globals(matches)?;

    match matches.subcommand() {
        Some(("login", sub_m)) => Ok(Action::Login(auth::LoginArgs {
            globals,
            user: required(sub_m, "user")?,
            password: SecretString::from(required(sub_m, "password")?),
        })),
        Some(("logout", _)) => Ok(Action::Logout(globals)),
        Some(("status", _)) => Ok(Action::Status(globals)),
        Some(("subscriptions", _)) => Ok(Action::Subscriptions(globals)),
        Some(("show", sub_m)) => Ok(Action::Show(subscriptions::ShowArgs {
            globals,
            subscription: required(sub_m, "subscription")?,
        })),
        Some(("flags", sub_m)) => flags_action(globals, sub_m),
        Some(("settings", sub_m)) => settings_action(globals, sub_m),
        _ => bail!("missing subcommand, see --help"),
    }
}

fn flags_action(globals: GlobalArgs, matches: &ArgMatches) -> Result<Action> {
    let Some((name, sub_m)) = matches.subcommand() else {
        bail!("missing flags subcommand, see --help");
    };

    let subscription = required(sub_m, "subscription")?;

    let op = match name {
        "list" => flags::Op::List,
        "create" => flags::Op::Create(NewFeatureFlag {
            name: required(sub_m, "name")?,
            enabled: sub_m.get_flag("enabled"),
            description: optional(sub_m, "description"),
        }),
        "update" => {
            let patch = FeatureFlagPatch {
                name: optional(sub_m, "name"),
                enabled: sub_m.get_one::<bool>("enabled").copied(),
                description: optional(sub_m, "description"),
            };
            if patch == FeatureFlagPatch::default() {
                bail!("nothing to update, pass --name, --enabled or --description");
            }
            flags::Op::Update {
                id: required(sub_m, "id")?,
                patch,
            }
        }
        "toggle" => flags::Op::Toggle {
            id: required(sub_m, "id")?,
        },
        "delete" => flags::Op::Delete {
            id: required(sub_m, "id")?,
        },
        other => bail!("unknown flags subcommand: {other}"),
    };

    Ok(Action::Flags(flags::Args {
        globals,
        subscription,
        op,
    }))
}

fn settings_action(globals: GlobalArgs, matches: &ArgMatches) -> Result<Action> {
    let Some((name, sub_m)) = matches.subcommand() else {
        bail!("missing settings subcommand, see --help");
    };

    let subscription = required(sub_m, "subscription")?;

    let op = match name {
        "list" => settings::Op::List,
        "get" => settings::Op::Get {
            id: required(sub_m, "id")?,
        },
        "create" => settings::Op::Create(NewSetting {
            key: required(sub_m, "key")?,
            value: required(sub_m, "value")?,
            description: optional(sub_m, "description"),
        }),
        "update" => {
            let patch = SettingPatch {
                key: optional(sub_m, "key"),
                value: optional(sub_m, "value"),
                description: optional(sub_m, "description"),
            };
            if patch == SettingPatch::default() {
                bail!("nothing to update, pass --key, --value or --description");
            }
            settings::Op::Update {
                id: required(sub_m, "id")?,
                patch,
            }
        }
        "delete" => settings::Op::Delete {
            id: required(sub_m, "id")?,
        },
        other => bail!("unknown settings subcommand: {other}"),
    };

    Ok(Action::Settings(settings::Args {
        globals,
        subscription,
        op,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    fn action(args: &[&str]) -> Result<Action> {
        let mut argv = vec!["subadmin", "--state-dir", "/tmp/subadmin-test"];
        argv.extend_from_slice(args);
        handler(&commands::new().try_get_matches_from(argv)?)
    }

    #[test]
    fn login_keeps_password_secret() -> Result<()> {
        let Action::Login(args) = action(&["login", "-u", "ops@example.com", "-p", "hunter2"])?
        else {
            bail!("expected login action");
        };
        assert_eq!(args.user, "ops@example.com");
        assert_eq!(args.password.expose_secret(), "hunter2");
        assert!(!format!("{args:?}").contains("hunter2"));
        assert_eq!(args.globals.state_dir, PathBuf::from("/tmp/subadmin-test"));
        Ok(())
    }

    #[test]
    fn flags_update_builds_partial_patch() -> Result<()> {
        let Action::Flags(args) = action(&["flags", "update", "sub-001", "f1", "--enabled", "true"])?
        else {
            bail!("expected flags action");
        };
        assert_eq!(args.subscription, "sub-001");
        let flags::Op::Update { id, patch } = args.op else {
            bail!("expected update");
        };
        assert_eq!(id, "f1");
        assert_eq!(patch, FeatureFlagPatch::enabled(true));
        Ok(())
    }

    #[test]
    fn empty_update_is_rejected() -> Result<()> {
        let err = action(&["settings", "update", "sub-001", "s1"])
            .err()
            .context("expected error")?;
        assert!(err.to_string().contains("nothing to update"));
        Ok(())
    }

    #[test]
    fn settings_create_collects_fields() -> Result<()> {
        let Action::Settings(args) = action(&[
            "settings", "create", "sub-002", "--key", "region", "--value", "eu", "-d", "data region",
        ])?
        else {
            bail!("expected settings action");
        };
        let settings::Op::Create(new) = args.op else {
            bail!("expected create");
        };
        assert_eq!(new.key, "region");
        assert_eq!(new.value, "eu");
        assert_eq!(new.description.as_deref(), Some("data region"));
        Ok(())
    }

    #[test]
    fn invalid_api_url_is_rejected() -> Result<()> {
        let err = action(&["--api-url", "not a url", "status"])
            .err()
            .context("expected error")?;
        assert!(err.to_string().contains("invalid SUBADMIN_API_URL"));
        Ok(())
    }
}
