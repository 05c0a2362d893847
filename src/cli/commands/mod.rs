use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        BoolishValueParser, ValueParser,
    },
    Arg, ArgAction, ColorChoice, Command,
};

pub const DEFAULT_API_URL: &str = "https://dev-api.miramedical.io/api/v4";

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

fn subscription_arg() -> Arg {
    Arg::new("subscription")
        .help("Subscription id, example: sub-001")
        .required(true)
}

fn id_arg(help: &'static str) -> Arg {
    Arg::new("id").help(help).required(true)
}

fn description_arg() -> Arg {
    Arg::new("description")
        .short('d')
        .long("description")
        .help("Free-form description")
}

fn flags_command() -> Command {
    Command::new("flags")
        .about("Manage a subscription's feature flags")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("list")
                .about("List feature flags")
                .arg(subscription_arg()),
        )
        .subcommand(
            Command::new("create")
                .about("Create a feature flag")
                .arg(subscription_arg())
                .arg(
                    Arg::new("name")
                        .short('n')
                        .long("name")
                        .help("Flag name")
                        .required(true),
                )
                .arg(
                    Arg::new("enabled")
                        .short('e')
                        .long("enabled")
                        .help("Create the flag enabled")
                        .action(ArgAction::SetTrue),
                )
                .arg(description_arg()),
        )
        .subcommand(
            Command::new("update")
                .about("Update fields of a feature flag")
                .arg(subscription_arg())
                .arg(id_arg("Feature flag id"))
                .arg(Arg::new("name").short('n').long("name").help("New name"))
                .arg(
                    Arg::new("enabled")
                        .short('e')
                        .long("enabled")
                        .help("New state: true/false")
                        .value_parser(BoolishValueParser::new()),
                )
                .arg(description_arg()),
        )
        .subcommand(
            Command::new("toggle")
                .about("Flip a feature flag on or off")
                .arg(subscription_arg())
                .arg(id_arg("Feature flag id")),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a feature flag")
                .arg(subscription_arg())
                .arg(id_arg("Feature flag id")),
        )
}

fn settings_command() -> Command {
    Command::new("settings")
        .about("Manage a subscription's settings")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("list")
                .about("List settings")
                .arg(subscription_arg()),
        )
        .subcommand(
            Command::new("get")
                .about("Show one setting")
                .arg(subscription_arg())
                .arg(id_arg("Setting id")),
        )
        .subcommand(
            Command::new("create")
                .about("Create a setting")
                .arg(subscription_arg())
                .arg(
                    Arg::new("key")
                        .short('k')
                        .long("key")
                        .help("Setting key")
                        .required(true),
                )
                .arg(
                    Arg::new("value")
                        .long("value")
                        .help("Setting value")
                        .required(true),
                )
                .arg(description_arg()),
        )
        .subcommand(
            Command::new("update")
                .about("Update fields of a setting")
                .arg(subscription_arg())
                .arg(id_arg("Setting id"))
                .arg(Arg::new("key").short('k').long("key").help("New key"))
                .arg(Arg::new("value").long("value").help("New value"))
                .arg(description_arg()),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a setting")
                .arg(subscription_arg())
                .arg(id_arg("Setting id")),
        )
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("subadmin")
        .about("Subscription admin console")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("Base URL of the admin API")
                .default_value(DEFAULT_API_URL)
                .env("SUBADMIN_API_URL")
                .global(true),
        )
        .arg(
            Arg::new("state-dir")
                .long("state-dir")
                .help("Directory holding the session token (default: $XDG_CONFIG_HOME/subadmin)")
                .env("SUBADMIN_STATE_DIR")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print results as JSON")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("SUBADMIN_LOG_LEVEL")
                .global(true)
                .action(ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .subcommand(
            Command::new("login")
                .about("Log in and store the session token")
                .arg(
                    Arg::new("user")
                        .short('u')
                        .long("user")
                        .help("Login identifier, usually an email address")
                        .env("SUBADMIN_USER")
                        .required(true),
                )
                .arg(
                    Arg::new("password")
                        .short('p')
                        .long("password")
                        .help("Password")
                        .env("SUBADMIN_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                ),
        )
        .subcommand(Command::new("logout").about("Forget the stored session token"))
        .subcommand(Command::new("status").about("Show whether a session token is stored"))
        .subcommand(Command::new("subscriptions").about("List known subscriptions"))
        .subcommand(
            Command::new("show")
                .about("Show a subscription with its feature flags and settings")
                .arg(subscription_arg()),
        )
        .subcommand(flags_command())
        .subcommand(settings_command())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "subadmin");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            "Subscription admin console"
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_command_definition() {
        new().debug_assert();
    }

    #[test]
    fn test_login_args() {
        temp_env::with_vars(
            [
                ("SUBADMIN_USER", None::<&str>),
                ("SUBADMIN_PASSWORD", None::<&str>),
                ("SUBADMIN_API_URL", None::<&str>),
            ],
            || {
                let matches = new().get_matches_from(vec![
                    "subadmin",
                    "login",
                    "--user",
                    "ops@example.com",
                    "--password",
                    "hunter2",
                ]);

                assert_eq!(
                    matches.get_one::<String>("api-url").map(|s| s.to_string()),
                    Some(DEFAULT_API_URL.to_string())
                );

                let (name, sub_m) = matches.subcommand().unwrap();
                assert_eq!(name, "login");
                assert_eq!(
                    sub_m.get_one::<String>("user").map(|s| s.to_string()),
                    Some("ops@example.com".to_string())
                );
                assert_eq!(
                    sub_m.get_one::<String>("password").map(|s| s.to_string()),
                    Some("hunter2".to_string())
                );
            },
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("SUBADMIN_API_URL", Some("https://api.example.com/v1")),
                ("SUBADMIN_STATE_DIR", Some("/var/lib/subadmin")),
                ("SUBADMIN_USER", Some("ops@example.com")),
                ("SUBADMIN_PASSWORD", Some("hunter2")),
                ("SUBADMIN_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["subadmin", "login"]);
                assert_eq!(
                    matches.get_one::<String>("api-url").map(|s| s.to_string()),
                    Some("https://api.example.com/v1".to_string())
                );
                assert_eq!(
                    matches
                        .get_one::<String>("state-dir")
                        .map(|s| s.to_string()),
                    Some("/var/lib/subadmin".to_string())
                );
                assert_eq!(matches.get_one::<u8>("verbosity").map(|s| *s), Some(2));
            },
        );
    }

    #[test]
    fn test_global_args_after_subcommand() {
        temp_env::with_vars([("SUBADMIN_API_URL", None::<&str>)], || {
            let matches = new().get_matches_from(vec![
                "subadmin",
                "flags",
                "list",
                "sub-001",
                "--json",
                "--api-url",
                "http://localhost:8080",
            ]);
            assert!(matches.get_flag("json"));
            assert_eq!(
                matches.get_one::<String>("api-url").map(|s| s.to_string()),
                Some("http://localhost:8080".to_string())
            );
        });
    }

    #[test]
    fn test_flags_update_parses_boolish() {
        let matches = new().get_matches_from(vec![
            "subadmin", "flags", "update", "sub-001", "f1", "--enabled", "yes",
        ]);
        let (_, flags_m) = matches.subcommand().unwrap();
        let (name, update_m) = flags_m.subcommand().unwrap();
        assert_eq!(name, "update");
        assert_eq!(update_m.get_one::<bool>("enabled").copied(), Some(true));
        assert_eq!(
            update_m.get_one::<String>("id").map(|s| s.to_string()),
            Some("f1".to_string())
        );
    }

    #[test]
    fn test_check_log_level_env() {
        // loop cover all possible value_parse
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars([("SUBADMIN_LOG_LEVEL", Some(level))], || {
                let matches = new().get_matches_from(vec!["subadmin", "status"]);
                assert_eq!(
                    matches.get_one::<u8>("verbosity").map(|s| *s),
                    Some(index as u8)
                );
            });
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("SUBADMIN_LOG_LEVEL", None::<String>)], || {
                let mut args = vec!["subadmin".to_string(), "status".to_string()];

                // Add the appropriate number of "-v" flags based on the index
                if index > 0 {
                    let v = format!("-{}", "v".repeat(index));
                    args.push(v);
                }

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>("verbosity").map(|s| *s),
                    Some(index as u8)
                );
            });
        }
    }
}
