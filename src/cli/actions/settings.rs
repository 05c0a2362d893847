use crate::{
    api::{NewSetting, SettingPatch},
    cli::{
        actions::{authenticated, create_into, delete_from, print_list, print_one},
        globals::GlobalArgs,
    },
    view::NO_SETTINGS,
};
use anyhow::Result;

#[derive(Debug)]
pub enum Op {
    List,
    Get { id: String },
    Create(NewSetting),
    Update { id: String, patch: SettingPatch },
    Delete { id: String },
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub subscription: String,
    pub op: Op,
}

/// Handle the settings action
/// # Errors
/// Returns an error if there is no session or the API call fails.
pub async fn execute(args: Args) -> Result<()> {
    let api = authenticated(&args.globals)?;
    let settings = api.settings();
    let subscription = args.subscription.as_str();

    match args.op {
        Op::List => {
            let items = settings.list(subscription).await?;
            print_list(&args.globals, &items, NO_SETTINGS)
        }
        Op::Get { id } => {
            let setting = settings.get(subscription, &id).await?;
            print_one(&args.globals, &setting)
        }
        Op::Create(new) => {
            let view = create_into(&settings, subscription, &new).await?;
            print_list(&args.globals, view.as_slice(), NO_SETTINGS)
        }
        Op::Update { id, patch } => {
            let setting = settings.update(subscription, &id, &patch).await?;
            print_one(&args.globals, &setting)
        }
        Op::Delete { id } => {
            let view = delete_from(&settings, subscription, &id).await?;
            print_list(&args.globals, view.as_slice(), NO_SETTINGS)
        }
    }
}
