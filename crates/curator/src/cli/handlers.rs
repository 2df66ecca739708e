use super::args::{Cli, Commands};
use super::print::{print_item, print_items, print_messages, print_pins, ListRow};
use anyhow::{Context, Result};
use clap::Parser;
use curatorapp::auth::Principal;
use curatorapp::commands::query::{ListingQuery, QueryContext, TypeFilter};
use curatorapp::commands::save::SaveRequest;
use curatorapp::config::CuratorConfig;
use curatorapp::model::{ItemId, ItemStatus, Module, ModuleChange, NewItem};
use curatorapp::store::fs::JsonHost;
use curatorapp::CuratorApi;
use directories::ProjectDirs;
use env_logger::Env;
use log::debug;
use std::path::PathBuf;

type Api = CuratorApi<JsonHost>;

/// The session the command line acts in; tokens are bound to it.
const CLI_SESSION: &str = "cli";

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::init_from_env(Env::default().default_filter_or(default_filter));

    let data_dir = resolve_data_dir(cli.data_dir)?;
    debug!("Using data directory {}", data_dir.display());
    let config = CuratorConfig::load(&data_dir)?;
    let host = JsonHost::open(&data_dir)?;
    let mut api = CuratorApi::from_config(host, &config)?;
    let principal = Principal::new(cli.user, cli.role.into()).with_session(CLI_SESSION);

    match cli.command {
        Commands::Init => {
            print_messages(&api.setup_default_terms()?.messages);
        }
        Commands::Create {
            title,
            item_type,
            status,
            author,
        } => {
            let mut item = NewItem::new(item_type, title).with_status(status);
            if let Some(author) = author {
                item = item.with_author(author);
            }
            print_messages(&api.create_item(item)?.messages);
        }
        Commands::Curate { id } => print_messages(&api.curate_item(&principal, id)?.messages),
        Commands::Uncurate { id } => {
            print_messages(&api.uncurate_item(&principal, id)?.messages)
        }
        Commands::Feature { id, size } => {
            let changes = [(Module::Featurer, ModuleChange::Add)];
            let result = api.set_item_modules(&principal, id, &changes, size.as_deref())?;
            print_messages(&result.messages);
        }
        Commands::Unfeature { id } => {
            let changes = [(Module::Featurer, ModuleChange::Remove)];
            let result = api.set_item_modules(&principal, id, &changes, None)?;
            print_messages(&result.messages);
        }
        Commands::Resize { id, size } => {
            print_messages(&api.set_featured_size(&principal, id, &size)?.messages)
        }
        Commands::Pin { id } => print_messages(&api.pin_item(&principal, id)?.messages),
        Commands::Unpin { id } => print_messages(&api.unpin_item(&principal, id)?.messages),
        Commands::Save {
            id,
            curate,
            feature,
            pin,
            size,
            no_token,
        } => handle_save(&mut api, &principal, id, [curate, feature, pin], size, no_token)?,
        Commands::Publish { id } => {
            print_messages(&api.set_item_status(id, ItemStatus::Publish)?.messages)
        }
        Commands::Unpublish { id } => {
            print_messages(&api.set_item_status(id, ItemStatus::Draft)?.messages)
        }
        Commands::Trash { id } => print_messages(&api.trash_item(id)?.messages),
        Commands::Delete { id } => print_messages(&api.delete_item(id)?.messages),
        Commands::List {
            item_type,
            admin,
            page,
            per_page,
            no_sticky,
            exclude,
        } => {
            let post_type = match item_type {
                Some(t) => TypeFilter::Single(t),
                None => TypeFilter::Single(api.registry().curated_type().to_string()),
            };
            let mut query = ListingQuery::new(post_type)
                .with_page(page)
                .with_per_page(Some(per_page))
                .excluding(&exclude);
            if admin {
                query = query.in_context(QueryContext::Admin);
            }
            if no_sticky {
                query = query.ignore_sticky();
            }
            handle_list(&mut api, &query)?;
        }
        Commands::Show { id } => {
            let item = api.get_item(id)?;
            let related = api.get_related(id)?;
            let states = api.module_states(id)?;
            let size = api.featured_size(id)?;
            print_item(&item, related, &states, size.as_deref());
        }
        Commands::Pins => print_pins(&api.pinned_items()?),
        Commands::Notice { dismiss } => {
            if dismiss {
                print_messages(&api.dismiss_notice()?.messages);
            } else if !api.notice_dismissed()? {
                println!("Curator is active. Run `curator init` to create the module terms.");
            }
        }
    }
    Ok(())
}

fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    let dirs = ProjectDirs::from("com", "curator", "curator")
        .context("Could not determine a data directory; pass --data-dir")?;
    Ok(dirs.data_dir().to_path_buf())
}

fn handle_save(
    api: &mut Api,
    principal: &Principal,
    id: ItemId,
    [curate, feature, pin]: [bool; 3],
    size: Option<String>,
    no_token: bool,
) -> Result<()> {
    let mut request = SaveRequest::new();
    for (ticked, module) in [
        (curate, Module::Curator),
        (feature, Module::Featurer),
        (pin, Module::Pinner),
    ] {
        if ticked {
            request = request.check(module);
        }
    }
    if let Some(size) = size {
        request = request.with_featured_size(size);
    }
    if !no_token {
        request = request.with_token(principal.confirmation_token());
    }

    let result = api.save_item(principal, id, &request)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(api: &mut Api, query: &ListingQuery) -> Result<()> {
    let items = api.list_curated(query)?.listed_items;
    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let pinned = api.is_pinned(item.id)?;
        let featured = api.is_featured(item.id)?;
        rows.push(ListRow {
            item,
            pinned,
            featured,
        });
    }
    print_items(&rows);
    Ok(())
}
