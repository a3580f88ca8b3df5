use std::fs;

use clap::Parser;
use cli::{Args, Commands, OrderAction, ProductAction};
use error::{ErrorContext, StorefrontResult};
use logging::setup_logging;
use storefront_config::{
    config::{self, generate_default_config, get_config, set_config_path},
    path::resolve_path,
};
use storefront_db::{connection::DbConnection, repository::order::OrderQuery};
use tracing::debug;
use utils::set_color;

mod cli;
mod error;
mod logging;
mod orders;
mod products;
mod utils;

fn open_database() -> StorefrontResult<DbConnection> {
    let db_path = get_config().get_db_path()?;

    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating database directory {}", parent.display()))?;
    }

    debug!(path = %db_path.display(), "using database");
    Ok(DbConnection::open(&db_path)?)
}

fn handle_cli() -> StorefrontResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        set_color(false);
    }

    if let Some(ref c) = args.config {
        set_config_path(resolve_path(c)?);
    }

    match args.command {
        Commands::DefConfig => {
            generate_default_config()?;
        }
        command => {
            config::init()?;

            let config = get_config();
            if !config.color() {
                set_color(false);
            }

            let mut db = open_database()?;

            match command {
                Commands::Orders {
                    action,
                } => {
                    match action {
                        OrderAction::List {
                            unshipped,
                            shipped,
                            limit,
                        } => {
                            let shipped = match (unshipped, shipped) {
                                (true, _) => Some(false),
                                (_, true) => Some(true),
                                _ => None,
                            };
                            let query = OrderQuery {
                                order_id: None,
                                shipped,
                                limit: Some(limit.unwrap_or_else(|| config.list_limit())),
                            };
                            orders::list_orders(&mut db, query, args.json)?;
                        }
                        OrderAction::Show {
                            order_id,
                        } => orders::show_order(&mut db, order_id, args.json)?,
                        OrderAction::Save {
                            file,
                        } => orders::save_order(&mut db, &file, args.json)?,
                        OrderAction::Ship {
                            order_id,
                        } => orders::ship_order(&mut db, order_id)?,
                    }
                }
                Commands::Products {
                    action,
                } => {
                    match action {
                        ProductAction::List {
                            category,
                        } => products::list_products(&mut db, category, args.json)?,
                        ProductAction::Add {
                            name,
                            price,
                            category,
                            description,
                        } => {
                            products::add_product(
                                &mut db,
                                name,
                                price,
                                category,
                                description,
                                args.json,
                            )?
                        }
                        ProductAction::Remove {
                            product_id,
                        } => products::remove_product(&mut db, product_id)?,
                    }
                }
                Commands::DefConfig => unreachable!(),
            }
        }
    }

    Ok(())
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
