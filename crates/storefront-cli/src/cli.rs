use clap::{ArgAction, Parser, Subcommand, ValueHint};
use rust_decimal::Decimal;

use crate::utils::parse_price;

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate default config
    #[clap(name = "defconfig")]
    DefConfig,

    /// Work with stored orders
    #[command(arg_required_else_help = true)]
    Orders {
        #[clap(subcommand)]
        action: OrderAction,
    },

    /// Work with the product catalog
    #[command(arg_required_else_help = true)]
    Products {
        #[clap(subcommand)]
        action: ProductAction,
    },
}

#[derive(Subcommand)]
pub enum OrderAction {
    /// List orders with their lines
    #[clap(name = "list", visible_alias = "ls")]
    List {
        /// Only show orders that have not shipped
        #[arg(required = false, long, conflicts_with = "shipped")]
        unshipped: bool,

        /// Only show shipped orders
        #[arg(required = false, long)]
        shipped: bool,

        /// Maximum number of orders to show
        #[arg(required = false, short, long, value_parser = clap::value_parser!(i64).range(1..))]
        limit: Option<i64>,
    },

    /// Show a single order
    #[command(arg_required_else_help = true)]
    Show {
        /// Order id
        order_id: i32,
    },

    /// Save an order read from a JSON file, or `-` for stdin
    ///
    /// An `order_id` of 0 (or none) creates the order; any other id updates it.
    #[command(arg_required_else_help = true)]
    Save {
        #[arg(value_hint = ValueHint::FilePath)]
        file: String,
    },

    /// Mark an order as shipped
    #[command(arg_required_else_help = true)]
    Ship {
        /// Order id
        order_id: i32,
    },
}

#[derive(Subcommand)]
pub enum ProductAction {
    /// List products in the catalog
    #[clap(name = "list", visible_alias = "ls")]
    List {
        /// Only show products in this category
        #[arg(required = false, long)]
        category: Option<String>,
    },

    /// Add a product to the catalog
    #[command(arg_required_else_help = true)]
    Add {
        #[arg(required = true, long)]
        name: String,

        #[arg(required = true, long, value_parser = parse_price)]
        price: Decimal,

        #[arg(required = true, long)]
        category: String,

        #[arg(required = false, long, default_value = "")]
        description: String,
    },

    /// Remove a product that no order refers to
    #[command(arg_required_else_help = true)]
    #[clap(name = "remove", visible_alias = "rm")]
    Remove {
        /// Product id
        product_id: i32,
    },
}
