use std::error::Error as StdError;

use clap::{Arg, ArgMatches, Command, builder::RangedU64ValueParser};
use serde_json;

use storefront_sdk::api::{
    category,
    product::{self, ListOptions, Order, SortBy},
};

use super::{Config, arg_value, new_client};

pub fn reg_args(cmd: Command) -> Command {
    cmd.about("Product catalog operations")
        .subcommand(
            Command::new("list")
                .about("List products")
                .arg(
                    Arg::new("page")
                        .long("page")
                        .help("page number, starting from 1")
                        .num_args(1)
                        .value_parser(RangedU64ValueParser::<u64>::new().range(1..)),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .help("items per page")
                        .num_args(1)
                        .value_parser(RangedU64ValueParser::<u64>::new().range(1..)),
                )
                .arg(
                    Arg::new("sort-by")
                        .long("sort-by")
                        .help("sort key")
                        .num_args(1)
                        .value_parser([
                            SortBy::CREATED_AT,
                            SortBy::VIEW,
                            SortBy::SOLD,
                            SortBy::PRICE,
                        ]),
                )
                .arg(
                    Arg::new("order")
                        .long("order")
                        .help("sort direction")
                        .num_args(1)
                        .value_parser([Order::ASC, Order::DESC]),
                )
                .arg(
                    Arg::new("category")
                        .long("category")
                        .help("category ID filter")
                        .num_args(1),
                )
                .arg(
                    Arg::new("exclude")
                        .long("exclude")
                        .help("product ID to exclude")
                        .num_args(1),
                )
                .arg(
                    Arg::new("rating")
                        .long("rating")
                        .help("minimum rating, 1 to 5")
                        .num_args(1)
                        .value_parser(RangedU64ValueParser::<u64>::new().range(1..=5)),
                )
                .arg(
                    Arg::new("price-min")
                        .long("price-min")
                        .help("minimum price")
                        .num_args(1)
                        .value_parser(RangedU64ValueParser::<u64>::new()),
                )
                .arg(
                    Arg::new("price-max")
                        .long("price-max")
                        .help("maximum price")
                        .num_args(1)
                        .value_parser(RangedU64ValueParser::<u64>::new()),
                )
                .arg(
                    Arg::new("name")
                        .long("name")
                        .help("name search term")
                        .num_args(1),
                ),
        )
        .subcommand(
            Command::new("get").about("Get one product").arg(
                Arg::new("id")
                    .long("id")
                    .help("product ID")
                    .num_args(1)
                    .required(true),
            ),
        )
}

pub fn reg_category_args(cmd: Command) -> Command {
    cmd.about("Category operations")
        .subcommand(Command::new("list").about("List categories"))
}

pub async fn run(conf: &Config, args: &ArgMatches) -> Result<Option<()>, Box<dyn StdError>> {
    match args.subcommand() {
        Some(("list", args)) => {
            let opts = ListOptions {
                page: args.get_one::<u64>("page").copied(),
                limit: args.get_one::<u64>("limit").copied(),
                sort_by: args.get_one::<String>("sort-by").cloned(),
                order: args.get_one::<String>("order").cloned(),
                category: args.get_one::<String>("category").cloned(),
                exclude: args.get_one::<String>("exclude").cloned(),
                rating_filter: args.get_one::<u64>("rating").map(|value| *value as u8),
                price_min: args.get_one::<u64>("price-min").copied(),
                price_max: args.get_one::<u64>("price-max").copied(),
                name: args.get_one::<String>("name").cloned(),
            };
            let mut client = new_client(conf)?;
            let data = product::list(&mut client, &opts).await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(Some(()))
        }
        Some(("get", args)) => {
            let product_id = arg_value(args, "id")?;
            let mut client = new_client(conf)?;
            let data = product::get(&mut client, product_id.as_str()).await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(Some(()))
        }
        _ => Ok(None),
    }
}

pub async fn run_category(
    conf: &Config,
    args: &ArgMatches,
) -> Result<Option<()>, Box<dyn StdError>> {
    match args.subcommand() {
        Some(("list", _)) => {
            let mut client = new_client(conf)?;
            let data = category::list(&mut client).await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(Some(()))
        }
        _ => Ok(None),
    }
}
