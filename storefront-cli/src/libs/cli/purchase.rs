use std::error::Error as StdError;

use clap::{Arg, ArgMatches, Command, builder::RangedU64ValueParser, value_parser};
use serde_json;

use storefront_sdk::api::purchase::{self, BuyItem, Status};

use super::{Config, arg_value, new_client};

pub fn reg_args(cmd: Command) -> Command {
    cmd.about("Cart and order operations")
        .subcommand(
            Command::new("list")
                .about("List purchases by status")
                .arg(
                    Arg::new("status")
                        .long("status")
                        .help("-1 cart, 0 all orders, 1..5 one order status")
                        .num_args(1)
                        .allow_hyphen_values(true)
                        .value_parser(value_parser!(i32).range(-1..=5))
                        .default_value("-1"),
                ),
        )
        .subcommand(
            Command::new("add")
                .about("Add a product to the cart")
                .arg(
                    Arg::new("product-id")
                        .long("product-id")
                        .help("product ID")
                        .num_args(1)
                        .required(true),
                )
                .arg(
                    Arg::new("count")
                        .long("count")
                        .help("buy count")
                        .num_args(1)
                        .value_parser(RangedU64ValueParser::<u64>::new().range(1..))
                        .default_value("1"),
                ),
        )
        .subcommand(
            Command::new("update")
                .about("Replace the buy count of a cart line")
                .arg(
                    Arg::new("product-id")
                        .long("product-id")
                        .help("product ID")
                        .num_args(1)
                        .required(true),
                )
                .arg(
                    Arg::new("count")
                        .long("count")
                        .help("buy count")
                        .num_args(1)
                        .value_parser(RangedU64ValueParser::<u64>::new().range(1..))
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("buy")
                .about("Place an order for a cart line")
                .arg(
                    Arg::new("product-id")
                        .long("product-id")
                        .help("product ID")
                        .num_args(1)
                        .required(true),
                )
                .arg(
                    Arg::new("count")
                        .long("count")
                        .help("buy count")
                        .num_args(1)
                        .value_parser(RangedU64ValueParser::<u64>::new().range(1..))
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Remove cart lines")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .help("purchase ID, repeatable")
                        .num_args(1..)
                        .required(true),
                ),
        )
}

pub async fn run(conf: &Config, args: &ArgMatches) -> Result<Option<()>, Box<dyn StdError>> {
    match args.subcommand() {
        Some(("list", args)) => {
            let status = match args.get_one::<i32>("status") {
                None => Status::IN_CART,
                Some(status) => *status,
            };
            let mut client = new_client(conf)?;
            let data = purchase::list(&mut client, status).await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(Some(()))
        }
        Some(("add", args)) => {
            let product_id = arg_value(args, "product-id")?;
            let count = *args.get_one::<u64>("count").unwrap_or(&1);
            let mut client = new_client(conf)?;
            let data = purchase::add_to_cart(&mut client, product_id.as_str(), count).await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(Some(()))
        }
        Some(("update", args)) => {
            let product_id = arg_value(args, "product-id")?;
            let count = *args.get_one::<u64>("count").unwrap_or(&1);
            let mut client = new_client(conf)?;
            let data = purchase::update(&mut client, product_id.as_str(), count).await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(Some(()))
        }
        Some(("buy", args)) => {
            let product_id = arg_value(args, "product-id")?;
            let count = *args.get_one::<u64>("count").unwrap_or(&1);
            let items = vec![BuyItem {
                product_id: product_id.clone(),
                buy_count: count,
            }];
            let mut client = new_client(conf)?;
            let data = purchase::buy(&mut client, &items).await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
            Ok(Some(()))
        }
        Some(("delete", args)) => {
            let ids: Vec<String> = match args.get_many::<String>("id") {
                None => vec![],
                Some(ids) => ids.cloned().collect(),
            };
            let mut client = new_client(conf)?;
            let deleted = purchase::delete(&mut client, ids.as_slice()).await?;
            println!("{{ \"deleted_count\": {} }}", deleted);
            Ok(Some(()))
        }
        _ => Ok(None),
    }
}
