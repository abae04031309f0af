use std::error::Error as StdError;

use chrono::DateTime;
use clap::{Arg, ArgMatches, Command};
use serde_json;

use storefront_sdk::api::user;

use super::{Config, new_client};

pub fn reg_args(cmd: Command) -> Command {
    cmd.about("User profile operations")
        .subcommand(Command::new("get").about("Get the signed-in user profile"))
        .subcommand(
            Command::new("update")
                .about("Update the signed-in user profile")
                .arg(
                    Arg::new("name")
                        .long("name")
                        .help("display name")
                        .num_args(1),
                )
                .arg(
                    Arg::new("phone")
                        .long("phone")
                        .help("phone number")
                        .num_args(1),
                )
                .arg(
                    Arg::new("address")
                        .long("address")
                        .help("shipping address")
                        .num_args(1),
                )
                .arg(
                    Arg::new("birthday")
                        .long("birthday")
                        .help("date of birth in RFC 3339 format")
                        .num_args(1)
                        .value_parser(validate_timestr),
                )
                .arg(
                    Arg::new("avatar")
                        .long("avatar")
                        .help("avatar image name")
                        .num_args(1),
                )
                .arg(
                    Arg::new("password")
                        .long("password")
                        .help("current password, required with `new-password`")
                        .num_args(1),
                )
                .arg(
                    Arg::new("new-password")
                        .long("new-password")
                        .help("new password")
                        .num_args(1),
                ),
        )
}

pub async fn run(conf: &Config, args: &ArgMatches) -> Result<Option<()>, Box<dyn StdError>> {
    match args.subcommand() {
        Some(("get", _)) => {
            let mut client = new_client(conf)?;
            let profile = user::get(&mut client).await?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
            Ok(Some(()))
        }
        Some(("update", args)) => {
            let data = user::UpdateReqData {
                name: args.get_one::<String>("name").cloned(),
                phone: args.get_one::<String>("phone").cloned(),
                address: args.get_one::<String>("address").cloned(),
                date_of_birth: match args.get_one::<String>("birthday") {
                    None => None,
                    Some(time_str) => Some(DateTime::parse_from_rfc3339(time_str)?.into()),
                },
                avatar: args.get_one::<String>("avatar").cloned(),
                password: args.get_one::<String>("password").cloned(),
                new_password: args.get_one::<String>("new-password").cloned(),
            };
            let mut client = new_client(conf)?;
            let profile = user::update(&mut client, &data).await?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
            Ok(Some(()))
        }
        _ => Ok(None),
    }
}

fn validate_timestr(time_str: &str) -> Result<String, String> {
    match DateTime::parse_from_rfc3339(time_str) {
        Err(e) => Err(e.to_string()),
        Ok(_) => Ok(time_str.to_string()),
    }
}
