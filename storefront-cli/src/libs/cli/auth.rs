use std::error::Error as StdError;

use clap::{Arg, ArgMatches, Command};
use serde_json;

use storefront_sdk::api::auth;

use super::{Config, arg_value, new_client};

pub fn reg_login_args(cmd: Command) -> Command {
    cmd.about("Log in and store the session credentials")
        .arg(
            Arg::new("email")
                .long("email")
                .help("account email")
                .num_args(1)
                .required(true),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .help("account password")
                .num_args(1)
                .required(true),
        )
}

pub fn reg_register_args(cmd: Command) -> Command {
    cmd.about("Register an account and store the session credentials")
        .arg(
            Arg::new("email")
                .long("email")
                .help("account email")
                .num_args(1)
                .required(true),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .help("account password")
                .num_args(1)
                .required(true),
        )
}

pub fn reg_args(cmd: Command) -> Command {
    cmd.about("Session operations")
        .subcommand(Command::new("refresh").about("Refresh the access token"))
        .subcommand(Command::new("logout").about("Log out and clear stored credentials"))
}

pub async fn run_login(
    conf: &Config,
    args: &ArgMatches,
) -> Result<Option<()>, Box<dyn StdError>> {
    let email = arg_value(args, "email")?;
    let password = arg_value(args, "password")?;
    let mut client = new_client(conf)?;
    let data = auth::login(&mut client, email.as_str(), password.as_str()).await?;
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(Some(()))
}

pub async fn run_register(
    conf: &Config,
    args: &ArgMatches,
) -> Result<Option<()>, Box<dyn StdError>> {
    let email = arg_value(args, "email")?;
    let password = arg_value(args, "password")?;
    let mut client = new_client(conf)?;
    let data = auth::register(&mut client, email.as_str(), password.as_str()).await?;
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(Some(()))
}

pub async fn run(conf: &Config, args: &ArgMatches) -> Result<Option<()>, Box<dyn StdError>> {
    match args.subcommand() {
        Some(("refresh", _)) => {
            let mut client = new_client(conf)?;
            let token = auth::refresh(&mut client).await?;
            println!("{}", token);
            Ok(Some(()))
        }
        Some(("logout", _)) => {
            let mut client = new_client(conf)?;
            auth::logout(&mut client).await?;
            Ok(Some(()))
        }
        _ => Ok(None),
    }
}
