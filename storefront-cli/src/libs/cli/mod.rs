use std::{error::Error as StdError, sync::Arc};

use clap::{ArgMatches, Command};
use serde::Deserialize;

use storefront_sdk::{
    api::http::{Client, ClientOptions},
    storage::FileStore,
};

pub mod config;

mod auth;
mod product;
mod purchase;
mod user;

/// Application configurations.
#[derive(Deserialize)]
pub struct Config {
    /// Storefront API base path with host. For example: `http://localhost:4000`.
    api: String,
}

/// Credential storage file in the user's home directory.
const STORAGE_FILE: &'static str = ".storefront-cli.json";

/// To register Clap arguments.
pub fn reg_args(cmd: Command) -> Command {
    config::reg_args(cmd)
        .subcommand(auth::reg_login_args(Command::new("login")))
        .subcommand(auth::reg_register_args(Command::new("register")))
        .subcommand(auth::reg_args(Command::new("auth")))
        .subcommand(user::reg_args(Command::new("user")))
        .subcommand(product::reg_args(Command::new("product")))
        .subcommand(product::reg_category_args(Command::new("category")))
        .subcommand(purchase::reg_args(Command::new("purchase")))
}

pub async fn run(conf: &Config, args: &ArgMatches) -> Result<Option<()>, Box<dyn StdError>> {
    match args.subcommand() {
        Some(("login", args)) => auth::run_login(conf, args).await,
        Some(("register", args)) => auth::run_register(conf, args).await,
        Some(("auth", args)) => auth::run(conf, args).await,
        Some(("user", args)) => user::run(conf, args).await,
        Some(("product", args)) => product::run(conf, args).await,
        Some(("category", args)) => product::run_category(conf, args).await,
        Some(("purchase", args)) => purchase::run(conf, args).await,
        _ => Ok(None),
    }
}

/// Create the SDK client over the CLI credential storage file.
fn new_client(conf: &Config) -> Result<Client, Box<dyn StdError>> {
    let opts = ClientOptions {
        api_base: conf.api.clone(),
        ..Default::default()
    };
    let store = Arc::new(FileStore::new(STORAGE_FILE));
    match Client::new(opts, store) {
        Err(e) => Err(Box::new(e)),
        Ok(client) => Ok(client),
    }
}

fn arg_value<'a>(args: &'a ArgMatches, key: &str) -> Result<&'a String, Box<dyn StdError>> {
    match args.get_one::<String>(key) {
        None => Err(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("missing `{}`", key),
        ))),
        Some(value) => Ok(value),
    }
}
