//! Program configurations.

use std::env;

use clap::{Arg, ArgMatches, Command};
use validators::prelude::*;

use super::Config;

#[derive(Validator)]
#[validator(http_ftp_url(local(Allow)))]
struct HttpFtpURL {
    url: url::Url,
    protocol: validators::models::Protocol,
}

const DEF_API: &'static str = "http://localhost:4000";

/// To register Clap arguments.
pub fn reg_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("storefront-cli.api")
            .long("storefront-cli.api")
            .help("storefront API base path (scheme://host[:port])")
            .num_args(1),
    )
}

/// To read input arguments from command-line arguments and environment variables.
pub fn read_args(args: &ArgMatches) -> Config {
    Config {
        api: match args.get_one::<String>("storefront-cli.api") {
            None => match env::var("STORECLI_API") {
                Err(_) => DEF_API.to_string(),
                Ok(v) => match HttpFtpURL::parse_string(v.as_str()) {
                    Err(_) => panic!("invalid `storefront-cli.api`"),
                    Ok(_) => v,
                },
            },
            Some(v) => match HttpFtpURL::parse_string(v) {
                Err(_) => panic!("invalid `storefront-cli.api`"),
                Ok(_) => v.clone(),
            },
        },
    }
}
