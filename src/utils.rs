use crate::utils::error::{Error, Result};
use crate::utils::public_ip::{CHECKIP_TIMEOUT, CHECKIP_URL};
use clap::ArgMatches;
use reqwest::blocking::Client;
use std::env;
use std::path::PathBuf;

pub mod config;
pub mod error;
pub mod public_ip;
#[cfg(test)]
pub mod test_server;

/// Environment variable holding the Linode personal access token.
pub const TOKEN_VAR: &str = "PAT";

pub fn config_path(cmd: &ArgMatches) -> Result<PathBuf> {
    match cmd.get_one::<String>("config") {
        Some(path) => Ok(PathBuf::from(path)),
        None => config::default_config_path(),
    }
}

pub fn read_token() -> Result<String> {
    token_from(env::var(TOKEN_VAR).ok())
}

fn token_from(value: Option<String>) -> Result<String> {
    match value.map(|v| v.trim().to_owned()) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(Error::MissingCredential(TOKEN_VAR)),
    }
}

pub fn checkip_client() -> Result<Client> {
    Client::builder()
        .timeout(CHECKIP_TIMEOUT)
        .build()
        .map_err(|e| Error::http(CHECKIP_URL, e))
}
