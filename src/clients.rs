use std::{sync::OnceLock, time::Duration};

use color_eyre::eyre::{eyre, Result};

pub static REQWEST: OnceLock<reqwest::Client> = OnceLock::new();

pub fn build_reqwest_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

pub fn init_reqwest_client(timeout: Duration) -> Result<()> {
    let client = build_reqwest_client(timeout)?;
    REQWEST
        .set(client)
        .map_err(|_| eyre!("reqwest client already initialised"))
}

pub fn get_reqwest_client() -> Result<&'static reqwest::Client> {
    REQWEST.get().ok_or(eyre!("Failed to get reqwest client"))
}
