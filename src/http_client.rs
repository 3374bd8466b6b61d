use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::Client;

const REQUEST_TIMEOUT_SECS: u64 = 10;

pub const USER_AGENT_VALUE: &str = "runslate/0.1";

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

/// Single-line body excerpt for error messages on non-2xx responses.
pub fn body_snippet(body: &str) -> String {
    body.trim()
        .replace('\n', " ")
        .replace('\r', " ")
        .chars()
        .take(220)
        .collect()
}
