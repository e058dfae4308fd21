use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, REFERER, USER_AGENT};

use crate::config::{ConnectionMode, FetchSettings};

const REQUEST_TIMEOUT_SECS: u64 = 20;
const BROWSER_UA: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared direct client with the default timeout.
pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        base_builder(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

/// Client for a specific connection mode. The default direct setup reuses
/// the shared client.
pub fn client_for(settings: &FetchSettings) -> Result<Client> {
    match &settings.connection {
        ConnectionMode::Direct if settings.timeout.as_secs() == REQUEST_TIMEOUT_SECS => {
            Ok(http_client()?.clone())
        }
        ConnectionMode::Direct => base_builder(settings.timeout)
            .build()
            .context("failed to build http client"),
        ConnectionMode::Proxy(url) => {
            let proxy = reqwest::Proxy::all(url.as_str())
                .with_context(|| format!("invalid proxy url {url}"))?;
            base_builder(settings.timeout)
                .proxy(proxy)
                .build()
                .context("failed to build proxied http client")
        }
    }
}

fn base_builder(timeout: Duration) -> reqwest::blocking::ClientBuilder {
    Client::builder()
        .timeout(timeout)
        .default_headers(default_headers())
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.sofascore.com/"));
    headers
}
