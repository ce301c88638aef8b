//! Shared reqwest plumbing for the JSON endpoints.
use crate::config::HttpSettings;
use crate::error::{CrateError, Result};
use log::info;
use reqwest::Client;
use serde::de::DeserializeOwned;

pub fn build_http_client(settings: &HttpSettings) -> Result<Client> {
    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(settings.timeout)
        .build()
        .map_err(CrateError::HttpClient)
}

/// GETs `url` and decodes the JSON body.
pub async fn fetch_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T> {
    info!("GET {}", url);
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(|source| CrateError::ServiceUnavailable {
            url: url.to_string(),
            source,
        })?;

    if !response.status().is_success() {
        return Err(CrateError::ServiceStatus {
            url: url.to_string(),
            status: response.status(),
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|source| CrateError::ResponseDecode {
            url: url.to_string(),
            source,
        })
}
