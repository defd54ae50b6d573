//! Shared HTTP plumbing for the lookup providers.

use std::time::Duration;

use geonote_core::{NetworkError, ReqwestErrorExt, ServiceConfig};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::types::LookupError;

/// Build a client that identifies itself and gives up after `timeout`.
pub fn build_client(user_agent: &str, timeout: Duration) -> Result<Client, LookupError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| LookupError::Network(e.into_network_error()))
}

/// Build a client from the service settings.
pub fn client_for(services: &ServiceConfig) -> Result<Client, LookupError> {
    build_client(
        &services.user_agent,
        Duration::from_secs(services.request_timeout_secs),
    )
}

/// Send a request once and decode a JSON body.
pub async fn get_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, LookupError> {
    let response = request
        .send()
        .await
        .map_err(|e| LookupError::Network(e.into_network_error()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LookupError::Network(NetworkError::ServerError {
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or("unknown").to_string(),
        }));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| LookupError::InvalidResponse(e.to_string()))
}
