use reqwest::Client;
use std::time::Duration;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Shared HTTP client for every outbound integration (model, mail, speech, calls).
pub fn build_provider_client() -> Client {
    build_provider_client_with_timeout(DEFAULT_REQUEST_TIMEOUT)
}

pub fn build_provider_client_with_timeout(timeout: Duration) -> Client {
    Client::builder()
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .timeout(timeout)
        .user_agent(concat!("dailycall/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|error| {
            tracing::warn!(%error, "falling back to default HTTP client");
            Client::new()
        })
}
