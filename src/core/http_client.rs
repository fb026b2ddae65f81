use std::time::Duration;

use reqwest::Client;

use crate::config::AppConfig;

pub fn build_http_client(config: &AppConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent("localtime-client/0.1")
        .connect_timeout(Duration::from_secs(config.timeout_secs))
        .timeout(Duration::from_secs(config.timeout_secs));

    if config.accept_invalid_certs {
        // Development-only override for endpoints with self-signed certificates.
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder.build()
}
