use std::env;

use crate::config::dto::AppConfig;
use crate::core::error::AppError;

const DEFAULT_BASE_URL: &str = "https://local-time-project.onrender.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub fn load_config() -> Result<AppConfig, AppError> {
    dotenvy::dotenv().ok();

    let base_url =
        env::var("LOCALTIME_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    let timeout_secs = env::var("LOCALTIME_TIMEOUT_SECS")
        .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
        .parse::<u64>()
        .map_err(|err| {
            AppError::configuration(format!("invalid LOCALTIME_TIMEOUT_SECS: {err}"))
        })?;

    let accept_invalid_certs = parse_bool_env("LOCALTIME_ACCEPT_INVALID_CERTS", false);
    if accept_invalid_certs {
        tracing::warn!("certificate validation is disabled, never use this outside development");
    }

    Ok(AppConfig {
        base_url,
        timeout_secs,
        accept_invalid_certs,
    })
}

fn parse_bool_env(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|value| matches!(value.as_str(), "true" | "1" | "TRUE" | "True"))
        .unwrap_or(default)
}
