#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub accept_invalid_certs: bool,
}
