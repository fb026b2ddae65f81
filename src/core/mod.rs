pub mod error;
pub mod http_client;

pub use error::AppError;
pub use http_client::build_http_client;
