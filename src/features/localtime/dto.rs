use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct TimeRequest {
    pub local_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeResponse {
    pub id: i64,
    pub local_time: String,
}
