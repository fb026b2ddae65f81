pub mod client;
pub mod dto;

pub use client::{LocalTimeApi, LocalTimeClient};
pub use dto::{TimeRequest, TimeResponse};
