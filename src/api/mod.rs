mod client;
mod error;
pub mod types;

pub use client::{ApiClient, DEFAULT_SERVER_URL};
pub use error::ApiError;
