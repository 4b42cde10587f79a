//! REST client for the procurement backend.

mod client;
mod error;
pub mod models;

pub use client::ApiClient;
pub use error::ApiError;
