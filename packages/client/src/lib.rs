//! Client side of the terrain listing service: a typed wrapper around the
//! backend's HTTP API, a persisted bearer token, and the route table the
//! `terrains` CLI is organised around.

mod client;
pub mod error;
pub mod models;
pub mod routes;
pub mod token;

pub use client::{BackendClient, DEFAULT_BASE_URL};
pub use error::ClientError;
pub use token::TokenStore;
