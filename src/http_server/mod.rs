//! HTTP adapter over the ledger store.
//!
//! A thin translation layer: validate and parse requests, convert amounts
//! to integer cents, call the store, and map domain failures onto status
//! codes (404 / 409 / 422). The store never sees HTTP.

mod config;
mod envelope_routes;
mod server;
mod transfer_routes;

pub use config::HttpServerConfig;
pub use envelope_routes::envelope_routes;
pub use server::HttpServer;
pub use transfer_routes::transfer_routes;
