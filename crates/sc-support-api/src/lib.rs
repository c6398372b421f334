//! Support chat API: library crate for the customer-support REST server.
//!
//! Exposes every module so the binary (`main.rs`) and the end-to-end test
//! crate can reach `AppState`, `build_router`, and `ResponseClassifier`.

pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod inference;
pub mod routes;
pub mod state;
pub mod store;
