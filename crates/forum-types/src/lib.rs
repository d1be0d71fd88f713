//! Types shared by the store, the API handlers and the server binary.

pub mod api;
pub mod models;
