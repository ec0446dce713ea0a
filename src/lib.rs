//! Direct-messaging backend: message log, per-user conversation list and read-state
//! transitions, served over HTTP with a JWT authentication gate.

pub mod app_state;
pub mod config;
pub mod database;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
