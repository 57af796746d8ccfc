pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod payments;
pub mod routes;
pub mod server;
pub mod state;

pub use config::AppConfig;
pub use state::AppState;
