// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition, the service banner and health check, and read-only
// access to the marketplace catalog (categories, classes, events).
pub mod auth;
pub mod catalog;
pub mod service;
