// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (JWT auth via middleware::jwt_auth_middleware)
pub mod public;    // Token issuance, service endpoints, catalog reads
pub mod protected; // Collection CRUD, profile, checkout (/api/*, /me, /create-checkout-session)
