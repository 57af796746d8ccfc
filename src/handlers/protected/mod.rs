// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every route here sits behind jwt_auth_middleware, so handlers can rely on
// an `Extension<AuthUser>` being present.
pub mod auth;
pub mod data;
pub mod payments;
