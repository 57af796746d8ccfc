// handlers/public/auth/mod.rs - Token acquisition
pub mod token;

pub use token::issue as token_issue;
