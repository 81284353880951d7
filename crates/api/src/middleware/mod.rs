//! Request-level middleware and extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the caller's identity from the `x-auth-token` header.
//! - [`error_detail`] -- Surfaces internal error detail outside production mode.

pub mod auth;
pub mod error_detail;
