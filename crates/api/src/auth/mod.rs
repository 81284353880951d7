//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- identity assertion signing ([`jwt::TokenIssuer`]) and checking ([`jwt::TokenVerifier`]).
//! - [`credentials`] -- registration and login on top of a [`taskkeep_db::UserStore`].

pub mod credentials;
pub mod jwt;
pub mod password;
