//! Domain primitives shared by the store and HTTP layers.

pub mod error;
pub mod ownership;
pub mod types;
