//! JWT token handling
//!
//! This module provides access token creation and verification.

mod handler;
pub mod types;

#[cfg(test)]
mod tests;

pub use types::{AccessToken, Claims, JwtHandler};
