//! # docflow
//!
//! Collaborative document workflow service: documents move from draft through
//! author, verifier and validator review to approval, while contributors are
//! brought in by invitation and sign off stage by stage.
//!
//! ## Features
//!
//! - **Access decisions**: one engine combines role, ownership, explicit grants
//!   and contributor membership into an allow or a reasoned deny
//! - **Workflow**: a guarded status machine with automatic advancement when a
//!   team has fully signed
//! - **Invitations**: hashed single-use tokens with lazy expiry
//! - **Audit trail**: typed activity events persisted off the request path
//!
//! ## Server Mode
//!
//! ```rust,no_run
//! use docflow::{Config, server::run_server};
//!
//! #[actix_web::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/docflow.yaml").await?;
//!     run_server(config).await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod config;
pub mod core;
pub mod server;
pub mod services;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use utils::error::{DocflowError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(NAME, "docflow");
    }
}
