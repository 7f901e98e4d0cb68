//! Common test utilities for docflow
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::TestApp;
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let app = TestApp::new().await;
//!     let owner = app.user("owner@example.com").await;
//!     let document = app.document(&owner, "SOP-001").await;
//!     // ...
//! }
//! ```

pub mod database;
pub mod fixtures;

pub use database::TestDatabase;
pub use fixtures::TestApp;

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err and return the error
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
