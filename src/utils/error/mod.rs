//! Error handling for docflow
//!
//! One error type flows from storage through the core rules up to the HTTP
//! boundary, where it is rendered as a structured JSON body.

#![allow(missing_docs)]

mod helpers;
mod response;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{DocflowError, Result};
