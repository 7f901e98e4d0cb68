//! User models

mod types;

pub use types::*;
