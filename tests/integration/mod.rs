//! Integration tests
//!
//! Every test builds its own [`TestApp`](crate::common::TestApp) over a fresh
//! in-memory database.

mod access_scenarios;
mod invitation_flow;
mod signature_flow;
