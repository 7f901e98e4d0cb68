//! Core domain of docflow
//!
//! Data models plus the three pure rule sets that every collaboration
//! operation passes through: access decisions, the status workflow and the
//! invitation lifecycle. Nothing in here performs I/O.

pub mod access;
pub mod invitations;
pub mod models;
pub mod workflow;
