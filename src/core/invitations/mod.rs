//! Invitation lifecycle rules
//!
//! `pending → {accepted, declined, expired, cancelled}`; every non-pending
//! status is terminal. Expiry is evaluated lazily by [`expire_if_due`].

mod lifecycle;
mod token;

pub use lifecycle::{
    NewInvitation, accept, cancel, contributor_for, decline, expire_if_due, is_addressed_to,
    issue, resend,
};
pub use token::{generate_token, hash_token, token_matches};
