//! Authentication
//!
//! Bearer-token issue/verification and password hashing. Authorization on
//! documents lives in `core::access`; this module only answers "who is
//! calling".

pub mod jwt;
pub mod password;

pub use jwt::{AccessToken, Claims, JwtHandler};
pub use password::{hash_password, validate_password_strength, verify_password};
