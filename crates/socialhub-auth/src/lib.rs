//! # socialhub-auth
//!
//! Session tokens are issued by the account service; this crate only
//! validates them so REST handlers know which recipient they act for.
//! The encoder exists for tooling and tests that need a signed token.

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
