//! # lifeshare-auth
//!
//! Verification of identity tokens issued by the external identity
//! provider. LifeShare never mints tokens outside tests; it only checks
//! the HMAC signature and expiry and exposes the caller's identity.
//!
//! - `jwt`: claims payload and decoder

pub mod jwt;

pub use jwt::{Claims, JwtDecoder};
