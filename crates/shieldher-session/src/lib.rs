//! Session-token types shared between the auth service (issuer) and any
//! service that validates tokens.

pub mod cookie;
pub mod identity;
pub mod token;
