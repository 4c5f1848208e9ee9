//! Credentials and OAuth 1.0a request signing.

pub mod credentials;
pub mod oauth1;

pub use credentials::*;
pub use oauth1::*;
