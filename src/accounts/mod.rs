//! Account management: signup validation and login verification
//!
//! Both services operate against an injected [`RecordStore`]; they share no
//! state with each other. The authenticated identity is returned to the
//! caller as a value, never held as ambient state.
//!
//! [`RecordStore`]: crate::store::RecordStore

pub mod auth;
pub mod password;
pub mod registrar;

pub use auth::{AuthOutcome, AuthenticationService};
pub use registrar::{AccountRegistrar, RegistrationOutcome};

use thiserror::Error;

/// Errors that can occur during account operations
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("Password hashing failed: {0}")]
    Hash(String),
}
