//! Login verification against the record store

use std::sync::Arc;

use super::{password, AccountError};
use crate::store::{KeyColumn, RecordStore};

/// Outcome of a login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Credentials matched. Carries the account's `user_id` for the caller
    /// to thread through the session.
    Authenticated(String),
    /// The account exists but the password did not match.
    InvalidCredentials,
    /// No account under the given login identifier.
    UnknownUser,
}

/// Verifies credentials against the record store
///
/// Every call is an independent read-through lookup. No lockout, rate
/// limiting or attempt counting is applied.
pub struct AuthenticationService {
    store: Arc<dyn RecordStore>,
    login_key: KeyColumn,
}

impl AuthenticationService {
    /// Create a service that looks accounts up by `user_id`.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        AuthenticationService {
            store,
            login_key: KeyColumn::UserId,
        }
    }

    /// Create a service that looks accounts up by the given column.
    pub fn with_login_key(store: Arc<dyn RecordStore>, login_key: KeyColumn) -> Self {
        AuthenticationService { store, login_key }
    }

    /// Check a login attempt.
    ///
    /// Password length is deliberately not re-checked here; the minimum
    /// applies at creation only.
    pub fn authenticate(
        &self,
        login: &str,
        password_input: &str,
    ) -> Result<AuthOutcome, AccountError> {
        let record = match self.store.find_by_key(self.login_key, login)? {
            Some(record) => record,
            None => {
                log::debug!("Login attempt for unknown user '{}'", login);
                return Ok(AuthOutcome::UnknownUser);
            }
        };

        if password::verify(password_input, &record.password_hash) {
            log::info!("User '{}' authenticated", record.user_id);
            Ok(AuthOutcome::Authenticated(record.user_id))
        } else {
            log::debug!("Invalid credentials for login '{}'", login);
            Ok(AuthOutcome::InvalidCredentials)
        }
    }
}
