//! New-account validation and creation

use std::sync::Arc;

use super::{password, AccountError};
use crate::models::{NewAccount, UserRecord};
use crate::store::{KeyColumn, RecordStore};

/// Minimum cleartext password length accepted at signup
pub const MIN_PASSWORD_LEN: usize = 8;

/// Outcome of a registration attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Created,
    PasswordTooShort,
    DuplicateUsername,
}

/// Validates signup candidates and appends accepted records to the store
pub struct AccountRegistrar {
    store: Arc<dyn RecordStore>,
    uniqueness_key: KeyColumn,
}

impl AccountRegistrar {
    /// Create a registrar that rejects duplicates by `user_name`.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        AccountRegistrar {
            store,
            uniqueness_key: KeyColumn::UserName,
        }
    }

    /// Create a registrar that rejects duplicates by the given column.
    pub fn with_uniqueness_key(store: Arc<dyn RecordStore>, uniqueness_key: KeyColumn) -> Self {
        AccountRegistrar {
            store,
            uniqueness_key,
        }
    }

    /// Validate and create a new account.
    ///
    /// Checks run in order and the first failure wins: password length
    /// first, then a duplicate probe on the uniqueness key. Only an
    /// accepted candidate is hashed and appended. Email, date of birth and
    /// the numeric fields arrive pre-validated and are not re-checked.
    pub fn register(&self, candidate: NewAccount) -> Result<RegistrationOutcome, AccountError> {
        if candidate.password.chars().count() < MIN_PASSWORD_LEN {
            log::debug!("Registration rejected for '{}': password too short", candidate.user_id);
            return Ok(RegistrationOutcome::PasswordTooShort);
        }

        let probe = match self.uniqueness_key {
            KeyColumn::UserId => &candidate.user_id,
            KeyColumn::UserName => &candidate.user_name,
        };
        if self.store.find_by_key(self.uniqueness_key, probe)?.is_some() {
            log::debug!("Registration rejected: '{}' already taken", probe);
            return Ok(RegistrationOutcome::DuplicateUsername);
        }

        let password_hash = password::hash(&candidate.password)?;
        let record = UserRecord {
            user_id: candidate.user_id,
            user_name: candidate.user_name,
            password_hash,
            email: candidate.email,
            date_of_birth: candidate.date_of_birth,
            height_cm: candidate.height_cm,
            weight_kg: candidate.weight_kg,
            gender: candidate.gender,
            blood_group: candidate.blood_group,
        };
        self.store.append(&record)?;

        log::info!("Account created for user '{}'", record.user_id);
        Ok(RegistrationOutcome::Created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BloodGroup, Gender};
    use crate::store::CsvRecordStore;
    use chrono::NaiveDate;

    fn candidate(user_id: &str, user_name: &str, password: &str) -> NewAccount {
        NewAccount {
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            password: password.to_string(),
            email: format!("{}@example.com", user_name),
            date_of_birth: NaiveDate::from_ymd_opt(1995, 11, 30).unwrap(),
            height_cm: 165.0,
            weight_kg: 58.0,
            gender: Gender::Female,
            blood_group: BloodGroup::BNegative,
        }
    }

    fn create_test_store() -> (tempfile::TempDir, Arc<CsvRecordStore>) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = Arc::new(CsvRecordStore::new(dir.path().join("users.csv")));
        (dir, store)
    }

    #[test]
    fn test_valid_registration_round_trips() {
        let (_dir, store) = create_test_store();
        let registrar = AccountRegistrar::new(store.clone());

        let outcome = registrar.register(candidate("u1", "alice", "longpass1")).unwrap();
        assert_eq!(outcome, RegistrationOutcome::Created);

        let stored = store.find_by_name("alice").unwrap().unwrap();
        assert_eq!(stored.user_id, "u1");
        assert_eq!(stored.email, "alice@example.com");
        assert_eq!(stored.blood_group, BloodGroup::BNegative);
        // The cleartext never reaches the table.
        assert_ne!(stored.password_hash, "longpass1");
        assert!(password::verify("longpass1", &stored.password_hash));
    }

    #[test]
    fn test_short_password_rejected_without_write() {
        let (_dir, store) = create_test_store();
        let registrar = AccountRegistrar::new(store.clone());

        let outcome = registrar.register(candidate("u1", "alice", "short")).unwrap();
        assert_eq!(outcome, RegistrationOutcome::PasswordTooShort);
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_seven_chars_rejected_eight_accepted() {
        let (_dir, store) = create_test_store();
        let registrar = AccountRegistrar::new(store.clone());

        assert_eq!(
            registrar.register(candidate("u1", "alice", "1234567")).unwrap(),
            RegistrationOutcome::PasswordTooShort
        );
        assert_eq!(
            registrar.register(candidate("u1", "alice", "12345678")).unwrap(),
            RegistrationOutcome::Created
        );
    }

    #[test]
    fn test_duplicate_user_name_rejected_without_write() {
        let (_dir, store) = create_test_store();
        let registrar = AccountRegistrar::new(store.clone());

        registrar.register(candidate("u1", "alice", "longpass1")).unwrap();
        let before = store.load_all().unwrap().len();

        // Same user_name, different everything else.
        let outcome = registrar
            .register(candidate("u2", "alice", "anotherpass"))
            .unwrap();
        assert_eq!(outcome, RegistrationOutcome::DuplicateUsername);
        assert_eq!(store.load_all().unwrap().len(), before);
    }

    #[test]
    fn test_duplicate_user_id_is_not_checked_by_default() {
        let (_dir, store) = create_test_store();
        let registrar = AccountRegistrar::new(store.clone());

        registrar.register(candidate("u1", "alice", "longpass1")).unwrap();
        // user_id collides but user_name differs; the default uniqueness
        // key is user_name, so this is accepted and appended.
        let outcome = registrar.register(candidate("u1", "bob", "longpass2")).unwrap();
        assert_eq!(outcome, RegistrationOutcome::Created);
        assert_eq!(store.load_all().unwrap().len(), 2);
    }

    #[test]
    fn test_uniqueness_key_configurable_to_user_id() {
        let (_dir, store) = create_test_store();
        let registrar =
            AccountRegistrar::with_uniqueness_key(store.clone(), KeyColumn::UserId);

        registrar.register(candidate("u1", "alice", "longpass1")).unwrap();
        let outcome = registrar.register(candidate("u1", "bob", "longpass2")).unwrap();
        assert_eq!(outcome, RegistrationOutcome::DuplicateUsername);
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_validation_order_password_before_duplicate() {
        let (_dir, store) = create_test_store();
        let registrar = AccountRegistrar::new(store.clone());

        registrar.register(candidate("u1", "alice", "longpass1")).unwrap();
        // Both checks would fail; the password check wins.
        let outcome = registrar.register(candidate("u2", "alice", "short")).unwrap();
        assert_eq!(outcome, RegistrationOutcome::PasswordTooShort);
    }
}
