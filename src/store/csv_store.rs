//! Flat-table implementation of the RecordStore trait

use super::{RecordStore, StoreError};
use crate::models::UserRecord;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Header-row flat table on disk
///
/// The table is re-read on every lookup, so edits made outside the process
/// are visible to the next query. Writers are serialized behind a lock so
/// concurrent registrations cannot interleave rows.
pub struct CsvRecordStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvRecordStore {
    /// Create a store backed by the table file at the given path.
    ///
    /// The file is not created until the first `append`; a missing file
    /// reads as an empty table.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        CsvRecordStore {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the underlying table file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record from the table
    pub fn load_all(&self) -> Result<Vec<UserRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: UserRecord =
                row.map_err(|e| StoreError::InvalidRow(e.to_string()))?;
            records.push(record);
        }
        Ok(records)
    }

    fn find_first<F>(&self, matches: F) -> Result<Option<UserRecord>, StoreError>
    where
        F: Fn(&UserRecord) -> bool,
    {
        Ok(self.load_all()?.into_iter().find(|record| matches(record)))
    }
}

impl RecordStore for CsvRecordStore {
    fn find_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        self.find_first(|record| record.user_id == user_id)
    }

    fn find_by_name(&self, user_name: &str) -> Result<Option<UserRecord>, StoreError> {
        self.find_first(|record| record.user_name == user_name)
    }

    fn append(&self, record: &UserRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap();

        // A fresh or empty file gets the header row first.
        let needs_header = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;

        log::debug!("Appended record for user '{}'", record.user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BloodGroup, Gender};
    use chrono::NaiveDate;
    use std::io::Read;

    fn sample_record(user_id: &str, user_name: &str) -> UserRecord {
        UserRecord {
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            email: format!("{}@example.com", user_name),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 14).unwrap(),
            height_cm: 172.0,
            weight_kg: 68.5,
            gender: Gender::Female,
            blood_group: BloodGroup::OPositive,
        }
    }

    fn create_test_store() -> (tempfile::TempDir, CsvRecordStore) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = CsvRecordStore::new(dir.path().join("users.csv"));
        (dir, store)
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let (_dir, store) = create_test_store();
        assert!(store.load_all().unwrap().is_empty());
        assert!(store.find_by_id("u1").unwrap().is_none());
        assert!(store.find_by_name("alice").unwrap().is_none());
    }

    #[test]
    fn test_append_and_find_round_trip() {
        let (_dir, store) = create_test_store();
        let record = sample_record("u1", "alice");
        store.append(&record).unwrap();

        let by_id = store.find_by_id("u1").unwrap().unwrap();
        assert_eq!(by_id, record);

        let by_name = store.find_by_name("alice").unwrap().unwrap();
        assert_eq!(by_name, record);
    }

    #[test]
    fn test_header_written_once_with_exact_columns() {
        let (_dir, store) = create_test_store();
        store.append(&sample_record("u1", "alice")).unwrap();
        store.append(&sample_record("u2", "bob")).unwrap();

        let mut contents = String::new();
        std::fs::File::open(store.path())
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();

        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "user_id,user_name,password_hash,email,date_of_birth,height_cm,weight_kg,gender,blood_group"
        );
        // Header plus two record rows, no repeated header.
        assert_eq!(contents.lines().count(), 3);
    }

    #[test]
    fn test_append_never_overwrites_duplicate_ids() {
        let (_dir, store) = create_test_store();
        let first = sample_record("u1", "alice");
        let mut second = sample_record("u1", "carol");
        second.email = "carol@example.com".to_string();

        store.append(&first).unwrap();
        store.append(&second).unwrap();

        assert_eq!(store.load_all().unwrap().len(), 2);
        // First match wins on lookups.
        assert_eq!(store.find_by_id("u1").unwrap().unwrap().user_name, "alice");
        assert_eq!(
            store.find_by_name("carol").unwrap().unwrap().email,
            "carol@example.com"
        );
    }

    #[test]
    fn test_find_by_key_dispatch() {
        use crate::store::KeyColumn;

        let (_dir, store) = create_test_store();
        store.append(&sample_record("u1", "alice")).unwrap();

        assert!(store
            .find_by_key(KeyColumn::UserId, "u1")
            .unwrap()
            .is_some());
        assert!(store
            .find_by_key(KeyColumn::UserName, "alice")
            .unwrap()
            .is_some());
        assert!(store
            .find_by_key(KeyColumn::UserId, "alice")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_write_error_on_unwritable_path() {
        let store = CsvRecordStore::new("/nonexistent-dir/users.csv");
        let result = store.append(&sample_record("u1", "alice"));
        assert!(matches!(result, Err(StoreError::Io(_))));
    }

    #[test]
    fn test_enum_columns_round_trip() {
        let (_dir, store) = create_test_store();
        let mut record = sample_record("u1", "alice");
        record.gender = Gender::Other;
        record.blood_group = BloodGroup::AbNegative;
        store.append(&record).unwrap();

        let loaded = store.find_by_id("u1").unwrap().unwrap();
        assert_eq!(loaded.gender, Gender::Other);
        assert_eq!(loaded.blood_group, BloodGroup::AbNegative);
    }
}
