//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store`
//! trait, including the change-event feed.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};
use tokio::sync::broadcast;

use ecocollect_core::{ChangeKind, FeedMessage, ReportId, Role, User, UserId, WasteReport};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// Capacity of the change-feed broadcast channel. Subscribers that fall
/// further behind than this miss events (no replay).
const FEED_CAPACITY: usize = 256;

/// RocksDB-backed record store.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
    feed: broadcast::Sender<FeedMessage>,
    // Serializes the read-check-write compound operations. RocksDB gives
    // single-batch atomicity but nothing across a read followed by a
    // write; without this lock two concurrent finalizations could both
    // observe collected_at == None.
    write_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let path = path.as_ref();
        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        tracing::debug!(path = %path.display(), "RocksDB store opened");

        let (feed, _) = broadcast::channel(FEED_CAPACITY);

        Ok(Self {
            db: Arc::new(db),
            feed,
            write_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Write an updated report record and publish the matching feed event.
    fn write_report_update(&self, report: &WasteReport, batch: WriteBatch) -> Result<()> {
        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        self.emit(FeedMessage::report(ChangeKind::Update, report.clone()));
        Ok(())
    }

    /// Publish a feed message. A send error just means nobody is
    /// subscribed right now.
    fn emit(&self, message: FeedMessage) {
        let _ = self.feed.send(message);
    }

    /// Shared listing path for the by-resident and by-worker indexes:
    /// prefix-scan the index, newest first, then fetch the records.
    fn list_reports_from_index(
        &self,
        index_cf: &str,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<WasteReport>> {
        let cf_index = self.cf(index_cf)?;
        let prefix = keys::user_reports_prefix(user_id);

        let iter = self.db.iterator_cf(
            &cf_index,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        // ULIDs are time-ordered, so the index scan yields oldest first;
        // collect and reverse for newest-first listings.
        let mut all_keys: Vec<Vec<u8>> = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(&prefix) {
                break;
            }

            all_keys.push(key.to_vec());
        }
        all_keys.reverse();

        let mut reports = Vec::new();
        for key in all_keys.into_iter().skip(offset) {
            if reports.len() >= limit {
                break;
            }

            let report_id = keys::extract_report_id_from_user_key(&key);
            if let Some(report) = self.get_report(&report_id)? {
                reports.push(report);
            }
        }

        Ok(reports)
    }
}

impl Store for RocksStore {
    // =========================================================================
    // User Operations
    // =========================================================================

    fn put_user(&self, user: &User) -> Result<()> {
        let cf_users = self.cf(cf::USERS)?;
        let cf_by_role = self.cf(cf::USERS_BY_ROLE)?;

        let user_key = keys::user_key(&user.user_id);
        let role_key = keys::role_user_key(user.role, &user.user_id);
        let value = Self::serialize(user)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_users, &user_key, &value);
        batch.put_cf(&cf_by_role, &role_key, []); // Index entry (empty value)

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_user(&self, user_id: &UserId) -> Result<Option<User>> {
        let cf = self.cf(cf::USERS)?;
        let key = keys::user_key(user_id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn list_users_by_role(&self, role: Role) -> Result<Vec<User>> {
        let cf_by_role = self.cf(cf::USERS_BY_ROLE)?;
        let prefix = keys::role_prefix(role);

        let iter = self.db.iterator_cf(
            &cf_by_role,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        let mut users = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;

            if !key.starts_with(&prefix) {
                break;
            }

            let user_id = keys::extract_user_id_from_role_key(&key);
            if let Some(user) = self.get_user(&user_id)? {
                users.push(user);
            }
        }

        Ok(users)
    }

    fn credit_reward_points(&self, user_id: &UserId, points: i64) -> Result<i64> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Database("write lock poisoned".into()))?;

        let cf = self.cf(cf::USERS)?;
        let key = keys::user_key(user_id);

        let mut user = self.get_user(user_id)?.ok_or_else(|| StoreError::NotFound {
            entity: "user",
            id: user_id.to_string(),
        })?;

        user.reward_points += points;
        user.updated_at = chrono::Utc::now();

        let value = Self::serialize(&user)?;
        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(user.reward_points)
    }

    // =========================================================================
    // Report Operations
    // =========================================================================

    fn create_report(&self, report: &WasteReport) -> Result<()> {
        let cf_reports = self.cf(cf::REPORTS)?;
        let cf_by_resident = self.cf(cf::REPORTS_BY_RESIDENT)?;

        let report_key = keys::report_key(&report.id);
        let resident_key = keys::user_report_key(&report.resident_id, &report.id);
        let value = Self::serialize(report)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_reports, &report_key, &value);
        batch.put_cf(&cf_by_resident, &resident_key, []);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        self.emit(FeedMessage::report(ChangeKind::Create, report.clone()));

        Ok(())
    }

    fn get_report(&self, id: &ReportId) -> Result<Option<WasteReport>> {
        let cf = self.cf(cf::REPORTS)?;
        let key = keys::report_key(id);

        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn list_reports_by_resident(
        &self,
        resident_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<WasteReport>> {
        self.list_reports_from_index(cf::REPORTS_BY_RESIDENT, resident_id, limit, offset)
    }

    fn list_reports_by_worker(
        &self,
        worker_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<WasteReport>> {
        self.list_reports_from_index(cf::REPORTS_BY_WORKER, worker_id, limit, offset)
    }

    // =========================================================================
    // Compound Operations
    // =========================================================================

    fn assign_report(&self, id: &ReportId, worker_id: &UserId) -> Result<WasteReport> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Database("write lock poisoned".into()))?;

        let mut report = self.get_report(id)?.ok_or_else(|| StoreError::NotFound {
            entity: "report",
            id: id.to_string(),
        })?;

        report.assign(*worker_id)?;

        let cf_reports = self.cf(cf::REPORTS)?;
        let cf_by_worker = self.cf(cf::REPORTS_BY_WORKER)?;

        let report_key = keys::report_key(id);
        let worker_key = keys::user_report_key(worker_id, id);
        let value = Self::serialize(&report)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_reports, &report_key, &value);
        batch.put_cf(&cf_by_worker, &worker_key, []);

        self.write_report_update(&report, batch)?;

        Ok(report)
    }

    fn collect_report(
        &self,
        id: &ReportId,
        pickup_photo_url: Option<String>,
    ) -> Result<WasteReport> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Database("write lock poisoned".into()))?;

        let mut report = self.get_report(id)?.ok_or_else(|| StoreError::NotFound {
            entity: "report",
            id: id.to_string(),
        })?;

        report.collect(pickup_photo_url)?;

        let cf_reports = self.cf(cf::REPORTS)?;
        let report_key = keys::report_key(id);
        let value = Self::serialize(&report)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_reports, &report_key, &value);

        self.write_report_update(&report, batch)?;

        Ok(report)
    }

    fn finalize_report(&self, id: &ReportId, reward_amount: i64) -> Result<WasteReport> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StoreError::Database("write lock poisoned".into()))?;

        let mut report = self.get_report(id)?.ok_or_else(|| StoreError::NotFound {
            entity: "report",
            id: id.to_string(),
        })?;

        report.finalize(reward_amount)?;

        let cf_reports = self.cf(cf::REPORTS)?;
        let report_key = keys::report_key(id);
        let value = Self::serialize(&report)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_reports, &report_key, &value);

        self.write_report_update(&report, batch)?;

        Ok(report)
    }

    // =========================================================================
    // Change Feed
    // =========================================================================

    fn subscribe(&self) -> broadcast::Receiver<FeedMessage> {
        self.feed.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecocollect_core::{DomainError, ReportStatus};
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn sample_report(resident_id: UserId) -> WasteReport {
        WasteReport::new(resident_id, "Main St", 1.0, 2.0, "photos/f1")
    }

    #[test]
    fn user_crud_and_role_listing() {
        let (store, _dir) = create_test_store();

        let worker = User::new(UserId::generate(), "Ada", "ada@example.com", Role::Worker);
        let resident = User::new(UserId::generate(), "Ben", "ben@example.com", Role::Resident);
        store.put_user(&worker).unwrap();
        store.put_user(&resident).unwrap();

        let retrieved = store.get_user(&worker.user_id).unwrap().unwrap();
        assert_eq!(retrieved.name, "Ada");
        assert_eq!(retrieved.role, Role::Worker);

        let workers = store.list_users_by_role(Role::Worker).unwrap();
        assert_eq!(workers.len(), 1);
        assert_eq!(workers[0].user_id, worker.user_id);

        let residents = store.list_users_by_role(Role::Resident).unwrap();
        assert_eq!(residents.len(), 1);
        assert_eq!(residents[0].user_id, resident.user_id);
    }

    #[test]
    fn credit_reward_points_accumulates() {
        let (store, _dir) = create_test_store();

        let worker = User::new(UserId::generate(), "Ada", "ada@example.com", Role::Worker);
        store.put_user(&worker).unwrap();

        assert_eq!(store.credit_reward_points(&worker.user_id, 10).unwrap(), 10);
        assert_eq!(store.credit_reward_points(&worker.user_id, 10).unwrap(), 20);

        let retrieved = store.get_user(&worker.user_id).unwrap().unwrap();
        assert_eq!(retrieved.reward_points, 20);
    }

    #[test]
    fn credit_unknown_user_fails() {
        let (store, _dir) = create_test_store();
        let result = store.credit_reward_points(&UserId::generate(), 10);
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn report_listing_newest_first_with_pagination() {
        let (store, _dir) = create_test_store();
        let resident_id = UserId::generate();

        let first = sample_report(resident_id);
        store.create_report(&first).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(2)); // Ensure different ULIDs

        let mut second = sample_report(resident_id);
        second.location_text = "Oak Ave".into();
        store.create_report(&second).unwrap();

        let reports = store.list_reports_by_resident(&resident_id, 10, 0).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].location_text, "Oak Ave"); // Newest first
        assert_eq!(reports[1].location_text, "Main St");

        let page1 = store.list_reports_by_resident(&resident_id, 1, 0).unwrap();
        let page2 = store.list_reports_by_resident(&resident_id, 1, 1).unwrap();
        assert_eq!(page1.len(), 1);
        assert_eq!(page2.len(), 1);
        assert_eq!(page1[0].location_text, "Oak Ave");
        assert_eq!(page2[0].location_text, "Main St");
    }

    #[test]
    fn assign_report_is_conditional() {
        let (store, _dir) = create_test_store();
        let report = sample_report(UserId::generate());
        store.create_report(&report).unwrap();

        let worker_a = UserId::generate();
        let assigned = store.assign_report(&report.id, &worker_a).unwrap();
        assert_eq!(assigned.status, ReportStatus::Assigned);
        assert_eq!(assigned.assigned_worker_id, Some(worker_a));

        // A duplicate delivery must not rebind the report.
        let worker_b = UserId::generate();
        let err = store.assign_report(&report.id, &worker_b).unwrap_err();
        assert!(err.is_already_processed());

        let stored = store.get_report(&report.id).unwrap().unwrap();
        assert_eq!(stored.assigned_worker_id, Some(worker_a));

        let assigned_list = store.list_reports_by_worker(&worker_a, 10, 0).unwrap();
        assert_eq!(assigned_list.len(), 1);
        assert_eq!(assigned_list[0].id, report.id);
    }

    #[test]
    fn collect_requires_assigned_status() {
        let (store, _dir) = create_test_store();
        let report = sample_report(UserId::generate());
        store.create_report(&report).unwrap();

        let err = store.collect_report(&report.id, None).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Domain(DomainError::InvalidTransition { .. })
        ));

        store.assign_report(&report.id, &UserId::generate()).unwrap();
        let collected = store
            .collect_report(&report.id, Some("photos/p1".into()))
            .unwrap();
        assert_eq!(collected.status, ReportStatus::Collected);
        assert_eq!(collected.pickup_photo_url.as_deref(), Some("photos/p1"));
    }

    #[test]
    fn finalize_report_is_single_shot() {
        let (store, _dir) = create_test_store();
        let report = sample_report(UserId::generate());
        store.create_report(&report).unwrap();
        store.assign_report(&report.id, &UserId::generate()).unwrap();
        store.collect_report(&report.id, None).unwrap();

        let finalized = store.finalize_report(&report.id, 10).unwrap();
        assert_eq!(finalized.reward_amount, Some(10));
        assert!(finalized.collected_at.is_some());

        let err = store.finalize_report(&report.id, 10).unwrap_err();
        assert!(err.is_already_processed());

        let stored = store.get_report(&report.id).unwrap().unwrap();
        assert_eq!(stored.reward_amount, Some(10));
    }

    #[test]
    fn feed_emits_create_and_update_events() {
        let (store, _dir) = create_test_store();
        let mut rx = store.subscribe();

        let report = sample_report(UserId::generate());
        store.create_report(&report).unwrap();

        let created = rx.try_recv().unwrap();
        assert!(created.is_create());
        assert_eq!(created.payload.id, report.id);

        store.assign_report(&report.id, &UserId::generate()).unwrap();

        let updated = rx.try_recv().unwrap();
        assert!(updated.is_update());
        assert_eq!(updated.payload.status, ReportStatus::Assigned);
    }

    #[test]
    fn feed_silent_without_subscribers() {
        let (store, _dir) = create_test_store();
        // No subscriber; emits must not error.
        let report = sample_report(UserId::generate());
        store.create_report(&report).unwrap();
        store.assign_report(&report.id, &UserId::generate()).unwrap();
    }
}
