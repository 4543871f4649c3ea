//! `RocksDB` record store for EcoCollect.
//!
//! This crate provides persistent storage for users and waste reports
//! using `RocksDB` with column families for efficient indexing, plus the
//! change-event feed that drives the trigger handlers and the worker-side
//! realtime notifier.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `users`: Primary user records, keyed by `user_id`
//! - `users_by_role`: Index for listing users by role
//! - `reports`: Primary report records, keyed by `report_id` (ULID)
//! - `reports_by_resident`: Index for listing a resident's reports
//! - `reports_by_worker`: Index for listing a worker's assigned reports
//!
//! Every report create and update emits a [`FeedMessage`] on a broadcast
//! channel; subscribers that lag are skipped, not replayed.
//!
//! # Example
//!
//! ```no_run
//! use ecocollect_store::{RocksStore, Store};
//! use ecocollect_core::{Role, User, UserId};
//!
//! let store = RocksStore::open("/tmp/ecocollect-db").unwrap();
//!
//! let user_id = UserId::generate();
//! let user = User::new(user_id, "Ada", "ada@example.com", Role::Worker);
//! store.put_user(&user).unwrap();
//!
//! let retrieved = store.get_user(&user_id).unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use tokio::sync::broadcast;

use ecocollect_core::{FeedMessage, ReportId, Role, User, UserId, WasteReport};

/// The storage trait defining all record-store operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations. The compound operations re-check their lifecycle
/// preconditions under the store's write serialization, which is what
/// makes duplicate trigger delivery safe (see the assignment and
/// completion handlers).
pub trait Store: Send + Sync {
    // =========================================================================
    // User Operations
    // =========================================================================

    /// Insert or replace a user record.
    ///
    /// Callers must not change `role` on an existing record; the role
    /// index is written once and roles are immutable by contract.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_user(&self, user: &User) -> Result<()>;

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_user(&self, user_id: &UserId) -> Result<Option<User>>;

    /// List all users with the given role.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_users_by_role(&self, role: Role) -> Result<Vec<User>>;

    /// Atomically add `points` to a user's reward balance.
    ///
    /// Returns the new balance. `points` must be non-negative; reward
    /// balances only grow.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the user doesn't exist.
    fn credit_reward_points(&self, user_id: &UserId, points: i64) -> Result<i64>;

    // =========================================================================
    // Report Operations
    // =========================================================================

    /// Insert a freshly created report and emit a `create` feed event.
    ///
    /// This also maintains the by-resident index.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn create_report(&self, report: &WasteReport) -> Result<()>;

    /// Get a report by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_report(&self, id: &ReportId) -> Result<Option<WasteReport>>;

    /// List a resident's reports, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_reports_by_resident(
        &self,
        resident_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<WasteReport>>;

    /// List the reports assigned to a worker, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_reports_by_worker(
        &self,
        worker_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<WasteReport>>;

    // =========================================================================
    // Compound Operations
    // =========================================================================

    /// Bind a worker to a pending report and emit an `update` feed event.
    ///
    /// The `pending`/unassigned precondition is re-checked under the
    /// write lock, so a racing duplicate cannot double-assign.
    ///
    /// Returns the updated report.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the report doesn't exist.
    /// - `DomainError::AlreadyAssigned` if the report has advanced.
    fn assign_report(&self, id: &ReportId, worker_id: &UserId) -> Result<WasteReport>;

    /// Record a collection (status → `collected`, optional pickup photo)
    /// and emit an `update` feed event.
    ///
    /// Returns the updated report.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the report doesn't exist.
    /// - `DomainError::InvalidTransition` if the report is not `assigned`.
    fn collect_report(
        &self,
        id: &ReportId,
        pickup_photo_url: Option<String>,
    ) -> Result<WasteReport>;

    /// Finalize a collected report (reward amount + `collected_at`) and
    /// emit an `update` feed event.
    ///
    /// The `collected_at == None` precondition is re-checked under the
    /// write lock; this is the double-reward defense.
    ///
    /// Returns the updated report.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the report doesn't exist.
    /// - `DomainError::AlreadyFinalized` if already finalized.
    /// - `DomainError::NotCollected` if the report is not `collected`.
    fn finalize_report(&self, id: &ReportId, reward_amount: i64) -> Result<WasteReport>;

    // =========================================================================
    // Change Feed
    // =========================================================================

    /// Subscribe to the change-event feed.
    ///
    /// Delivery is exactly what the channel delivers: no replay, no
    /// gap-filling. A subscriber that falls behind misses events.
    fn subscribe(&self) -> broadcast::Receiver<FeedMessage>;
}
