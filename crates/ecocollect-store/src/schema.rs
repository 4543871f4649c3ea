//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary user records, keyed by `user_id`.
    pub const USERS: &str = "users";

    /// Index: users by role, keyed by `role_tag || user_id`.
    /// Value is empty (index only).
    pub const USERS_BY_ROLE: &str = "users_by_role";

    /// Primary report records, keyed by `report_id` (ULID).
    pub const REPORTS: &str = "reports";

    /// Index: reports by resident, keyed by `resident_id || report_id`.
    /// Value is empty (index only).
    pub const REPORTS_BY_RESIDENT: &str = "reports_by_resident";

    /// Index: reports by assigned worker, keyed by
    /// `worker_id || report_id`. Written at assignment time.
    pub const REPORTS_BY_WORKER: &str = "reports_by_worker";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::USERS,
        cf::USERS_BY_ROLE,
        cf::REPORTS,
        cf::REPORTS_BY_RESIDENT,
        cf::REPORTS_BY_WORKER,
    ]
}
