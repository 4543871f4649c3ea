//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions for encoding and decoding keys used in
//! column families.

use ecocollect_core::{ReportId, Role, UserId};

/// Create a user key from a user ID.
#[must_use]
pub fn user_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a role index key.
///
/// Format: `role_tag (1 byte) || user_id (16 bytes)`
#[must_use]
pub fn role_user_key(role: Role, user_id: &UserId) -> Vec<u8> {
    let mut key = Vec::with_capacity(17);
    key.push(role.tag());
    key.extend_from_slice(user_id.as_bytes());
    key
}

/// Create a prefix for iterating all users with a role.
#[must_use]
pub fn role_prefix(role: Role) -> Vec<u8> {
    vec![role.tag()]
}

/// Extract the user ID from a role index key.
///
/// # Panics
///
/// Panics if the key is not exactly 17 bytes.
#[must_use]
pub fn extract_user_id_from_role_key(key: &[u8]) -> UserId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[1..17]);
    UserId::from_uuid(uuid::Uuid::from_bytes(bytes))
}

/// Create a report key from a report ID.
#[must_use]
pub fn report_key(report_id: &ReportId) -> Vec<u8> {
    report_id.to_bytes().to_vec()
}

/// Create a user-report index key (by-resident and by-worker indexes
/// share this shape).
///
/// Format: `user_id (16 bytes) || report_id (16 bytes)`
///
/// Since ULIDs are time-ordered, a user's reports sort by creation time.
#[must_use]
pub fn user_report_key(user_id: &UserId, report_id: &ReportId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&report_id.to_bytes());
    key
}

/// Create a prefix for iterating all reports indexed under a user.
#[must_use]
pub fn user_reports_prefix(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Extract the report ID from a user-report index key.
///
/// # Panics
///
/// Panics if the key is not at least 32 bytes.
#[must_use]
pub fn extract_report_id_from_user_key(key: &[u8]) -> ReportId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[16..32]);
    ReportId::from_bytes(bytes).expect("valid ULID bytes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_key_length() {
        let user_id = UserId::generate();
        let key = user_key(&user_id);
        assert_eq!(key.len(), 16);
    }

    #[test]
    fn role_key_format() {
        let user_id = UserId::generate();
        let key = role_user_key(Role::Worker, &user_id);

        assert_eq!(key.len(), 17);
        assert_eq!(key[0], Role::Worker.tag());
        assert_eq!(&key[1..], user_id.as_bytes());
    }

    #[test]
    fn extract_user_id_roundtrip() {
        let user_id = UserId::generate();
        let key = role_user_key(Role::Resident, &user_id);

        let extracted = extract_user_id_from_role_key(&key);
        assert_eq!(extracted, user_id);
    }

    #[test]
    fn user_report_key_format() {
        let user_id = UserId::generate();
        let report_id = ReportId::generate();
        let key = user_report_key(&user_id, &report_id);

        assert_eq!(key.len(), 32);
        assert_eq!(&key[..16], user_id.as_bytes());
        assert_eq!(&key[16..], report_id.to_bytes());
    }

    #[test]
    fn extract_report_id_roundtrip() {
        let user_id = UserId::generate();
        let report_id = ReportId::generate();
        let key = user_report_key(&user_id, &report_id);

        let extracted = extract_report_id_from_user_key(&key);
        assert_eq!(extracted, report_id);
    }
}
