//! User types for EcoCollect.
//!
//! A `User` record mirrors an account in the external identity service and
//! carries the data the lifecycle engine needs: the role (which decides
//! whether the user can be assigned collections) and the reward-points
//! balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// A user profile record.
///
/// Exactly one record exists per `user_id`; the identity service owns
/// authentication, this record owns the role and reward balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// The user ID (from the identity service).
    pub user_id: UserId,

    /// Display name.
    pub name: String,

    /// Email address.
    pub email: String,

    /// Role. Immutable after creation.
    pub role: Role,

    /// Reward-points balance. Non-negative and monotonically
    /// non-decreasing; mutated only by the completion handler through
    /// the store's atomic credit operation.
    pub reward_points: i64,

    /// When the profile was created.
    pub created_at: DateTime<Utc>,

    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new profile with a zero reward balance.
    #[must_use]
    pub fn new(user_id: UserId, name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            name: name.into(),
            email: email.into(),
            role,
            reward_points: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether this user can be assigned collections.
    #[must_use]
    pub fn is_worker(&self) -> bool {
        self.role == Role::Worker
    }
}

/// The role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Files waste reports.
    Resident,

    /// Collects reported waste and earns reward points.
    Worker,
}

impl Role {
    /// Stable single-byte tag used in role index keys.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Resident => b'r',
            Self::Worker => b'w',
        }
    }
}
