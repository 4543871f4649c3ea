//! Core types for EcoCollect.
//!
//! This crate provides the foundational types used throughout the EcoCollect
//! platform:
//!
//! - **Identifiers**: `UserId`, `ReportId`
//! - **Users**: `User`, `Role`
//! - **Reports**: `WasteReport`, `ReportStatus`
//! - **Rewards**: `RewardPolicy`, `FixedReward`
//! - **Change feed**: `FeedMessage`, `ChangeKind`
//!
//! # Report lifecycle
//!
//! A `WasteReport` moves forward-only through three states:
//!
//! `pending` (resident files the report) → `assigned` (a worker is bound by
//! the assignment handler) → `collected` (the worker picks up the waste and
//! the completion handler finalizes the record, crediting reward points
//! exactly once). There are no regression transitions and no deletion path.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod feed;
pub mod ids;
pub mod report;
pub mod reward;
pub mod user;

pub use error::{DomainError, Result};
pub use feed::{ChangeKind, FeedMessage, REPORTS_CHANNEL, REPORT_UPDATE_PATTERN};
pub use ids::{IdError, ReportId, UserId};
pub use report::{ReportStatus, WasteReport};
pub use reward::{FixedReward, RewardPolicy, DEFAULT_REWARD_POINTS};
pub use user::{Role, User};
