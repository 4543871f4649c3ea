//! EcoCollect Client SDK.
//!
//! This crate provides a client library for devices and services to
//! interact with the EcoCollect API, plus the worker-side realtime
//! notifier that watches a change-event stream for new assignments.
//!
//! # Example
//!
//! ```no_run
//! use ecocollect_client::{CreateReport, EcoCollectClient};
//!
//! # async fn example() -> Result<(), ecocollect_client::ClientError> {
//! let client = EcoCollectClient::new("http://ecocollect:8080", "user-jwt");
//!
//! let report = client.create_report(CreateReport {
//!     location_text: "Main St".to_string(),
//!     latitude: 1.0,
//!     longitude: 2.0,
//!     waste_photo_url: "photos/f1".to_string(),
//! }).await?;
//!
//! println!("Filed report {}", report.id);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod notifier;

pub use client::{ClientOptions, CreateReport, EcoCollectClient};
pub use error::ClientError;
pub use notifier::{AssignmentWatcher, FeedSource, Subscription};
