//! Status review workflow for case-management application records.
//!
//! The [`workflows::status_update`] module holds the headless status update form
//! together with the repository seam and HTTP router that expose it.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
