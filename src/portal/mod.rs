//! Grading portal API: login, homework list and submission upload.

pub mod client;
pub mod error;
pub mod types;

pub use client::PortalClient;
pub use error::PortalError;
pub use types::{HomeworkSummary, LoginOutcome, SubmissionRequest, SubmitReceipt};
