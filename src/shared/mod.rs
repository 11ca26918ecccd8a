//! Shared Module
//!
//! Types and data structures shared between the inspection client and the
//! companion server. These types are serialized over the inspection API.
//!
//! # Overview
//!
//! The shared module provides platform-agnostic types that can be used
//! in both server and client code.

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Injectable wall clock
pub mod clock;

/// Tagged submission payloads and their validation
pub mod submission;

/// Paginated list responses
pub mod pagination;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use submission::{InspectionSummary, Ratings, SubmissionPayload, SubmissionReceipt};
pub use pagination::{Page, Pagination, PaginationEnvelope};
