//! Inspections Module
//!
//! Storage and HTTP handlers for submitted forms.
//!
//! # Module Structure
//!
//! ```text
//! inspections/
//! ├── mod.rs       - Module exports and documentation
//! ├── store.rs     - In-memory InspectionStore
//! └── handlers.rs  - Pending list, submission, review handlers
//! ```

/// In-memory inspection storage
pub mod store;

/// HTTP handlers
pub mod handlers;

pub use handlers::{create_inspection, list_all, list_pending, review_inspection};
pub use store::{InspectionRecord, InspectionStore, ReviewError};
