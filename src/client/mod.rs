//! Inspection Client Module
//!
//! Offline-aware form persistence for the inspection app.
//!
//! # Architecture
//!
//! - **`config`** - Client configuration (server URL, timings, storage path)
//! - **`storage`** - Key/value backends (in-memory, SQLite)
//! - **`drafts`** - Local draft store, availability checks, quota monitor
//! - **`network`** - Online/offline/reconnecting state from events and polling
//! - **`pending`** - Cached count of inspections awaiting review
//! - **`autosave`** - Debounced save with an idle/saving/saved/error status
//! - **`api`** - Inspection API client
//! - **`offline`** - Queue of submissions made offline, flushed on reconnect
//! - **`session`** - Wires the above together for one open form
//!
//! # Module Structure
//!
//! ```text
//! client/
//! ├── mod.rs       - Module exports and documentation
//! ├── config.rs    - Configuration management
//! ├── task.rs      - Owned background tasks
//! ├── storage/     - KeyValueStorage trait and backends
//! ├── drafts/      - DraftStore, availability, quota
//! ├── network/     - NetworkMonitor and connectivity probes
//! ├── pending.rs   - PendingCountPoller
//! ├── autosave.rs  - AutoSaveController
//! ├── api.rs       - InspectionApi
//! ├── offline/     - SubmissionQueue and the OfflineSync worker
//! └── session.rs   - FormSession
//! ```
//!
//! Nothing in this module returns an error for a storage or network hiccup.
//! Failures turn into state: a `None` draft, an offline flag, a stale count
//! or an `error` save status.

pub mod api;
pub mod autosave;
pub mod config;
pub mod drafts;
pub mod network;
pub mod offline;
pub mod pending;
pub mod session;
pub mod storage;
pub mod task;

// Re-export commonly used types
pub use api::{ApiError, InspectionApi};
pub use autosave::{AutoSaveController, SaveState, SaveStatus};
pub use config::Config;
pub use drafts::{DraftKey, DraftStore};
pub use network::{ConnectionState, NetworkMonitor, NetworkStatus};
pub use offline::{FlushReport, OfflineSync, SubmissionQueue};
pub use pending::PendingCountPoller;
pub use session::{FormSession, SubmitOutcome};
pub use storage::{KeyValueStorage, MemoryStorage, SqliteStorage, StorageError};
pub use task::TaskHandle;
