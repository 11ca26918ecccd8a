//! Custodial Sync - Main Library
//!
//! Offline-aware form persistence for a custodial inspection app, plus the
//! small server it talks to.
//!
//! # Overview
//!
//! Inspectors fill in forms on devices with unreliable connectivity. This
//! library keeps their work safe:
//! - Drafts are auto-saved locally and expire after a retention window
//! - Connectivity is tracked from platform events and periodic health probes
//! - Submissions go out when online and stay as drafts when not
//! - A pending-review count is polled from the server
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between client and server
//!   - Submission payloads and validation
//!   - Pagination, clock, configuration
//!   - Error types
//!
//! - **`client`** - Draft store, network monitor, pending poller, auto-save
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server
//!   - Inspection store and admin review sessions
//!
//! # Feature Flags
//!
//! - **`ssr`** - Enables the backend module and the `custodial-server` binary
//!
//! # Usage
//!
//! ## Client
//!
//! ```rust,no_run
//! use custodial_sync::client::{Config, DraftStore, NetworkMonitor, SqliteStorage};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new();
//! let storage = SqliteStorage::open_default().await?;
//! let drafts = DraftStore::new(Arc::new(storage));
//! drafts.migrate_legacy_drafts().await;
//!
//! let monitor = NetworkMonitor::from_config(&config);
//! let _running = monitor.start();
//! # Ok(())
//! # }
//! ```
//!
//! ## Server-Side
//!
//! ```rust,ignore
//! use custodial_sync::backend::server::init::create_app;
//!
//! # async fn example() {
//! let app = create_app().await;
//! // Use app with Axum server
//! # }
//! ```
//!
//! # Thread Safety
//!
//! - **Client**: components are cheap to clone and share state through `Arc`
//! - **Server**: all state is thread-safe using `Arc<RwLock<>>`
//!
//! # Error Handling
//!
//! - `Result<T, E>` for fallible operations
//! - Custom error types in `shared::error`, `client::storage`, `client::api`
//!   and `backend::error`

/// Shared types and data structures
pub mod shared;

/// Offline-aware client components
pub mod client;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
