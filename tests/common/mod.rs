//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - Scripted connectivity probes
//! - Mock server helpers
//! - Payload and config fixtures
//! - Custom assertion macros

pub mod assertions;
pub mod fixtures;
pub mod mock_server;
pub mod probes;

// Re-export commonly used utilities
pub use fixtures::*;
pub use mock_server::*;
pub use probes::*;
