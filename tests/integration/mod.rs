//! Integration tests
//!
//! Exercise the client components together, against wiremock servers or the
//! real router.

mod drafts_test;
mod network_test;
mod pending_test;
mod session_test;

#[cfg(feature = "ssr")]
mod backend_test;
