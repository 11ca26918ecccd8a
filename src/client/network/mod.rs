//! # Network Status
//!
//! Tracks whether the inspection API is reachable. Platform connectivity
//! events are fed in through [`NetworkMonitor::handle_event`]; a polling loop
//! backs them up because some platforms report "online" while requests are
//! failing.
//!
//! Polling is a best-effort heuristic. The status can lag reality by up to
//! one poll interval.

pub mod monitor;
pub mod probe;

pub use monitor::{
    ConnectionState, ConnectivityEvent, MonitorHandle, MonitorSettings, NetworkMonitor,
    NetworkStatus,
};
pub use probe::{ConnectivityProbe, HttpProbe, ProbeOutcome};
