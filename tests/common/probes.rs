//! Connectivity probes with scripted answers

use async_trait::async_trait;
use custodial_sync::client::network::{ConnectivityProbe, ProbeOutcome};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Replays queued outcomes in order, then keeps answering with the last one
#[derive(Debug)]
pub struct ScriptedProbe {
    queue: Mutex<VecDeque<ProbeOutcome>>,
    last: Mutex<ProbeOutcome>,
    calls: AtomicUsize,
}

impl ScriptedProbe {
    pub fn new(outcomes: &[ProbeOutcome]) -> Arc<Self> {
        Arc::new(Self {
            queue: Mutex::new(outcomes.iter().copied().collect()),
            last: Mutex::new(ProbeOutcome::Reachable),
            calls: AtomicUsize::new(0),
        })
    }

    /// Queue more outcomes
    pub fn push(&self, outcome: ProbeOutcome) {
        self.queue.lock().unwrap().push_back(outcome);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectivityProbe for ScriptedProbe {
    async fn probe(&self) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.queue.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(next) = next {
            *last = next;
        }
        *last
    }
}
