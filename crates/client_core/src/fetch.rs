//! Shared pieces of the fetch, degrade, present cycle.
//!
//! Each trigger holds a [`LoadingGuard`] for the lifetime of its request.
//! The guard is released on drop, so every exit path (success, failure,
//! panic, or the future being dropped mid-await) clears its share of the
//! indicator.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// Where the data currently on screen came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Live,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    Idle,
    Loading,
    Success,
    Failed,
}

impl FetchPhase {
    pub fn resolve(is_loading: bool, source: Option<DataSource>) -> Self {
        match (is_loading, source) {
            (true, _) => Self::Loading,
            (false, None) => Self::Idle,
            (false, Some(DataSource::Live)) => Self::Success,
            (false, Some(DataSource::Fallback)) => Self::Failed,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadingTracker {
    in_flight: Arc<AtomicUsize>,
}

impl LoadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> LoadingGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        LoadingGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    /// True while at least one trigger has not settled.
    pub fn is_loading(&self) -> bool {
        self.in_flight() > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

#[must_use = "dropping the guard immediately clears the loading indicator"]
#[derive(Debug)]
pub struct LoadingGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
