//! Transfer progress, throughput and ETA tracking.
//!
//! The displayed speed is the mean of the last few instantaneous rates so it
//! does not jitter. The ETA uses the overall average rate since the transfer
//! started, which is steadier over a long transfer. The two are kept apart.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Number of instantaneous rates averaged for the displayed speed.
pub const SPEED_HISTORY_LEN: usize = 5;

/// Minimum time between two rate samples.
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(300);

/// A rendered point in a transfer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    /// Bytes transferred so far
    pub loaded: u64,
    /// Total bytes expected
    pub total: u64,
    /// Percent complete, 0 to 100
    pub percent: f64,
    /// Smoothed speed in bytes per second
    pub speed: f64,
    /// Estimated seconds remaining, 0 when unknown
    pub eta_seconds: f64,
}

/// Tracks one upload or download.
#[derive(Debug, Clone)]
pub struct TransferProgress {
    total: u64,
    loaded: u64,
    started_at: Instant,
    last_sample_at: Instant,
    last_sample_loaded: u64,
    history: VecDeque<f64>,
}

impl TransferProgress {
    /// Start tracking a transfer of `total` bytes at `now`.
    pub fn new(total: u64, now: Instant) -> Self {
        Self {
            total,
            loaded: 0,
            started_at: now,
            last_sample_at: now,
            last_sample_loaded: 0,
            history: VecDeque::with_capacity(SPEED_HISTORY_LEN),
        }
    }

    /// Bytes transferred so far.
    pub fn loaded(&self) -> u64 {
        self.loaded
    }

    /// Total bytes expected.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Percent complete. An empty transfer counts as complete.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.loaded as f64 * 100.0 / self.total as f64).min(100.0)
    }

    /// Add `bytes` to the running count.
    pub fn advance(&mut self, bytes: u64, now: Instant) -> Option<ProgressUpdate> {
        self.record(self.loaded.saturating_add(bytes), now)
    }

    /// Record that `loaded` bytes are done as of `now`.
    ///
    /// Returns an update only when more than [`SAMPLE_INTERVAL`] and at least
    /// one byte have passed since the previous sample.
    pub fn record(&mut self, loaded: u64, now: Instant) -> Option<ProgressUpdate> {
        self.loaded = loaded;

        let since_sample = now.saturating_duration_since(self.last_sample_at);
        let delta = loaded.saturating_sub(self.last_sample_loaded);
        if since_sample <= SAMPLE_INTERVAL || delta == 0 {
            return None;
        }

        let instant_speed = delta as f64 / since_sample.as_secs_f64();
        if self.history.len() == SPEED_HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(instant_speed);

        self.last_sample_at = now;
        self.last_sample_loaded = loaded;

        Some(ProgressUpdate {
            loaded,
            total: self.total,
            percent: self.percent(),
            speed: self.smoothed_speed(),
            eta_seconds: self.eta_seconds(now),
        })
    }

    /// Mean of the retained instantaneous rates.
    pub fn smoothed_speed(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        self.history.iter().sum::<f64>() / self.history.len() as f64
    }

    /// Average rate since the transfer started.
    pub fn overall_speed(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started_at).as_secs_f64();
        if elapsed <= 0.0 {
            return 0.0;
        }
        self.loaded as f64 / elapsed
    }

    /// Remaining bytes divided by the overall rate, 0 when the rate is unknown.
    pub fn eta_seconds(&self, now: Instant) -> f64 {
        let overall = self.overall_speed(now);
        if overall <= 0.0 {
            return 0.0;
        }
        self.total.saturating_sub(self.loaded) as f64 / overall
    }
}
