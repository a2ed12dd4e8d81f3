//! git::progress
//!
//! Transfer progress snapshots and rate limiting.
//!
//! libgit2 invokes the transfer-progress callback far more often than a
//! terminal can usefully display. [`ProgressThrottle`] decides which samples
//! are shown: at most one per interval of wall-clock time. The throttle is a
//! plain value owned by whoever runs the fetch, so its last-emitted
//! timestamp carries over between fetches made through the same owner and
//! the first sample of a new transfer may be suppressed when the previous
//! emission is still inside the window.

use std::fmt;
use std::time::{Duration, Instant};

use crate::core::config::DEFAULT_PROGRESS_INTERVAL;

/// An immutable sample of fetch progress.
///
/// Counts are monotonically non-decreasing within one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransferProgress {
    /// Objects received so far
    pub received_objects: usize,
    /// Objects the remote will send in total
    pub total_objects: usize,
    /// Bytes received so far
    pub received_bytes: usize,
}

impl TransferProgress {
    /// Percent of objects received, in `0..=100`.
    ///
    /// Returns 0 while the total is still unknown.
    ///
    /// # Example
    ///
    /// ```
    /// use relaunch::git::TransferProgress;
    ///
    /// let p = TransferProgress { received_objects: 50, total_objects: 200, received_bytes: 0 };
    /// assert_eq!(p.percent(), 25);
    /// assert_eq!(TransferProgress::default().percent(), 0);
    /// ```
    pub fn percent(&self) -> usize {
        if self.total_objects == 0 {
            return 0;
        }
        (self.received_objects.saturating_mul(100) / self.total_objects).min(100)
    }

    /// Kilobytes received (1 KiB = 1024 bytes, rounded down).
    pub fn received_kib(&self) -> usize {
        self.received_bytes / 1024
    }
}

impl From<git2::Progress<'_>> for TransferProgress {
    fn from(stats: git2::Progress<'_>) -> Self {
        Self {
            received_objects: stats.received_objects(),
            total_objects: stats.total_objects(),
            received_bytes: stats.received_bytes(),
        }
    }
}

impl fmt::Display for TransferProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Downloading: {}% ({}/{} objects, {} KiB)",
            self.percent(),
            self.received_objects,
            self.total_objects,
            self.received_kib()
        )
    }
}

/// Wall-clock rate limiter for progress output.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
/// use relaunch::git::ProgressThrottle;
///
/// let mut throttle = ProgressThrottle::new(Duration::from_millis(500));
/// let start = Instant::now();
/// assert!(throttle.should_emit(start));
/// assert!(!throttle.should_emit(start + Duration::from_millis(100)));
/// assert!(throttle.should_emit(start + Duration::from_millis(500)));
/// ```
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    interval: Duration,
    last_emitted: Option<Instant>,
}

impl ProgressThrottle {
    /// Create a throttle that emits at most once per `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emitted: None,
        }
    }

    /// The configured minimum spacing.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Decide whether a sample observed at `now` should be emitted.
    ///
    /// Records `now` as the last emission when returning true.
    pub fn should_emit(&mut self, now: Instant) -> bool {
        let due = match self.last_emitted {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if due {
            self.last_emitted = Some(now);
        }
        due
    }

    /// Forward `progress` to `sink` if the throttle allows a sample now.
    pub fn observe<F>(&mut self, progress: &TransferProgress, sink: &mut F)
    where
        F: FnMut(&TransferProgress) + ?Sized,
    {
        if self.should_emit(Instant::now()) {
            sink(progress);
        }
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRESS_INTERVAL)
    }
}
