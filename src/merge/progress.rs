//! Progress accounting and the event stream UIs subscribe to.

use serde::Serialize;

/// Counts ticks against a fixed denominator.
///
/// One tick per group (when its processing starts) plus one per product (after its
/// image was resolved), so `total = groups + products`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressTracker {
    processed: usize,
    total: usize,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self {
            processed: 0,
            total,
        }
    }

    pub fn for_manifest(groups: &[crate::model::Group]) -> Self {
        Self::new(groups.len() + groups.iter().map(|g| g.products.len()).sum::<usize>())
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Current percentage; 100 when there is nothing to do.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        let ratio = self.processed as f64 / self.total as f64;
        (ratio * 100.0).round().min(100.0) as u8
    }

    /// Records one unit of work and returns the new percentage.
    pub fn tick(&mut self) -> u8 {
        self.processed = (self.processed + 1).min(self.total);
        self.percent()
    }
}

/// Totals for one finished sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub groups: usize,
    pub products: usize,
    pub downloaded: usize,
    pub cache_hits: usize,
    pub failed_images: usize,
}

/// Published on the engine's broadcast channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyncEvent {
    Started,
    Progress {
        processed: usize,
        total: usize,
        percent: u8,
    },
    Completed(SyncOutcome),
    /// The single user-facing notification for a failed sync.
    Failed {
        reason: String,
    },
}
