//! Cosmetic spin-wheel reward on the profile page.

use rand::Rng;
use serde::Serialize;

/// Result of a single spin. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpinOutcome {
    pub index: usize,
    pub label: String,
}

/// A wheel of equally weighted reward segments.
#[derive(Debug, Clone)]
pub struct SpinWheel {
    labels: Vec<String>,
}

impl SpinWheel {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Pick a segment uniformly at random. `None` for an empty wheel.
    pub fn spin<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<SpinOutcome> {
        if self.labels.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.labels.len());
        Some(SpinOutcome {
            index,
            label: self.labels[index].clone(),
        })
    }
}
