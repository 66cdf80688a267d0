//! Adaptive population cap driven by recent tick durations
//!
//! A rolling window of tick times feeds a simple hysteretic controller:
//! slow ticks shrink the cap, fast ticks with a nearly full world grow it.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;

/// Samples needed before the controller acts
pub const MIN_SAMPLES: usize = 5;

/// Population share of the cap above which growth is considered
pub const GROWTH_UTILIZATION: f64 = 0.8;

/// A change the controller made to the dynamic cap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CapAdjustment {
    Reduced { from: usize, to: usize, mean_secs: f64 },
    Increased { from: usize, to: usize, mean_secs: f64 },
}

impl CapAdjustment {
    pub fn new_cap(&self) -> usize {
        match *self {
            CapAdjustment::Reduced { to, .. } | CapAdjustment::Increased { to, .. } => to,
        }
    }
}

/// Rolling window of tick durations in seconds
#[derive(Debug, Clone)]
pub struct PerformanceMonitor {
    samples: VecDeque<f64>,
    window: usize,
}

impl PerformanceMonitor {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: VecDeque::with_capacity(window),
            window,
        }
    }

    /// Record one tick duration, dropping the oldest sample when full
    pub fn record(&mut self, elapsed: Duration) {
        self.record_secs(elapsed.as_secs_f64());
    }

    pub fn record_secs(&mut self, secs: f64) {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(secs);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn mean(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }

    /// Decide whether the cap should move. Returns None when it stays put.
    pub fn evaluate(
        &self,
        cap: usize,
        population: usize,
        config: &SimulationConfig,
    ) -> Option<CapAdjustment> {
        if self.samples.len() < MIN_SAMPLES {
            return None;
        }
        let mean_secs = self.mean()?;

        if mean_secs > config.lag_threshold {
            let to = shrink_cap(cap, config.cap_shrink_factor, config.min_entities);
            (to < cap).then_some(CapAdjustment::Reduced {
                from: cap,
                to,
                mean_secs,
            })
        } else if mean_secs < config.lag_threshold / 2.0
            && population as f64 >= cap as f64 * GROWTH_UTILIZATION
        {
            let to = grow_cap(cap, config.cap_growth_factor, config.max_entities_limit);
            (to > cap).then_some(CapAdjustment::Increased {
                from: cap,
                to,
                mean_secs,
            })
        } else {
            None
        }
    }
}

/// Multiplicative decrease, always by at least one, never below `floor`
pub fn shrink_cap(cap: usize, factor: f64, floor: usize) -> usize {
    let scaled = (cap as f64 * factor).floor() as usize;
    scaled.min(cap.saturating_sub(1)).max(floor)
}

/// Multiplicative increase, always by at least one, never above `ceiling`
pub fn grow_cap(cap: usize, factor: f64, ceiling: usize) -> usize {
    let scaled = (cap as f64 * factor).ceil() as usize;
    scaled.max(cap + 1).min(ceiling)
}
