//! Depth-staggered reveal timing.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Reveal timing for a layout: every level starts `delay_step` after the one
/// above it and fades in over `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationTiming {
    pub delay_step: Duration,
    pub duration: Duration,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            delay_step: Duration::from_millis(200),
            duration: Duration::from_millis(100),
        }
    }
}

impl AnimationTiming {
    pub fn from_millis(delay_step_ms: u64, duration_ms: u64) -> Self {
        Self {
            delay_step: Duration::from_millis(delay_step_ms),
            duration: Duration::from_millis(duration_ms),
        }
    }

    pub fn delay_for_depth(&self, depth: usize) -> Duration {
        let levels = u32::try_from(depth).unwrap_or(u32::MAX);
        self.delay_step.checked_mul(levels).unwrap_or(Duration::MAX)
    }

    /// Time until the deepest level has finished appearing.
    pub fn total_for_depth(&self, max_depth: usize) -> Duration {
        self.delay_for_depth(max_depth).saturating_add(self.duration)
    }
}
