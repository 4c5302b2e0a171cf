//! Core configuration for armature-animation-core.

use serde::{Deserialize, Serialize};

/// Playback configuration shared by queues and players.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Samples taken per axis when tabulating a Bézier segment.
    pub bezier_divisions: usize,

    /// Name given to synthesized transition animations.
    pub transition_name: String,

    /// Host tick rate. Only used to convert authored seconds into ticks.
    pub ticks_per_second: u32,
}

impl Config {
    /// Converts a duration in seconds to whole ticks, rounding to nearest.
    pub fn ticks(&self, seconds: f32) -> u32 {
        (seconds.max(0.0) * self.ticks_per_second as f32).round() as u32
    }

    pub(crate) fn divisions(&self) -> usize {
        self.bezier_divisions.max(2)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bezier_divisions: 100,
            transition_name: "$$transition".to_string(),
            ticks_per_second: 20,
        }
    }
}
