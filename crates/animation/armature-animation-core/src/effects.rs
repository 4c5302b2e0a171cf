//! Timed side effects: sound cues and script instructions.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A sound cue. Playback is up to the host's audio collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sound {
    pub name: String,
    #[serde(default = "unit")]
    pub volume: f32,
    #[serde(default = "unit")]
    pub pitch: f32,
}

fn unit() -> f32 {
    1.0
}

impl Sound {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            volume: 1.0,
            pitch: 1.0,
        }
    }
}

/// Effects registered for a single tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectsFrame {
    #[serde(default)]
    pub sounds: Vec<Sound>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

impl EffectsFrame {
    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty() && self.instructions.is_empty()
    }
}

/// Tick to effect batch mapping of one animation.
#[derive(Clone, Debug, Default)]
pub struct EffectsTimeline {
    frames: Arc<BTreeMap<u32, EffectsFrame>>,
}

impl EffectsTimeline {
    pub fn builder() -> EffectsTimelineBuilder {
        EffectsTimelineBuilder::default()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, tick: u32) -> Option<&EffectsFrame> {
        self.frames.get(&tick)
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn playhead(&self) -> EffectsPlayhead {
        EffectsPlayhead {
            timeline: self.clone(),
            tick: 0,
        }
    }
}

#[derive(Default)]
pub struct EffectsTimelineBuilder {
    frames: BTreeMap<u32, EffectsFrame>,
}

impl EffectsTimelineBuilder {
    pub fn sound(mut self, tick: u32, sound: Sound) -> Self {
        self.frames.entry(tick).or_default().sounds.push(sound);
        self
    }

    pub fn instruction(mut self, tick: u32, instruction: impl Into<String>) -> Self {
        self.frames
            .entry(tick)
            .or_default()
            .instructions
            .push(instruction.into());
        self
    }

    pub fn build(self) -> EffectsTimeline {
        EffectsTimeline {
            frames: Arc::new(self.frames),
        }
    }
}

/// Cursor over an [`EffectsTimeline`]; samples the current tick, then
/// advances.
#[derive(Clone, Debug)]
pub struct EffectsPlayhead {
    timeline: EffectsTimeline,
    tick: u32,
}

impl EffectsPlayhead {
    /// Returns the batch for the current tick (empty if none) together with
    /// that tick, then advances.
    pub fn next(&mut self) -> (u32, EffectsFrame) {
        let tick = self.tick;
        self.tick = self.tick.saturating_add(1);
        let frame = self.timeline.get(tick).cloned().unwrap_or_default();
        (tick, frame)
    }

    /// Ticks sampled so far.
    pub fn tick(&self) -> u32 {
        self.tick
    }
}
