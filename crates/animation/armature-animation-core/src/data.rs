//! Animation data model.
//!
//! An [`Animation`] is immutable once built and is shared between playbacks
//! as `Arc<Animation>`.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::bone::BoneTimeline;
use crate::effects::EffectsTimeline;
use crate::error::{AnimationError, Result};

/// Policy applied when a playback reaches the animation length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    /// Stop; bones fall back to their rest pose.
    Once,
    /// Stop; bones keep their last pose.
    Hold,
    /// Restart from tick 0.
    Loop,
}

#[derive(Debug)]
pub struct Animation {
    name: String,
    length: u32,
    loop_mode: LoopMode,
    priority: i32,
    timelines: HashMap<String, BoneTimeline>,
    effects: EffectsTimeline,
}

impl Animation {
    pub fn builder() -> AnimationBuilder {
        AnimationBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length in ticks; always at least 1.
    pub fn length(&self) -> u32 {
        self.length
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    /// Higher priorities win when layered.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn timelines(&self) -> &HashMap<String, BoneTimeline> {
        &self.timelines
    }

    pub fn timeline(&self, bone: &str) -> Option<&BoneTimeline> {
        self.timelines.get(bone)
    }

    pub fn animates(&self, bone: &str) -> bool {
        self.timelines.contains_key(bone)
    }

    pub fn effects(&self) -> &EffectsTimeline {
        &self.effects
    }
}

/// Validated constructor for [`Animation`].
///
/// `name`, `loop_mode`, the timelines map and `effects` are required;
/// `priority` defaults to 0 and `length` must be positive.
#[derive(Default)]
pub struct AnimationBuilder {
    name: Option<String>,
    length: u32,
    loop_mode: Option<LoopMode>,
    priority: i32,
    timelines: Option<HashMap<String, BoneTimeline>>,
    effects: Option<EffectsTimeline>,
}

impl AnimationBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn length(mut self, ticks: u32) -> Self {
        self.length = ticks;
        self
    }

    pub fn loop_mode(mut self, mode: LoopMode) -> Self {
        self.loop_mode = Some(mode);
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Replaces the whole timelines map.
    pub fn timelines(mut self, timelines: HashMap<String, BoneTimeline>) -> Self {
        self.timelines = Some(timelines);
        self
    }

    /// Adds one bone timeline, creating the map if needed.
    pub fn timeline(mut self, bone: impl Into<String>, timeline: BoneTimeline) -> Self {
        self.timelines
            .get_or_insert_with(HashMap::new)
            .insert(bone.into(), timeline);
        self
    }

    pub fn effects(mut self, effects: EffectsTimeline) -> Self {
        self.effects = Some(effects);
        self
    }

    pub fn build(self) -> Result<Animation> {
        let name = self.name.ok_or_else(|| AnimationError::missing("name"))?;
        let loop_mode = self
            .loop_mode
            .ok_or_else(|| AnimationError::missing("loop_mode"))?;
        let timelines = self
            .timelines
            .ok_or_else(|| AnimationError::missing("timelines"))?;
        let effects = self
            .effects
            .ok_or_else(|| AnimationError::missing("effects"))?;
        if self.length == 0 {
            return Err(AnimationError::invalid(format!(
                "animation '{name}' must be at least one tick long"
            )));
        }
        Ok(Animation {
            name,
            length: self.length,
            loop_mode,
            priority: self.priority,
            timelines,
            effects,
        })
    }

    /// Builds and wraps in an `Arc` for sharing across playbacks.
    pub fn build_shared(self) -> Result<Arc<Animation>> {
        self.build().map(Arc::new)
    }
}
