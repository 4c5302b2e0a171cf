//! Boundary traits.
//!
//! Hosts implement [`BoneView`], [`ModelView`] and [`EffectSink`] to receive
//! per-tick output. [`FrameSource`] is what a controller ticks; both
//! [`AnimationQueue`] and [`AnimationPlayer`] implement it.

use std::collections::HashMap;

use crate::bone::BoneFrame;
use crate::effects::{EffectsFrame, Sound};
use crate::player::AnimationPlayer;
use crate::queue::AnimationQueue;
use crate::value::{Rotation, Vec3};

/// Receives the global transform of one bone each tick.
pub trait BoneView {
    fn update(&mut self, position: Vec3, rotation: Rotation, scale: Vec3);
}

/// Resolves bone views by name. Bones without a view are still animated.
pub trait ModelView {
    fn bone(&mut self, name: &str) -> Option<&mut dyn BoneView>;
}

/// Audio and scripting collaborators.
pub trait EffectSink {
    fn emit_sound(&mut self, sound: &Sound);
    fn eval(&mut self, instruction: &str);
}

/// Per-tick frame producer.
pub trait FrameSource {
    /// Called once per bone per tick.
    fn next_frame(&mut self, bone: &str) -> BoneFrame;
    /// Called once per tick, after every bone.
    fn next_effects(&mut self) -> Option<EffectsFrame>;
    /// Called last in every tick.
    fn end_tick(&mut self);
}

impl<V: BoneView> ModelView for HashMap<String, V> {
    fn bone(&mut self, name: &str) -> Option<&mut dyn BoneView> {
        self.get_mut(name).map(|view| view as &mut dyn BoneView)
    }
}

/// Discards every effect.
impl EffectSink for () {
    fn emit_sound(&mut self, _sound: &Sound) {}
    fn eval(&mut self, _instruction: &str) {}
}

impl FrameSource for AnimationQueue {
    fn next_frame(&mut self, bone: &str) -> BoneFrame {
        AnimationQueue::next_frame(self, bone)
    }

    fn next_effects(&mut self) -> Option<EffectsFrame> {
        AnimationQueue::next_effects(self)
    }

    fn end_tick(&mut self) {
        AnimationQueue::end_tick(self)
    }
}

impl FrameSource for AnimationPlayer {
    fn next_frame(&mut self, bone: &str) -> BoneFrame {
        AnimationPlayer::next_frame(self, bone)
    }

    fn next_effects(&mut self) -> Option<EffectsFrame> {
        AnimationPlayer::next_effects(self)
    }

    fn end_tick(&mut self) {
        AnimationPlayer::end_tick(self)
    }
}
