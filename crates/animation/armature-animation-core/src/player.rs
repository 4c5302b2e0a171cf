//! Priority-layered playback.
//!
//! Each layer is an independent stream keyed by animation priority. For every
//! bone the highest-priority layer whose current animation drives that bone
//! supplies the frame; lower layers are not advanced for it.

use std::sync::Arc;

use log::{debug, warn};

use crate::bone::BoneFrame;
use crate::config::Config;
use crate::data::Animation;
use crate::effects::EffectsFrame;
use crate::playback::{LastFrames, Playback, Stream};
use crate::queue::record;
use crate::transition;

#[derive(Debug)]
struct Layer {
    priority: i32,
    stream: Stream,
}

#[derive(Debug)]
pub struct AnimationPlayer {
    config: Config,
    /// Sorted by descending priority; priorities are unique.
    layers: Vec<Layer>,
    last_frames: LastFrames,
}

impl Default for AnimationPlayer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AnimationPlayer {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            layers: Vec::new(),
            last_frames: LastFrames::new(),
        }
    }

    /// Plays `animation` on the layer for its priority, replacing whatever
    /// that layer was playing.
    ///
    /// If the layer was playing and `transition_ticks > 0`, a transition
    /// from the last observed poses of the bones involved plays first.
    pub fn add(&mut self, animation: Arc<Animation>, transition_ticks: u32) {
        let priority = animation.priority();
        let index = match self
            .layers
            .binary_search_by(|layer| priority.cmp(&layer.priority))
        {
            Ok(index) => {
                debug!(
                    "replacing layer {priority} with '{}'",
                    animation.name()
                );
                index
            }
            Err(index) => {
                debug!("new layer {priority} for '{}'", animation.name());
                self.layers.insert(
                    index,
                    Layer {
                        priority,
                        stream: Stream::new(self.config.divisions()),
                    },
                );
                index
            }
        };

        let layer = &mut self.layers[index];
        let clip = match layer.stream.current() {
            Some(current) if transition_ticks > 0 => {
                let involved = self.last_frames.iter().filter(|(bone, _)| {
                    current.has_bone(bone) || animation.animates(bone)
                });
                match transition::synthesize(
                    &self.config.transition_name,
                    involved,
                    &animation,
                    transition_ticks,
                    self.config.divisions(),
                ) {
                    Ok(clip) => Some(clip),
                    Err(err) => {
                        warn!("transition into '{}' skipped: {err}", animation.name());
                        None
                    }
                }
            }
            _ => None,
        };

        layer.stream.clear();
        match clip {
            Some(clip) => {
                layer.stream.play(Arc::new(clip));
                layer.stream.enqueue(animation);
            }
            None => layer.stream.play(animation),
        }
    }

    /// Removes every occurrence of `animation` (matched by name) and drops
    /// layers left with nothing to play. Returns whether anything matched.
    pub fn remove(&mut self, animation: &Animation) -> bool {
        let name = animation.name();
        let mut removed = false;
        for layer in &mut self.layers {
            removed |= layer.stream.remove(name);
        }
        self.layers.retain(|layer| !layer.stream.is_idle());
        if removed {
            debug!("removed animation '{name}'");
        } else {
            warn!("remove: animation '{name}' is not playing");
        }
        removed
    }

    /// Drops every layer. Bones keep their last observed pose as fallback.
    pub fn clear(&mut self) {
        debug!("clearing {} animation layers", self.layers.len());
        self.layers.clear();
    }

    /// Current animations, highest priority first.
    pub fn animations(&self) -> Vec<Arc<Animation>> {
        self.layers
            .iter()
            .filter_map(|layer| layer.stream.current().map(Playback::animation))
            .cloned()
            .collect()
    }

    pub fn layer_priorities(&self) -> Vec<i32> {
        self.layers.iter().map(|layer| layer.priority).collect()
    }

    pub fn last_frame(&self, bone: &str) -> Option<&BoneFrame> {
        self.last_frames.get(bone)
    }

    /// Frame for `bone` from the first layer that drives it; otherwise the
    /// last observed frame or [`BoneFrame::INITIAL`].
    pub fn next_frame(&mut self, bone: &str) -> BoneFrame {
        for layer in &mut self.layers {
            if let Some(frame) = layer.stream.advance_bone(bone) {
                record(&mut self.last_frames, bone, frame);
                return frame;
            }
        }
        self.last_frames
            .get(bone)
            .copied()
            .unwrap_or(BoneFrame::INITIAL)
    }

    /// Effects of the highest-priority layer with a current animation.
    pub fn next_effects(&mut self) -> Option<EffectsFrame> {
        self.layers
            .iter_mut()
            .find(|layer| layer.stream.current().is_some())?
            .stream
            .advance_effects()
    }

    pub fn end_tick(&mut self) {
        for layer in &mut self.layers {
            layer.stream.end_tick(&mut self.last_frames);
        }
    }
}
