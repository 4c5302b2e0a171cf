//! Single-stream playback with queueing and synthesized transitions.

use std::sync::Arc;

use log::{debug, warn};

use crate::bone::BoneFrame;
use crate::config::Config;
use crate::data::Animation;
use crate::effects::EffectsFrame;
use crate::playback::{LastFrames, Playback, Stream};
use crate::transition;

/// Plays one animation at a time.
///
/// Call [`next_frame`](Self::next_frame) once per bone and
/// [`next_effects`](Self::next_effects) once per tick, then
/// [`end_tick`](Self::end_tick) to apply loop-mode policies.
#[derive(Debug)]
pub struct AnimationQueue {
    config: Config,
    stream: Stream,
    last_frames: LastFrames,
}

impl Default for AnimationQueue {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AnimationQueue {
    pub fn new(config: Config) -> Self {
        let stream = Stream::new(config.divisions());
        Self {
            config,
            stream,
            last_frames: LastFrames::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Interrupts the current animation with `animation`.
    ///
    /// With `transition_ticks > 0` a synthetic clip first blends from the
    /// last observed poses to the first frame of `animation`. Animations
    /// already pending stay queued behind it.
    pub fn queue(&mut self, animation: Arc<Animation>, transition_ticks: u32) {
        debug!(
            "queueing '{}' with {transition_ticks} transition ticks",
            animation.name()
        );
        if transition_ticks == 0 {
            self.stream.interrupt(vec![animation]);
            return;
        }
        match transition::synthesize(
            &self.config.transition_name,
            &self.last_frames,
            &animation,
            transition_ticks,
            self.config.divisions(),
        ) {
            Ok(clip) => self.stream.interrupt(vec![Arc::new(clip), animation]),
            Err(err) => {
                warn!("transition into '{}' skipped: {err}", animation.name());
                self.stream.interrupt(vec![animation]);
            }
        }
    }

    /// Appends `animation` behind everything already queued, without
    /// interrupting.
    pub fn enqueue(&mut self, animation: Arc<Animation>) {
        self.stream.enqueue(animation);
    }

    /// Drops the current and pending animations.
    pub fn clear(&mut self) {
        debug!("clearing animation queue");
        self.stream.clear();
    }

    pub fn current(&self) -> Option<&Arc<Animation>> {
        self.stream.current().map(Playback::animation)
    }

    pub fn pending(&self) -> Vec<Arc<Animation>> {
        self.stream.pending().cloned().collect()
    }

    pub fn is_idle(&self) -> bool {
        self.stream.is_idle()
    }

    pub fn last_frame(&self, bone: &str) -> Option<&BoneFrame> {
        self.last_frames.get(bone)
    }

    /// Frame for `bone` at this tick.
    ///
    /// Bones the current animation does not drive, or any bone while idle,
    /// get their last observed frame or [`BoneFrame::INITIAL`].
    pub fn next_frame(&mut self, bone: &str) -> BoneFrame {
        match self.stream.advance_bone(bone) {
            Some(frame) => {
                record(&mut self.last_frames, bone, frame);
                frame
            }
            None => self.fallback(bone),
        }
    }

    pub fn next_effects(&mut self) -> Option<EffectsFrame> {
        self.stream.advance_effects()
    }

    /// Applies the current animation's loop mode if it has run its length.
    pub fn end_tick(&mut self) {
        self.stream.end_tick(&mut self.last_frames);
    }

    fn fallback(&self, bone: &str) -> BoneFrame {
        self.last_frames
            .get(bone)
            .copied()
            .unwrap_or(BoneFrame::INITIAL)
    }
}

pub(crate) fn record(last_frames: &mut LastFrames, bone: &str, frame: BoneFrame) {
    match last_frames.get_mut(bone) {
        Some(slot) => *slot = frame,
        None => {
            last_frames.insert(bone.to_string(), frame);
        }
    }
}
