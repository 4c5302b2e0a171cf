//! Playback state shared by [`AnimationQueue`](crate::queue::AnimationQueue)
//! and the layers of [`AnimationPlayer`](crate::player::AnimationPlayer).
//!
//! A [`Stream`] is one line of playback: the current animation with its
//! playheads, plus the animations waiting behind it. Termination is
//! evaluated once per tick in [`Stream::end_tick`], so every bone and the
//! effects batch of a tick observe the same animation.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use log::debug;

use crate::bone::{BoneFrame, BonePlayhead};
use crate::data::{Animation, LoopMode};
use crate::effects::{EffectsFrame, EffectsPlayhead};

/// Last frame observed per bone; the fallback pose for idle bones.
pub type LastFrames = HashMap<String, BoneFrame>;

/// Playheads of one running animation.
#[derive(Debug)]
pub struct Playback {
    animation: Arc<Animation>,
    bones: HashMap<String, BonePlayhead>,
    effects: EffectsPlayhead,
    divisions: usize,
}

impl Playback {
    pub fn start(animation: Arc<Animation>, divisions: usize) -> Self {
        let bones = animation
            .timelines()
            .iter()
            .map(|(name, timeline)| (name.clone(), timeline.playhead(divisions)))
            .collect();
        let effects = animation.effects().playhead();
        Self {
            animation,
            bones,
            effects,
            divisions,
        }
    }

    /// Rewinds every playhead to tick 0.
    pub fn restart(&mut self) {
        *self = Self::start(Arc::clone(&self.animation), self.divisions);
    }

    pub fn animation(&self) -> &Arc<Animation> {
        &self.animation
    }

    pub fn has_bone(&self, bone: &str) -> bool {
        self.bones.contains_key(bone)
    }

    /// Advances one bone; `None` if the animation does not drive it.
    pub fn advance_bone(&mut self, bone: &str) -> Option<BoneFrame> {
        self.bones.get_mut(bone).map(BonePlayhead::next)
    }

    /// Advances the effects playhead; the batch is returned only while the
    /// advanced tick count is still short of the animation length, so the
    /// last tick of a cycle never emits.
    pub fn advance_effects(&mut self) -> Option<EffectsFrame> {
        let (tick, frame) = self.effects.next();
        (tick.saturating_add(1) < self.animation.length()).then_some(frame)
    }

    /// Ticks this playback has advanced, across bones and effects.
    pub fn elapsed(&self) -> u32 {
        self.bones
            .values()
            .map(BonePlayhead::tick)
            .fold(self.effects.tick(), u32::max)
    }

    pub fn finished(&self) -> bool {
        self.elapsed() >= self.animation.length()
    }

    /// Bones that produced at least one frame in this run.
    pub fn driven_bones(&self) -> impl Iterator<Item = &str> + '_ {
        self.bones
            .iter()
            .filter(|(_, playhead)| playhead.tick() > 0)
            .map(|(name, _)| name.as_str())
    }
}

/// End-of-animation policy.
pub type EndHandler = fn(&mut Stream, &mut LastFrames);

/// Policy table: one handler per loop mode.
pub fn end_handler(mode: LoopMode) -> EndHandler {
    match mode {
        LoopMode::Once => end_once,
        LoopMode::Hold => end_hold,
        LoopMode::Loop => end_loop,
    }
}

/// Forgets the poses the finished animation left behind, then moves on.
fn end_once(stream: &mut Stream, last_frames: &mut LastFrames) {
    if let Some(current) = &stream.current {
        for bone in current.driven_bones() {
            last_frames.remove(bone);
        }
    }
    stream.promote();
}

/// Keeps the final poses as fallback, then moves on.
fn end_hold(stream: &mut Stream, _last_frames: &mut LastFrames) {
    stream.promote();
}

fn end_loop(stream: &mut Stream, _last_frames: &mut LastFrames) {
    if let Some(current) = stream.current.as_mut() {
        debug!("looping animation '{}'", current.animation().name());
        current.restart();
    }
}

/// Current animation plus the animations queued behind it.
#[derive(Debug)]
pub struct Stream {
    pending: VecDeque<Arc<Animation>>,
    current: Option<Playback>,
    divisions: usize,
}

impl Stream {
    pub fn new(divisions: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            current: None,
            divisions,
        }
    }

    pub fn current(&self) -> Option<&Playback> {
        self.current.as_ref()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Arc<Animation>> + '_ {
        self.pending.iter()
    }

    pub fn is_idle(&self) -> bool {
        self.current.is_none() && self.pending.is_empty()
    }

    /// Replaces the current animation, keeping the pending ones.
    pub fn play(&mut self, animation: Arc<Animation>) {
        debug!(
            "playing animation '{}' ({} ticks, {:?})",
            animation.name(),
            animation.length(),
            animation.loop_mode()
        );
        self.current = Some(Playback::start(animation, self.divisions));
    }

    /// Appends behind the current and pending animations.
    pub fn enqueue(&mut self, animation: Arc<Animation>) {
        self.pending.push_back(animation);
    }

    /// Puts `animations` in front of the pending ones, in order, and
    /// promotes the first of them.
    pub fn interrupt(&mut self, animations: Vec<Arc<Animation>>) {
        for animation in animations.into_iter().rev() {
            self.pending.push_front(animation);
        }
        self.promote();
    }

    /// Makes the next pending animation current; idle if none.
    pub fn promote(&mut self) {
        match self.pending.pop_front() {
            Some(next) => self.play(next),
            None => {
                if let Some(done) = self.current.take() {
                    debug!("animation '{}' finished; stream idle", done.animation().name());
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.current = None;
    }

    /// Drops every occurrence of the animation named `name`. Returns whether
    /// anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.pending.len();
        self.pending.retain(|a| a.name() != name);
        let mut removed = self.pending.len() != before;
        if self
            .current
            .as_ref()
            .is_some_and(|p| p.animation().name() == name)
        {
            self.current = None;
            self.promote();
            removed = true;
        }
        removed
    }

    /// Advances `bone` in the current animation, promoting a pending
    /// animation first if the stream is idle.
    pub fn advance_bone(&mut self, bone: &str) -> Option<BoneFrame> {
        if self.current.is_none() && !self.pending.is_empty() {
            self.promote();
        }
        self.current.as_mut()?.advance_bone(bone)
    }

    pub fn has_bone(&self, bone: &str) -> bool {
        self.current.as_ref().is_some_and(|p| p.has_bone(bone))
    }

    pub fn advance_effects(&mut self) -> Option<EffectsFrame> {
        self.current.as_mut()?.advance_effects()
    }

    /// Applies the loop-mode policy if the current animation has run its
    /// full length.
    pub fn end_tick(&mut self, last_frames: &mut LastFrames) {
        let Some(current) = &self.current else {
            return;
        };
        if !current.finished() {
            return;
        }
        let mode = current.animation().loop_mode();
        end_handler(mode)(self, last_frames);
    }
}
