//! Lock-guarded tick loop.
//!
//! A [`Controller`] owns a skeleton and a frame source behind one mutex.
//! `tick` and every mutating entry point take that lock, so queue/add/clear
//! calls from other threads land atomically between ticks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::trace;

use crate::data::Animation;
use crate::player::AnimationPlayer;
use crate::queue::AnimationQueue;
use crate::skeleton::Skeleton;
use crate::transform::{propagate, yaw_pitch_rotation, Transform};
use crate::value::{Rotation, Vec3};
use crate::view::{EffectSink, FrameSource, ModelView};

#[derive(Debug)]
pub struct Controller<S> {
    skeleton: Skeleton,
    source: Mutex<S>,
}

/// Single-stream controller.
pub type AnimationController = Controller<AnimationQueue>;
/// Priority-layered controller.
pub type LayeredController = Controller<AnimationPlayer>;

impl<S: FrameSource> Controller<S> {
    pub fn new(skeleton: Skeleton, source: S) -> Self {
        Self {
            skeleton,
            source: Mutex::new(source),
        }
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    // poisoned locks are recovered; state is only mutated under the guard
    fn lock(&self) -> MutexGuard<'_, S> {
        self.source.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with exclusive access to the frame source.
    pub fn with_source<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut *self.lock())
    }

    /// Advances one tick: bone transforms, then effects, then loop-mode
    /// policies.
    pub fn tick(
        &self,
        view: &mut dyn ModelView,
        effects: &mut dyn EffectSink,
        root_rotation: Rotation,
        root_position: Vec3,
    ) {
        let mut source = self.lock();
        propagate(
            &self.skeleton,
            &mut *source,
            view,
            Transform::root(root_rotation, root_position),
        );
        if let Some(frame) = source.next_effects() {
            for sound in &frame.sounds {
                trace!("emit sound '{}'", sound.name);
                effects.emit_sound(sound);
            }
            for instruction in &frame.instructions {
                trace!("eval '{instruction}'");
                effects.eval(instruction);
            }
        }
        source.end_tick();
    }

    /// [`tick`](Self::tick) with the root rotation given as yaw and pitch
    /// in degrees.
    pub fn tick_yaw_pitch(
        &self,
        view: &mut dyn ModelView,
        effects: &mut dyn EffectSink,
        yaw: f32,
        pitch: f32,
        root_position: Vec3,
    ) {
        self.tick(view, effects, yaw_pitch_rotation(yaw, pitch), root_position);
    }
}

impl Controller<AnimationQueue> {
    pub fn queue(&self, animation: Arc<Animation>, transition_ticks: u32) {
        self.lock().queue(animation, transition_ticks);
    }

    pub fn clear_queue(&self) {
        self.lock().clear();
    }

    pub fn current(&self) -> Option<Arc<Animation>> {
        self.lock().current().cloned()
    }
}

impl Controller<AnimationPlayer> {
    pub fn add(&self, animation: Arc<Animation>, transition_ticks: u32) {
        self.lock().add(animation, transition_ticks);
    }

    pub fn remove(&self, animation: &Animation) -> bool {
        self.lock().remove(animation)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn animations(&self) -> Vec<Arc<Animation>> {
        self.lock().animations()
    }
}
