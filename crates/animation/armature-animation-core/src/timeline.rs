//! Keyframe timelines and the playheads that walk them.
//!
//! A [`Timeline`] is immutable and cheap to clone (the keyframes are shared).
//! A [`Playhead`] is the per-playback cursor: it samples the current tick,
//! then advances by one, preparing a new segment [`Interpolation`] only when
//! it crosses a keyframe.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{AnimationError, Result};
use crate::interp::{Interpolation, Interpolator};
use crate::value::Animatable;

/// Default number of Bézier table samples for playheads created outside a
/// queue or player.
pub const DEFAULT_BEZIER_DIVISIONS: usize = 100;

/// Bézier control data attached to a keyframe.
///
/// Times are tick offsets relative to the keyframe, values are offsets
/// relative to its value; both are per axis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BezierHandles<T> {
    pub left_time: T,
    pub left_value: T,
    pub right_time: T,
    pub right_value: T,
}

impl<T: Animatable> BezierHandles<T> {
    /// Short flat handles: ±0.1 ticks, no value offset.
    pub fn initial() -> Self {
        Self {
            left_time: T::splat(-0.1),
            left_value: T::splat(0.0),
            right_time: T::splat(0.1),
            right_value: T::splat(0.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe<T> {
    pub tick: u32,
    pub value: T,
    /// Overrides the timeline default for segments touching this keyframe.
    #[serde(default)]
    pub interpolator: Option<Interpolator>,
    #[serde(default)]
    pub handles: Option<BezierHandles<T>>,
}

impl<T> Keyframe<T> {
    pub fn new(tick: u32, value: T) -> Self {
        Self {
            tick,
            value,
            interpolator: None,
            handles: None,
        }
    }

    pub fn with_interpolator(mut self, interpolator: Interpolator) -> Self {
        self.interpolator = Some(interpolator);
        self
    }

    pub fn with_handles(mut self, handles: BezierHandles<T>) -> Self {
        self.handles = Some(handles);
        self
    }
}

#[derive(Debug)]
struct TimelineData<T> {
    initial: T,
    default_interpolator: Interpolator,
    keyframes: Vec<Keyframe<T>>,
}

/// Ordered keyframes for one animated channel.
#[derive(Debug)]
pub struct Timeline<T> {
    data: Arc<TimelineData<T>>,
}

impl<T> Clone for Timeline<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Animatable> Timeline<T> {
    pub fn builder() -> TimelineBuilder<T> {
        TimelineBuilder::default()
    }

    /// A timeline without keyframes; every sample is `initial`.
    pub fn constant(initial: T) -> Self {
        Self {
            data: Arc::new(TimelineData {
                initial,
                default_interpolator: Interpolator::default(),
                keyframes: Vec::new(),
            }),
        }
    }

    pub fn initial(&self) -> T {
        self.data.initial
    }

    pub fn default_interpolator(&self) -> Interpolator {
        self.data.default_interpolator
    }

    /// Keyframes sorted by ascending, unique tick.
    pub fn keyframes(&self) -> &[Keyframe<T>] {
        &self.data.keyframes
    }

    pub fn playhead(&self) -> Playhead<T> {
        self.playhead_with(DEFAULT_BEZIER_DIVISIONS)
    }

    pub fn playhead_with(&self, bezier_divisions: usize) -> Playhead<T> {
        Playhead::new(self.clone(), bezier_divisions)
    }
}

pub struct TimelineBuilder<T> {
    initial: Option<T>,
    default_interpolator: Interpolator,
    keyframes: Vec<Keyframe<T>>,
}

impl<T> Default for TimelineBuilder<T> {
    fn default() -> Self {
        Self {
            initial: None,
            default_interpolator: Interpolator::default(),
            keyframes: Vec::new(),
        }
    }
}

impl<T: Animatable> TimelineBuilder<T> {
    /// Value produced by a timeline with no keyframes.
    pub fn initial(mut self, value: T) -> Self {
        self.initial = Some(value);
        self
    }

    pub fn default_interpolator(mut self, interpolator: Interpolator) -> Self {
        self.default_interpolator = interpolator;
        self
    }

    pub fn keyframe(self, tick: u32, value: T) -> Self {
        self.keyframe_with(Keyframe::new(tick, value))
    }

    pub fn keyframe_with(mut self, keyframe: Keyframe<T>) -> Self {
        self.keyframes.push(keyframe);
        self
    }

    /// Sorts keyframes by tick. Fails if `initial` was never set or two
    /// keyframes share a tick.
    pub fn build(mut self) -> Result<Timeline<T>> {
        let initial = self.initial.ok_or_else(|| AnimationError::missing("initial"))?;
        self.keyframes.sort_by_key(|k| k.tick);
        if let Some(dup) = self.keyframes.windows(2).find(|w| w[0].tick == w[1].tick) {
            return Err(AnimationError::DuplicateKeyframe { tick: dup[0].tick });
        }
        Ok(Timeline {
            data: Arc::new(TimelineData {
                initial,
                default_interpolator: self.default_interpolator,
                keyframes: self.keyframes,
            }),
        })
    }
}

/// Tick-by-tick cursor over a [`Timeline`].
///
/// Before the first keyframe the first keyframe's value is held; after the
/// last one the last value is held forever.
#[derive(Clone, Debug)]
pub struct Playhead<T> {
    timeline: Timeline<T>,
    divisions: usize,
    tick: u32,
    before: Option<Keyframe<T>>,
    previous: Keyframe<T>,
    next: Option<usize>,
    segment: Interpolation<T>,
}

impl<T: Animatable> Playhead<T> {
    fn new(timeline: Timeline<T>, divisions: usize) -> Self {
        let keys = timeline.keyframes();
        let initial = timeline.initial();
        let (previous, next, segment) = match keys {
            [] => (Keyframe::new(0, initial), None, Interpolation::Constant(initial)),
            [only] => (*only, None, Interpolation::Constant(only.value)),
            [first, ..] if first.tick > 0 => {
                // hold the first value until its keyframe is reached
                let held = Keyframe::new(0, first.value);
                (held, Some(0), Interpolation::Constant(first.value))
            }
            [first, second, ..] => {
                let segment =
                    Self::prepare(&timeline, divisions, None, first, second, keys.get(2));
                (*first, Some(1), segment)
            }
        };
        Self {
            timeline,
            divisions,
            tick: 0,
            before: None,
            previous,
            next,
            segment,
        }
    }

    fn prepare(
        timeline: &Timeline<T>,
        divisions: usize,
        before: Option<&Keyframe<T>>,
        from: &Keyframe<T>,
        to: &Keyframe<T>,
        after: Option<&Keyframe<T>>,
    ) -> Interpolation<T> {
        let default = timeline.default_interpolator();
        from.interpolator
            .unwrap_or(default)
            .combine(to.interpolator.unwrap_or(default))
            .interpolation(before, from, to, after, divisions)
    }

    /// Number of ticks sampled so far.
    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// True until the playhead has sampled past its last keyframe.
    pub fn has_next(&self) -> bool {
        self.timeline
            .keyframes()
            .last()
            .is_some_and(|last| self.tick <= last.tick)
    }

    /// Value the next call to [`Playhead::next`] will return.
    pub fn peek(&self) -> T {
        self.clone().next()
    }

    /// Samples the current tick and advances by one.
    pub fn next(&mut self) -> T {
        let value = self.sample();
        self.tick = self.tick.saturating_add(1);
        value
    }

    fn sample(&mut self) -> T {
        let timeline = self.timeline.clone();
        let keys = timeline.keyframes();
        loop {
            let Some(index) = self.next else {
                return self.previous.value;
            };
            let next = keys[index];
            if self.tick == next.tick {
                return next.value;
            }
            if self.tick < next.tick {
                let span = (next.tick - self.previous.tick) as f32;
                let progress = (self.tick - self.previous.tick) as f32 / span;
                return self.segment.sample(progress);
            }

            // crossed `next`; it becomes the start of the new segment
            self.before = Some(self.previous);
            self.previous = next;
            self.next = (index + 1 < keys.len()).then_some(index + 1);
            if let Some(to) = self.next {
                self.segment = Self::prepare(
                    &timeline,
                    self.divisions,
                    self.before.as_ref(),
                    &next,
                    &keys[to],
                    keys.get(to + 1),
                );
            }
        }
    }
}
