//! Per-bone channel timelines and frames.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::interp::Interpolator;
use crate::timeline::{Playhead, Timeline, TimelineBuilder};
use crate::value::Vec3;

/// The three animated channels of a bone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Position,
    Rotation,
    Scale,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Position, Channel::Rotation, Channel::Scale];

    /// Rest value of the channel: zero offset, zero rotation, unit scale.
    pub fn initial(self) -> Vec3 {
        match self {
            Channel::Position | Channel::Rotation => Vec3::zeros(),
            Channel::Scale => Vec3::new(1.0, 1.0, 1.0),
        }
    }

    /// Builder preloaded with this channel's initial value.
    pub fn timeline(self) -> TimelineBuilder<Vec3> {
        Timeline::builder().initial(self.initial())
    }

    /// Two-keyframe linear timeline from `from` at tick 0 to `to` at `ticks`.
    pub(crate) fn ramp(self, from: Vec3, to: Vec3, ticks: u32) -> Result<Timeline<Vec3>> {
        self.timeline()
            .default_interpolator(Interpolator::Linear)
            .keyframe(0, from)
            .keyframe(ticks, to)
            .build()
    }
}

/// Sampled state of one bone at one tick. Rotation is Euler degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneFrame {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl BoneFrame {
    pub const INITIAL: BoneFrame = BoneFrame {
        position: Vec3::new(0.0, 0.0, 0.0),
        rotation: Vec3::new(0.0, 0.0, 0.0),
        scale: Vec3::new(1.0, 1.0, 1.0),
    };

    pub fn channel(&self, channel: Channel) -> Vec3 {
        match channel {
            Channel::Position => self.position,
            Channel::Rotation => self.rotation,
            Channel::Scale => self.scale,
        }
    }
}

impl Default for BoneFrame {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Position, rotation and scale timelines of one bone.
#[derive(Clone, Debug)]
pub struct BoneTimeline {
    pub positions: Timeline<Vec3>,
    pub rotations: Timeline<Vec3>,
    pub scales: Timeline<Vec3>,
}

impl Default for BoneTimeline {
    fn default() -> Self {
        Self {
            positions: Timeline::constant(Channel::Position.initial()),
            rotations: Timeline::constant(Channel::Rotation.initial()),
            scales: Timeline::constant(Channel::Scale.initial()),
        }
    }
}

impl BoneTimeline {
    pub fn builder() -> BoneTimelineBuilder {
        BoneTimelineBuilder::default()
    }

    pub fn get(&self, channel: Channel) -> &Timeline<Vec3> {
        match channel {
            Channel::Position => &self.positions,
            Channel::Rotation => &self.rotations,
            Channel::Scale => &self.scales,
        }
    }

    pub fn playhead(&self, bezier_divisions: usize) -> BonePlayhead {
        BonePlayhead {
            positions: self.positions.playhead_with(bezier_divisions),
            rotations: self.rotations.playhead_with(bezier_divisions),
            scales: self.scales.playhead_with(bezier_divisions),
        }
    }

    /// Frame sampled at tick 0.
    pub fn first_frame(&self, bezier_divisions: usize) -> BoneFrame {
        self.playhead(bezier_divisions).peek()
    }
}

/// Missing channels fall back to a keyframe-less timeline holding the
/// channel's initial value.
#[derive(Default)]
pub struct BoneTimelineBuilder {
    positions: Option<Timeline<Vec3>>,
    rotations: Option<Timeline<Vec3>>,
    scales: Option<Timeline<Vec3>>,
}

impl BoneTimelineBuilder {
    pub fn positions(mut self, timeline: Timeline<Vec3>) -> Self {
        self.positions = Some(timeline);
        self
    }

    pub fn rotations(mut self, timeline: Timeline<Vec3>) -> Self {
        self.rotations = Some(timeline);
        self
    }

    pub fn scales(mut self, timeline: Timeline<Vec3>) -> Self {
        self.scales = Some(timeline);
        self
    }

    pub fn channel(self, channel: Channel, timeline: Timeline<Vec3>) -> Self {
        match channel {
            Channel::Position => self.positions(timeline),
            Channel::Rotation => self.rotations(timeline),
            Channel::Scale => self.scales(timeline),
        }
    }

    pub fn build(self) -> BoneTimeline {
        let defaults = BoneTimeline::default();
        BoneTimeline {
            positions: self.positions.unwrap_or(defaults.positions),
            rotations: self.rotations.unwrap_or(defaults.rotations),
            scales: self.scales.unwrap_or(defaults.scales),
        }
    }
}

/// Playheads for the three channels of one bone, advanced together.
#[derive(Clone, Debug)]
pub struct BonePlayhead {
    positions: Playhead<Vec3>,
    rotations: Playhead<Vec3>,
    scales: Playhead<Vec3>,
}

impl BonePlayhead {
    pub fn next(&mut self) -> BoneFrame {
        BoneFrame {
            position: self.positions.next(),
            rotation: self.rotations.next(),
            scale: self.scales.next(),
        }
    }

    pub fn peek(&self) -> BoneFrame {
        BoneFrame {
            position: self.positions.peek(),
            rotation: self.rotations.peek(),
            scale: self.scales.peek(),
        }
    }

    /// Ticks sampled so far.
    pub fn tick(&self) -> u32 {
        self.positions.tick()
    }

    pub fn has_next(&self) -> bool {
        self.positions.has_next() || self.rotations.has_next() || self.scales.has_next()
    }
}
