//! Armature Animation Core
//!
//! Tick-driven skeletal animation: keyframe timelines with linear, step,
//! Catmull-Rom, Bézier and spherical interpolation; playheads that sample
//! them lazily; single-stream queues with synthesized transitions; priority
//! layered players; and transform propagation over a bone tree. Rendering,
//! audio and scripting stay behind the traits in [`view`].

pub mod bone;
pub mod config;
pub mod controller;
pub mod data;
pub mod effects;
pub mod error;
pub mod interp;
pub mod playback;
pub mod player;
pub mod queue;
pub mod skeleton;
pub mod timeline;
pub mod transform;
pub mod transition;
pub mod value;
pub mod view;

// Re-exports for hosts
pub use bone::{BoneFrame, BonePlayhead, BoneTimeline, Channel};
pub use config::Config;
pub use controller::{AnimationController, Controller, LayeredController};
pub use data::{Animation, AnimationBuilder, LoopMode};
pub use effects::{EffectsFrame, EffectsPlayhead, EffectsTimeline, Sound};
pub use error::{AnimationError, Result};
pub use interp::{Interpolation, Interpolator};
pub use player::AnimationPlayer;
pub use queue::AnimationQueue;
pub use skeleton::{Bone, Skeleton};
pub use timeline::{BezierHandles, Keyframe, Playhead, Timeline, TimelineBuilder};
pub use transform::{propagate, yaw_pitch_rotation, Transform};
pub use value::{Animatable, Quat, Rotation, Vec3};
pub use view::{BoneView, EffectSink, FrameSource, ModelView};
