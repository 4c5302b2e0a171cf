#![allow(dead_code)]
//! Shared helpers for integration tests: fixture conversion, clip builders
//! and recording collaborators.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use armature_animation_core::{
    Animation, BezierHandles, BoneTimeline, BoneView, Channel, Config, EffectSink,
    EffectsTimeline, Interpolator, Keyframe, LoopMode, Rotation, Skeleton, Sound, Vec3,
};
use serde::Deserialize;

pub fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

pub fn approx_vec(a: Vec3, b: Vec3, eps: f32) {
    assert!((a - b).norm() <= eps, "left={a:?} right={b:?} eps={eps}");
}

pub fn v3(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, y, z)
}

/// Clip moving `bone` linearly from `from` (tick 0) to `to` (tick `length - 1`).
pub fn mk_clip(name: &str, mode: LoopMode, length: u32, bone: &str, from: Vec3, to: Vec3) -> Arc<Animation> {
    mk_clip_with(name, mode, length, 0, &[bone], from, to)
}

pub fn mk_clip_with(
    name: &str,
    mode: LoopMode,
    length: u32,
    priority: i32,
    bones: &[&str],
    from: Vec3,
    to: Vec3,
) -> Arc<Animation> {
    let last = length.saturating_sub(1).max(1);
    let mut builder = Animation::builder()
        .name(name)
        .length(length)
        .loop_mode(mode)
        .priority(priority)
        .timelines(HashMap::new())
        .effects(EffectsTimeline::empty());
    for bone in bones {
        let positions = Channel::Position
            .timeline()
            .keyframe(0, from)
            .keyframe(last, to)
            .build()
            .expect("valid timeline");
        builder = builder.timeline(*bone, BoneTimeline::builder().positions(positions).build());
    }
    builder.build_shared().expect("valid animation")
}

#[derive(Default)]
pub struct RecordingBone {
    pub updates: Vec<(Vec3, Rotation, Vec3)>,
}

impl BoneView for RecordingBone {
    fn update(&mut self, position: Vec3, rotation: Rotation, scale: Vec3) {
        self.updates.push((position, rotation, scale));
    }
}

pub fn recording_view(bones: &[&str]) -> HashMap<String, RecordingBone> {
    bones
        .iter()
        .map(|name| (name.to_string(), RecordingBone::default()))
        .collect()
}

#[derive(Default)]
pub struct RecordingSink {
    pub sounds: Vec<(usize, String)>,
    pub scripts: Vec<(usize, String)>,
    pub tick: usize,
}

impl EffectSink for RecordingSink {
    fn emit_sound(&mut self, sound: &Sound) {
        self.sounds.push((self.tick, sound.name.clone()));
    }

    fn eval(&mut self, instruction: &str) {
        self.scripts.push((self.tick, instruction.to_string()));
    }
}

// Fixture format: times in seconds, converted with `Config::ticks`.

#[derive(Debug, Deserialize)]
pub struct AnimationFixture {
    pub name: String,
    pub length: f32,
    #[serde(rename = "loop")]
    pub loop_mode: LoopMode,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub bones: BTreeMap<String, BoneFixture>,
    #[serde(default)]
    pub effects: EffectsFixture,
}

#[derive(Debug, Default, Deserialize)]
pub struct BoneFixture {
    #[serde(default)]
    pub position: Vec<KeyFixture>,
    #[serde(default)]
    pub rotation: Vec<KeyFixture>,
    #[serde(default)]
    pub scale: Vec<KeyFixture>,
}

#[derive(Debug, Deserialize)]
pub struct KeyFixture {
    pub time: f32,
    pub value: Vec3,
    #[serde(default)]
    pub interpolation: Option<Interpolator>,
    #[serde(default)]
    pub bezier: Option<BezierHandles<Vec3>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EffectsFixture {
    #[serde(default)]
    pub sounds: Vec<TimedSound>,
    #[serde(default)]
    pub instructions: Vec<TimedScript>,
}

#[derive(Debug, Deserialize)]
pub struct TimedSound {
    pub time: f32,
    pub sound: Sound,
}

#[derive(Debug, Deserialize)]
pub struct TimedScript {
    pub time: f32,
    pub script: String,
}

impl AnimationFixture {
    pub fn into_animation(self, cfg: &Config) -> armature_animation_core::Result<Arc<Animation>> {
        let mut builder = Animation::builder()
            .name(self.name)
            .length(cfg.ticks(self.length))
            .loop_mode(self.loop_mode)
            .priority(self.priority)
            .timelines(HashMap::new());

        for (bone, channels) in self.bones {
            let mut timeline = BoneTimeline::builder();
            for (channel, keys) in [
                (Channel::Position, channels.position),
                (Channel::Rotation, channels.rotation),
                (Channel::Scale, channels.scale),
            ] {
                if keys.is_empty() {
                    continue;
                }
                let mut tl = channel.timeline();
                for key in keys {
                    let mut frame = Keyframe::new(cfg.ticks(key.time), key.value);
                    frame.interpolator = key.interpolation;
                    frame.handles = key.bezier.map(|h| seconds_to_ticks(h, cfg));
                    tl = tl.keyframe_with(frame);
                }
                timeline = timeline.channel(channel, tl.build()?);
            }
            builder = builder.timeline(bone, timeline.build());
        }

        let mut effects = EffectsTimeline::builder();
        for s in self.effects.sounds {
            effects = effects.sound(cfg.ticks(s.time), s.sound);
        }
        for i in self.effects.instructions {
            effects = effects.instruction(cfg.ticks(i.time), i.script);
        }
        builder.effects(effects.build()).build_shared()
    }
}

fn seconds_to_ticks(h: BezierHandles<Vec3>, cfg: &Config) -> BezierHandles<Vec3> {
    let tps = cfg.ticks_per_second as f32;
    BezierHandles {
        left_time: h.left_time * tps,
        right_time: h.right_time * tps,
        ..h
    }
}

pub fn load_animation(name: &str) -> Arc<Animation> {
    let fixture: AnimationFixture =
        armature_test_fixtures::animations::load(name).expect("animation fixture");
    fixture
        .into_animation(&Config::default())
        .expect("fixture converts")
}

pub fn load_skeleton(name: &str) -> Skeleton {
    let roots = armature_test_fixtures::skeletons::load(name).expect("skeleton fixture");
    Skeleton::new(roots).expect("valid skeleton")
}
