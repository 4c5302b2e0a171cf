mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use armature_animation_core::{
    propagate, yaw_pitch_rotation, AnimationController, AnimationQueue, Bone, BoneFrame,
    EffectsFrame, FrameSource, LoopMode, Rotation, Skeleton, Transform, Vec3,
};
use common::{approx, approx_vec, load_animation, load_skeleton, mk_clip, recording_view, v3, RecordingSink};

/// Frame source with fixed frames per bone.
struct FixedFrames(HashMap<String, BoneFrame>);

impl FrameSource for FixedFrames {
    fn next_frame(&mut self, bone: &str) -> BoneFrame {
        self.0.get(bone).copied().unwrap_or(BoneFrame::INITIAL)
    }

    fn next_effects(&mut self) -> Option<EffectsFrame> {
        None
    }

    fn end_tick(&mut self) {}
}

fn chain(root_position: Vec3, root_rotation: Vec3, child_offset: Vec3) -> Skeleton {
    let root = Bone::new("root", root_position)
        .with_rotation(root_rotation)
        .with_child(Bone::new("child", child_offset));
    Skeleton::new(vec![root]).unwrap()
}

/// it should place the child at its rest offset rotated by the root's rest rotation
#[test]
fn two_bone_chain_rest_pose() {
    let sk = chain(v3(1.0, 2.0, 3.0), v3(0.0, 0.0, 90.0), v3(1.0, 0.0, 0.0));
    let mut source = AnimationQueue::default();
    let mut view = recording_view(&["root", "child"]);
    propagate(
        &sk,
        &mut source,
        &mut view,
        Transform::root(Rotation::identity(), Vec3::zeros()),
    );

    let (root_pos, root_rot, _) = view["root"].updates[0];
    approx_vec(root_pos, v3(1.0, 2.0, 3.0), 1e-5);
    let (child_pos, child_rot, child_scale) = view["child"].updates[0];
    approx_vec(child_pos, v3(1.0, 3.0, 3.0), 1e-5);
    assert!(child_rot.angle_to(&root_rot) < 1e-5);
    assert_eq!(child_scale, v3(1.0, 1.0, 1.0));
}

#[test]
fn root_transform_moves_the_whole_tree() {
    let sk = chain(v3(0.0, 1.0, 0.0), Vec3::zeros(), v3(0.0, 1.0, 0.0));
    let mut source = AnimationQueue::default();
    let mut view = recording_view(&["root", "child"]);
    let root = Transform::root(yaw_pitch_rotation(0.0, 90.0), v3(10.0, 0.0, 0.0));
    propagate(&sk, &mut source, &mut view, root);

    // pitch 90 rotates +y onto +z
    approx_vec(view["root"].updates[0].0, v3(10.0, 0.0, 1.0), 1e-5);
    approx_vec(view["child"].updates[0].0, v3(10.0, 0.0, 2.0), 1e-5);
}

#[test]
fn yaw_turns_about_the_vertical_axis() {
    // euler y = 360 - 90, mirrored: a +90 degree turn about +y
    let rotated = yaw_pitch_rotation(90.0, 0.0) * v3(1.0, 0.0, 0.0);
    approx_vec(rotated, v3(0.0, 0.0, -1.0), 1e-5);
    let level = yaw_pitch_rotation(0.0, 0.0);
    assert!(level.angle() < 1e-3);
}

/// it should compose Euler rotations as x, then mirrored y, then z down the chain
#[test]
fn y_rotated_parent_with_multi_axis_child() {
    let tip = Bone::new("tip", v3(1.0, 0.0, 0.0));
    let child = Bone::new("child", v3(1.0, 0.0, 0.0))
        .with_rotation(v3(90.0, 0.0, 90.0))
        .with_child(tip);
    let root = Bone::new("root", Vec3::zeros())
        .with_rotation(v3(0.0, 90.0, 0.0))
        .with_child(child);
    let sk = Skeleton::new(vec![root]).unwrap();

    let mut view = recording_view(&["root", "child", "tip"]);
    propagate(
        &sk,
        &mut AnimationQueue::default(),
        &mut view,
        Transform::root(Rotation::identity(), Vec3::zeros()),
    );

    let half = std::f32::consts::FRAC_1_SQRT_2;
    let q = view["root"].updates[0].1.into_inner();
    approx_vec(q.imag(), v3(0.0, -half, 0.0), 1e-5);
    approx(q.w, half, 1e-5);

    // y 90 mirrored sends +x to +z
    approx_vec(view["child"].updates[0].0, v3(0.0, 0.0, 1.0), 1e-5);
    // x(90) * z(90) sends +x to +z, then the root sends +z to -x
    approx_vec(view["tip"].updates[0].0, v3(-1.0, 0.0, 1.0), 1e-5);
    let child_rot = view["child"].updates[0].1;
    approx_vec(child_rot * v3(0.0, 1.0, 0.0), v3(0.0, 0.0, -1.0), 1e-5);
}

/// it should multiply scale down the chain and scale child offsets by it
#[test]
fn scale_propagates_to_children() {
    let sk = chain(v3(0.0, 1.0, 0.0), Vec3::zeros(), v3(0.0, 1.0, 0.0));
    let mut frames = HashMap::new();
    frames.insert(
        "root".to_string(),
        BoneFrame {
            scale: v3(2.0, 2.0, 2.0),
            ..BoneFrame::INITIAL
        },
    );
    frames.insert(
        "child".to_string(),
        BoneFrame {
            scale: v3(1.0, 0.5, 1.0),
            ..BoneFrame::INITIAL
        },
    );
    let mut view = recording_view(&["root", "child"]);
    propagate(
        &sk,
        &mut FixedFrames(frames),
        &mut view,
        Transform::root(Rotation::identity(), Vec3::zeros()),
    );

    let (root_pos, _, root_scale) = view["root"].updates[0];
    approx_vec(root_pos, v3(0.0, 2.0, 0.0), 1e-5);
    assert_eq!(root_scale, v3(2.0, 2.0, 2.0));
    let (child_pos, _, child_scale) = view["child"].updates[0];
    assert_eq!(child_scale, v3(2.0, 1.0, 2.0));
    approx_vec(child_pos, v3(0.0, 3.0, 0.0), 1e-5);
}

#[test]
fn bone_display_scale_is_left_to_the_host() {
    let mut root =
        Bone::new("root", v3(0.0, 1.0, 0.0)).with_child(Bone::new("child", v3(0.0, 1.0, 0.0)));
    root.scale = 4.0;
    let sk = Skeleton::new(vec![root]).unwrap();
    let mut view = recording_view(&["root", "child"]);
    propagate(
        &sk,
        &mut AnimationQueue::default(),
        &mut view,
        Transform::root(Rotation::identity(), Vec3::zeros()),
    );

    assert_eq!(sk.bone("root").unwrap().scale, 4.0);
    let (child_pos, _, child_scale) = view["child"].updates[0];
    assert_eq!(child_scale, v3(1.0, 1.0, 1.0));
    approx_vec(child_pos, v3(0.0, 2.0, 0.0), 1e-5);
}

/// it should add animated offsets and rotations to the rest pose
#[test]
fn animated_frame_adds_to_rest_pose() {
    let sk = chain(Vec3::zeros(), v3(0.0, 0.0, 45.0), v3(2.0, 0.0, 0.0));
    let mut frames = HashMap::new();
    frames.insert(
        "root".to_string(),
        BoneFrame {
            position: v3(0.0, 0.0, 5.0),
            rotation: v3(0.0, 0.0, 45.0),
            ..BoneFrame::INITIAL
        },
    );
    let mut view = recording_view(&["root", "child"]);
    propagate(
        &sk,
        &mut FixedFrames(frames),
        &mut view,
        Transform::root(Rotation::identity(), Vec3::zeros()),
    );

    approx_vec(view["root"].updates[0].0, v3(0.0, 0.0, 5.0), 1e-5);
    // rest 45 + animated 45 about z
    approx_vec(view["child"].updates[0].0, v3(0.0, 2.0, 5.0), 1e-5);
}

#[test]
fn bones_without_views_are_still_sampled() {
    let sk = chain(Vec3::zeros(), Vec3::zeros(), v3(1.0, 0.0, 0.0));
    let mut source = AnimationQueue::default();
    source.queue(
        mk_clip("a", LoopMode::Hold, 4, "root", Vec3::zeros(), v3(3.0, 0.0, 0.0)),
        0,
    );
    let mut view = recording_view(&["child"]);
    for _ in 0..3 {
        propagate(
            &sk,
            &mut source,
            &mut view,
            Transform::root(Rotation::identity(), Vec3::zeros()),
        );
        source.end_tick();
    }
    let xs: Vec<f32> = view["child"].updates.iter().map(|u| u.0.x).collect();
    assert_eq!(xs, vec![1.0, 2.0, 3.0]);
    assert_eq!(source.last_frame("root").unwrap().position.x, 2.0);
}

/// it should drive a whole skeleton and its effects through the controller
#[test]
fn controller_ticks_biped_walk() {
    let skeleton = load_skeleton("biped");
    let bones: Vec<String> = skeleton.iter().map(|b| b.name.clone()).collect();
    let bone_refs: Vec<&str> = bones.iter().map(String::as_str).collect();
    let controller = AnimationController::new(skeleton, AnimationQueue::default());
    controller.queue(load_animation("walk"), 0);

    let mut view = recording_view(&bone_refs);
    let mut sink = RecordingSink::default();
    for tick in 0..21 {
        sink.tick = tick;
        controller.tick(&mut view, &mut sink, Rotation::identity(), Vec3::zeros());
    }

    for bone in &bones {
        assert_eq!(view[bone].updates.len(), 21, "bone {bone}");
    }
    let steps: Vec<usize> = sink
        .sounds
        .iter()
        .filter(|(_, name)| name == "step")
        .map(|(tick, _)| *tick)
        .collect();
    assert_eq!(steps, vec![0, 10, 20]);
    assert!(sink.scripts.is_empty());

    let (leg_pos, leg_rot, _) = view["right_leg"].updates[0];
    approx_vec(leg_pos, v3(-2.0, 12.0, 0.0), 1e-5);
    let expected = armature_animation_core::value::rotation_from_euler_degrees(&v3(30.0, 0.0, 0.0));
    assert!(leg_rot.angle_to(&expected) < 1e-4);

    // step position keys on the body at 0.25 s
    approx(view["body"].updates[5].0.y, 12.5, 1e-5);
    approx(view["body"].updates[4].0.y, 12.0, 1e-5);
    assert_eq!(controller.current().unwrap().name(), "walk");
}

#[test]
fn tick_yaw_pitch_matches_explicit_rotation() {
    let a = AnimationController::new(load_skeleton("biped"), AnimationQueue::default());
    let b = AnimationController::new(load_skeleton("biped"), AnimationQueue::default());
    let mut va = recording_view(&["right_hand"]);
    let mut vb = recording_view(&["right_hand"]);
    a.tick_yaw_pitch(&mut va, &mut (), 30.0, 10.0, v3(1.0, 0.0, 0.0));
    b.tick(&mut vb, &mut (), yaw_pitch_rotation(30.0, 10.0), v3(1.0, 0.0, 0.0));
    approx_vec(va["right_hand"].updates[0].0, vb["right_hand"].updates[0].0, 1e-6);
}

/// it should accept queue calls from another thread between ticks
#[test]
fn concurrent_queue_and_tick() {
    let controller = Arc::new(AnimationController::new(
        load_skeleton("biped"),
        AnimationQueue::default(),
    ));
    let walk = load_animation("walk");
    let wave = load_animation("wave");

    thread::scope(|scope| {
        let ctl = Arc::clone(&controller);
        scope.spawn(move || {
            for i in 0..200 {
                let next = if i % 2 == 0 { &walk } else { &wave };
                ctl.queue(Arc::clone(next), (i % 3) as u32);
            }
        });

        let mut view = recording_view(&["body", "right_arm", "right_hand"]);
        for _ in 0..200 {
            controller.tick(&mut view, &mut (), Rotation::identity(), Vec3::zeros());
        }
        assert_eq!(view["body"].updates.len(), 200);
        for (pos, rot, scale) in &view["right_hand"].updates {
            assert!(pos.iter().all(|c| c.is_finite()));
            assert!(rot.angle().is_finite());
            assert!(scale.iter().all(|c| c.is_finite()));
        }
    });

    controller.clear_queue();
    assert!(controller.current().is_none());
    controller.with_source(|queue| assert!(queue.is_idle()));
}
