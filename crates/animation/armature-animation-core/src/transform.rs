//! Transform propagation over the bone tree.
//!
//! For each bone, depth first:
//! - local position = rest position + frame position
//! - local rotation = rest rotation + frame rotation (Euler degrees)
//! - global scale = parent scale * frame scale (component-wise)
//! - global rotation = parent rotation * rotation(local rotation)
//! - global position = parent rotation applied to (local position * global
//!   scale), plus parent position

use crate::skeleton::{Bone, Skeleton};
use crate::value::{rotation_from_euler_degrees, Rotation, Vec3};
use crate::view::{FrameSource, ModelView};

/// Global placement of a bone, or the root placement of a model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Rotation,
    pub scale: Vec3,
}

impl Transform {
    /// Root placement with unit scale.
    pub fn root(rotation: Rotation, position: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Root rotation from a yaw/pitch pair in degrees.
pub fn yaw_pitch_rotation(yaw: f32, pitch: f32) -> Rotation {
    rotation_from_euler_degrees(&Vec3::new(pitch, 360.0 - yaw, 0.0))
}

/// Pulls one frame per bone from `source` and pushes global transforms to
/// `view`. Every bone is visited, with or without a view.
pub fn propagate<S, V>(skeleton: &Skeleton, source: &mut S, view: &mut V, root: Transform)
where
    S: FrameSource + ?Sized,
    V: ModelView + ?Sized,
{
    for bone in skeleton.roots() {
        propagate_bone(bone, source, view, &root);
    }
}

fn propagate_bone<S, V>(bone: &Bone, source: &mut S, view: &mut V, parent: &Transform)
where
    S: FrameSource + ?Sized,
    V: ModelView + ?Sized,
{
    let frame = source.next_frame(&bone.name);

    let local_position = bone.position + frame.position;
    let local_rotation = bone.rotation + frame.rotation;

    let scale = parent.scale.component_mul(&frame.scale);
    let rotation = parent.rotation * rotation_from_euler_degrees(&local_rotation);
    let position = parent.rotation * local_position.component_mul(&scale) + parent.position;

    if let Some(bone_view) = view.bone(&bone.name) {
        bone_view.update(position, rotation, scale);
    }

    let global = Transform {
        position,
        rotation,
        scale,
    };
    for child in &bone.children {
        propagate_bone(child, source, view, &global);
    }
}
