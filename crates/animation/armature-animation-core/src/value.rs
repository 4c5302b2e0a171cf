//! Animated value types.
//!
//! Bone channels are `Vec3` (positions, Euler rotations in degrees, scales).
//! `Quat` is supported for hosts animating raw quaternions. Both implement
//! [`Animatable`], which gives interpolators per-axis access and a quaternion
//! view for spherical interpolation.

use std::fmt::Debug;

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

pub type Vec3 = Vector3<f32>;
pub type Quat = Quaternion<f32>;
/// Normalized rotation emitted to bone views.
pub type Rotation = UnitQuaternion<f32>;

/// A keyframe value interpolators can operate on.
pub trait Animatable: Copy + PartialEq + Debug + Send + Sync + 'static {
    /// Number of scalar axes.
    const AXES: usize;

    fn axis(&self, index: usize) -> f32;

    fn from_axes<F: FnMut(usize) -> f32>(f: F) -> Self;

    /// Quaternion view used by spherical interpolation.
    fn to_quaternion(&self) -> Quat;

    fn from_quaternion(q: Quat) -> Self;

    /// Value with every axis set to `v`.
    fn splat(v: f32) -> Self {
        Self::from_axes(|_| v)
    }
}

impl Animatable for Vec3 {
    const AXES: usize = 3;

    #[inline]
    fn axis(&self, index: usize) -> f32 {
        self[index]
    }

    #[inline]
    fn from_axes<F: FnMut(usize) -> f32>(mut f: F) -> Self {
        Vec3::new(f(0), f(1), f(2))
    }

    /// Treats the vector as Euler angles in degrees.
    fn to_quaternion(&self) -> Quat {
        rotation_from_euler_degrees(self).into_inner()
    }

    /// Inverse of [`rotation_from_euler_degrees`]. The conjugate is in
    /// nalgebra's z-y-x order with x and z negated.
    fn from_quaternion(q: Quat) -> Self {
        let (roll, pitch, yaw) = UnitQuaternion::from_quaternion(q).inverse().euler_angles();
        Vec3::new(-roll.to_degrees(), pitch.to_degrees(), -yaw.to_degrees())
    }
}

impl Animatable for Quat {
    const AXES: usize = 4;

    /// Axes are ordered x, y, z, w.
    #[inline]
    fn axis(&self, index: usize) -> f32 {
        self.coords[index]
    }

    #[inline]
    fn from_axes<F: FnMut(usize) -> f32>(mut f: F) -> Self {
        let (x, y, z, w) = (f(0), f(1), f(2), f(3));
        Quaternion::new(w, x, y, z)
    }

    #[inline]
    fn to_quaternion(&self) -> Quat {
        *self
    }

    #[inline]
    fn from_quaternion(q: Quat) -> Self {
        q
    }
}

/// Euler angles in degrees (x, y, z) to a rotation.
///
/// Builds `Rx(x) * Ry(-y) * Rz(z)`: the y axis is mirrored, and x is the
/// outermost rotation.
pub fn rotation_from_euler_degrees(euler: &Vec3) -> Rotation {
    UnitQuaternion::from_axis_angle(&Vector3::x_axis(), euler.x.to_radians())
        * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -euler.y.to_radians())
        * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), euler.z.to_radians())
}
