//! Interpolation helpers:
//! - linear_value / step_value (component-wise)
//! - catmull_rom (up to four points) and binary_catmull_rom (endpoints only)
//! - bezier_axis_table / bezier_axis_lookup (tabulated cubic Bézier per axis)
//! - slerp_quat with a linear fallback for nearly parallel inputs

use crate::value::{Animatable, Quat};

/// Dot product above which slerp degrades to linear interpolation.
pub const SLERP_LINEAR_THRESHOLD: f32 = 0.9995;

/// `a*(1-t) + b*t`; exact at both ends.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

#[inline]
pub fn linear_value<T: Animatable>(from: &T, to: &T, t: f32) -> T {
    T::from_axes(|i| lerp_f32(from.axis(i), to.axis(i), t))
}

/// Holds `from` until the segment is complete.
#[inline]
pub fn step_value<T: Animatable>(from: &T, to: &T, t: f32) -> T {
    if t < 1.0 {
        *from
    } else {
        *to
    }
}

#[inline]
fn catmull_rom_axis(t: f32, p0: f32, p1: f32, p2: f32, p3: f32) -> f32 {
    let t2 = t * t;
    let t3 = t * t2;
    let v0 = (p2 - p0) * 0.5;
    let v1 = (p3 - p1) * 0.5;
    let a = 2.0 * p1 - 2.0 * p2 + v0 + v1;
    let b = -3.0 * p1 + 3.0 * p2 - 2.0 * v0 - v1;
    a * t3 + b * t2 + v0 * t + p1
}

/// Catmull-Rom spline through `points` (2 to 4 entries), evaluated at
/// `progress` in `[0,1]` over the whole point run. Control points beyond
/// either end are clamped to the end point.
pub fn catmull_rom<T: Animatable>(points: &[T], progress: f32) -> T {
    let n = points.len();
    debug_assert!((2..=4).contains(&n));
    let p = (n - 1) as f32 * progress;
    let seg = (p.floor().max(0.0) as usize).min(n - 1);
    let weight = p - seg as f32;

    let p0 = &points[seg.saturating_sub(1)];
    let p1 = &points[seg];
    let p2 = &points[(seg + 1).min(n - 1)];
    let p3 = &points[(seg + 2).min(n - 1)];

    T::from_axes(|i| catmull_rom_axis(weight, p0.axis(i), p1.axis(i), p2.axis(i), p3.axis(i)))
}

/// Two-point Catmull-Rom with tangents derived from the endpoint delta.
pub fn binary_catmull_rom<T: Animatable>(from: &T, to: &T, t: f32) -> T {
    let t2 = t * t;
    let t3 = t * t2;
    T::from_axes(|i| {
        let a = from.axis(i) - to.axis(i);
        let b = -1.5 * a;
        let c = -0.5 * a;
        a * t3 + b * t2 + c * t + from.axis(i)
    })
}

/// Samples one axis of a cubic Bézier segment into `(time, value)` pairs.
///
/// `times` and `values` are the four control points; `divisions` samples
/// are taken at evenly spaced curve parameters, both ends included.
pub fn bezier_axis_table(times: [f32; 4], values: [f32; 4], divisions: usize) -> Vec<(f32, f32)> {
    let divisions = divisions.max(2);
    (0..divisions)
        .map(|i| {
            let t = i as f32 / (divisions - 1) as f32;
            let s2 = t * t;
            let s3 = t * s2;
            let k = 1.0 - t;
            let k2 = k * k;
            let k3 = k * k2;
            let basis = |p: [f32; 4]| {
                k3 * p[0] + 3.0 * k2 * t * p[1] + 3.0 * k * s2 * p[2] + s3 * p[3]
            };
            (basis(times), basis(values))
        })
        .collect()
}

/// Finds the table entry closest to `time`, then the closest entry with a
/// different time, and interpolates linearly between them (factor clamped
/// to `[0,1]`). A table with a single distinct time returns that value.
pub fn bezier_axis_lookup(table: &[(f32, f32)], time: f32) -> f32 {
    let closest = table.iter().copied().min_by(|a, b| {
        (time - a.0).abs().total_cmp(&(time - b.0).abs())
    });
    let Some((closest_time, closest_value)) = closest else {
        return 0.0;
    };
    let second = table
        .iter()
        .copied()
        .filter(|(t, _)| *t != closest_time)
        .min_by(|a, b| (time - a.0).abs().total_cmp(&(time - b.0).abs()));
    match second {
        Some((second_time, second_value)) => {
            let f = ((time - closest_time) / (second_time - closest_time)).clamp(0.0, 1.0);
            closest_value + (second_value - closest_value) * f
        }
        None => closest_value,
    }
}

/// Spherical linear interpolation with shortest-path correction.
///
/// If the corrected dot product exceeds [`SLERP_LINEAR_THRESHOLD`] the result
/// is a plain (unnormalized) linear blend, avoiding division by a near-zero
/// sine.
pub fn slerp_quat(from: &Quat, to: &Quat, t: f32) -> Quat {
    let mut to = *to;
    let mut dot = from.coords.dot(&to.coords);
    if dot < 0.0 {
        to = -to;
        dot = -dot;
    }
    if dot > SLERP_LINEAR_THRESHOLD {
        return linear_value(from, &to, t);
    }
    let theta = dot.acos();
    let sin_theta = theta.sin();
    let f1 = ((1.0 - t) * theta).sin() / sin_theta;
    let f2 = (t * theta).sin() / sin_theta;
    *from * f1 + to * f2
}

/// Spherical interpolation on any animatable value via its quaternion view.
#[inline]
pub fn spherical_value<T: Animatable>(from: &T, to: &T, t: f32) -> T {
    T::from_quaternion(slerp_quat(&from.to_quaternion(), &to.to_quaternion(), t))
}
