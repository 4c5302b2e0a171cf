//! Keyframe interpolators.
//!
//! An [`Interpolator`] names how a segment between two keyframes is shaped.
//! When a playhead enters a segment it prepares an [`Interpolation`], which
//! is then sampled once per tick with the segment progress in `[0,1]`.

pub mod functions;

use serde::{Deserialize, Serialize};

use crate::timeline::{BezierHandles, Keyframe};
use crate::value::Animatable;
use functions::{
    bezier_axis_lookup, bezier_axis_table, binary_catmull_rom, catmull_rom, linear_value,
    lerp_f32, spherical_value, step_value,
};

/// Segment shape selected per keyframe or per timeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolator {
    #[default]
    Linear,
    Step,
    CatmullRom,
    Bezier,
    Spherical,
}

impl Interpolator {
    /// Resolves which interpolator governs the segment between a keyframe
    /// using `self` and the next keyframe using `right`.
    ///
    /// Linear yields to anything more specific; Step, Catmull-Rom and
    /// Spherical always keep themselves; Bézier yields only to Catmull-Rom.
    pub fn combine(self, right: Interpolator) -> Interpolator {
        use Interpolator::*;
        match (self, right) {
            (Linear, Linear | Step) => Linear,
            (Linear, other) => other,
            (Step, _) => Step,
            (CatmullRom, _) => CatmullRom,
            (Bezier, CatmullRom) => CatmullRom,
            (Bezier, _) => Bezier,
            (Spherical, _) => Spherical,
        }
    }

    /// Prepares the segment `from -> to`.
    ///
    /// `before` and `after` are the neighbouring keyframes, when they exist;
    /// only Catmull-Rom uses them. `divisions` sizes the Bézier lookup table.
    pub fn interpolation<T: Animatable>(
        self,
        before: Option<&Keyframe<T>>,
        from: &Keyframe<T>,
        to: &Keyframe<T>,
        after: Option<&Keyframe<T>>,
        divisions: usize,
    ) -> Interpolation<T> {
        let (a, b) = (from.value, to.value);
        match self {
            Interpolator::Linear => Interpolation::Linear { from: a, to: b },
            Interpolator::Step => Interpolation::Step { from: a, to: b },
            Interpolator::Spherical => Interpolation::Spherical { from: a, to: b },
            Interpolator::CatmullRom => match (before, after) {
                (None, None) => Interpolation::BinaryCatmullRom { from: a, to: b },
                _ => {
                    let mut points = [a; 4];
                    let mut len = 0;
                    for value in before
                        .map(|k| k.value)
                        .into_iter()
                        .chain([a, b])
                        .chain(after.map(|k| k.value))
                    {
                        points[len] = value;
                        len += 1;
                    }
                    Interpolation::CatmullRom {
                        points,
                        len,
                        lead: before.is_some(),
                    }
                }
            },
            Interpolator::Bezier => Interpolation::Bezier(BezierCurve::new(from, to, divisions)),
        }
    }
}

/// Per-axis tabulated cubic Bézier between two keyframes.
#[derive(Clone, Debug, PartialEq)]
pub struct BezierCurve {
    start: f32,
    end: f32,
    axes: Vec<Vec<(f32, f32)>>,
}

impl BezierCurve {
    pub fn new<T: Animatable>(from: &Keyframe<T>, to: &Keyframe<T>, divisions: usize) -> Self {
        let out = from.handles.unwrap_or_else(BezierHandles::initial);
        let inc = to.handles.unwrap_or_else(BezierHandles::initial);
        let start = from.tick as f32;
        let end = to.tick as f32;
        let gap = end - start;

        let axes = (0..T::AXES)
            .map(|axis| {
                // handle time offsets never cross the segment boundary
                let t1 = start + out.right_time.axis(axis).clamp(0.0, gap);
                let t2 = end + inc.left_time.axis(axis).clamp(-gap, 0.0);
                let v0 = from.value.axis(axis);
                let v3 = to.value.axis(axis);
                let v1 = v0 + out.right_value.axis(axis);
                let v2 = v3 + inc.left_value.axis(axis);
                bezier_axis_table([start, t1, t2, end], [v0, v1, v2, v3], divisions)
            })
            .collect();

        Self { start, end, axes }
    }

    pub fn sample<T: Animatable>(&self, progress: f32) -> T {
        let time = lerp_f32(self.start, self.end, progress);
        T::from_axes(|axis| bezier_axis_lookup(&self.axes[axis], time))
    }
}

/// A prepared segment evaluator.
#[derive(Clone, Debug, PartialEq)]
pub enum Interpolation<T> {
    /// Same value for every progress.
    Constant(T),
    Linear { from: T, to: T },
    Step { from: T, to: T },
    /// Spline over `points[..len]`; `lead` is set when a keyframe before
    /// `from` is part of the run.
    CatmullRom { points: [T; 4], len: usize, lead: bool },
    BinaryCatmullRom { from: T, to: T },
    Bezier(BezierCurve),
    Spherical { from: T, to: T },
}

impl<T: Animatable> Interpolation<T> {
    pub fn sample(&self, progress: f32) -> T {
        match self {
            Interpolation::Constant(v) => *v,
            Interpolation::Linear { from, to } => linear_value(from, to, progress),
            Interpolation::Step { from, to } => step_value(from, to, progress),
            Interpolation::CatmullRom { points, len, lead } => {
                let offset = if *lead { 1.0 } else { 0.0 };
                catmull_rom(&points[..*len], (progress + offset) / (*len - 1) as f32)
            }
            Interpolation::BinaryCatmullRom { from, to } => {
                binary_catmull_rom(from, to, progress)
            }
            Interpolation::Bezier(curve) => curve.sample(progress),
            Interpolation::Spherical { from, to } => spherical_value(from, to, progress),
        }
    }
}
