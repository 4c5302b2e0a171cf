//! Synthetic transition clips.
//!
//! A transition ramps each bone linearly from the pose it was last observed
//! in to the first frame of the target animation, over a fixed number of
//! ticks. Bones the target does not animate ramp back to
//! [`BoneFrame::INITIAL`]. Only bones with a recorded pose get a ramp; the
//! rest keep their fallback until the target starts.

use log::debug;

use crate::bone::{BoneFrame, BoneTimeline, Channel};
use crate::data::{Animation, LoopMode};
use crate::effects::EffectsTimeline;
use crate::error::Result;

pub fn synthesize<'a>(
    name: &str,
    last_frames: impl IntoIterator<Item = (&'a String, &'a BoneFrame)>,
    target: &Animation,
    ticks: u32,
    bezier_divisions: usize,
) -> Result<Animation> {
    let mut builder = Animation::builder()
        .name(name)
        .length(ticks)
        .loop_mode(LoopMode::Hold)
        .priority(target.priority())
        .timelines(Default::default())
        .effects(EffectsTimeline::empty());

    let mut ramped = 0usize;
    for (bone, last) in last_frames {
        let goal = target
            .timeline(bone)
            .map_or(BoneFrame::INITIAL, |t| t.first_frame(bezier_divisions));
        builder = builder.timeline(bone.clone(), ramp(last, &goal, ticks)?);
        ramped += 1;
    }

    debug!(
        "synthesized {ticks}-tick transition into '{}' ({ramped} bones)",
        target.name()
    );
    builder.build()
}

fn ramp(from: &BoneFrame, to: &BoneFrame, ticks: u32) -> Result<BoneTimeline> {
    let mut builder = BoneTimeline::builder();
    for channel in Channel::ALL {
        let timeline = channel.ramp(from.channel(channel), to.channel(channel), ticks)?;
        builder = builder.channel(channel, timeline);
    }
    Ok(builder.build())
}
