use std::sync::Arc;

use crate::animation::{AnimationClip, FinishedEvent, PlaybackControl, TrackMeta, TrackValue};
use crate::bvh::MotionClip;
use crate::errors::{MotionError, Result};
use crate::host::{AvatarHost, ClipEntry, Playback};
use crate::retarget::bind_pose::BindMap;
use crate::retarget::engine::{self, RetargetReport, RetargetedTracks};
use crate::retarget::pose::{PoseKind, RestPose};
use crate::settings::RetargetSettings;

/// A finished clip: tracks, opening pose, and how the mapping went.
#[derive(Debug, Clone)]
pub struct RetargetedClip {
    pub clip: Arc<AnimationClip>,
    pub rest_pose: RestPose,
    pub report: RetargetReport,
}

impl RetargetedClip {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.clip.name
    }

    #[must_use]
    pub fn duration(&self) -> f32 {
        self.clip.duration
    }
}

/// Packages retargeted tracks into a named clip and captures its rest pose.
///
/// The clip runs for `frame_count * frame_time`, one frame interval past the
/// last keyframe.
#[must_use]
pub fn assemble(
    motion: &MotionClip,
    tracks: RetargetedTracks,
    bind_map: &BindMap,
    settings: &RetargetSettings,
) -> RetargetedClip {
    let clip = AnimationClip::with_duration(settings.clip_name.clone(), motion.duration(), tracks.tracks);
    let rest_pose = capture_rest_pose(motion, bind_map, settings);

    log::info!(
        "Assembled clip '{}': {} tracks, {:.3}s, {:?} rest pose",
        clip.name,
        clip.tracks.len(),
        clip.duration,
        rest_pose.kind
    );

    RetargetedClip {
        clip: Arc::new(clip),
        rest_pose,
        report: tracks.report,
    }
}

/// Target-bone transforms of the first frame, through the same mapping as
/// the tracks.
///
/// The pose is [`PoseKind::Lying`] when the source root's converted height
/// is below the configured threshold.
#[must_use]
pub fn capture_rest_pose(motion: &MotionClip, bind_map: &BindMap, settings: &RetargetSettings) -> RestPose {
    let mut pose = RestPose::default();
    let Some(frame) = motion.frames.first() else {
        return pose;
    };

    for joint in motion.skeleton.iter() {
        let Some(bind) = bind_map.get(&joint.name) else {
            continue;
        };
        if let Some(position) = engine::joint_position(joint, frame, settings.unit_scale) {
            pose.props.insert(
                TrackMeta::translation(&bind.target_bone_name),
                TrackValue::Vector3(position),
            );
        }
        if let Some(rotation) = engine::joint_rotation(joint, frame, bind) {
            pose.props.insert(
                TrackMeta::rotation(&bind.target_bone_name),
                TrackValue::Quaternion(rotation),
            );
        }
    }

    let root_height = motion
        .skeleton
        .root()
        .and_then(|root| bind_map.get(&root.name))
        .and_then(|bind| pose.position(&bind.target_bone_name))
        .map(|p| p.y);
    if root_height.is_some_and(|y| y < settings.lying_threshold) {
        pose.kind = PoseKind::Lying;
    }

    pose
}

/// Registers `clip` on the host under `path`, replacing a previous load of
/// the same path. Returns `true` when an entry was replaced.
pub fn install<H: AvatarHost>(host: &mut H, path: &str, clip: RetargetedClip) -> bool {
    let replaced = host.clips_mut().insert(ClipEntry {
        path: path.to_string(),
        clip: clip.clip,
        rest_pose: clip.rest_pose,
    });
    if replaced {
        log::debug!("Replaced registered clip '{path}'");
    }
    replaced
}

/// Passes over a clip needed to cover `requested` seconds; at least one.
#[must_use]
pub fn repetitions_for(requested: f32, clip_duration: f32) -> u32 {
    let valid = clip_duration > 0.0 && requested > 0.0;
    if !valid {
        return 1;
    }
    let passes = (requested / clip_duration).ceil();
    if passes >= u32::MAX as f32 { u32::MAX } else { (passes as u32).max(1) }
}

/// Plays the clip registered under `path` for roughly `duration` seconds.
///
/// Stops whatever is playing, installs the clip's rest pose, then starts the
/// clip on a fresh player with a fade-in. The clip holds its last frame when
/// done and the player stops itself. Returns the repetition count.
///
/// # Errors
///
/// [`MotionError::NotReady`] when the host has no armature or no clip under
/// `path`.
pub fn start_playback<H: AvatarHost>(
    host: &mut H,
    path: &str,
    duration: f32,
    settings: &RetargetSettings,
) -> Result<u32> {
    if host.armature_mut().is_none() {
        return Err(MotionError::NotReady("avatar armature is not loaded".into()));
    }
    let Some(entry) = host.clips().get(path) else {
        return Err(MotionError::NotReady(format!("animation '{path}' is not loaded")));
    };
    let clip = entry.clip.clone();
    let rest_pose = entry.rest_pose.clone();

    host.stop_playback();
    host.set_pose(&rest_pose, settings.pose_transition);

    let repetitions = repetitions_for(duration, clip.duration);
    let playback = Playback {
        repetitions,
        fade_in: settings.fade_in,
        clamp_when_finished: true,
        on_finished: Some(Box::new(|event: &FinishedEvent| {
            log::info!("Animation '{}' finished", event.clip_name);
            PlaybackControl::StopAll
        })),
    };

    log::info!("Playing '{}' x{} ({:.3}s per pass)", path, repetitions, clip.duration);
    host.start_playback(clip, playback)?;
    Ok(repetitions)
}
