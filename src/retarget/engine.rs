use glam::{EulerRot, Quat, Vec3};

use crate::animation::{KeyframeTrack, Track, TrackData, TrackMeta};
use crate::bvh::{Joint, MotionClip};
use crate::errors::{MotionError, Result};
use crate::retarget::bind_pose::{BindMap, BoneBindInfo};
use crate::settings::RetargetSettings;

/// Outcome of one retargeting pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetargetReport {
    /// Source joints that drive a target bone.
    pub mapped: Vec<String>,
    /// Source joints with no target bone; they were skipped.
    pub missing: Vec<String>,
    pub track_count: usize,
}

impl RetargetReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Tracks produced by [`retarget`], ready for clip assembly.
#[derive(Debug, Clone)]
pub struct RetargetedTracks {
    pub tracks: Vec<Track>,
    pub report: RetargetReport,
}

/// Source-space rotation from Euler angles in degrees.
///
/// Capture files list rotations Z, X, Y; they compose in that order.
#[must_use]
pub fn source_rotation(euler_degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::ZXY,
        euler_degrees.z.to_radians(),
        euler_degrees.x.to_radians(),
        euler_degrees.y.to_radians(),
    )
}

/// Maps a source rotation into the target bone's local space:
/// into world space through the bone's bind rotation, then into the
/// parent's frame.
#[must_use]
pub fn retarget_rotation(source: Quat, bind: &BoneBindInfo) -> Quat {
    let world = bind.target_world_rotation * source;
    (bind.target_parent_world_rotation.inverse() * world).normalize()
}

/// Target-space position of a joint on one frame, or `None` when the joint
/// has no position channels.
#[must_use]
pub(crate) fn joint_position(joint: &Joint, frame: &[f32], unit_scale: f32) -> Option<Vec3> {
    joint.read_position(frame).map(|p| p * unit_scale)
}

/// Target-space local rotation of a joint on one frame, or `None` when the
/// joint has no rotation channels.
#[must_use]
pub(crate) fn joint_rotation(joint: &Joint, frame: &[f32], bind: &BoneBindInfo) -> Option<Quat> {
    joint
        .read_euler_degrees(frame)
        .map(|euler| retarget_rotation(source_rotation(euler), bind))
}

/// Turns the frames of `clip` into keyframe tracks on the target bones in
/// `bind_map`.
///
/// Each mapped joint yields a position track when it has any position
/// channel and a rotation track when it has any rotation channel; missing
/// axes read as 0. Keyframe `i` sits at `i * frame_time`.
///
/// # Errors
///
/// [`MotionError::NoTracks`] when nothing maps, including clips with no
/// frames.
pub fn retarget(clip: &MotionClip, bind_map: &BindMap, settings: &RetargetSettings) -> Result<RetargetedTracks> {
    let times = clip.frame_times();
    let mut tracks = Vec::new();
    let mut report = RetargetReport::default();

    for joint in clip.skeleton.iter() {
        let Some(bind) = bind_map.get(&joint.name) else {
            report.missing.push(joint.name.clone());
            continue;
        };
        report.mapped.push(joint.name.clone());

        if clip.frames.is_empty() {
            continue;
        }

        if joint.has_position() {
            let values: Vec<Vec3> = clip
                .frames
                .iter()
                .filter_map(|frame| joint_position(joint, frame, settings.unit_scale))
                .collect();
            tracks.push(Track {
                meta: TrackMeta::translation(&bind.target_bone_name),
                data: TrackData::Vector3(KeyframeTrack::new(times.clone(), values)),
            });
        }

        if joint.has_rotation() {
            let values: Vec<Quat> = clip
                .frames
                .iter()
                .filter_map(|frame| joint_rotation(joint, frame, bind))
                .collect();
            tracks.push(Track {
                meta: TrackMeta::rotation(&bind.target_bone_name),
                data: TrackData::Quaternion(KeyframeTrack::new(times.clone(), values)),
            });
        }
    }

    if !report.missing.is_empty() {
        log::warn!(
            "{} of {} joints have no target bone: {}",
            report.missing.len(),
            clip.skeleton.len(),
            report.missing.join(", ")
        );
    }

    if tracks.is_empty() {
        log::error!("No animation tracks created, bone names may not match");
        return Err(MotionError::NoTracks {
            missing: report.missing,
        });
    }

    report.track_count = tracks.len();
    log::info!("Created {} animation tracks", tracks.len());
    Ok(RetargetedTracks { tracks, report })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn zero_euler_is_identity() {
        assert!(source_rotation(Vec3::ZERO).abs_diff_eq(Quat::IDENTITY, EPSILON));
    }

    #[test]
    fn single_axis_rotations() {
        let q = source_rotation(Vec3::new(0.0, 90.0, 0.0));
        assert!(q.abs_diff_eq(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2), EPSILON));

        let q = source_rotation(Vec3::new(0.0, 0.0, 90.0));
        assert!(q.abs_diff_eq(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2), EPSILON));
    }

    #[test]
    fn composition_order_is_z_then_x_then_y() {
        let euler = Vec3::new(30.0, 45.0, 60.0);
        let expected = Quat::from_rotation_z(60f32.to_radians())
            * Quat::from_rotation_x(30f32.to_radians())
            * Quat::from_rotation_y(45f32.to_radians());
        let q = source_rotation(euler);
        assert!(q.abs_diff_eq(expected, EPSILON) || q.abs_diff_eq(-expected, EPSILON));
    }

    #[test]
    fn identity_bind_passes_rotation_through() {
        let bind = BoneBindInfo {
            target_world_rotation: Quat::IDENTITY,
            target_parent_world_rotation: Quat::IDENTITY,
            target_bone_name: "Hips".into(),
        };
        let q = Quat::from_rotation_x(0.3);
        assert!(retarget_rotation(q, &bind).abs_diff_eq(q, EPSILON));
    }

    #[test]
    fn shared_bind_rotation_cancels_against_parent() {
        let r = Quat::from_rotation_y(1.1);
        let bind = BoneBindInfo {
            target_world_rotation: r,
            target_parent_world_rotation: r,
            target_bone_name: "Spine".into(),
        };
        let q = Quat::from_rotation_z(0.4);
        let out = retarget_rotation(q, &bind);
        assert!((out.length() - 1.0).abs() < EPSILON);
        assert!(out.abs_diff_eq(q, EPSILON));
    }
}
