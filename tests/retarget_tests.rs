//! Retargeting Tests
//!
//! Tests for:
//! - Bone name mapping (arm-chain side swap, rig prefixes)
//! - BindPoseResolver (mapping, snapshot caching, eviction)
//! - RetargetingEngine (track layout, rotation math, unit scale, NoTracks)
//! - ClipAssembler (duration, rest pose, standing/lying)

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};

use mocap::animation::{AnimationClip, TrackData, TrackMeta};
use mocap::bvh::{self, MotionClip};
use mocap::errors::MotionError;
use mocap::host::{Armature, Rig};
use mocap::retarget::{
    self, BindPoseResolver, BoneNaming, PoseKind, is_arm_joint, mirror_arm_name, swap_left_right,
};
use mocap::scene::Scene;
use mocap::settings::RetargetSettings;

// ============================================================================
// Helpers
// ============================================================================

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn quat_approx(a: Quat, b: Quat) -> bool {
    // q and -q are the same rotation
    a.abs_diff_eq(b, EPSILON) || a.abs_diff_eq(-b, EPSILON)
}

fn deg_z(degrees: f32) -> Quat {
    Quat::from_rotation_z(degrees.to_radians())
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Rig with an `Armature` root and the given `(bone, parent, local rotation)` chain.
fn rig(bones: &[(&str, &str, Quat)]) -> Rig {
    let mut scene = Scene::new();
    let root = scene.build_node("Armature").build();
    let mut handles = vec![("Armature".to_string(), root)];
    for &(name, parent, rotation) in bones {
        let parent_handle = handles
            .iter()
            .find(|(n, _)| n == parent)
            .map(|(_, h)| *h)
            .expect("parent declared before child");
        let handle = scene
            .build_node(name)
            .with_rotation(rotation)
            .with_parent(parent_handle)
            .build();
        handles.push((name.to_string(), handle));
    }
    Rig::new(scene, root, "avatar")
}

fn humanoid() -> Rig {
    rig(&[
        ("Hips", "Armature", Quat::IDENTITY),
        ("Spine", "Hips", Quat::IDENTITY),
        ("LeftArm", "Spine", Quat::IDENTITY),
        ("RightArm", "Spine", Quat::IDENTITY),
        ("LeftUpLeg", "Hips", Quat::IDENTITY),
    ])
}

fn quaternions(clip: &AnimationClip, bone: &str) -> Vec<Quat> {
    match &clip.track(&TrackMeta::rotation(bone)).expect("rotation track").data {
        TrackData::Quaternion(t) => t.values.clone(),
        TrackData::Vector3(_) => panic!("rotation track holds vectors"),
    }
}

fn positions(clip: &AnimationClip, bone: &str) -> Vec<Vec3> {
    match &clip.track(&TrackMeta::translation(bone)).expect("position track").data {
        TrackData::Vector3(t) => t.values.clone(),
        TrackData::Quaternion(_) => panic!("position track holds quaternions"),
    }
}

const TWO_JOINTS: &str = "\
HIERARCHY
ROOT Hips
{
  OFFSET 0 0 0
  CHANNELS 3 Xposition Yposition Zrotation
  JOINT Spine
  {
    OFFSET 0 10 0
    CHANNELS 3 Zrotation Xrotation Yrotation
  }
}
MOTION
Frames: 1
Frame Time: 0.033333
0 0 0 0 0 0
";

const ARMS: &str = "\
HIERARCHY
ROOT Hips
{
  OFFSET 0 90 0
  CHANNELS 6 Xposition Yposition Zposition Zrotation Xrotation Yrotation
  JOINT Spine
  {
    OFFSET 0 10 0
    CHANNELS 3 Zrotation Xrotation Yrotation
    JOINT LeftArm
    {
      OFFSET 15 0 0
      CHANNELS 3 Zrotation Xrotation Yrotation
      End Site
      {
        OFFSET 25 0 0
      }
    }
    JOINT RightArm
    {
      OFFSET -15 0 0
      CHANNELS 3 Zrotation Xrotation Yrotation
      End Site
      {
        OFFSET -25 0 0
      }
    }
  }
  JOINT LeftUpLeg
  {
    OFFSET 10 -5 0
    CHANNELS 3 Zrotation Xrotation Yrotation
  }
}
MOTION
Frames: 3
Frame Time: 0.5
100 90 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0
100 90 0 0 0 0 10 0 0 20 0 0 -20 0 0 5 0 0
100 90 0 0 0 0 20 0 0 40 0 0 -40 0 0 10 0 0
";

fn convert(motion: &MotionClip, rig: &mut Rig, settings: &RetargetSettings) -> retarget::RetargetedClip {
    init_logger();
    let mut resolver = BindPoseResolver::new(BoneNaming::from_settings(settings));
    let bind_map = resolver.resolve(rig, &motion.skeleton);
    let tracks = retarget::retarget(motion, &bind_map, settings).unwrap();
    retarget::assemble(motion, tracks, &bind_map, settings)
}

// ============================================================================
// Bone Name Mapping
// ============================================================================

#[test]
fn forearm_swaps_sides() {
    assert_eq!(mirror_arm_name("LeftForeArm"), "RightForeArm");
    assert_eq!(mirror_arm_name("RightForeArm"), "LeftForeArm");
}

#[test]
fn legs_keep_their_side() {
    assert_eq!(mirror_arm_name("LeftUpLeg"), "LeftUpLeg");
    assert_eq!(mirror_arm_name("RightFoot"), "RightFoot");
    assert!(!is_arm_joint("LeftUpLeg"));
}

#[test]
fn fingers_follow_their_hand() {
    assert_eq!(mirror_arm_name("LeftHandIndex1"), "RightHandIndex1");
}

#[test]
fn mirroring_is_an_involution() {
    for name in ["LeftShoulder", "RightWrist", "LeftUpLeg", "Spine1", "Head"] {
        let once = mirror_arm_name(name).into_owned();
        assert_eq!(mirror_arm_name(&once), name);
    }
}

#[test]
fn unconditional_swap_touches_any_side_prefix() {
    assert_eq!(swap_left_right("LeftUpLeg"), "RightUpLeg");
    assert_eq!(swap_left_right("Hips"), "Hips");
}

// ============================================================================
// BindPoseResolver
// ============================================================================

#[test]
fn resolve_maps_present_bones_only() {
    let motion = bvh::parse(ARMS).unwrap();
    let mut target = rig(&[
        ("Hips", "Armature", Quat::IDENTITY),
        ("Spine", "Hips", Quat::IDENTITY),
        ("RightArm", "Spine", Quat::IDENTITY),
    ]);
    let mut resolver = BindPoseResolver::default();
    let map = resolver.resolve(&mut target, &motion.skeleton);

    assert_eq!(map.len(), 3);
    assert_eq!(map["LeftArm"].target_bone_name, "RightArm");
    assert!(!map.contains_key("RightArm"));
    assert!(!map.contains_key("LeftUpLeg"));
}

#[test]
fn bind_rotations_come_from_world_transforms() {
    let motion = bvh::parse(TWO_JOINTS).unwrap();
    let turn = Quat::from_rotation_y(FRAC_PI_2);
    let mut target = rig(&[
        ("Hips", "Armature", turn),
        ("Spine", "Hips", Quat::from_rotation_x(0.5)),
    ]);

    let map = BindPoseResolver::default().resolve(&mut target, &motion.skeleton);

    let hips = &map["Hips"];
    assert!(quat_approx(hips.target_world_rotation, turn));
    assert!(quat_approx(hips.target_parent_world_rotation, Quat::IDENTITY));

    let spine = &map["Spine"];
    assert!(quat_approx(spine.target_world_rotation, turn * Quat::from_rotation_x(0.5)));
    assert!(quat_approx(spine.target_parent_world_rotation, turn));
}

#[test]
fn snapshot_is_taken_once_per_armature() {
    let motion = bvh::parse(TWO_JOINTS).unwrap();
    let mut target = humanoid();
    let mut resolver = BindPoseResolver::default();

    let first = resolver.resolve(&mut target, &motion.skeleton);
    assert!(resolver.is_cached(target.skeleton_id()));

    // Animate the rig; the cached bind pose must not follow.
    let hips = target.find_bone("Hips").unwrap();
    target.scene.get_node_mut(hips).unwrap().transform.rotation = Quat::from_rotation_x(1.0);

    let second = resolver.resolve(&mut target, &motion.skeleton);
    assert_eq!(first, second);

    assert!(resolver.evict(target.skeleton_id()));
    assert!(!resolver.is_cached(target.skeleton_id()));
    let third = resolver.resolve(&mut target, &motion.skeleton);
    assert!(quat_approx(third["Hips"].target_world_rotation, Quat::from_rotation_x(1.0)));
}

#[test]
fn snapshot_serves_clips_with_different_joints() {
    let mut target = humanoid();
    let mut resolver = BindPoseResolver::default();

    let small = bvh::parse(TWO_JOINTS).unwrap();
    let large = bvh::parse(ARMS).unwrap();
    assert_eq!(resolver.resolve(&mut target, &small.skeleton).len(), 2);
    assert_eq!(resolver.resolve(&mut target, &large.skeleton).len(), 5);
}

#[test]
fn rebuilt_armature_gets_a_fresh_snapshot() {
    let motion = bvh::parse(TWO_JOINTS).unwrap();
    let mut resolver = BindPoseResolver::default();

    let mut first = humanoid();
    let mut second = humanoid();
    resolver.resolve(&mut first, &motion.skeleton);
    assert!(!resolver.is_cached(second.skeleton_id()));
    resolver.resolve(&mut second, &motion.skeleton);
    assert!(resolver.is_cached(second.skeleton_id()));

    resolver.clear();
    assert!(!resolver.is_cached(first.skeleton_id()));
}

#[test]
fn prefixed_source_joints_map_to_plain_bones() {
    let content = TWO_JOINTS
        .replace("ROOT Hips", "ROOT mixamorig:Hips")
        .replace("JOINT Spine", "JOINT mixamorig:Spine");
    let motion = bvh::parse(&content).unwrap();
    let mut target = humanoid();

    let map = BindPoseResolver::default().resolve(&mut target, &motion.skeleton);
    assert_eq!(map["mixamorig:Hips"].target_bone_name, "Hips");
    assert_eq!(map["mixamorig:Spine"].target_bone_name, "Spine");
}

// ============================================================================
// RetargetingEngine
// ============================================================================

#[test]
fn two_joint_clip_onto_identity_rig() {
    let motion = bvh::parse(TWO_JOINTS).unwrap();
    let mut target = rig(&[
        ("Hips", "Armature", Quat::IDENTITY),
        ("Spine", "Hips", Quat::IDENTITY),
    ]);
    let result = convert(&motion, &mut target, &RetargetSettings::default());
    let clip = &result.clip;

    assert_eq!(clip.name, "BVHAnimation");
    assert_eq!(clip.tracks.len(), 3);
    assert!(approx(clip.duration, 0.033_333));

    assert_eq!(positions(clip, "Hips"), vec![Vec3::ZERO]);
    assert!(quat_approx(quaternions(clip, "Hips")[0], Quat::IDENTITY));
    assert!(quat_approx(quaternions(clip, "Spine")[0], Quat::IDENTITY));
    assert!(clip.track(&TrackMeta::translation("Spine")).is_none());

    assert!(result.report.is_complete());
    assert_eq!(result.report.track_count, 3);
}

#[test]
fn tracks_land_on_mirrored_arm_bones() {
    let motion = bvh::parse(ARMS).unwrap();
    let mut target = humanoid();
    let result = convert(&motion, &mut target, &RetargetSettings::default());
    let clip = &result.clip;

    // Source LeftArm drives target RightArm and vice versa; legs stay put.
    let right = quaternions(clip, "RightArm");
    let left = quaternions(clip, "LeftArm");
    let leg = quaternions(clip, "LeftUpLeg");
    assert!(quat_approx(right[2], deg_z(40.0)));
    assert!(quat_approx(left[2], deg_z(-40.0)));
    assert!(quat_approx(leg[2], deg_z(10.0)));
}

#[test]
fn keyframes_sit_on_frame_boundaries() {
    let motion = bvh::parse(ARMS).unwrap();
    let mut target = humanoid();
    let result = convert(&motion, &mut target, &RetargetSettings::default());

    for track in &result.clip.tracks {
        assert_eq!(track.data.times(), &[0.0, 0.5, 1.0]);
    }
    assert!(approx(result.clip.duration, 1.5));
}

#[test]
fn positions_are_scaled() {
    let motion = bvh::parse(ARMS).unwrap();
    let mut target = humanoid();
    let result = convert(&motion, &mut target, &RetargetSettings::default());
    let hips = positions(&result.clip, "Hips");
    assert!(hips[0].abs_diff_eq(Vec3::new(1.0, 0.9, 0.0), EPSILON));

    let settings = RetargetSettings {
        unit_scale: 1.0,
        ..Default::default()
    };
    let mut target = humanoid();
    let result = convert(&motion, &mut target, &settings);
    assert!(positions(&result.clip, "Hips")[0].abs_diff_eq(Vec3::new(100.0, 90.0, 0.0), EPSILON));
}

#[test]
fn rotation_is_reexpressed_under_the_parent() {
    let motion = bvh::parse(ARMS).unwrap();
    let turn = Quat::from_rotation_y(FRAC_PI_2);
    let mut target = rig(&[
        ("Hips", "Armature", turn),
        ("Spine", "Hips", Quat::IDENTITY),
    ]);
    let result = convert(&motion, &mut target, &RetargetSettings::default());

    // Hips hangs off an identity parent: the bind rotation is kept.
    assert!(quat_approx(quaternions(&result.clip, "Hips")[0], turn));
    // Spine shares its parent's world rotation: the source delta passes through.
    assert!(quat_approx(quaternions(&result.clip, "Spine")[1], deg_z(10.0)));
}

#[test]
fn output_rotations_are_unit_length() {
    let motion = bvh::parse(ARMS).unwrap();
    let mut target = rig(&[
        ("Hips", "Armature", Quat::from_rotation_x(0.7)),
        ("Spine", "Hips", Quat::from_rotation_z(-0.3)),
        ("LeftArm", "Spine", Quat::from_rotation_y(1.2)),
        ("RightArm", "Spine", Quat::from_rotation_y(-1.2)),
    ]);
    let result = convert(&motion, &mut target, &RetargetSettings::default());
    for bone in ["Hips", "Spine", "LeftArm", "RightArm"] {
        for q in quaternions(&result.clip, bone) {
            assert!(approx(q.length(), 1.0));
        }
    }
}

#[test]
fn unmapped_joints_are_reported() {
    init_logger();
    let motion = bvh::parse(ARMS).unwrap();
    let mut target = rig(&[("Hips", "Armature", Quat::IDENTITY)]);
    let result = convert(&motion, &mut target, &RetargetSettings::default());

    assert_eq!(result.report.mapped, vec!["Hips".to_string()]);
    assert_eq!(result.report.missing, ["Spine", "LeftArm", "RightArm", "LeftUpLeg"]);
    assert!(!result.report.is_complete());
    assert_eq!(result.clip.tracks.len(), 2);
}

#[test]
fn nothing_mapped_is_no_tracks() {
    init_logger();
    let motion = bvh::parse(ARMS).unwrap();
    let mut target = rig(&[("Head", "Armature", Quat::IDENTITY)]);
    let map = BindPoseResolver::default().resolve(&mut target, &motion.skeleton);
    assert!(map.is_empty());

    let err = retarget::retarget(&motion, &map, &RetargetSettings::default()).unwrap_err();
    match err {
        MotionError::NoTracks { missing } => assert_eq!(missing.len(), 5),
        other => panic!("expected NoTracks, got {other:?}"),
    }
}

#[test]
fn clip_without_frames_is_no_tracks() {
    init_logger();
    let motion = bvh::parse(&TWO_JOINTS.replace("Frames: 1", "Frames: 0")).unwrap();
    let mut target = humanoid();
    let map = BindPoseResolver::default().resolve(&mut target, &motion.skeleton);
    let err = retarget::retarget(&motion, &map, &RetargetSettings::default()).unwrap_err();
    assert!(err.is_no_tracks());
}

// ============================================================================
// ClipAssembler: Rest Pose
// ============================================================================

#[test]
fn rest_pose_matches_first_frame() {
    let motion = bvh::parse(ARMS).unwrap();
    let mut target = humanoid();
    let result = convert(&motion, &mut target, &RetargetSettings::default());
    let pose = &result.rest_pose;

    assert_eq!(pose.len(), 6);
    assert!(pose.position("Hips").unwrap().abs_diff_eq(Vec3::new(1.0, 0.9, 0.0), EPSILON));
    for bone in ["Hips", "Spine", "LeftArm", "RightArm", "LeftUpLeg"] {
        let first = quaternions(&result.clip, bone)[0];
        assert!(quat_approx(pose.rotation(bone).unwrap(), first));
    }
    assert_eq!(pose.kind, PoseKind::Standing);
    assert!(pose.is_standing());
}

#[test]
fn low_root_means_lying() {
    let content = ARMS.replace("100 90 0 0 0 0 0 0 0 0 0 0 0", "100 20 0 0 0 0 0 0 0 0 0 0 0");
    let motion = bvh::parse(&content).unwrap();
    let mut target = humanoid();
    let result = convert(&motion, &mut target, &RetargetSettings::default());
    assert_eq!(result.rest_pose.kind, PoseKind::Lying);
}

#[test]
fn root_without_position_is_standing() {
    let content = "\
HIERARCHY
ROOT Hips
{
  OFFSET 0 0 0
  CHANNELS 3 Zrotation Xrotation Yrotation
}
MOTION
Frames: 1
Frame Time: 0.1
0 0 0
";
    let motion = bvh::parse(content).unwrap();
    let mut target = humanoid();
    let result = convert(&motion, &mut target, &RetargetSettings::default());
    assert_eq!(result.rest_pose.kind, PoseKind::Standing);
    assert!(result.rest_pose.position("Hips").is_none());
}
