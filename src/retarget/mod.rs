//! Retargeting
//!
//! Maps a parsed capture onto a target armature:
//! - naming: source joint → target bone name
//! - bind_pose: per-armature bind rotations, cached
//! - engine: per-frame rotation/position conversion into keyframe tracks
//! - pose: first-frame snapshot of a clip
//! - assembler: clip packaging, registration and playback

pub mod assembler;
pub mod bind_pose;
pub mod engine;
pub mod naming;
pub mod pose;

pub use assembler::{RetargetedClip, assemble, capture_rest_pose, install, repetitions_for, start_playback};
pub use bind_pose::{BindMap, BindPoseResolver, BoneBindInfo};
pub use engine::{RetargetReport, RetargetedTracks, retarget, retarget_rotation, source_rotation};
pub use naming::{BoneNaming, is_arm_joint, mirror_arm_name, strip_rig_prefix, swap_left_right};
pub use pose::{PoseKind, RestPose};
