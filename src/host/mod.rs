//! Host integration
//!
//! What the loader needs from the avatar runtime it drives:
//! - [`Armature`]: bone enumeration, name lookup, world rotations
//! - [`AvatarHost`]: clip registry, pose installation, an animation player
//!
//! [`Avatar`] is the in-crate host built on [`crate::scene`] and
//! [`crate::animation`].

pub mod avatar;
pub mod registry;

pub use avatar::{Avatar, Rig};
pub use registry::{ClipEntry, ClipRegistry};

use std::sync::Arc;

use glam::Quat;
use uuid::Uuid;

use crate::animation::{AnimationClip, FinishedListener};
use crate::errors::Result;
use crate::retarget::RestPose;

/// Read access to a target skeleton.
pub trait Armature {
    type Bone: Copy;

    /// Identity of this armature instance. A rebuilt armature must report a
    /// new id.
    fn skeleton_id(&self) -> Uuid;

    /// Brings every bone's world transform up to date.
    fn update_world_transforms(&mut self);

    fn bones(&self) -> Vec<Self::Bone>;

    fn bone_name(&self, bone: Self::Bone) -> Option<&str>;

    fn find_bone(&self, name: &str) -> Option<Self::Bone>;

    /// World rotation as of the last [`update_world_transforms`](Self::update_world_transforms).
    fn world_rotation(&self, bone: Self::Bone) -> Quat;

    fn parent(&self, bone: Self::Bone) -> Option<Self::Bone>;
}

/// How a clip should be started on the host's player.
pub struct Playback {
    pub repetitions: u32,
    /// Fade-in length in seconds.
    pub fade_in: f32,
    /// Hold the last frame when the repetitions run out.
    pub clamp_when_finished: bool,
    pub on_finished: Option<FinishedListener>,
}

/// The avatar runtime a clip is loaded into and played on.
pub trait AvatarHost {
    type Armature: Armature;

    /// The loaded armature, or `None` before the avatar is ready.
    fn armature_mut(&mut self) -> Option<&mut Self::Armature>;

    /// Installs `armature`, stopping playback. Returns the one it replaced.
    fn replace_armature(&mut self, armature: Self::Armature) -> Option<Self::Armature>;

    /// Removes the armature, stopping playback.
    fn take_armature(&mut self) -> Option<Self::Armature>;

    fn clips(&self) -> &ClipRegistry;

    fn clips_mut(&mut self) -> &mut ClipRegistry;

    /// Installs `pose` as both the base and the target pose, reached over
    /// `transition` seconds.
    fn set_pose(&mut self, pose: &RestPose, transition: f32);

    /// Stops and releases the current player, if any.
    fn stop_playback(&mut self);

    /// Creates a fresh player bound to the armature root and starts `clip` on it.
    ///
    /// # Errors
    ///
    /// [`crate::errors::MotionError::NotReady`] without an armature.
    fn start_playback(&mut self, clip: Arc<AnimationClip>, playback: Playback) -> Result<()>;
}
