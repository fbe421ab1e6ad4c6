use std::sync::Arc;

use glam::Quat;
use uuid::Uuid;

use crate::animation::{AnimationClip, AnimationMixer, TargetPath, TrackValue};
use crate::errors::{MotionError, Result};
use crate::host::{Armature, AvatarHost, ClipRegistry, Playback};
use crate::retarget::RestPose;
use crate::scene::{NodeHandle, Scene, Skeleton};

/// A scene plus the armature defined over it.
#[derive(Debug)]
pub struct Rig {
    pub scene: Scene,
    pub skeleton: Skeleton,
}

impl Rig {
    /// Builds a rig whose bones are every node under `root`.
    #[must_use]
    pub fn new(scene: Scene, root: NodeHandle, name: &str) -> Self {
        let skeleton = Skeleton::from_hierarchy(name, root, &scene.nodes);
        log::debug!("Rig '{}' with {} bones", name, skeleton.bones.len());
        Self { scene, skeleton }
    }

    /// Writes the pose's local transforms into the matching bones.
    /// Bones the pose does not mention keep their transform.
    pub fn apply_pose(&mut self, pose: &RestPose) {
        for (meta, value) in &pose.props {
            let Some(handle) = self.skeleton.find_bone(&self.scene.nodes, &meta.node_name) else {
                continue;
            };
            let Some(node) = self.scene.get_node_mut(handle) else {
                continue;
            };
            match (meta.target, *value) {
                (TargetPath::Translation, TrackValue::Vector3(v)) => node.transform.position = v,
                (TargetPath::Rotation, TrackValue::Quaternion(q)) => node.transform.rotation = q,
                _ => {}
            }
        }
    }
}

impl Armature for Rig {
    type Bone = NodeHandle;

    fn skeleton_id(&self) -> Uuid {
        self.skeleton.id
    }

    fn update_world_transforms(&mut self) {
        self.scene.update_matrix_world();
    }

    fn bones(&self) -> Vec<NodeHandle> {
        self.skeleton.bones.clone()
    }

    fn bone_name(&self, bone: NodeHandle) -> Option<&str> {
        self.scene.get_node(bone).map(|n| n.name.as_str())
    }

    fn find_bone(&self, name: &str) -> Option<NodeHandle> {
        self.skeleton.find_bone(&self.scene.nodes, name)
    }

    fn world_rotation(&self, bone: NodeHandle) -> Quat {
        self.scene.world_rotation(bone).unwrap_or(Quat::IDENTITY)
    }

    fn parent(&self, bone: NodeHandle) -> Option<NodeHandle> {
        self.scene.get_node(bone).and_then(|n| n.parent())
    }
}

/// Avatar runtime: an optional rig, loaded clips, the pose layer and at most
/// one active mixer.
#[derive(Debug, Default)]
pub struct Avatar {
    rig: Option<Rig>,
    clips: ClipRegistry,
    mixer: Option<AnimationMixer>,

    pose_base: RestPose,
    pose_target: RestPose,
    pose_transition: f32,
}

impl Avatar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_rig(rig: Rig) -> Self {
        Self {
            rig: Some(rig),
            ..Self::default()
        }
    }

    /// Installs a new rig. Playback on the previous one stops; returns it.
    pub fn load_rig(&mut self, rig: Rig) -> Option<Rig> {
        self.stop_playback();
        self.rig.replace(rig)
    }

    /// Removes the rig. Prefer [`MotionPlayer::unload_armature`], which also
    /// drops the rig's cached bind pose.
    ///
    /// [`MotionPlayer::unload_armature`]: crate::player::MotionPlayer::unload_armature
    pub fn unload_rig(&mut self) -> Option<Rig> {
        self.stop_playback();
        self.rig.take()
    }

    #[must_use]
    pub fn rig(&self) -> Option<&Rig> {
        self.rig.as_ref()
    }

    pub fn rig_mut(&mut self) -> Option<&mut Rig> {
        self.rig.as_mut()
    }

    #[must_use]
    pub fn mixer(&self) -> Option<&AnimationMixer> {
        self.mixer.as_ref()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.mixer.as_ref().is_some_and(AnimationMixer::is_active)
    }

    #[must_use]
    pub fn pose_base(&self) -> &RestPose {
        &self.pose_base
    }

    #[must_use]
    pub fn pose_target(&self) -> &RestPose {
        &self.pose_target
    }

    #[must_use]
    pub fn pose_transition(&self) -> f32 {
        self.pose_transition
    }

    /// Advances playback by `dt` seconds and refreshes world matrices.
    ///
    /// A mixer that stopped itself (its clip finished) is released here.
    pub fn update(&mut self, dt: f32) {
        if let (Some(rig), Some(mixer)) = (self.rig.as_mut(), self.mixer.as_mut()) {
            mixer.update(dt, &mut rig.scene);
        }

        if self.mixer.as_ref().is_some_and(AnimationMixer::is_stopped) {
            self.mixer = None;
            log::debug!("Released finished mixer");
        }

        if let Some(rig) = self.rig.as_mut() {
            rig.scene.update_matrix_world();
        }
    }
}

impl AvatarHost for Avatar {
    type Armature = Rig;

    fn armature_mut(&mut self) -> Option<&mut Rig> {
        self.rig.as_mut()
    }

    fn replace_armature(&mut self, armature: Rig) -> Option<Rig> {
        self.load_rig(armature)
    }

    fn take_armature(&mut self) -> Option<Rig> {
        self.unload_rig()
    }

    fn clips(&self) -> &ClipRegistry {
        &self.clips
    }

    fn clips_mut(&mut self) -> &mut ClipRegistry {
        &mut self.clips
    }

    fn set_pose(&mut self, pose: &RestPose, transition: f32) {
        self.pose_base = pose.clone();
        self.pose_target = pose.clone();
        self.pose_transition = transition;
        if let Some(rig) = self.rig.as_mut() {
            rig.apply_pose(pose);
        }
    }

    fn stop_playback(&mut self) {
        if let Some(mut mixer) = self.mixer.take() {
            mixer.remove_finished_listeners();
            mixer.stop_all_action();
        }
    }

    fn start_playback(&mut self, clip: Arc<AnimationClip>, playback: Playback) -> Result<()> {
        self.stop_playback();
        let Some(rig) = self.rig.as_mut() else {
            return Err(MotionError::NotReady("avatar armature is not loaded".into()));
        };

        let mut mixer = AnimationMixer::new(rig.skeleton.root);
        if let Some(listener) = playback.on_finished {
            mixer.add_finished_listener(listener);
        }

        let action = mixer.clip_action(clip, &rig.scene);
        action.clamp_when_finished = playback.clamp_when_finished;
        action
            .set_repetitions(playback.repetitions)
            .fade_in(playback.fade_in)
            .play();

        self.mixer = Some(mixer);
        Ok(())
    }
}
