//! Load-and-play entry point.
//!
//! ```rust,ignore
//! let mut player = MotionPlayer::new(FileAssetReader::new("assets/motion"), RetargetSettings::default());
//! let report = pollster::block_on(player.load_and_play(&mut avatar, "walk.bvh", None))?;
//! // every frame:
//! avatar.update(dt);
//! ```

use uuid::Uuid;

use crate::assets::{AssetReader, read_text};
use crate::bvh;
use crate::errors::{MotionError, Result};
use crate::host::{Armature, AvatarHost};
use crate::retarget::{self, BindPoseResolver, BoneNaming, RetargetReport, RetargetedClip};
use crate::settings::RetargetSettings;

/// Fetches motion files, retargets them onto a host avatar and plays them.
///
/// Owns the bind-pose cache, so one player should serve an avatar for its
/// whole lifetime.
#[derive(Debug)]
pub struct MotionPlayer<R: AssetReader> {
    reader: R,
    resolver: BindPoseResolver,
    settings: RetargetSettings,
}

impl<R: AssetReader> MotionPlayer<R> {
    #[must_use]
    pub fn new(reader: R, settings: RetargetSettings) -> Self {
        Self {
            reader,
            resolver: BindPoseResolver::new(BoneNaming::from_settings(&settings)),
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &RetargetSettings {
        &self.settings
    }

    #[must_use]
    pub fn resolver(&self) -> &BindPoseResolver {
        &self.resolver
    }

    #[must_use]
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Parses `content` and retargets it onto `armature`.
    ///
    /// Pure with respect to the host: nothing is registered or played.
    pub fn convert<A: Armature>(&mut self, armature: &mut A, content: &str) -> Result<RetargetedClip> {
        let motion = bvh::parse(content)?;
        log::info!(
            "BVH parsed: {} joints, {} frames, {:.4}s frame time",
            motion.skeleton.len(),
            motion.frame_count(),
            motion.frame_time
        );

        let bind_map = self.resolver.resolve(armature, &motion.skeleton);
        let tracks = retarget::retarget(&motion, &bind_map, &self.settings)?;
        Ok(retarget::assemble(&motion, tracks, &bind_map, &self.settings))
    }

    /// Fetches, converts and registers the clip at `path` without playing it.
    ///
    /// On any failure the host is left untouched.
    pub async fn load<H: AvatarHost>(&mut self, host: &mut H, path: &str) -> Result<RetargetReport> {
        if host.armature_mut().is_none() {
            return Err(MotionError::NotReady("avatar armature is not loaded".into()));
        }

        log::info!("Loading BVH animation: {path}");
        let content = read_text(&self.reader, path).await?;

        let armature = host
            .armature_mut()
            .ok_or_else(|| MotionError::NotReady("avatar armature was unloaded during fetch".into()))?;
        let clip = self.convert(armature, &content)?;
        let report = clip.report.clone();
        retarget::install(host, path, clip);
        Ok(report)
    }

    /// Loads `path` and plays it for `duration` seconds (the configured
    /// default when `None`).
    ///
    /// A failed load leaves whatever was playing untouched.
    pub async fn load_and_play<H: AvatarHost>(
        &mut self,
        host: &mut H,
        path: &str,
        duration: Option<f32>,
    ) -> Result<RetargetReport> {
        let report = self.load(host, path).await?;
        self.play(host, path, duration)?;
        Ok(report)
    }

    /// Plays an already loaded clip. Returns the repetition count.
    pub fn play<H: AvatarHost>(&self, host: &mut H, path: &str, duration: Option<f32>) -> Result<u32> {
        let duration = duration.unwrap_or(self.settings.default_duration);
        retarget::start_playback(host, path, duration, &self.settings)
    }

    /// Stops whatever the host is playing. Fails with `NotReady` when the
    /// host has no armature.
    #[allow(clippy::unused_self)]
    pub fn stop<H: AvatarHost>(&self, host: &mut H) -> Result<()> {
        if host.armature_mut().is_none() {
            return Err(MotionError::NotReady("avatar armature is not loaded".into()));
        }
        host.stop_playback();
        Ok(())
    }

    /// Installs `armature` on the host and forgets the bind pose of the one
    /// it replaces.
    pub fn load_armature<H: AvatarHost>(
        &mut self,
        host: &mut H,
        armature: H::Armature,
    ) -> Option<H::Armature> {
        let previous = host.replace_armature(armature)?;
        self.evict(previous.skeleton_id());
        Some(previous)
    }

    /// Removes the host's armature and forgets its bind pose.
    pub fn unload_armature<H: AvatarHost>(&mut self, host: &mut H) -> Option<H::Armature> {
        let armature = host.take_armature()?;
        if self.evict(armature.skeleton_id()) {
            log::debug!("Evicted bind pose of skeleton {}", armature.skeleton_id());
        }
        Some(armature)
    }

    /// Forgets the bind pose of armature `skeleton_id`.
    pub fn evict(&mut self, skeleton_id: Uuid) -> bool {
        self.resolver.evict(skeleton_id)
    }
}
