use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::{
    binding::{PropertyBinding, TargetPath},
    clip::{AnimationClip, TrackData},
    tracks::KeyframeCursor,
};
use crate::scene::Scene;

/// Emitted by [`AnimationAction::update`] when the action runs out of
/// repetitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionFinished;

/// Playback state of one clip on one mixer.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub weight: f32,
    /// Passes over the clip before the action finishes.
    pub repetitions: u32,
    /// Hold the last frame after finishing instead of disabling the action.
    pub clamp_when_finished: bool,
    pub paused: bool,
    pub enabled: bool,

    pub bindings: Vec<PropertyBinding>,

    loop_count: u32,
    fade_duration: f32,
    fade_elapsed: f32,

    pub(crate) track_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            weight: 1.0,
            repetitions: u32::MAX,
            clamp_when_finished: false,
            paused: false,
            enabled: false,
            bindings: Vec::new(),
            loop_count: 0,
            fade_duration: 0.0,
            fade_elapsed: 0.0,
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    /// Completed passes over the clip since [`play`](Self::play).
    #[must_use]
    pub fn loop_count(&self) -> u32 {
        self.loop_count
    }

    /// Plays the clip `repetitions` times (at least once), then finishes.
    pub fn set_repetitions(&mut self, repetitions: u32) -> &mut Self {
        self.repetitions = repetitions.max(1);
        self
    }

    /// Ramps the effective weight from zero to `weight` over `duration` seconds.
    pub fn fade_in(&mut self, duration: f32) -> &mut Self {
        self.fade_duration = duration.max(0.0);
        self.fade_elapsed = 0.0;
        self
    }

    /// Starts (or restarts) playback from the beginning.
    pub fn play(&mut self) -> &mut Self {
        self.time = 0.0;
        self.loop_count = 0;
        self.paused = false;
        self.enabled = true;
        self
    }

    pub fn stop(&mut self) {
        self.enabled = false;
        self.paused = false;
        self.time = 0.0;
        self.loop_count = 0;
        self.fade_elapsed = 0.0;
    }

    /// Whether the action is advancing time.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.enabled && !self.paused
    }

    /// Weight after applying the fade-in ramp.
    #[must_use]
    pub fn effective_weight(&self) -> f32 {
        if !self.enabled {
            return 0.0;
        }
        if self.fade_duration > 0.0 && self.fade_elapsed < self.fade_duration {
            self.weight * (self.fade_elapsed / self.fade_duration)
        } else {
            self.weight
        }
    }

    /// Advances time; returns [`ActionFinished`] on the update that exhausts
    /// the repetitions.
    pub fn update(&mut self, dt: f32) -> Option<ActionFinished> {
        if !self.is_running() {
            return None;
        }

        self.fade_elapsed += dt;

        let duration = self.clip.duration;
        if duration <= 0.0 {
            // Nothing to play through; finish on the first tick.
            self.loop_count = self.repetitions;
            self.finish(0.0);
            return Some(ActionFinished);
        }

        self.time += dt;
        if self.time < duration {
            return None;
        }

        while self.time >= duration {
            self.loop_count = self.loop_count.saturating_add(1);
            if self.loop_count >= self.repetitions {
                self.finish(duration);
                return Some(ActionFinished);
            }
            self.time -= duration;
        }

        None
    }

    fn finish(&mut self, duration: f32) {
        if self.clamp_when_finished {
            self.time = duration;
            self.paused = true;
        } else {
            self.time = 0.0;
            self.enabled = false;
        }
    }

    /// Gets the value of the specified track at the current time.
    pub fn sample_track(&mut self, track_index: usize) -> Option<TrackValue> {
        let track = self.clip.tracks.get(track_index)?;
        let cursor = self.track_cursors.get_mut(track_index)?;

        match &track.data {
            TrackData::Vector3(t) => t.sample_with_cursor(self.time, cursor).map(TrackValue::Vector3),
            TrackData::Quaternion(t) => t
                .sample_with_cursor(self.time, cursor)
                .map(TrackValue::Quaternion),
        }
    }

    /// Writes the current sample of every bound track into the scene,
    /// blended from each binding's rest value by `weight`.
    pub(crate) fn apply(&mut self, scene: &mut Scene, weight: f32) {
        let weight = weight.clamp(0.0, 1.0);
        for binding_index in 0..self.bindings.len() {
            let (track_index, node_handle, target, rest) = {
                let b = &self.bindings[binding_index];
                (b.track_index, b.node_handle, b.target, b.rest)
            };
            let Some(value) = self.sample_track(track_index) else {
                continue;
            };
            let Some(node) = scene.get_node_mut(node_handle) else {
                continue;
            };

            match (target, value, rest) {
                (TargetPath::Translation, TrackValue::Vector3(v), TrackValue::Vector3(r)) => {
                    node.transform.position = r.lerp(v, weight);
                }
                (TargetPath::Rotation, TrackValue::Quaternion(q), TrackValue::Quaternion(r)) => {
                    node.transform.rotation = r.slerp(q, weight).normalize();
                }
                _ => {}
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackValue {
    Vector3(Vec3),
    Quaternion(Quat),
}
