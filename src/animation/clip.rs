use std::fmt;

use glam::{Quat, Vec3};

use crate::animation::binding::TargetPath;
use crate::animation::tracks::KeyframeTrack;

/// Which property of which node a track animates.
///
/// Displays as `"<node>.<property>"`, e.g. `Hips.position`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackMeta {
    pub node_name: String,
    pub target: TargetPath,
}

impl TrackMeta {
    #[must_use]
    pub fn new(node_name: impl Into<String>, target: TargetPath) -> Self {
        Self {
            node_name: node_name.into(),
            target,
        }
    }

    #[must_use]
    pub fn translation(node_name: impl Into<String>) -> Self {
        Self::new(node_name, TargetPath::Translation)
    }

    #[must_use]
    pub fn rotation(node_name: impl Into<String>) -> Self {
        Self::new(node_name, TargetPath::Rotation)
    }
}

impl fmt::Display for TrackMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.node_name, self.target.as_str())
    }
}

#[derive(Debug, Clone)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
}

impl TrackData {
    #[must_use]
    pub fn times(&self) -> &[f32] {
        match self {
            TrackData::Vector3(track) => &track.times,
            TrackData::Quaternion(track) => &track.times,
        }
    }

    #[must_use]
    pub fn end_time(&self) -> f32 {
        match self {
            TrackData::Vector3(track) => track.end_time(),
            TrackData::Quaternion(track) => track.end_time(),
        }
    }
}

/// Complete track definition: metadata plus keyframe data.
#[derive(Debug, Clone)]
pub struct Track {
    pub meta: TrackMeta,
    pub data: TrackData,
}

#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    /// Creates a clip whose duration is the latest keyframe time.
    #[must_use]
    pub fn new(name: String, tracks: Vec<Track>) -> Self {
        let duration = tracks
            .iter()
            .map(|t| t.data.end_time())
            .fold(0.0_f32, f32::max);

        Self::with_duration(name, duration, tracks)
    }

    /// Creates a clip with an explicit duration.
    ///
    /// Sampled clips run one frame interval past their last keyframe.
    #[must_use]
    pub fn with_duration(name: String, duration: f32, tracks: Vec<Track>) -> Self {
        Self {
            name,
            duration,
            tracks,
        }
    }

    /// Track animating the given property, if any.
    #[must_use]
    pub fn track(&self, meta: &TrackMeta) -> Option<&Track> {
        self.tracks.iter().find(|t| &t.meta == meta)
    }
}
