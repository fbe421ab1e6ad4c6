use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::animation::{TargetPath, TrackMeta, TrackValue};

/// Whether a clip starts upright or on the floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PoseKind {
    #[default]
    Standing,
    Lying,
}

/// Target-bone transforms of a clip's first frame.
///
/// Installed as the avatar's base pose before the clip starts so that the
/// fade-in blends from the clip's own opening posture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestPose {
    pub props: FxHashMap<TrackMeta, TrackValue>,
    pub kind: PoseKind,
}

impl RestPose {
    #[must_use]
    pub fn position(&self, bone: &str) -> Option<Vec3> {
        match self.props.get(&TrackMeta::new(bone, TargetPath::Translation)) {
            Some(TrackValue::Vector3(v)) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn rotation(&self, bone: &str) -> Option<Quat> {
        match self.props.get(&TrackMeta::new(bone, TargetPath::Rotation)) {
            Some(TrackValue::Quaternion(q)) => Some(*q),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_standing(&self) -> bool {
        self.kind == PoseKind::Standing
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.props.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }
}
