use glam::Vec3;
use smallvec::SmallVec;

use crate::bvh::channels::ChannelKind;

/// Index of a joint inside its [`BvhSkeleton`].
pub type JointIndex = usize;

/// Index of the root joint; the parser always stores it first.
pub const ROOT_JOINT: JointIndex = 0;

/// A node of the source (capture) skeleton.
#[derive(Debug, Clone)]
pub struct Joint {
    /// Unique within one file.
    pub name: String,
    /// `None` only for the root.
    pub parent: Option<JointIndex>,
    /// Declaration order.
    pub children: Vec<JointIndex>,
    /// Static translation from the parent, in file units.
    pub offset: Vec3,
    /// Animated channels in the order their values appear in a frame row.
    pub channels: SmallVec<[ChannelKind; 6]>,
    /// Where this joint's values begin in a frame row.
    pub channel_offset: usize,
}

impl Joint {
    #[must_use]
    pub fn new(name: impl Into<String>, offset: Vec3) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            offset,
            channels: SmallVec::new(),
            channel_offset: 0,
        }
    }

    /// Position of `kind` within this joint's own channel list.
    #[inline]
    #[must_use]
    pub fn channel_index(&self, kind: ChannelKind) -> Option<usize> {
        self.channels.iter().position(|&c| c == kind)
    }

    #[must_use]
    pub fn has_position(&self) -> bool {
        self.channels.iter().any(|c| c.is_position())
    }

    #[must_use]
    pub fn has_rotation(&self) -> bool {
        self.channels.iter().any(|c| c.is_rotation())
    }

    fn read(&self, frame: &[f32], kind: ChannelKind) -> f32 {
        self.channel_index(kind)
            .and_then(|i| frame.get(self.channel_offset + i))
            .copied()
            .unwrap_or(0.0)
    }

    /// Raw position channels of one frame, missing axes read as zero.
    /// `None` when the joint has no position channel at all.
    #[must_use]
    pub fn read_position(&self, frame: &[f32]) -> Option<Vec3> {
        if !self.has_position() {
            return None;
        }
        Some(Vec3::new(
            self.read(frame, ChannelKind::Xposition),
            self.read(frame, ChannelKind::Yposition),
            self.read(frame, ChannelKind::Zposition),
        ))
    }

    /// Raw rotation channels of one frame as `(x, y, z)` degrees, missing
    /// axes read as zero. `None` when the joint has no rotation channel.
    #[must_use]
    pub fn read_euler_degrees(&self, frame: &[f32]) -> Option<Vec3> {
        if !self.has_rotation() {
            return None;
        }
        Some(Vec3::new(
            self.read(frame, ChannelKind::Xrotation),
            self.read(frame, ChannelKind::Yrotation),
            self.read(frame, ChannelKind::Zrotation),
        ))
    }
}

/// Joint tree of a capture file, stored flat in pre-order.
///
/// Parents own their children through index lists; `parent` is a plain
/// back-reference. Because joints are stored in the order they are declared,
/// iterating the storage is a pre-order walk.
#[derive(Debug, Clone, Default)]
pub struct BvhSkeleton {
    joints: Vec<Joint>,
}

impl BvhSkeleton {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a joint under `parent` and returns its index.
    pub fn push(&mut self, mut joint: Joint, parent: Option<JointIndex>) -> JointIndex {
        let index = self.joints.len();
        joint.parent = parent;
        self.joints.push(joint);
        if let Some(p) = parent.and_then(|p| self.joints.get_mut(p)) {
            p.children.push(index);
        }
        index
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> Option<&Joint> {
        self.joints.first()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: JointIndex) -> Option<&Joint> {
        self.joints.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: JointIndex) -> Option<&mut Joint> {
        self.joints.get_mut(index)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Pre-order iteration, root first.
    pub fn iter(&self) -> impl Iterator<Item = &Joint> {
        self.joints.iter()
    }

    /// First joint with the given name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Joint> {
        self.joints.iter().find(|j| j.name == name)
    }

    /// Rest positions obtained by accumulating offsets from the root, in file
    /// units and indexed like the joints. Approximate: ignores any animated
    /// root translation.
    #[must_use]
    pub fn rest_world_positions(&self) -> Vec<Vec3> {
        let mut positions: Vec<Vec3> = Vec::with_capacity(self.joints.len());
        for joint in &self.joints {
            // Parents precede children in pre-order storage.
            let base = joint
                .parent
                .and_then(|p| positions.get(p))
                .copied()
                .unwrap_or(Vec3::ZERO);
            positions.push(base + joint.offset);
        }
        positions
    }
}

/// A parsed capture file.
#[derive(Debug, Clone)]
pub struct MotionClip {
    pub skeleton: BvhSkeleton,
    /// Seconds between frames.
    pub frame_time: f32,
    /// One flat row of channel values per accepted frame.
    pub frames: Vec<Vec<f32>>,
    /// Sum of all joints' channel counts; the length of every row.
    pub total_channels: usize,
}

impl MotionClip {
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// `frame_count × frame_time`.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.frames.len() as f32 * self.frame_time
    }

    /// Sample time of each frame.
    #[must_use]
    pub fn frame_times(&self) -> Vec<f32> {
        (0..self.frames.len())
            .map(|i| i as f32 * self.frame_time)
            .collect()
    }
}
