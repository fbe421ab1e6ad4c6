use crate::bvh::joint::{BvhSkeleton, JointIndex};

/// One animated scalar degree of freedom declared by a joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Xposition,
    Yposition,
    Zposition,
    Xrotation,
    Yrotation,
    Zrotation,
}

impl ChannelKind {
    /// Parses a channel token as written in a `CHANNELS` declaration.
    #[must_use]
    pub fn from_name(token: &str) -> Option<Self> {
        match token {
            "Xposition" => Some(Self::Xposition),
            "Yposition" => Some(Self::Yposition),
            "Zposition" => Some(Self::Zposition),
            "Xrotation" => Some(Self::Xrotation),
            "Yrotation" => Some(Self::Yrotation),
            "Zrotation" => Some(Self::Zrotation),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xposition => "Xposition",
            Self::Yposition => "Yposition",
            Self::Zposition => "Zposition",
            Self::Xrotation => "Xrotation",
            Self::Yrotation => "Yrotation",
            Self::Zrotation => "Zrotation",
        }
    }

    #[inline]
    #[must_use]
    pub fn is_position(self) -> bool {
        matches!(self, Self::Xposition | Self::Yposition | Self::Zposition)
    }

    #[inline]
    #[must_use]
    pub fn is_rotation(self) -> bool {
        !self.is_position()
    }
}

impl std::fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Total number of channels declared by `joint` and all of its descendants.
///
/// For the root joint this is the length every frame row must have.
#[must_use]
pub fn count_channels(skeleton: &BvhSkeleton, joint: JointIndex) -> usize {
    let Some(node) = skeleton.get(joint) else {
        return 0;
    };
    node.channels.len()
        + node
            .children
            .iter()
            .map(|&child| count_channels(skeleton, child))
            .sum::<usize>()
}

/// Assigns each joint of the subtree its offset into a frame row.
///
/// Offsets are handed out in pre-order (a joint before its children, children
/// in declaration order), which is the order values appear in the file.
/// Returns the first offset past the subtree. The numbering depends only on
/// the tree shape, so repeated calls with the same `start` agree.
pub fn assign_channel_offsets(skeleton: &mut BvhSkeleton, joint: JointIndex, start: usize) -> usize {
    let Some(node) = skeleton.get_mut(joint) else {
        return start;
    };
    node.channel_offset = start;
    let mut next = start + node.channels.len();

    let children = node.children.clone();
    for child in children {
        next = assign_channel_offsets(skeleton, child, next);
    }
    next
}
