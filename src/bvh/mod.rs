//! BioVision Hierarchy (BVH) motion-capture files
//!
//! - [`parse`]: text to [`MotionClip`] (joint tree + per-frame channel rows)
//! - [`count_channels`] / [`assign_channel_offsets`]: channel indexing over the
//!   joint tree, in declaration (pre-)order

pub mod channels;
pub mod joint;
pub mod parser;

pub use channels::{ChannelKind, assign_channel_offsets, count_channels};
pub use joint::{BvhSkeleton, Joint, JointIndex, MotionClip, ROOT_JOINT};
pub use parser::parse;
