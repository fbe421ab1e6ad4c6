//! Scene graph
//!
//! The minimal host-side hierarchy an avatar armature lives in:
//! - Node: named hierarchy entry with a transform
//! - Transform: local TRS with cached matrices and dirty tracking
//! - Scene: node storage, hierarchy edits, name lookup
//! - Skeleton: the bones of one armature, with a stable id
//! - transform_system: world-matrix propagation

pub mod node;
pub mod scene;
pub mod skeleton;
pub mod transform;
pub mod transform_system;

pub use node::Node;
pub use scene::{NodeBuilder, Scene};
pub use skeleton::Skeleton;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
}
