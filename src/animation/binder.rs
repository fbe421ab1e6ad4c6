use crate::animation::action::TrackValue;
use crate::animation::binding::{PropertyBinding, TargetPath};
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

pub struct Binder;

impl Binder {
    /// Resolves clip tracks to nodes under `root_node` by name.
    ///
    /// Tracks whose node is not found are left unbound. Each binding records
    /// the node's current value as its rest value.
    #[must_use]
    pub fn bind(scene: &Scene, root_node: NodeHandle, clip: &AnimationClip) -> Vec<PropertyBinding> {
        let mut bindings = Vec::with_capacity(clip.tracks.len());

        for (track_idx, track) in clip.tracks.iter().enumerate() {
            let target = track.meta.target;
            let Some(node_handle) = scene.find_node_by_name(root_node, &track.meta.node_name) else {
                log::debug!("Track '{}' has no matching node", track.meta);
                continue;
            };
            let Some(node) = scene.get_node(node_handle) else {
                continue;
            };

            let rest = match target {
                TargetPath::Translation => TrackValue::Vector3(node.transform.position),
                TargetPath::Rotation => TrackValue::Quaternion(node.transform.rotation),
            };

            bindings.push(PropertyBinding {
                track_index: track_idx,
                node_handle,
                target,
                rest,
            });
        }

        bindings
    }
}
