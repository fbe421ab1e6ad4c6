use crate::animation::action::TrackValue;
use crate::scene::NodeHandle;

/// Defines the target property for animation data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPath {
    /// Maps to `transform.position`
    Translation,
    /// Maps to `transform.rotation`
    Rotation,
}

impl TargetPath {
    /// Property suffix used in `"<bone>.<property>"` paths.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TargetPath::Translation => "position",
            TargetPath::Rotation => "quaternion",
        }
    }
}

/// Binds track `track_index` of a clip to a property of a scene node.
///
/// `rest` is the node's value when the binding was made; actions blend from
/// it while their weight is below one.
#[derive(Debug, Clone)]
pub struct PropertyBinding {
    pub track_index: usize,
    pub node_handle: NodeHandle,
    pub target: TargetPath,
    pub rest: TrackValue,
}
