use std::sync::Arc;

use glam::Quat;
use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::bvh::BvhSkeleton;
use crate::host::Armature;
use crate::retarget::naming::BoneNaming;

/// Bind-pose rotations of one target bone, captured before any animation is
/// applied.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneBindInfo {
    /// World rotation of the target bone.
    pub target_world_rotation: Quat,
    /// World rotation of the target bone's parent (identity at the top).
    pub target_parent_world_rotation: Quat,
    pub target_bone_name: String,
}

/// Source joint name → bind info of the target bone it drives.
///
/// Joints with no matching target bone are absent.
pub type BindMap = FxHashMap<String, BoneBindInfo>;

#[derive(Debug, Clone, Copy, PartialEq)]
struct BoneRest {
    world: Quat,
    parent_world: Quat,
}

/// Rest rotations of every bone of one armature, keyed by bone name.
type BindSnapshot = FxHashMap<String, BoneRest>;

/// Resolves source joints to target bones and remembers each target
/// armature's bind pose.
///
/// The snapshot of an armature is taken once, on first use, and reused for
/// every later clip: once a clip has played, the live bone rotations are no
/// longer the bind pose. A rebuilt armature has a new id and is snapshotted
/// afresh; call [`evict`](Self::evict) when an armature is unloaded.
#[derive(Debug, Default)]
pub struct BindPoseResolver {
    naming: BoneNaming,
    cache: FxHashMap<Uuid, Arc<BindSnapshot>>,
}

impl BindPoseResolver {
    #[must_use]
    pub fn new(naming: BoneNaming) -> Self {
        Self {
            naming,
            cache: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn naming(&self) -> &BoneNaming {
        &self.naming
    }

    /// Builds the bind map of `source` against `armature`.
    ///
    /// On the first call for an armature its world transforms are brought up
    /// to date and every bone's rest rotation is recorded.
    pub fn resolve<A: Armature>(&mut self, armature: &mut A, source: &BvhSkeleton) -> BindMap {
        let snapshot = self
            .cache
            .entry(armature.skeleton_id())
            .or_insert_with(|| Arc::new(take_snapshot(armature)))
            .clone();

        let mut map = BindMap::default();
        for joint in source.iter() {
            let target = self.naming.target_bone_name(&joint.name);
            let Some(rest) = snapshot.get(&target) else {
                log::debug!("No target bone '{}' for joint '{}'", target, joint.name);
                continue;
            };
            map.insert(
                joint.name.clone(),
                BoneBindInfo {
                    target_world_rotation: rest.world,
                    target_parent_world_rotation: rest.parent_world,
                    target_bone_name: target,
                },
            );
        }
        map
    }

    /// Whether a bind snapshot exists for the armature `id`.
    #[must_use]
    pub fn is_cached(&self, id: Uuid) -> bool {
        self.cache.contains_key(&id)
    }

    /// Number of armatures with a cached snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drops the snapshot of armature `id`. Returns whether one existed.
    pub fn evict(&mut self, id: Uuid) -> bool {
        self.cache.remove(&id).is_some()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

fn take_snapshot<A: Armature>(armature: &mut A) -> BindSnapshot {
    armature.update_world_transforms();

    let mut snapshot = BindSnapshot::default();
    for bone in armature.bones() {
        let Some(name) = armature.bone_name(bone) else {
            continue;
        };
        let world = armature.world_rotation(bone);
        let parent_world = armature
            .parent(bone)
            .map_or(Quat::IDENTITY, |parent| armature.world_rotation(parent));

        // First bone of a given name wins, as with a by-name lookup.
        snapshot
            .entry(name.to_string())
            .or_insert(BoneRest { world, parent_world });
    }

    log::debug!("Captured bind pose of {} bones", snapshot.len());
    snapshot
}
