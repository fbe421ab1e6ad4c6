use std::sync::Arc;

use crate::animation::AnimationClip;
use crate::retarget::RestPose;

/// A loaded clip and its opening pose, keyed by the path it came from.
#[derive(Debug, Clone)]
pub struct ClipEntry {
    pub path: String,
    pub clip: Arc<AnimationClip>,
    pub rest_pose: RestPose,
}

/// Loaded clips, at most one per source path.
#[derive(Debug, Clone, Default)]
pub struct ClipRegistry {
    entries: Vec<ClipEntry>,
}

impl ClipRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry`, replacing any entry with the same path in place.
    /// Returns `true` when an entry was replaced.
    pub fn insert(&mut self, entry: ClipEntry) -> bool {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.path == entry.path) {
            *existing = entry;
            true
        } else {
            self.entries.push(entry);
            false
        }
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&ClipEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    pub fn remove(&mut self, path: &str) -> Option<ClipEntry> {
        let index = self.entries.iter().position(|e| e.path == path)?;
        Some(self.entries.remove(index))
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClipEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
