//! Retargeting Settings
//!
//! Tunables for converting a motion-capture clip onto an avatar and for the
//! playback hand-off to the host.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use mocap::RetargetSettings;
//!
//! // Defaults match a centimetre capture rig and a metre-based avatar.
//! let settings = RetargetSettings::default();
//!
//! // Rig without arm mirroring, slower fade.
//! let settings = RetargetSettings {
//!     swap_arm_sides: false,
//!     fade_in: 1.0,
//!     ..Default::default()
//! };
//! ```

use serde::{Deserialize, Serialize};

/// Centimetre-like capture units to metres.
pub const DEFAULT_UNIT_SCALE: f32 = 0.01;

/// Configuration for the retargeting pipeline and playback.
///
/// Every field has a default, so partial JSON documents deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetargetSettings {
    /// Factor applied to position channels (source units to target units).
    pub unit_scale: f32,
    /// Fade-in time of a freshly started action, in seconds.
    pub fade_in: f32,
    /// Root height (target units) below which the rest pose counts as lying.
    pub lying_threshold: f32,
    /// Mirror Left/Right on arm-chain joints before bone lookup.
    pub swap_arm_sides: bool,
    /// Namespace prefixes removed from source joint names before bone lookup,
    /// e.g. `mixamorig:`.
    pub strip_prefixes: Vec<String>,
    /// Name given to generated clips.
    pub clip_name: String,
    /// Time the host takes to blend into the pose target, in seconds.
    pub pose_transition: f32,
    /// Playback length used when the caller does not ask for one, in seconds.
    pub default_duration: f32,
}

impl Default for RetargetSettings {
    fn default() -> Self {
        Self {
            unit_scale: DEFAULT_UNIT_SCALE,
            fade_in: 0.5,
            lying_threshold: 0.5,
            swap_arm_sides: true,
            strip_prefixes: vec!["mixamorig:".to_string()],
            clip_name: "BVHAnimation".to_string(),
            pose_transition: 1.0,
            default_duration: 10.0,
        }
    }
}
