//! Source joint name to target bone name.
//!
//! The capture rig and the avatar rig observed so far share bone names except
//! that their arm chains are mirrored: the capture's `LeftArm` drives the
//! avatar's `RightArm`. Only arm-chain joints are swapped; legs and spine are
//! already aligned and must keep their names.

use std::borrow::Cow;

use crate::settings::RetargetSettings;

const LEFT: &str = "Left";
const RIGHT: &str = "Right";

/// Segment names that follow the side marker on an arm-chain joint.
const ARM_SEGMENTS: [&str; 7] = ["Shoulder", "Arm", "UpperArm", "ForeArm", "Elbow", "Hand", "Wrist"];

/// Name-resolution options, extracted from [`RetargetSettings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoneNaming {
    pub swap_arm_sides: bool,
    pub strip_prefixes: Vec<String>,
}

impl BoneNaming {
    #[must_use]
    pub fn from_settings(settings: &RetargetSettings) -> Self {
        Self {
            swap_arm_sides: settings.swap_arm_sides,
            strip_prefixes: settings.strip_prefixes.clone(),
        }
    }

    /// Target bone name for a source joint: namespace prefix stripped, then
    /// the arm-chain side swap.
    #[must_use]
    pub fn target_bone_name(&self, source: &str) -> String {
        let name = strip_rig_prefix(source, &self.strip_prefixes);
        if self.swap_arm_sides {
            mirror_arm_name(name).into_owned()
        } else {
            name.to_string()
        }
    }
}

impl Default for BoneNaming {
    fn default() -> Self {
        Self::from_settings(&RetargetSettings::default())
    }
}

/// Whether `name` is `Left`/`Right` followed by an arm-chain segment
/// (shoulder, arm, upper arm, forearm, elbow, hand, wrist).
///
/// Finger joints such as `LeftHandIndex1` also match, through `Hand`.
#[must_use]
pub fn is_arm_joint(name: &str) -> bool {
    name.strip_prefix(LEFT)
        .or_else(|| name.strip_prefix(RIGHT))
        .is_some_and(|rest| ARM_SEGMENTS.iter().any(|segment| rest.starts_with(segment)))
}

/// Exchanges a leading `Left`/`Right` marker; other names pass through.
#[must_use]
pub fn swap_left_right(name: &str) -> Cow<'_, str> {
    if let Some(rest) = name.strip_prefix(LEFT) {
        Cow::Owned(format!("{RIGHT}{rest}"))
    } else if let Some(rest) = name.strip_prefix(RIGHT) {
        Cow::Owned(format!("{LEFT}{rest}"))
    } else {
        Cow::Borrowed(name)
    }
}

/// Swaps the side marker of arm-chain joints only. An involution: applying
/// it twice yields the original name.
#[must_use]
pub fn mirror_arm_name(name: &str) -> Cow<'_, str> {
    if is_arm_joint(name) {
        swap_left_right(name)
    } else {
        Cow::Borrowed(name)
    }
}

/// Removes the first matching namespace prefix, e.g. `mixamorig:Hips` → `Hips`.
#[must_use]
pub fn strip_rig_prefix<'a>(name: &'a str, prefixes: &[String]) -> &'a str {
    prefixes
        .iter()
        .find_map(|prefix| name.strip_prefix(prefix.as_str()))
        .unwrap_or(name)
}
