#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod assets;
pub mod bvh;
pub mod errors;
pub mod host;
pub mod player;
pub mod retarget;
pub mod scene;
pub mod settings;

pub use animation::{AnimationAction, AnimationClip, AnimationMixer, Binder, TrackMeta, TrackValue};
pub use assets::{AssetReader, FileAssetReader, MemoryAssetReader};
pub use bvh::{BvhSkeleton, Joint, MotionClip};
pub use errors::{MotionError, Result};
pub use host::{Armature, Avatar, AvatarHost, ClipRegistry, Rig};
pub use player::MotionPlayer;
pub use retarget::{BindPoseResolver, PoseKind, RestPose, RetargetReport, RetargetedClip};
pub use scene::{Node, Scene, Skeleton};
pub use settings::RetargetSettings;
