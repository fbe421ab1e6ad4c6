pub mod action;
pub mod binder;
pub mod binding;
pub mod clip;
pub mod mixer;
pub mod tracks;
pub mod values;

pub use action::{ActionFinished, AnimationAction, TrackValue};
pub use binder::Binder;
pub use binding::{PropertyBinding, TargetPath};
pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use mixer::{AnimationMixer, FinishedEvent, FinishedListener, PlaybackControl};
pub use tracks::{KeyframeCursor, KeyframeTrack};
