use std::fmt;
use std::sync::Arc;

use crate::animation::action::AnimationAction;
use crate::animation::binder::Binder;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

/// Passed to finished listeners when an action exhausts its repetitions.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedEvent {
    /// Index of the action on its mixer.
    pub action: usize,
    pub clip_name: String,
}

/// What a finished listener wants the mixer to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackControl {
    Continue,
    /// Stop every action; the mixer becomes inert.
    StopAll,
}

pub type FinishedListener = Box<dyn FnMut(&FinishedEvent) -> PlaybackControl>;

/// Blend-capable animation player scoped to one skeleton root.
///
/// Tracks are bound to nodes found under `root`; actions advance and write
/// into the scene on [`update`](Self::update).
pub struct AnimationMixer {
    root: NodeHandle,
    actions: Vec<AnimationAction>,
    listeners: Vec<FinishedListener>,
    stopped: bool,
}

impl AnimationMixer {
    #[must_use]
    pub fn new(root: NodeHandle) -> Self {
        Self {
            root,
            actions: Vec::new(),
            listeners: Vec::new(),
            stopped: false,
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// Binds `clip` to this mixer's root and returns the new action, not yet
    /// playing.
    pub fn clip_action(&mut self, clip: Arc<AnimationClip>, scene: &Scene) -> &mut AnimationAction {
        let mut action = AnimationAction::new(clip);
        action.bindings = Binder::bind(scene, self.root, action.clip());
        self.stopped = false;
        self.actions.push(action);
        let last = self.actions.len() - 1;
        &mut self.actions[last]
    }

    #[must_use]
    pub fn actions(&self) -> &[AnimationAction] {
        &self.actions
    }

    pub fn action_mut(&mut self, index: usize) -> Option<&mut AnimationAction> {
        self.actions.get_mut(index)
    }

    /// Registers a listener for the `finished` event.
    pub fn add_finished_listener(&mut self, listener: FinishedListener) {
        self.listeners.push(listener);
    }

    pub fn remove_finished_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Stops every action. The mixer stays inert until a new action is added.
    pub fn stop_all_action(&mut self) {
        for action in &mut self.actions {
            action.stop();
        }
        self.stopped = true;
    }

    /// Whether the mixer has been stopped (explicitly or by a listener).
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Whether any action is still enabled.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.stopped && self.actions.iter().any(|a| a.enabled)
    }

    /// Advances every action by `dt` seconds and writes the blended samples
    /// into `scene`, then dispatches `finished` events.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        if self.stopped {
            return;
        }

        let mut finished = Vec::new();
        for (index, action) in self.actions.iter_mut().enumerate() {
            if action.update(dt).is_some() {
                finished.push(FinishedEvent {
                    action: index,
                    clip_name: action.clip().name.clone(),
                });
            }
        }

        for action in &mut self.actions {
            let weight = action.effective_weight();
            if weight <= 0.0 {
                continue;
            }
            action.apply(scene, weight);
        }

        for event in &finished {
            let mut stop = false;
            for listener in &mut self.listeners {
                if listener(event) == PlaybackControl::StopAll {
                    stop = true;
                }
            }
            if stop {
                log::debug!("Mixer stopped by finished listener ('{}')", event.clip_name);
                self.stop_all_action();
                break;
            }
        }
    }
}

impl fmt::Debug for AnimationMixer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationMixer")
            .field("root", &self.root)
            .field("actions", &self.actions)
            .field("listeners", &self.listeners.len())
            .field("stopped", &self.stopped)
            .finish()
    }
}
