//! Prop-style entry points: a start flag plus a run description.
//!
//! A run is (re)started when the start flag turns on, or when a new
//! description arrives while the flag is on. Turning the flag off cancels.

use crate::controller::{AnimationSpec, RunId, SpringAnimator};
use crate::error::Result;
use crate::scheduler::FrameScheduler;

/// Inputs for a one-shot trigger
#[derive(Clone, Debug)]
pub struct SpringAnimationConfig {
    pub should_start: bool,
    pub spec: AnimationSpec,
}

impl SpringAnimationConfig {
    pub fn new(should_start: bool, spec: AnimationSpec) -> Self {
        Self { should_start, spec }
    }
}

/// Start a run on `animator` if `config.should_start` is set.
/// Returns the new run, or `None` when nothing was started.
pub fn run_spring_animation<S: FrameScheduler + Clone + 'static>(
    animator: &SpringAnimator<S>,
    config: SpringAnimationConfig,
) -> Result<Option<RunId>> {
    if config.should_start {
        animator.start(config.spec).map(Some)
    } else {
        Ok(None)
    }
}

/// Keeps the last seen start flag and description and applies the restart
/// rules as either changes.
pub struct SpringAnimation<S: FrameScheduler + Clone + 'static> {
    animator: SpringAnimator<S>,
    should_start: bool,
    spec: AnimationSpec,
}

impl<S: FrameScheduler + Clone + 'static> SpringAnimation<S> {
    /// Starts with the flag off; nothing runs until it is set.
    pub fn new(animator: SpringAnimator<S>, spec: AnimationSpec) -> Self {
        Self {
            animator,
            should_start: false,
            spec,
        }
    }

    pub fn animator(&self) -> &SpringAnimator<S> {
        &self.animator
    }

    pub fn should_start(&self) -> bool {
        self.should_start
    }

    pub fn spec(&self) -> &AnimationSpec {
        &self.spec
    }

    /// Off to on starts a run, on to off cancels it, anything else is a no-op.
    /// The flag only turns on once a run has actually started.
    pub fn set_should_start(&mut self, should_start: bool) -> Result<Option<RunId>> {
        match (self.should_start, should_start) {
            (false, true) => {
                let id = self.animator.start(self.spec.clone())?;
                self.should_start = true;
                Ok(Some(id))
            }
            (true, false) => {
                self.should_start = false;
                self.animator.cancel();
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    /// Replace the description, restarting if the flag is on.
    pub fn set_spec(&mut self, spec: AnimationSpec) -> Result<Option<RunId>> {
        self.spec = spec;
        if self.should_start {
            self.animator.start(self.spec.clone()).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Apply a full set of new inputs at once. A new description counts as
    /// changed, so this restarts whenever the flag ends up on.
    pub fn update(&mut self, config: SpringAnimationConfig) -> Result<Option<RunId>> {
        self.spec = config.spec;
        if config.should_start {
            let id = self.animator.start(self.spec.clone())?;
            self.should_start = true;
            Ok(Some(id))
        } else {
            if std::mem::replace(&mut self.should_start, false) {
                self.animator.cancel();
            }
            Ok(None)
        }
    }
}
