//! Damped spring animations for style attribute values.
//!
//! A spring is simulated with a fixed 1/60 s timestep and its displacement is
//! used to blend between a start and an end attribute value, frame by frame:
//!
//! ```
//! use spring_animation::prelude::*;
//!
//! let scheduler = ManualScheduler::new();
//! let animator = SpringAnimator::new(scheduler.clone());
//! animator
//!     .start(AnimationSpec::new("transform", "translateY(0px)", "translateY(40px)", |frame| {
//!         // hand `frame.formatted` to the renderer
//!         assert!(frame.formatted.starts_with("translateY("));
//!     }))
//!     .unwrap();
//! scheduler.run_until_idle(1000);
//! assert!(matches!(animator.phase(), AnimationPhase::Completed(_)));
//! ```

pub mod animation;
pub mod attribute;
pub mod controller;
pub mod error;
pub mod scheduler;
pub mod spring_animation;

use animation::{Animatable, SpringConfig, SpringState};

pub mod prelude {
    pub use crate::animation::{Animatable, SpringConfig, SpringState, TransformFunction};
    pub use crate::attribute::{AttributeValue, PropertyKind};
    pub use crate::controller::{AnimationFrame, AnimationPhase, AnimationSpec, RunId, SpringAnimator};
    pub use crate::error::AnimationError;
    pub use crate::scheduler::{CalloopScheduler, FrameScheduler, ManualScheduler};
    pub use crate::spring_animation::{run_spring_animation, SpringAnimation, SpringAnimationConfig};
    pub use crate::{simulate_spring, AnimatorConfig};
}

/// Frames in one run unless configured otherwise
pub const DEFAULT_FRAME_LIMIT: u32 = 600;

/// Defaults applied by a [`controller::SpringAnimator`] to every run it starts
#[derive(Clone, Debug, PartialEq)]
pub struct AnimatorConfig {
    /// Spring used when a run leaves stiffness or damping unset
    pub spring: SpringConfig,
    /// Number of frames applied before a run completes
    pub frame_limit: u32,
}

impl AnimatorConfig {
    pub fn stiffness(mut self, stiffness: f64) -> Self {
        self.spring.stiffness = stiffness;
        self
    }

    pub fn damping(mut self, damping: f64) -> Self {
        self.spring.damping = damping;
        self
    }

    pub fn spring(mut self, spring: SpringConfig) -> Self {
        self.spring = spring;
        self
    }

    /// At least one frame is always applied
    pub fn frame_limit(mut self, frame_limit: u32) -> Self {
        self.frame_limit = frame_limit.max(1);
        self
    }
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            spring: SpringConfig::DEFAULT,
            frame_limit: DEFAULT_FRAME_LIMIT,
        }
    }
}

/// Value between `start_value` and `end_value` at `frame` of a spring with
/// the given parameters. Pure: the spring is simulated from rest every call.
pub fn simulate_spring(
    frame: u32,
    stiffness: f64,
    damping: f64,
    start_value: f64,
    end_value: f64,
) -> f64 {
    let factor = SpringState::simulate(frame, &SpringConfig::new(stiffness, damping));
    f64::lerp(&start_value, &end_value, factor)
}
