//! Frame-driven spring animation runs.
//!
//! [`SpringAnimator`] owns at most one active run. Starting a run parses the
//! start and end attributes, then requests ticks from a [`FrameScheduler`].
//! Every tick advances the spring by one frame, interpolates between the two
//! attribute values and hands the reformatted text to `on_each_frame`.
//!
//! Runs are identified by a [`RunId`]. A tick only has an effect while its
//! run is the animator's current running run, so a tick queued before a
//! cancel or restart is dropped when it fires.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::animation::{Animatable, SpringConfig, SpringState};
use crate::attribute::{AttributeValue, PropertyKind};
use crate::error::{AnimationError, Result};
use crate::scheduler::FrameScheduler;
use crate::AnimatorConfig;

/// Receives each interpolated frame
pub type FrameHandler = Rc<dyn Fn(&AnimationFrame<'_>)>;

/// Notification without payload
pub type Notify = Rc<dyn Fn()>;

/// One applied frame of a run
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationFrame<'a> {
    /// Property being animated, e.g. `opacity` or `transform`
    pub css_property: &'a str,
    /// Frame index, starting at 1
    pub frame: u32,
    /// Spring displacement for this frame (may overshoot 1.0)
    pub factor: f64,
    /// Interpolated value carrying the start attribute's unit and wrapper
    pub value: AttributeValue,
    /// `value` rendered back to attribute text
    pub formatted: String,
}

impl AnimationFrame<'_> {
    pub fn unit(&self) -> &str {
        &self.value.unit
    }
}

/// Everything needed to trigger one run
#[derive(Clone)]
pub struct AnimationSpec {
    pub css_property: String,
    pub start_attribute: String,
    pub end_attribute: String,
    /// Falls back to the animator's configured stiffness
    pub stiffness: Option<f64>,
    /// Falls back to the animator's configured damping
    pub damping: Option<f64>,
    /// Wait before the first frame
    pub delay: Duration,
    on_each_frame: FrameHandler,
    on_progress: Option<Notify>,
    on_complete: Option<Notify>,
}

impl AnimationSpec {
    pub fn new<F>(
        css_property: impl Into<String>,
        start_attribute: impl Into<String>,
        end_attribute: impl Into<String>,
        on_each_frame: F,
    ) -> Self
    where
        F: Fn(&AnimationFrame<'_>) + 'static,
    {
        Self {
            css_property: css_property.into(),
            start_attribute: start_attribute.into(),
            end_attribute: end_attribute.into(),
            stiffness: None,
            damping: None,
            delay: Duration::ZERO,
            on_each_frame: Rc::new(on_each_frame),
            on_progress: None,
            on_complete: None,
        }
    }

    pub fn stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = Some(stiffness);
        self
    }

    pub fn damping(mut self, damping: f64) -> Self {
        self.damping = Some(damping);
        self
    }

    pub fn spring(self, config: SpringConfig) -> Self {
        self.stiffness(config.stiffness).damping(config.damping)
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Called after every applied frame
    pub fn on_progress<F: Fn() + 'static>(mut self, f: F) -> Self {
        self.on_progress = Some(Rc::new(f));
        self
    }

    /// Called once after the final frame
    pub fn on_complete<F: Fn() + 'static>(mut self, f: F) -> Self {
        self.on_complete = Some(Rc::new(f));
        self
    }

    fn resolve_spring(&self, fallback: SpringConfig) -> SpringConfig {
        SpringConfig {
            stiffness: self.stiffness.unwrap_or(fallback.stiffness),
            damping: self.damping.unwrap_or(fallback.damping),
        }
    }
}

impl fmt::Debug for AnimationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationSpec")
            .field("css_property", &self.css_property)
            .field("start_attribute", &self.start_attribute)
            .field("end_attribute", &self.end_attribute)
            .field("stiffness", &self.stiffness)
            .field("damping", &self.damping)
            .field("delay", &self.delay)
            .field("on_progress", &self.on_progress.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Identifies one triggered run. Ids increase monotonically per animator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(u64);

impl RunId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Lifecycle of the animator's most recent run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationPhase {
    /// Nothing has been started yet
    Idle,
    Running(RunId),
    Completed(RunId),
    Cancelled(RunId),
}

struct Generation {
    last_id: u64,
    phase: AnimationPhase,
}

impl Generation {
    fn is_running(&self, id: RunId) -> bool {
        self.phase == AnimationPhase::Running(id)
    }
}

/// Drives one spring animation at a time on top of a [`FrameScheduler`].
pub struct SpringAnimator<S: FrameScheduler + Clone + 'static> {
    scheduler: S,
    config: AnimatorConfig,
    generation: Rc<RefCell<Generation>>,
}

impl<S: FrameScheduler + Clone + 'static> SpringAnimator<S> {
    pub fn new(scheduler: S) -> Self {
        Self::with_config(scheduler, AnimatorConfig::default())
    }

    pub fn with_config(scheduler: S, config: AnimatorConfig) -> Self {
        Self {
            scheduler,
            config,
            generation: Rc::new(RefCell::new(Generation {
                last_id: 0,
                phase: AnimationPhase::Idle,
            })),
        }
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn phase(&self) -> AnimationPhase {
        self.generation.borrow().phase
    }

    /// The run currently producing frames, if any
    pub fn current_run(&self) -> Option<RunId> {
        match self.phase() {
            AnimationPhase::Running(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.current_run().is_some()
    }

    /// Start a new run, superseding any run in flight.
    ///
    /// Spring parameters and both attributes are validated before anything
    /// is scheduled; on error the previous run keeps going.
    pub fn start(&self, spec: AnimationSpec) -> Result<RunId> {
        let spring = spec.resolve_spring(self.config.spring);
        spring.validate()?;

        let transform_like = PropertyKind::of(&spec.css_property).is_transform_like();
        let start = AttributeValue::parse(&spec.start_attribute, transform_like)?;
        let end = AttributeValue::parse(&spec.end_attribute, transform_like)?;

        if start.wrapper != end.wrapper {
            return Err(AnimationError::MismatchedTransform {
                start: describe_wrapper(&start),
                end: describe_wrapper(&end),
            });
        }
        if start.unit != end.unit {
            log::warn!(
                "Unit mismatch animating {}: {:?} to {:?}, using {:?}",
                spec.css_property,
                spec.start_attribute,
                spec.end_attribute,
                start.unit
            );
        }

        let id = RunId(self.generation.borrow().last_id + 1);
        let run = Run {
            id,
            css_property: spec.css_property,
            start,
            end,
            spring,
            spring_state: SpringState::new(),
            frame_limit: self.config.frame_limit,
            on_each_frame: spec.on_each_frame,
            on_progress: spec.on_progress,
            on_complete: spec.on_complete,
            scheduler: self.scheduler.clone(),
            generation: self.generation.clone(),
        };

        // Commit only once the first tick is queued; ticks check the phase
        // when they fire.
        run.schedule(spec.delay)?;

        let mut generation = self.generation.borrow_mut();
        if let AnimationPhase::Running(previous) = generation.phase {
            log::debug!("Run {} superseded by run {}", previous.0, id.0);
        }
        generation.last_id = id.0;
        generation.phase = AnimationPhase::Running(id);
        log::debug!(
            "Started run {} (delay {:?}, stiffness {}, damping {})",
            id.0,
            spec.delay,
            spring.stiffness,
            spring.damping
        );

        Ok(id)
    }

    /// Cancel the running run, if any. Returns whether a run was cancelled.
    pub fn cancel(&self) -> bool {
        let mut generation = self.generation.borrow_mut();
        match generation.phase {
            AnimationPhase::Running(id) => {
                generation.phase = AnimationPhase::Cancelled(id);
                log::debug!("Cancelled run {}", id.0);
                true
            }
            _ => false,
        }
    }
}

impl<S: FrameScheduler + Clone + 'static> Drop for SpringAnimator<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn describe_wrapper(value: &AttributeValue) -> String {
    match value.wrapper {
        Some(wrapper) => format!("{}()", wrapper),
        None => "a plain value".to_string(),
    }
}

/// A run in flight. Moved from tick to tick; never shared.
struct Run<S> {
    id: RunId,
    css_property: String,
    start: AttributeValue,
    end: AttributeValue,
    spring: SpringConfig,
    spring_state: SpringState,
    frame_limit: u32,
    on_each_frame: FrameHandler,
    on_progress: Option<Notify>,
    on_complete: Option<Notify>,
    scheduler: S,
    generation: Rc<RefCell<Generation>>,
}

impl<S: FrameScheduler + Clone + 'static> Run<S> {
    fn is_current(&self) -> bool {
        self.generation.borrow().is_running(self.id)
    }

    fn schedule(self, delay: Duration) -> Result<()> {
        let scheduler = self.scheduler.clone();
        scheduler.request_frame(delay, Box::new(move || self.tick()))
    }

    fn tick(mut self) {
        if !self.is_current() {
            log::trace!("Dropping stale tick for run {}", self.id.0);
            return;
        }

        let frame = self.spring_state.frame + 1;
        let factor = self.spring_state.advance_to(frame, &self.spring);
        let value = AttributeValue::lerp(&self.start, &self.end, factor);
        let formatted = value.to_string();
        log::trace!("Run {} frame {}: {}", self.id.0, frame, formatted);

        (self.on_each_frame)(&AnimationFrame {
            css_property: &self.css_property,
            frame,
            factor,
            value,
            formatted,
        });

        // Either callback may cancel or restart the animation
        if !self.is_current() {
            return;
        }
        if let Some(on_progress) = &self.on_progress {
            on_progress();
            if !self.is_current() {
                return;
            }
        }

        if frame < self.frame_limit {
            let id = self.id;
            let generation = self.generation.clone();
            if let Err(e) = self.schedule(Duration::ZERO) {
                log::error!("Run {} stopped at frame {}: {}", id.0, frame, e);
                let mut generation = generation.borrow_mut();
                if generation.is_running(id) {
                    generation.phase = AnimationPhase::Cancelled(id);
                }
            }
        } else {
            self.generation.borrow_mut().phase = AnimationPhase::Completed(self.id);
            log::debug!("Run {} completed after {} frames", self.id.0, frame);
            if let Some(on_complete) = &self.on_complete {
                on_complete();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualScheduler;
    use std::cell::Cell;

    fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&AnimationFrame<'_>)) {
        let frames = Rc::new(RefCell::new(Vec::new()));
        let sink = frames.clone();
        (frames, move |frame: &AnimationFrame<'_>| {
            sink.borrow_mut().push(frame.formatted.clone())
        })
    }

    fn animator(frame_limit: u32) -> SpringAnimator<ManualScheduler> {
        SpringAnimator::with_config(
            ManualScheduler::new(),
            AnimatorConfig::default().frame_limit(frame_limit),
        )
    }

    #[test]
    fn test_starts_idle() {
        let animator = animator(10);
        assert_eq!(animator.phase(), AnimationPhase::Idle);
        assert!(!animator.is_running());
        assert!(!animator.cancel());
    }

    #[test]
    fn test_runs_to_frame_limit() {
        let animator = animator(10);
        let (frames, sink) = recorder();
        let completions = Rc::new(Cell::new(0));
        let counter = completions.clone();

        let id = animator
            .start(
                AnimationSpec::new("opacity", "0", "1", sink)
                    .on_complete(move || counter.set(counter.get() + 1)),
            )
            .unwrap();
        assert_eq!(animator.phase(), AnimationPhase::Running(id));

        animator.scheduler().run_until_idle(100);

        assert_eq!(frames.borrow().len(), 10);
        assert_eq!(completions.get(), 1);
        assert_eq!(animator.phase(), AnimationPhase::Completed(id));

        let expected =
            SpringState::simulate(10, &SpringConfig::DEFAULT).to_string();
        assert_eq!(frames.borrow().last(), Some(&expected));
    }

    #[test]
    fn test_one_frame_per_scheduler_frame() {
        let animator = animator(10);
        let (frames, sink) = recorder();
        animator
            .start(AnimationSpec::new("opacity", "0", "1", sink))
            .unwrap();

        animator.scheduler().run_frame();
        animator.scheduler().run_frame();
        assert_eq!(frames.borrow().len(), 2);
    }

    #[test]
    fn test_frame_reports_factor_and_unit() {
        let animator = animator(3);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        animator
            .start(
                AnimationSpec::new("transform", "translateY(0px)", "translateY(100px)", move |frame| {
                    assert_eq!(frame.css_property, "transform");
                    assert_eq!(frame.unit(), "px");
                    sink.borrow_mut().push((frame.frame, frame.factor, frame.formatted.clone()));
                })
                .spring(SpringConfig::SNAPPY),
            )
            .unwrap();
        animator.scheduler().run_until_idle(10);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        for (frame, factor, formatted) in seen.iter() {
            let expected = SpringState::simulate(*frame, &SpringConfig::SNAPPY);
            assert_eq!(*factor, expected);
            assert_eq!(*formatted, format!("translateY({}px)", 100.0 * expected));
        }
    }

    #[test]
    fn test_cancel_stops_pending_tick() {
        let animator = animator(10);
        let (frames, sink) = recorder();
        let completions = Rc::new(Cell::new(0));
        let counter = completions.clone();
        let id = animator
            .start(
                AnimationSpec::new("opacity", "0", "1", sink)
                    .on_complete(move || counter.set(counter.get() + 1)),
            )
            .unwrap();

        animator.scheduler().run_frame();
        assert!(animator.cancel());
        assert!(!animator.cancel());
        // The next tick is already queued; it must not apply anything
        assert_eq!(animator.scheduler().pending_jobs(), 1);
        animator.scheduler().run_until_idle(100);

        assert_eq!(frames.borrow().len(), 1);
        assert_eq!(completions.get(), 0);
        assert_eq!(animator.phase(), AnimationPhase::Cancelled(id));
    }

    #[test]
    fn test_restart_supersedes_previous_run() {
        let animator = animator(20);
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let counter = first.clone();
        let first_id = animator
            .start(AnimationSpec::new("opacity", "0", "1", move |_| counter.set(counter.get() + 1)))
            .unwrap();
        for _ in 0..5 {
            animator.scheduler().run_frame();
        }

        let counter = second.clone();
        let second_id = animator
            .start(AnimationSpec::new("opacity", "1", "0", move |_| counter.set(counter.get() + 1)))
            .unwrap();
        assert!(second_id > first_id);

        animator.scheduler().run_until_idle(100);
        assert_eq!(first.get(), 5);
        assert_eq!(second.get(), 20);
        assert_eq!(animator.phase(), AnimationPhase::Completed(second_id));
    }

    #[test]
    fn test_callback_can_cancel_its_own_run() {
        let animator = Rc::new(animator(50));
        let frames = Rc::new(Cell::new(0));

        let handle = Rc::downgrade(&animator);
        let counter = frames.clone();
        animator
            .start(AnimationSpec::new("opacity", "0", "1", move |frame| {
                counter.set(counter.get() + 1);
                if frame.frame == 3 {
                    if let Some(animator) = handle.upgrade() {
                        animator.cancel();
                    }
                }
            }))
            .unwrap();

        animator.scheduler().run_until_idle(100);
        assert_eq!(frames.get(), 3);
        assert!(!animator.scheduler().has_pending_jobs());
    }

    #[test]
    fn test_delay_postpones_first_frame() {
        let animator = animator(2);
        let (frames, sink) = recorder();
        animator
            .start(
                AnimationSpec::new("opacity", "0", "1", sink)
                    .delay(crate::scheduler::FRAME_INTERVAL * 3),
            )
            .unwrap();

        for _ in 0..3 {
            animator.scheduler().run_frame();
        }
        assert!(frames.borrow().is_empty());
        animator.scheduler().run_frame();
        assert_eq!(frames.borrow().len(), 1);
    }

    #[test]
    fn test_progress_fires_every_frame() {
        let animator = animator(7);
        let progress = Rc::new(Cell::new(0));
        let counter = progress.clone();
        animator
            .start(
                AnimationSpec::new("opacity", "0", "1", |_| {})
                    .on_progress(move || counter.set(counter.get() + 1)),
            )
            .unwrap();
        animator.scheduler().run_until_idle(100);
        assert_eq!(progress.get(), 7);
    }

    #[test]
    fn test_invalid_attributes_schedule_nothing() {
        let animator = animator(10);
        let err = animator
            .start(AnimationSpec::new("opacity", "auto", "1", |_| {}))
            .unwrap_err();
        assert!(matches!(err, AnimationError::InvalidAttributeValue { .. }));

        let err = animator
            .start(AnimationSpec::new("transform", "scale(1)", "rotate(2deg)", |_| {}))
            .unwrap_err();
        assert!(matches!(err, AnimationError::InvalidAttributeValue { .. }));

        assert_eq!(animator.phase(), AnimationPhase::Idle);
        assert!(!animator.scheduler().has_pending_jobs());
    }

    #[test]
    fn test_no_progress_after_frame_callback_cancels() {
        let animator = Rc::new(animator(50));
        let progress = Rc::new(Cell::new(0));
        let completions = Rc::new(Cell::new(0));

        let handle = Rc::downgrade(&animator);
        let counter = progress.clone();
        let completed = completions.clone();
        animator
            .start(
                AnimationSpec::new("opacity", "0", "1", move |frame| {
                    if frame.frame == 3 {
                        if let Some(animator) = handle.upgrade() {
                            animator.cancel();
                        }
                    }
                })
                .on_progress(move || counter.set(counter.get() + 1))
                .on_complete(move || completed.set(completed.get() + 1)),
            )
            .unwrap();

        animator.scheduler().run_until_idle(100);
        assert_eq!(progress.get(), 2);
        assert_eq!(completions.get(), 0);
        assert!(matches!(animator.phase(), AnimationPhase::Cancelled(_)));
    }

    #[test]
    fn test_out_of_range_attribute_schedules_nothing() {
        let animator = animator(10);
        let err = animator
            .start(AnimationSpec::new("width", "1e999px", "0px", |_| {}))
            .unwrap_err();
        assert!(matches!(
            err,
            AnimationError::InvalidAttributeValue {
                reason: "number out of range",
                ..
            }
        ));
        assert_eq!(animator.phase(), AnimationPhase::Idle);
        assert!(!animator.scheduler().has_pending_jobs());
    }

    #[test]
    fn test_invalid_spring_rejected() {
        let animator = animator(10);
        for spec in [
            AnimationSpec::new("opacity", "0", "1", |_| {}).stiffness(0.0),
            AnimationSpec::new("opacity", "0", "1", |_| {}).damping(-1.0),
        ] {
            let err = animator.start(spec).unwrap_err();
            assert!(matches!(err, AnimationError::InvalidSpringParameters { .. }));
        }
        assert!(!animator.scheduler().has_pending_jobs());
    }

    #[test]
    fn test_mismatched_wrappers_rejected() {
        let animator = animator(10);
        let err = animator
            .start(AnimationSpec::new("transform", "scale(1)", "translateY(10px)", |_| {}))
            .unwrap_err();
        assert_eq!(
            err,
            AnimationError::MismatchedTransform {
                start: "scale()".to_string(),
                end: "translateY()".to_string(),
            }
        );
    }

    #[test]
    fn test_failed_restart_keeps_current_run() {
        let animator = animator(10);
        let (frames, sink) = recorder();
        let id = animator
            .start(AnimationSpec::new("opacity", "0", "1", sink))
            .unwrap();
        animator.scheduler().run_frame();

        assert!(animator
            .start(AnimationSpec::new("opacity", "0", "bogus", |_| {}))
            .is_err());
        assert_eq!(animator.current_run(), Some(id));

        animator.scheduler().run_until_idle(100);
        assert_eq!(frames.borrow().len(), 10);
    }

    #[test]
    fn test_spec_overrides_default_spring_independently() {
        let spec = AnimationSpec::new("opacity", "0", "1", |_| {}).damping(20.0);
        let spring = spec.resolve_spring(SpringConfig::DEFAULT);
        assert_eq!(spring, SpringConfig::new(90.0, 20.0));
    }

    #[test]
    fn test_drop_cancels_run() {
        let scheduler = ManualScheduler::new();
        let (frames, sink) = recorder();
        {
            let animator = SpringAnimator::new(scheduler.clone());
            animator
                .start(AnimationSpec::new("opacity", "0", "1", sink))
                .unwrap();
            scheduler.run_frame();
        }
        scheduler.run_until_idle(1000);
        assert_eq!(frames.borrow().len(), 1);
    }
}
