// ============================================================================
// Frame Scheduling
// ============================================================================

pub mod event_loop;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use crate::error::Result;

pub use event_loop::CalloopScheduler;

/// Interval between frames on a 60Hz display
pub const FRAME_INTERVAL: Duration = Duration::from_nanos(16_666_667);

/// A tick queued for a future frame
pub type FrameCallback = Box<dyn FnOnce() + 'static>;

/// Source of per-frame ticks.
///
/// Each request runs its callback exactly once, no earlier than `delay` from
/// now and never within the frame that requested it. Callbacks requested for
/// the same frame run in request order.
pub trait FrameScheduler {
    fn request_frame(&self, delay: Duration, callback: FrameCallback) -> Result<()>;
}

/// A pending tick
struct Job {
    due: Duration,
    callback: FrameCallback,
}

struct FrameQueue {
    now: Duration,
    frame_interval: Duration,
    jobs: VecDeque<Job>,
}

/// Scheduler driven by explicit `run_frame` calls against a virtual clock.
///
/// Used for headless stepping and tests. Clones share the same queue.
#[derive(Clone)]
pub struct ManualScheduler {
    queue: Rc<RefCell<FrameQueue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::with_frame_interval(FRAME_INTERVAL)
    }

    pub fn with_frame_interval(frame_interval: Duration) -> Self {
        Self {
            queue: Rc::new(RefCell::new(FrameQueue {
                now: Duration::ZERO,
                frame_interval,
                jobs: VecDeque::new(),
            })),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Duration {
        self.queue.borrow().now
    }

    /// Number of ticks waiting to run
    pub fn pending_jobs(&self) -> usize {
        self.queue.borrow().jobs.len()
    }

    /// Check if there are pending ticks
    pub fn has_pending_jobs(&self) -> bool {
        !self.queue.borrow().jobs.is_empty()
    }

    /// Run every tick that is due, then advance the clock by one frame.
    /// Ticks requested while this frame runs wait for a later frame.
    /// Returns the number of ticks run.
    pub fn run_frame(&self) -> usize {
        let due = self.drain_due_jobs();
        let count = due.len();
        for job in due {
            (job.callback)();
        }

        let mut queue = self.queue.borrow_mut();
        let interval = queue.frame_interval;
        queue.now += interval;
        count
    }

    /// Run frames until no ticks remain or `max_frames` frames have run.
    /// Returns the number of frames run.
    pub fn run_until_idle(&self, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && self.has_pending_jobs() {
            self.run_frame();
            frames += 1;
        }
        frames
    }

    fn drain_due_jobs(&self) -> Vec<Job> {
        let mut queue = self.queue.borrow_mut();
        let now = queue.now;
        let (due, waiting): (VecDeque<Job>, VecDeque<Job>) =
            std::mem::take(&mut queue.jobs)
                .into_iter()
                .partition(|job| job.due <= now);
        queue.jobs = waiting;
        due.into_iter().collect()
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, delay: Duration, callback: FrameCallback) -> Result<()> {
        let mut queue = self.queue.borrow_mut();
        let due = queue.now + delay;
        queue.jobs.push_back(Job { due, callback });
        Ok(())
    }
}
