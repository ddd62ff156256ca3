use std::time::Duration;

use calloop::timer::{TimeoutAction, Timer};
use calloop::LoopHandle;

use super::{FrameCallback, FrameScheduler, FRAME_INTERVAL};
use crate::error::{AnimationError, Result};

/// Scheduler that turns frame requests into one-shot calloop timers.
///
/// A request with no delay fires one frame interval later, so each tick lands
/// on a later loop iteration than the one that asked for it.
pub struct CalloopScheduler<Data: 'static> {
    handle: LoopHandle<'static, Data>,
    frame_interval: Duration,
}

impl<Data: 'static> CalloopScheduler<Data> {
    pub fn new(handle: LoopHandle<'static, Data>) -> Self {
        Self::with_frame_interval(handle, FRAME_INTERVAL)
    }

    pub fn with_frame_interval(handle: LoopHandle<'static, Data>, frame_interval: Duration) -> Self {
        Self {
            handle,
            frame_interval,
        }
    }
}

// Not derived: `Data` itself need not be Clone
impl<Data: 'static> Clone for CalloopScheduler<Data> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            frame_interval: self.frame_interval,
        }
    }
}

impl<Data: 'static> FrameScheduler for CalloopScheduler<Data> {
    fn request_frame(&self, delay: Duration, callback: FrameCallback) -> Result<()> {
        let timeout = delay.max(self.frame_interval);
        let mut callback = Some(callback);

        self.handle
            .insert_source(Timer::from_duration(timeout), move |_, _, _| {
                if let Some(callback) = callback.take() {
                    callback();
                }
                TimeoutAction::Drop
            })
            .map(|_| ())
            .map_err(|e| AnimationError::Schedule(e.error.to_string()))
    }
}
