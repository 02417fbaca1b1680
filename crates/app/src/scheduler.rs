//! Frame scheduling for reactive playback
//!
//! The session never loops on its own. It asks a [`FrameScheduler`] for the
//! next frame and renders when that frame's handle is delivered back to
//! [`Session::tick`](crate::session::Session::tick). Cancelling a handle
//! guarantees it is never delivered.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::trace;

/// Longest pause between paced frames
const MAX_FRAME_INTERVAL: Duration = Duration::from_secs(1);

/// Identifies one requested frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

/// Source of animation frames
pub trait FrameScheduler {
    /// Request one future frame
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a requested frame; unknown handles are ignored
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Frames requested and not yet delivered or cancelled
    fn pending_frames(&self) -> usize;

    /// Take the next frame once it is due, or None if nothing is pending
    fn take_due_frame(&mut self) -> Option<FrameHandle>;
}

/// Scheduler that delivers frames only when asked
///
/// Used headless and in tests: every pending frame is due immediately.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: VecDeque<FrameHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver the oldest pending frame
    pub fn fire_next(&mut self) -> Option<FrameHandle> {
        self.pending.pop_front()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push_back(handle);
        trace!("ManualScheduler::request_frame: {:?}", handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|&pending| pending != handle);
    }

    fn pending_frames(&self) -> usize {
        self.pending.len()
    }

    fn take_due_frame(&mut self) -> Option<FrameHandle> {
        self.fire_next()
    }
}

/// Scheduler that paces frames in wall-clock time
#[derive(Debug)]
pub struct PacedScheduler {
    queue: ManualScheduler,
    interval: Duration,
    last_frame: Option<Instant>,
}

impl PacedScheduler {
    /// Pace at `frame_rate` frames per second
    ///
    /// Rates at or below zero are unpaced; rates below one frame per second
    /// are paced at one.
    pub fn new(frame_rate: f32) -> Self {
        let interval = if frame_rate > 0.0 {
            Duration::try_from_secs_f32(1.0 / frame_rate)
                .map_or(MAX_FRAME_INTERVAL, |interval| interval.min(MAX_FRAME_INTERVAL))
        } else {
            Duration::ZERO
        };
        Self {
            queue: ManualScheduler::new(),
            interval,
            last_frame: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl FrameScheduler for PacedScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.queue.request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.queue.cancel_frame(handle);
    }

    fn pending_frames(&self) -> usize {
        self.queue.pending_frames()
    }

    /// Sleeps until one interval after the previous frame
    fn take_due_frame(&mut self) -> Option<FrameHandle> {
        if self.queue.pending_frames() == 0 {
            return None;
        }
        if let Some(last) = self.last_frame {
            let due = last + self.interval;
            let now = Instant::now();
            if due > now {
                std::thread::sleep(due - now);
            }
        }
        self.last_frame = Some(Instant::now());
        self.queue.fire_next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_fifo() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.request_frame();
        let b = scheduler.request_frame();
        assert_ne!(a, b);
        assert_eq!(scheduler.pending_frames(), 2);

        assert_eq!(scheduler.fire_next(), Some(a));
        assert_eq!(scheduler.take_due_frame(), Some(b));
        assert_eq!(scheduler.fire_next(), None);
    }

    #[test]
    fn test_cancel_removes_handle() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.request_frame();
        let b = scheduler.request_frame();
        scheduler.cancel_frame(a);
        scheduler.cancel_frame(a);

        assert_eq!(scheduler.pending_frames(), 1);
        assert_eq!(scheduler.fire_next(), Some(b));
    }

    #[test]
    fn test_paced_spacing() {
        let mut scheduler = PacedScheduler::new(200.0);
        assert_eq!(scheduler.take_due_frame(), None);

        scheduler.request_frame();
        let start = Instant::now();
        assert!(scheduler.take_due_frame().is_some());
        scheduler.request_frame();
        assert!(scheduler.take_due_frame().is_some());
        assert!(start.elapsed() >= scheduler.interval());
    }

    #[test]
    fn test_paced_interval_is_clamped() {
        assert_eq!(PacedScheduler::new(4.0).interval(), Duration::from_millis(250));
        assert_eq!(PacedScheduler::new(0.25).interval(), MAX_FRAME_INTERVAL);
        // 1 / 1e-39 overflows to infinity
        assert_eq!(PacedScheduler::new(1.0e-39).interval(), MAX_FRAME_INTERVAL);
        assert_eq!(PacedScheduler::new(0.0).interval(), Duration::ZERO);
        assert_eq!(PacedScheduler::new(f32::NAN).interval(), Duration::ZERO);
    }
}
