//! Explicit frame loop for non-browser hosts.
//!
//! A [`RunLoop`] ticks an [`Animation`] once per frame, paced by a
//! [`FrameScheduler`], until its [`StopSignal`] fires or an optional frame
//! limit is reached. Frames never overlap: each tick returns before the next
//! one is scheduled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::animation::Animation;
use crate::error::DriftError;
use crate::surface::Surface;

/// Decides when the next frame may start.
pub trait FrameScheduler {
    /// Blocks until the next frame is due.
    fn wait_for_next_frame(&mut self);
}

/// Runs frames back to back with no pacing. Used for headless rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl FrameScheduler for Immediate {
    fn wait_for_next_frame(&mut self) {}
}

/// Paces frames on a fixed interval, like a display refresh.
///
/// If a frame overruns one or more intervals, the missed boundaries are
/// skipped rather than queued; the next frame starts at the next boundary.
#[derive(Debug, Clone)]
pub struct FixedRate {
    interval: Duration,
    next_deadline: Option<Instant>,
}

impl FixedRate {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_deadline: None,
        }
    }

    /// A scheduler ticking `fps` times per second. `fps` of 0 is treated as 1.
    pub fn per_second(fps: u32) -> Self {
        Self::new(Duration::from_secs(1) / fps.max(1))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// First boundary strictly after `now`, given the previous deadline.
    fn next_boundary(&self, deadline: Instant, now: Instant) -> Instant {
        if now < deadline || self.interval.is_zero() {
            return deadline.max(now);
        }
        let behind = now.duration_since(deadline).as_nanos();
        let step = self.interval.as_nanos();
        // A stall too long to count in whole intervals restarts the grid at `now`.
        u32::try_from(behind / step + 1)
            .ok()
            .and_then(|skipped| self.interval.checked_mul(skipped))
            .and_then(|offset| deadline.checked_add(offset))
            .unwrap_or(now + self.interval)
    }
}

impl FrameScheduler for FixedRate {
    fn wait_for_next_frame(&mut self) {
        let now = Instant::now();
        let deadline = match self.next_deadline {
            None => now + self.interval,
            Some(d) => self.next_boundary(d, now),
        };
        if let Some(wait) = deadline.checked_duration_since(now) {
            std::thread::sleep(wait);
        }
        self.next_deadline = Some(deadline + self.interval);
    }
}

/// Cloneable flag that ends a [`RunLoop`] after the current frame.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Drives an animation frame by frame.
pub struct RunLoop<S: FrameScheduler> {
    scheduler: S,
    stop: StopSignal,
    max_frames: Option<u64>,
}

impl<S: FrameScheduler> RunLoop<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            stop: StopSignal::new(),
            max_frames: None,
        }
    }

    /// Stops after `frames` frames have been produced by this loop.
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Handle for stopping the loop, from a callback or another thread.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Runs until stopped or until the frame limit is reached.
    ///
    /// `after_frame` is called with the animation's frame number and the
    /// surface after every draw. Returns the number of frames this call
    /// produced. The first error from a draw or from `after_frame` ends the
    /// loop and is returned.
    pub fn run<A, T, F>(
        &mut self,
        animation: &mut A,
        surface: &mut T,
        mut after_frame: F,
    ) -> Result<u64, DriftError>
    where
        A: Animation + ?Sized,
        T: Surface,
        F: FnMut(u64, &T) -> Result<(), DriftError>,
    {
        log::info!("run loop started (limit: {:?})", self.max_frames);
        let mut produced = 0u64;
        while !self.stop.is_stopped() && self.max_frames.map_or(true, |max| produced < max) {
            animation.tick(&mut *surface)?;
            produced += 1;
            after_frame(animation.frame(), &*surface)?;
            if self.stop.is_stopped() || self.max_frames == Some(produced) {
                break;
            }
            self.scheduler.wait_for_next_frame();
        }
        log::info!("run loop stopped after {produced} frames");
        Ok(produced)
    }
}
