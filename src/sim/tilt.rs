//! Tilt input
//!
//! A background thread samples the device's gravity vector at a fixed rate
//! and hands each sample to a sink (the session queue). Turning a sample
//! into a striker force happens on the session thread, so gain and polarity
//! are read from the same state the escalation engine writes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use glam::Vec3;

use crate::consts::TILT_DT;
use crate::error::TiltError;
use crate::platform::MotionSource;

/// Lateral striker force for a gravity sample.
///
/// Only the x component of gravity matters; the striker is constrained to
/// the x axis.
#[inline]
pub fn striker_force(gravity: Vec3, gain: f32, inverted: bool) -> Vec3 {
    let polarity = if inverted { -1.0 } else { 1.0 };
    Vec3::new(gravity.x * gain * polarity, 0.0, 0.0)
}

/// Start/stop sampler for a motion source
pub struct TiltPipeline {
    /// Present while stopped; moved into the thread while running
    source: Option<Box<dyn MotionSource>>,
    handle: Option<JoinHandle<Box<dyn MotionSource>>>,
    running: Arc<AtomicBool>,
    interval: Duration,
}

impl std::fmt::Debug for TiltPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiltPipeline")
            .field("running", &self.is_running())
            .field("interval", &self.interval)
            .finish()
    }
}

impl TiltPipeline {
    /// Sample at the default 60 Hz
    pub fn new(source: Box<dyn MotionSource>) -> Self {
        Self::with_interval(source, Duration::from_secs_f32(TILT_DT))
    }

    pub fn with_interval(source: Box<dyn MotionSource>, interval: Duration) -> Self {
        Self {
            source: Some(source),
            handle: None,
            running: Arc::new(AtomicBool::new(false)),
            interval,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Whether the device can drive the striker at all
    pub fn is_available(&self) -> bool {
        self.source.as_ref().is_some_and(|s| s.is_available()) || self.is_running()
    }

    /// Start sampling. `sink` receives every gravity sample on the sampling
    /// thread and returns false to stop (e.g. the receiver is gone).
    pub fn start<F>(&mut self, mut sink: F) -> Result<(), TiltError>
    where
        F: FnMut(Vec3) -> bool + Send + 'static,
    {
        if self.is_running() {
            return Err(TiltError::AlreadyRunning);
        }
        let mut source = match self.source.take() {
            Some(source) if source.is_available() => source,
            Some(source) => {
                self.source = Some(source);
                return Err(TiltError::Unavailable);
            }
            None => return Err(TiltError::Unavailable),
        };

        self.running.store(true, Ordering::Release);
        let running = Arc::clone(&self.running);
        let interval = self.interval;

        let handle = thread::Builder::new()
            .name("tilt-sampler".into())
            .spawn(move || {
                let mut next = Instant::now();
                while running.load(Ordering::Acquire) {
                    if let Some(gravity) = source.gravity() {
                        if !sink(gravity) {
                            break;
                        }
                    }
                    next += interval;
                    let now = Instant::now();
                    if next > now {
                        thread::sleep(next - now);
                    } else {
                        // Fell behind; don't try to catch up with a burst
                        next = now;
                    }
                }
                source
            })?;

        self.handle = Some(handle);
        log::info!("Tilt sampling started ({:?} interval)", interval);
        Ok(())
    }

    /// Stop sampling and wait for the thread. No-op if not running.
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        self.running.store(false, Ordering::Release);
        match handle.join() {
            Ok(source) => self.source = Some(source),
            Err(_) => log::warn!("Tilt thread panicked; motion source lost"),
        }
        log::info!("Tilt sampling stopped");
    }
}

impl Drop for TiltPipeline {
    fn drop(&mut self) {
        self.stop();
    }
}
