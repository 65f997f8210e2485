//! Platform abstraction layer
//!
//! Device sensors the core reads from. Real devices plug in a
//! `MotionSource`; desktop builds and tests use the scripted source.

use std::collections::VecDeque;

use glam::Vec3;

/// Source of device gravity vectors (in g, device axes)
pub trait MotionSource: Send {
    /// Whether the device has a motion sensor at all
    fn is_available(&self) -> bool;

    /// Latest gravity sample, or `None` if no new reading is ready
    fn gravity(&mut self) -> Option<Vec3>;
}

/// Replays a fixed list of samples, then holds the last one
#[derive(Debug, Clone, Default)]
pub struct ScriptedMotion {
    samples: VecDeque<Vec3>,
    last: Option<Vec3>,
    available: bool,
}

impl ScriptedMotion {
    pub fn new(samples: impl IntoIterator<Item = Vec3>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
            last: None,
            available: true,
        }
    }

    /// Always reports the same tilt
    pub fn constant(gravity: Vec3) -> Self {
        Self::new([gravity])
    }

    /// A device without a motion sensor
    pub fn unavailable() -> Self {
        Self::default()
    }
}

impl MotionSource for ScriptedMotion {
    fn is_available(&self) -> bool {
        self.available
    }

    fn gravity(&mut self) -> Option<Vec3> {
        if let Some(next) = self.samples.pop_front() {
            self.last = Some(next);
        }
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_holds_last_sample() {
        let mut motion = ScriptedMotion::new([Vec3::X, Vec3::Y]);
        assert_eq!(motion.gravity(), Some(Vec3::X));
        assert_eq!(motion.gravity(), Some(Vec3::Y));
        assert_eq!(motion.gravity(), Some(Vec3::Y));
    }

    #[test]
    fn test_unavailable_has_no_samples() {
        let mut motion = ScriptedMotion::unavailable();
        assert!(!motion.is_available());
        assert_eq!(motion.gravity(), None);
    }
}
