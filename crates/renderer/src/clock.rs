//! Animation clock behind the time uniform.
//!
//! The frame renderer reads the clock once per tick and derives every
//! image's shader time from that shared sample: each image is offset by a
//! fixed stagger times its discovery index, image 0 anchored at the
//! unstaggered value, so the wall animates out of phase.

use std::time::Instant;

/// Seconds added to the time uniform per discovery index.
const STAGGER_SECONDS: f32 = 1.5;

/// One per-tick clock reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Seconds since the session started.
    pub seconds: f32,
    /// Ticks rendered so far this session.
    pub frame_index: u64,
}

impl TimeSample {
    /// Shader time for the image at `image_index`.
    pub fn staggered(&self, image_index: usize) -> f32 {
        self.seconds + STAGGER_SECONDS * image_index as f32
    }
}

/// Supplies per-tick samples to the frame renderer.
pub trait TimeSource: Send {
    fn sample(&mut self) -> TimeSample;
}

/// Wall-clock source counting from construction.
#[derive(Debug)]
pub struct SystemTimeSource {
    started: Instant,
    ticks: u64,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            ticks: 0,
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn sample(&mut self) -> TimeSample {
        let sample = TimeSample {
            seconds: self.started.elapsed().as_secs_f32(),
            frame_index: self.ticks,
        };
        self.ticks = self.ticks.saturating_add(1);
        sample
    }
}

/// Pinned clock for deterministic uniform tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource {
    seconds: f32,
}

impl FixedTimeSource {
    pub fn new(seconds: f32) -> Self {
        Self { seconds }
    }
}

impl TimeSource for FixedTimeSource {
    fn sample(&mut self) -> TimeSample {
        TimeSample {
            seconds: self.seconds,
            frame_index: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_source_counts_ticks() {
        let mut source = SystemTimeSource::new();
        assert_eq!(source.sample().frame_index, 0);
        assert_eq!(source.sample().frame_index, 1);
    }

    #[test]
    fn stagger_offsets_each_image_by_its_index() {
        let mut source = FixedTimeSource::new(2.0);
        let sample = source.sample();
        assert_eq!(sample.staggered(0), 2.0);
        assert_eq!(sample.staggered(1), 3.5);
        assert_eq!(sample.staggered(3), 6.5);
        // Pinned: a later sample reads the same.
        assert_eq!(source.sample(), sample);
    }
}
