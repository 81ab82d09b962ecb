//! Mapping animation frames onto a recording.
//!
//! The figure on the page replays a participant's sway at a fixed frame
//! rate, looping after a fixed duration. Each frame is mapped to a
//! recording time, the nearest sample is looked up, and the sample's
//! deviation from the participant's mean CoP becomes the figure's offset.

use serde::{Deserialize, Serialize};

use crate::store::{ParticipantSeries, Sample};

/// Frames per second of the replay.
pub const DEFAULT_FPS: u32 = 30;
/// Length of the replay loop in seconds.
pub const DEFAULT_LOOP_SECS: u32 = 60;
/// Pixels per unit of CoP deviation.
pub const DEFAULT_SWAY_SCALE: f64 = 2500.0;

/// Frame counter to recording-time conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameClock {
    /// Frames per second, at least 1.
    pub fps: u32,
    /// Seconds before the loop restarts.
    pub loop_secs: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            loop_secs: DEFAULT_LOOP_SECS,
        }
    }
}

impl FrameClock {
    /// Frames in one loop.
    pub fn frame_count(&self) -> u64 {
        u64::from(self.fps.max(1)) * u64::from(self.loop_secs)
    }

    /// Recording time shown at `frame`.
    pub fn time_at(&self, frame: u64) -> f64 {
        frame as f64 / f64::from(self.fps.max(1))
    }

    /// Next frame, wrapping to zero at the end of the loop.
    pub fn advance(&self, frame: u64) -> u64 {
        let next = frame + 1;
        if next >= self.frame_count() {
            0
        } else {
            next
        }
    }

    /// Whole seconds elapsed at `frame`, for a time readout.
    pub fn display_seconds(&self, frame: u64) -> u64 {
        frame / u64::from(self.fps.max(1))
    }
}

/// Displacement of the figure from its resting position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SwayOffset {
    /// Horizontal offset.
    pub dx: f64,
    /// Vertical offset.
    pub dy: f64,
}

/// Offset of `sample` from the participant's mean CoP, times `scale`.
pub fn sway_offset(series: &ParticipantSeries, sample: &Sample, scale: f64) -> SwayOffset {
    SwayOffset {
        dx: (sample.cop_x - series.avg_cop_x()) * scale,
        dy: (sample.cop_y - series.avg_cop_y()) * scale,
    }
}

/// Frame-driven view of one participant's series.
#[derive(Debug, Clone, Copy)]
pub struct Playback<'a> {
    series: &'a ParticipantSeries,
    clock: FrameClock,
    scale: f64,
}

impl<'a> Playback<'a> {
    /// Replay `series` with the default clock and scale.
    pub fn new(series: &'a ParticipantSeries) -> Self {
        Self {
            series,
            clock: FrameClock::default(),
            scale: DEFAULT_SWAY_SCALE,
        }
    }

    /// Use a different clock.
    pub fn with_clock(mut self, clock: FrameClock) -> Self {
        self.clock = clock;
        self
    }

    /// Use a different offset scale.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// The clock in use.
    pub fn clock(&self) -> FrameClock {
        self.clock
    }

    /// Sample shown at `frame`.
    pub fn sample_at(&self, frame: u64) -> Option<Sample> {
        self.series.nearest(self.clock.time_at(frame))
    }

    /// Figure offset at `frame`; frame zero is the resting position.
    pub fn pose_at(&self, frame: u64) -> Option<SwayOffset> {
        if frame == 0 {
            return Some(SwayOffset::default());
        }
        let sample = self.sample_at(frame)?;
        Some(sway_offset(self.series, &sample, self.scale))
    }
}
