//! Keyed alpha animation for the hotspot marker

use serde::{Deserialize, Serialize};

/// Direction of a fade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fade {
    In,
    Out,
}

impl Fade {
    /// Alpha at the first key
    pub fn start_alpha(self) -> f32 {
        match self {
            Fade::In => 0.0,
            Fade::Out => 1.0,
        }
    }

    /// Alpha at the last key
    pub fn end_alpha(self) -> f32 {
        match self {
            Fade::In => 1.0,
            Fade::Out => 0.0,
        }
    }
}

/// Timing of a fade clip, expressed in animation frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FadeTiming {
    /// Frame at which the alpha key reaches its end value
    #[serde(default = "default_ramp_frames")]
    pub ramp_frames: f32,
    /// Last frame of the played range
    #[serde(default = "default_clip_frames")]
    pub clip_frames: f32,
    /// Animation frames per second
    #[serde(default = "default_frames_per_second")]
    pub frames_per_second: f32,
}

impl Default for FadeTiming {
    fn default() -> Self {
        Self {
            ramp_frames: default_ramp_frames(),
            clip_frames: default_clip_frames(),
            frames_per_second: default_frames_per_second(),
        }
    }
}

fn default_ramp_frames() -> f32 {
    2.0
}

fn default_clip_frames() -> f32 {
    30.0
}

fn default_frames_per_second() -> f32 {
    60.0
}

impl FadeTiming {
    /// Wall-clock length of the played range in seconds
    pub fn duration_secs(&self) -> f32 {
        if self.frames_per_second > 0.0 {
            self.clip_frames / self.frames_per_second
        } else {
            0.0
        }
    }
}

/// A running (or finished) fade clip.
///
/// The clip is not looped: once the played range ends the alpha holds the
/// last key value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeAnimation {
    fade: Fade,
    timing: FadeTiming,
    elapsed_frames: f32,
}

impl FadeAnimation {
    pub fn start(fade: Fade, timing: FadeTiming) -> Self {
        Self {
            fade,
            timing,
            elapsed_frames: 0.0,
        }
    }

    /// Advance by `dt` seconds and return the new alpha
    pub fn advance(&mut self, dt: f32) -> f32 {
        let step = dt.max(0.0) * self.timing.frames_per_second;
        self.elapsed_frames = (self.elapsed_frames + step).min(self.timing.clip_frames);
        self.alpha()
    }

    /// Alpha at the current frame
    pub fn alpha(&self) -> f32 {
        let progress = if self.timing.ramp_frames > 0.0 {
            (self.elapsed_frames / self.timing.ramp_frames).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let start = self.fade.start_alpha();
        start + (self.fade.end_alpha() - start) * progress
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_frames >= self.timing.clip_frames
    }
}
