// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Camera capture.
//!
//! [`CaptureDevice`] abstracts the camera hardware. The device lives on a
//! capture thread that reads frames at a fixed rate; [`CaptureAdapter`]
//! drives that thread through the photo/recording state machine and
//! guarantees the device is released on every exit path.

mod adapter;
#[cfg(feature = "camera")]
mod native;
mod worker;

pub use adapter::{CaptureAdapter, CaptureState};

use crate::error::CaptureError;
use std::sync::Arc;
use std::time::Duration;

/// Longest recording kept; frames past it are dropped.
pub const MAX_RECORDING: Duration = Duration::from_secs(30);

/// One RGB8 frame from the camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

/// Options for opening the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOptions {
    /// Request microphone access along with the camera.
    pub want_audio: bool,
    /// Frames read per second; also the playback rate of recordings.
    pub fps: u32,
    /// Recording length limit.
    pub max_recording: Duration,
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            want_audio: false,
            fps: 30,
            max_recording: MAX_RECORDING,
        }
    }
}

impl OpenOptions {
    /// Frame budget of one recording.
    pub fn max_recorded_frames(&self) -> usize {
        ((self.fps.max(1) as f64 * self.max_recording.as_secs_f64()).ceil() as usize).max(1)
    }
}

/// Camera hardware access. A device is created, used and dropped on the
/// capture thread.
pub trait CaptureDevice {
    /// Acquire the device. Called only while the device is not held.
    fn open(&mut self, options: OpenOptions) -> Result<(), CaptureError>;

    /// Grab the next frame from an open device.
    fn frame(&mut self) -> Result<Frame, CaptureError>;

    /// Release the device. Called exactly once per successful `open`.
    fn stop(&mut self);
}

/// Device used when the binary is built without camera support.
#[cfg(not(feature = "camera"))]
struct NoCamera;

#[cfg(not(feature = "camera"))]
impl CaptureDevice for NoCamera {
    fn open(&mut self, _options: OpenOptions) -> Result<(), CaptureError> {
        Err(CaptureError::DeviceUnavailable(
            "built without camera support (enable the `camera` feature)".to_string(),
        ))
    }

    fn frame(&mut self) -> Result<Frame, CaptureError> {
        Err(CaptureError::NotActive)
    }

    fn stop(&mut self) {}
}

/// Builds a device on the capture thread.
pub type DeviceFactory = Arc<dyn Fn() -> Box<dyn CaptureDevice> + Send + Sync>;

/// The platform camera: the first device reported by the OS.
pub fn default_camera() -> DeviceFactory {
    #[cfg(feature = "camera")]
    {
        Arc::new(|| Box::new(native::NokhwaDevice::new(0)) as Box<dyn CaptureDevice>)
    }
    #[cfg(not(feature = "camera"))]
    {
        Arc::new(|| Box::new(NoCamera) as Box<dyn CaptureDevice>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_frame_budget() {
        let options = OpenOptions {
            fps: 30,
            ..Default::default()
        };
        assert_eq!(options.max_recorded_frames(), 900);

        let short = OpenOptions {
            fps: 0,
            max_recording: Duration::ZERO,
            ..Default::default()
        };
        assert_eq!(short.max_recorded_frames(), 1);
    }
}
