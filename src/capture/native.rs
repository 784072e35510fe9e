// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Native camera backend built on `nokhwa`.
//!
//! Runs on the capture thread; `Camera` never leaves it.

use super::{CaptureDevice, Frame, OpenOptions};
use crate::error::CaptureError;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::{Camera, NokhwaError};

pub struct NokhwaDevice {
    index: u32,
    camera: Option<Camera>,
}

impl NokhwaDevice {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            camera: None,
        }
    }
}

impl CaptureDevice for NokhwaDevice {
    fn open(&mut self, options: OpenOptions) -> Result<(), CaptureError> {
        if options.want_audio {
            // Recordings are video-only
            log::debug!("Audio requested, the camera backend records video frames only");
        }

        let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(Resolution::new(1280, 720), FrameFormat::MJPEG, options.fps.max(1)),
        ));
        let mut camera = Camera::new(CameraIndex::Index(self.index), format).map_err(classify)?;
        camera.open_stream().map_err(classify)?;

        log::info!(
            "Opened camera {} at {}x{} @ {} fps",
            self.index,
            camera.resolution().width(),
            camera.resolution().height(),
            camera.frame_rate()
        );
        self.camera = Some(camera);
        Ok(())
    }

    fn frame(&mut self) -> Result<Frame, CaptureError> {
        let camera = self.camera.as_mut().ok_or(CaptureError::NotActive)?;
        let buffer = camera.frame().map_err(classify)?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CaptureError::Encode(e.to_string()))?;
        Ok(Frame {
            width: decoded.width(),
            height: decoded.height(),
            rgb: decoded.into_raw(),
        })
    }

    fn stop(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                log::warn!("Failed to stop camera stream: {}", e);
            }
            log::info!("Released camera {}", self.index);
        }
    }
}

/// Map backend errors onto the two user-facing conditions.
fn classify(error: NokhwaError) -> CaptureError {
    let message = error.to_string();
    let lower = message.to_lowercase();
    if lower.contains("permission") || lower.contains("denied") || lower.contains("not authorized") {
        CaptureError::PermissionDenied
    } else {
        CaptureError::DeviceUnavailable(message)
    }
}
