// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Photo and recording state machine over the capture thread.
//!
//! ```text
//! Idle -> Active -> PhotoCaptured
//!                -> Recording -> Stopped
//! ```
//!
//! The device is held in `Active`, `Recording` and `Stopped`. Taking a
//! photo releases it; `close` releases it from any state, and so does
//! dropping the adapter.

use super::worker::CaptureWorker;
use super::{DeviceFactory, Frame, OpenOptions};
use crate::error::CaptureError;
use crate::io::media::encode_jpeg;
use crate::models::media::{MediaAsset, MediaFile, MOTION_JPEG_MIME};
use std::time::Duration;

const JPEG_QUALITY: u8 = 90;

/// How long a photo waits for the first frame of a fresh stream.
const PHOTO_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Active,
    PhotoCaptured,
    Recording,
    Stopped,
}

pub struct CaptureAdapter {
    factory: DeviceFactory,
    worker: Option<CaptureWorker>,
    state: CaptureState,
    options: OpenOptions,
    /// Latest live frame.
    last_frame: Option<Frame>,
    /// JPEG frames of the current recording.
    recorded: Vec<Vec<u8>>,
}

impl CaptureAdapter {
    pub fn new(factory: DeviceFactory) -> Self {
        Self {
            factory,
            worker: None,
            state: CaptureState::Idle,
            options: OpenOptions::default(),
            last_frame: None,
            recorded: Vec::new(),
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Whether the hardware handle is currently held.
    pub fn is_holding_device(&self) -> bool {
        self.worker.is_some()
    }

    pub fn is_recording(&self) -> bool {
        self.state == CaptureState::Recording
    }

    /// Number of frames in the current recording.
    pub fn recorded_frames(&self) -> usize {
        self.recorded.len()
    }

    /// The recording reached its length limit; further frames are dropped.
    pub fn is_recording_full(&self) -> bool {
        self.is_recording() && self.recorded.len() >= self.options.max_recorded_frames()
    }

    /// Acquire the camera. Opening an already open adapter is a no-op.
    pub fn open(&mut self, options: OpenOptions) -> Result<(), CaptureError> {
        if self.worker.is_some() {
            return Ok(());
        }
        match CaptureWorker::spawn(self.factory.clone(), options) {
            Ok(worker) => {
                self.worker = Some(worker);
                self.options = options;
                self.state = CaptureState::Active;
                log::info!("Camera active (audio: {}, {} fps)", options.want_audio, options.fps);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to open camera: {}", e);
                self.state = CaptureState::Idle;
                Err(e)
            }
        }
    }

    /// Take the frames the capture thread produced since the last call.
    /// While recording they are appended to the recording. Returns the
    /// newest frame, or `None` when nothing new arrived or the camera is
    /// not streaming. Never blocks.
    pub fn poll_frame(&mut self) -> Result<Option<&Frame>, CaptureError> {
        if !matches!(self.state, CaptureState::Active | CaptureState::Recording) {
            return Ok(None);
        }
        let Some(worker) = &self.worker else {
            return Ok(None);
        };

        let limit = self.options.max_recorded_frames();
        let mut fresh = false;
        while let Some(message) = worker.try_next() {
            let captured = message?;
            if self.state == CaptureState::Recording {
                if let Some(jpeg) = captured.jpeg {
                    if self.recorded.len() < limit {
                        self.recorded.push(jpeg);
                        if self.recorded.len() == limit {
                            log::info!("Recording reached its limit of {} frames", limit);
                        }
                    }
                }
            }
            self.last_frame = Some(captured.frame);
            fresh = true;
        }
        Ok(if fresh { self.last_frame.as_ref() } else { None })
    }

    /// Grab a still frame as a JPEG asset and release the camera.
    pub fn capture_photo(&mut self) -> Result<MediaAsset, CaptureError> {
        if self.state != CaptureState::Active {
            return Err(CaptureError::NotActive);
        }
        self.poll_frame()?;
        let frame = match self.last_frame.take() {
            Some(frame) => frame,
            None => {
                let worker = self.worker.as_ref().ok_or(CaptureError::NotActive)?;
                worker.next_within(PHOTO_TIMEOUT)?.frame
            }
        };
        let jpeg = encode_jpeg(&frame, JPEG_QUALITY).map_err(|e| CaptureError::Encode(e.to_string()))?;

        self.release();
        self.state = CaptureState::PhotoCaptured;

        let name = format!("capture-{}.jpg", chrono::Utc::now().timestamp_millis());
        log::info!("Captured photo {} ({}x{})", name, frame.width, frame.height);
        asset(name, "image/jpeg", jpeg)
    }

    pub fn start_recording(&mut self) -> Result<(), CaptureError> {
        if self.state != CaptureState::Active {
            return Err(CaptureError::NotActive);
        }
        let worker = self.worker.as_ref().ok_or(CaptureError::NotActive)?;
        worker.set_recording(true);
        self.recorded.clear();
        self.state = CaptureState::Recording;
        log::info!("Recording started");
        Ok(())
    }

    /// Finish the recording. The camera stays open until [`close`].
    ///
    /// [`close`]: CaptureAdapter::close
    pub fn stop_recording(&mut self) -> Result<MediaAsset, CaptureError> {
        if self.state != CaptureState::Recording {
            return Err(CaptureError::NotRecording);
        }
        // Keep frames already captured
        self.poll_frame()?;
        if let Some(worker) = &self.worker {
            worker.set_recording(false);
        }
        self.state = CaptureState::Stopped;

        let frames = std::mem::take(&mut self.recorded);
        let name = format!("recording-{}.mjpeg", chrono::Utc::now().timestamp_millis());
        log::info!(
            "Recording stopped: {} ({} frames at {} fps)",
            name,
            frames.len(),
            self.options.fps
        );
        asset(name, MOTION_JPEG_MIME, frames.concat())
    }

    /// Stop any recording in progress and release the camera.
    pub fn close(&mut self) {
        if self.state == CaptureState::Recording {
            log::info!("Discarding unfinished recording ({} frames)", self.recorded.len());
        }
        self.recorded.clear();
        self.release();
        self.state = CaptureState::Idle;
    }

    fn release(&mut self) {
        if let Some(mut worker) = self.worker.take() {
            worker.stop();
            log::info!("Camera released");
        }
        self.last_frame = None;
    }
}

impl Drop for CaptureAdapter {
    fn drop(&mut self) {
        self.release();
    }
}

fn asset(name: String, mime: &str, bytes: Vec<u8>) -> Result<MediaAsset, CaptureError> {
    MediaAsset::from_file(MediaFile::new(name, mime, bytes))
        .ok_or_else(|| CaptureError::Encode(format!("{mime} is not a media type")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureDevice;
    use crate::io::media::motion_jpeg_frames;
    use crate::models::media::MediaKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    #[derive(Default)]
    struct Calls {
        opens: AtomicUsize,
        stops: AtomicUsize,
        frames: AtomicUsize,
    }

    struct FakeDevice {
        calls: Arc<Calls>,
        fail_with: Option<CaptureError>,
        read_time: Duration,
    }

    impl CaptureDevice for FakeDevice {
        fn open(&mut self, _options: OpenOptions) -> Result<(), CaptureError> {
            if let Some(e) = self.fail_with.clone() {
                return Err(e);
            }
            self.calls.opens.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn frame(&mut self) -> Result<Frame, CaptureError> {
            std::thread::sleep(self.read_time);
            self.calls.frames.fetch_add(1, Ordering::SeqCst);
            Ok(Frame {
                width: 4,
                height: 2,
                rgb: vec![90; 4 * 2 * 3],
            })
        }

        fn stop(&mut self) {
            self.calls.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn factory(fail_with: Option<CaptureError>, read_time: Duration) -> (DeviceFactory, Arc<Calls>) {
        let calls = Arc::new(Calls::default());
        let shared = calls.clone();
        let factory: DeviceFactory = Arc::new(move || {
            Box::new(FakeDevice {
                calls: shared.clone(),
                fail_with: fail_with.clone(),
                read_time,
            }) as Box<dyn CaptureDevice>
        });
        (factory, calls)
    }

    fn adapter() -> (CaptureAdapter, Arc<Calls>) {
        let (factory, calls) = factory(None, Duration::ZERO);
        (CaptureAdapter::new(factory), calls)
    }

    fn fast() -> OpenOptions {
        OpenOptions {
            fps: 200,
            ..Default::default()
        }
    }

    /// Poll until `done` holds or a few seconds pass.
    fn poll_until(adapter: &mut CaptureAdapter, done: impl Fn(&CaptureAdapter) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(&*adapter) && Instant::now() < deadline {
            adapter.poll_frame().unwrap();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_record_without_photo_releases_device_on_teardown() {
        let (mut adapter, calls) = adapter();
        adapter
            .open(OpenOptions {
                want_audio: true,
                ..fast()
            })
            .unwrap();
        adapter.start_recording().unwrap();
        poll_until(&mut adapter, |a| a.recorded_frames() >= 3);
        let recording = adapter.stop_recording().unwrap();
        assert_eq!(adapter.state(), CaptureState::Stopped);
        assert!(adapter.is_holding_device());

        drop(adapter);
        assert_eq!(calls.opens.load(Ordering::SeqCst), 1);
        assert_eq!(calls.stops.load(Ordering::SeqCst), 1);

        assert_eq!(recording.kind(), MediaKind::Video);
        assert_eq!(recording.mime(), MOTION_JPEG_MIME);
        assert!(recording.name().starts_with("recording-"));
        assert!(motion_jpeg_frames(recording.bytes()).len() >= 3);
    }

    #[test]
    fn test_recording_stops_growing_at_limit() {
        let (mut adapter, _calls) = adapter();
        let options = OpenOptions {
            fps: 200,
            max_recording: Duration::from_millis(50),
            ..Default::default()
        };
        assert_eq!(options.max_recorded_frames(), 10);
        adapter.open(options).unwrap();
        adapter.start_recording().unwrap();

        poll_until(&mut adapter, CaptureAdapter::is_recording_full);
        assert!(adapter.is_recording_full());
        // Keep streaming well past the limit
        for _ in 0..20 {
            adapter.poll_frame().unwrap();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(adapter.recorded_frames(), 10);

        let recording = adapter.stop_recording().unwrap();
        assert_eq!(motion_jpeg_frames(recording.bytes()).len(), 10);
    }

    #[test]
    fn test_frames_are_paced_at_fps() {
        let (mut adapter, calls) = adapter();
        adapter
            .open(OpenOptions {
                fps: 20,
                ..Default::default()
            })
            .unwrap();
        std::thread::sleep(Duration::from_millis(500));
        adapter.close();

        // One read per 50 ms interval, not as fast as the device allows
        let reads = calls.frames.load(Ordering::SeqCst);
        assert!(reads >= 1 && reads <= 12, "read {} frames", reads);
    }

    #[test]
    fn test_poll_does_not_wait_for_slow_device() {
        let (factory, _calls) = factory(None, Duration::from_millis(300));
        let mut adapter = CaptureAdapter::new(factory);
        adapter.open(fast()).unwrap();

        let started = Instant::now();
        assert!(adapter.poll_frame().unwrap().is_none());
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn test_photo_releases_device() {
        let (mut adapter, calls) = adapter();
        adapter.open(fast()).unwrap();
        let photo = adapter.capture_photo().unwrap();

        assert_eq!(adapter.state(), CaptureState::PhotoCaptured);
        assert!(!adapter.is_holding_device());
        assert_eq!(calls.stops.load(Ordering::SeqCst), 1);
        assert_eq!(photo.mime(), "image/jpeg");
        assert!(photo.name().starts_with("capture-") && photo.name().ends_with(".jpg"));

        // Teardown does not stop a second time
        drop(adapter);
        assert_eq!(calls.stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_close_mid_recording_releases_device() {
        let (mut adapter, calls) = adapter();
        adapter.open(fast()).unwrap();
        adapter.start_recording().unwrap();
        poll_until(&mut adapter, |a| a.recorded_frames() >= 1);

        adapter.close();
        assert_eq!(adapter.state(), CaptureState::Idle);
        assert_eq!(adapter.recorded_frames(), 0);
        assert_eq!(calls.stops.load(Ordering::SeqCst), 1);
        assert!(matches!(adapter.stop_recording(), Err(CaptureError::NotRecording)));
    }

    #[test]
    fn test_open_failure_holds_nothing() {
        let (factory, calls) = factory(Some(CaptureError::PermissionDenied), Duration::ZERO);
        let mut adapter = CaptureAdapter::new(factory);

        assert_eq!(adapter.open(OpenOptions::default()), Err(CaptureError::PermissionDenied));
        assert_eq!(adapter.state(), CaptureState::Idle);
        assert!(!adapter.is_holding_device());
        assert!(matches!(adapter.capture_photo(), Err(CaptureError::NotActive)));
        assert!(matches!(adapter.poll_frame(), Ok(None)));

        drop(adapter);
        assert_eq!(calls.stops.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_invalid_transitions() {
        let (mut adapter, calls) = adapter();
        assert!(matches!(adapter.start_recording(), Err(CaptureError::NotActive)));
        assert!(matches!(adapter.stop_recording(), Err(CaptureError::NotRecording)));

        adapter.open(fast()).unwrap();
        // Second open keeps the existing handle
        adapter.open(fast()).unwrap();
        assert_eq!(calls.opens.load(Ordering::SeqCst), 1);

        adapter.start_recording().unwrap();
        assert!(matches!(adapter.capture_photo(), Err(CaptureError::NotActive)));
        // Frames are not taken once the recording stopped
        adapter.stop_recording().unwrap();
        assert!(matches!(adapter.poll_frame(), Ok(None)));
    }
}
