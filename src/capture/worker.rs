// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Capture thread.
//!
//! The thread builds the device, opens it, and then reads one frame per
//! interval until it is told to stop. Frames go to the UI over a bounded
//! channel; when the UI falls behind, new frames are dropped. While the
//! recording flag is set each frame is JPEG-encoded on the thread.

use super::{CaptureDevice, DeviceFactory, Frame, OpenOptions};
use crate::error::CaptureError;
use crate::io::media::encode_jpeg;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const JPEG_QUALITY: u8 = 90;

/// One frame read by the capture thread.
pub struct Captured {
    pub frame: Frame,
    /// Encoded frame, present while recording.
    pub jpeg: Option<Vec<u8>>,
}

pub type Message = Result<Captured, CaptureError>;

pub struct CaptureWorker {
    stop_flag: Arc<AtomicBool>,
    recording: Arc<AtomicBool>,
    frames: Option<Receiver<Message>>,
    thread: Option<JoinHandle<()>>,
}

impl CaptureWorker {
    /// Start the capture thread and wait until the device is open.
    pub fn spawn(factory: DeviceFactory, options: OpenOptions) -> Result<Self, CaptureError> {
        let stop_flag = Arc::new(AtomicBool::new(false));
        let recording = Arc::new(AtomicBool::new(false));
        let (opened_tx, opened_rx) = mpsc::sync_channel(1);
        let (frame_tx, frame_rx) = mpsc::sync_channel(options.fps.max(1) as usize);

        let thread = {
            let stop_flag = stop_flag.clone();
            let recording = recording.clone();
            thread::spawn(move || {
                let mut device = (*factory)();
                let opened = device.open(options);
                let ok = opened.is_ok();
                let _ = opened_tx.send(opened);
                if ok {
                    run_capture_loop(device.as_mut(), options.fps, frame_tx, &stop_flag, &recording);
                    device.stop();
                }
            })
        };

        let opened = opened_rx.recv().unwrap_or_else(|_| {
            Err(CaptureError::DeviceUnavailable(
                "capture thread exited before opening the camera".to_string(),
            ))
        });
        match opened {
            Ok(()) => Ok(Self {
                stop_flag,
                recording,
                frames: Some(frame_rx),
                thread: Some(thread),
            }),
            Err(e) => {
                let _ = thread.join();
                Err(e)
            }
        }
    }

    pub fn set_recording(&self, on: bool) {
        self.recording.store(on, Ordering::Relaxed);
    }

    /// Next frame without blocking.
    pub fn try_next(&self) -> Option<Message> {
        let frames = self.frames.as_ref()?;
        match frames.try_recv() {
            Ok(message) => Some(message),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(stream_ended())),
        }
    }

    /// Next frame, waiting at most `timeout`.
    pub fn next_within(&self, timeout: Duration) -> Message {
        let frames = self.frames.as_ref().ok_or(CaptureError::NotActive)?;
        match frames.recv_timeout(timeout) {
            Ok(message) => message,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(CaptureError::DeviceUnavailable(
                "no frame from the camera".to_string(),
            )),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(stream_ended()),
        }
    }

    /// Stop the thread and wait until it released the device.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        // Unblocks a thread waiting on a full channel
        self.frames = None;
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Capture thread panicked");
            }
        }
    }
}

impl Drop for CaptureWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn stream_ended() -> CaptureError {
    CaptureError::DeviceUnavailable("camera stream ended".to_string())
}

fn run_capture_loop(
    device: &mut dyn CaptureDevice,
    fps: u32,
    frames: SyncSender<Message>,
    stop_flag: &AtomicBool,
    recording: &AtomicBool,
) {
    let interval = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
    log::info!("Capture thread running at {} fps", fps.max(1));

    loop {
        if stop_flag.load(Ordering::Relaxed) {
            break;
        }
        let started = Instant::now();

        let message = device.frame().and_then(|frame| {
            let jpeg = if recording.load(Ordering::Relaxed) {
                Some(encode_jpeg(&frame, JPEG_QUALITY).map_err(|e| CaptureError::Encode(e.to_string()))?)
            } else {
                None
            };
            Ok(Captured { frame, jpeg })
        });

        let captured = match message {
            Ok(captured) => captured,
            Err(e) => {
                log::error!("Camera read failed: {}", e);
                let _ = frames.send(Err(e));
                break;
            }
        };
        match frames.try_send(Ok(captured)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => log::debug!("UI behind, dropped a camera frame"),
            Err(TrySendError::Disconnected(_)) => break,
        }

        if let Some(rest) = interval.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }
    log::info!("Capture thread stopping");
}
