// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background execution of analysis requests.
//!
//! The runner owns the "analyzing" flag. A request runs on a worker thread
//! and reports through a channel that the UI polls once per frame. Only
//! one request may be in flight; dropping the runner cancels it.

use super::engine::{AnalysisEngine, CancelToken};
use crate::error::AnalysisError;
use crate::models::analysis::AnalysisResult;
use crate::models::media::MediaAsset;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;

/// A finished request and the asset it was made for.
#[derive(Debug)]
pub struct Completed {
    pub asset: MediaAsset,
    pub outcome: Result<AnalysisResult, AnalysisError>,
}

struct InFlight {
    asset: MediaAsset,
    cancel: CancelToken,
    receiver: Receiver<Result<AnalysisResult, AnalysisError>>,
}

pub struct AnalysisRunner {
    engine: Arc<dyn AnalysisEngine>,
    in_flight: Option<InFlight>,
}

impl AnalysisRunner {
    pub fn new(engine: Arc<dyn AnalysisEngine>) -> Self {
        Self {
            engine,
            in_flight: None,
        }
    }

    pub fn is_analyzing(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Start analyzing `asset` in the background.
    ///
    /// Without an asset this fails with [`AnalysisError::InvalidArgument`]
    /// and nothing is started.
    pub fn start(&mut self, asset: Option<&MediaAsset>) -> Result<(), AnalysisError> {
        if self.is_analyzing() {
            return Err(AnalysisError::Busy);
        }
        let asset = asset.ok_or(AnalysisError::InvalidArgument)?.clone();

        let (sender, receiver) = channel();
        let cancel = CancelToken::new();
        let engine = Arc::clone(&self.engine);
        let worker_asset = asset.clone();
        let worker_cancel = cancel.clone();

        std::thread::spawn(move || {
            let outcome = engine.analyze(Some(&worker_asset), &worker_cancel);
            let _ = sender.send(outcome);
        });

        log::info!("Started analysis of {}", asset.name());
        self.in_flight = Some(InFlight {
            asset,
            cancel,
            receiver,
        });
        Ok(())
    }

    /// Collect the outcome of the in-flight request if it has finished.
    pub fn poll(&mut self) -> Option<Completed> {
        let in_flight = self.in_flight.as_ref()?;
        let outcome = match in_flight.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            // Worker went away without reporting
            Err(TryRecvError::Disconnected) => Err(AnalysisError::Cancelled),
        };
        let in_flight = self.in_flight.take()?;
        match &outcome {
            Ok(result) => log::info!(
                "Analysis of {} finished: {} cells, {:.1}% confidence",
                in_flight.asset.name(),
                result.count,
                result.confidence
            ),
            Err(e) => log::error!("Analysis of {} failed: {}", in_flight.asset.name(), e),
        }
        Some(Completed {
            asset: in_flight.asset,
            outcome,
        })
    }

    /// Cancel the in-flight request; its outcome is discarded.
    pub fn cancel(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.cancel.cancel();
            log::info!("Cancelled analysis of {}", in_flight.asset.name());
        }
    }
}

impl Drop for AnalysisRunner {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::engine::FixedEngine;
    use crate::models::analysis::QualityLabel;
    use crate::models::media::MediaFile;
    use std::time::{Duration, Instant};

    const RESULT: AnalysisResult = AnalysisResult {
        count: 42,
        confidence: 90.0,
        duration_seconds: 3.0,
        quality: QualityLabel::Good,
    };

    fn runner(delay: Duration) -> AnalysisRunner {
        AnalysisRunner::new(Arc::new(FixedEngine {
            result: RESULT,
            delay,
        }))
    }

    fn asset() -> MediaAsset {
        MediaAsset::from_file(MediaFile::new("clip.mp4", "video/mp4", vec![0u8; 4])).unwrap()
    }

    fn wait_for(runner: &mut AnalysisRunner) -> Completed {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(done) = runner.poll() {
                return done;
            }
            assert!(Instant::now() < deadline, "analysis did not finish");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_start_without_asset_never_sets_analyzing() {
        let mut runner = runner(Duration::ZERO);
        assert_eq!(runner.start(None), Err(AnalysisError::InvalidArgument));
        assert!(!runner.is_analyzing());
        assert!(runner.poll().is_none());
    }

    #[test]
    fn test_completes_with_engine_result() {
        let mut runner = runner(Duration::ZERO);
        let asset = asset();
        runner.start(Some(&asset)).unwrap();
        assert!(runner.is_analyzing());

        let done = wait_for(&mut runner);
        assert_eq!(done.outcome, Ok(RESULT));
        assert_eq!(done.asset.id(), asset.id());
        assert!(!runner.is_analyzing());
    }

    #[test]
    fn test_reentry_is_refused_while_busy() {
        let mut runner = runner(Duration::from_secs(30));
        let asset = asset();
        runner.start(Some(&asset)).unwrap();
        assert_eq!(runner.start(Some(&asset)), Err(AnalysisError::Busy));
        assert!(runner.is_analyzing());

        runner.cancel();
        assert!(!runner.is_analyzing());
        // Free again once the previous request is cancelled
        assert!(runner.start(Some(&asset)).is_ok());
    }
}
