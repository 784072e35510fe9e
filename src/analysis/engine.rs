// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Analysis engines.
//!
//! [`AnalysisEngine`] is the seam a real inference backend would plug
//! into. [`MockAnalysisEngine`] never looks at the media: it waits a fixed
//! delay and returns random values of the right shape.

use crate::error::AnalysisError;
use crate::models::analysis::{AnalysisResult, QualityLabel};
use crate::models::media::MediaAsset;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Artificial processing delay of the mock engine.
pub const SIMULATED_DELAY: Duration = Duration::from_millis(1000);

/// Granularity at which a waiting engine checks for cancellation.
const CANCEL_POLL: Duration = Duration::from_millis(25);

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub trait AnalysisEngine: Send + Sync {
    /// Analyze `asset`. Fails with [`AnalysisError::InvalidArgument`] when
    /// no asset is given and with [`AnalysisError::Cancelled`] when `cancel`
    /// fires first.
    fn analyze(
        &self,
        asset: Option<&MediaAsset>,
        cancel: &CancelToken,
    ) -> Result<AnalysisResult, AnalysisError>;
}

pub struct MockAnalysisEngine {
    delay: Duration,
    rng: Mutex<StdRng>,
}

impl Default for MockAnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAnalysisEngine {
    pub fn new() -> Self {
        Self {
            delay: SIMULATED_DELAY,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Reproducible engine for tests.
    #[cfg(test)]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            delay: SIMULATED_DELAY,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    #[cfg(test)]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl AnalysisEngine for MockAnalysisEngine {
    fn analyze(
        &self,
        asset: Option<&MediaAsset>,
        cancel: &CancelToken,
    ) -> Result<AnalysisResult, AnalysisError> {
        let asset = asset.ok_or(AnalysisError::InvalidArgument)?;
        log::debug!("Simulating analysis of {}", asset.name());

        wait(self.delay, cancel)?;

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(random_result(&mut *rng))
    }
}

/// Random result: count in [10, 210), confidence in [85, 95), duration
/// 2.5 s plus up to 2 s of jitter, uniform quality.
pub fn random_result<R: Rng + ?Sized>(rng: &mut R) -> AnalysisResult {
    AnalysisResult {
        count: rng.random_range(10..210),
        confidence: rng.random_range(85.0..95.0),
        duration_seconds: 2.5 + rng.random_range(0.0..2.0),
        quality: QualityLabel::ALL[rng.random_range(0..QualityLabel::ALL.len())],
    }
}

fn wait(delay: Duration, cancel: &CancelToken) -> Result<(), AnalysisError> {
    let deadline = Instant::now() + delay;
    loop {
        if cancel.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(());
        }
        std::thread::sleep(CANCEL_POLL.min(deadline - now));
    }
}

/// Deterministic engine for tests: returns a fixed result after an
/// optional delay.
#[cfg(test)]
pub struct FixedEngine {
    pub result: AnalysisResult,
    pub delay: Duration,
}

#[cfg(test)]
impl AnalysisEngine for FixedEngine {
    fn analyze(
        &self,
        asset: Option<&MediaAsset>,
        cancel: &CancelToken,
    ) -> Result<AnalysisResult, AnalysisError> {
        asset.ok_or(AnalysisError::InvalidArgument)?;
        wait(self.delay, cancel)?;
        Ok(self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::MediaFile;

    fn asset() -> MediaAsset {
        MediaAsset::from_file(MediaFile::new("sample.jpg", "image/jpeg", vec![0u8; 4])).unwrap()
    }

    #[test]
    fn test_missing_asset_is_invalid_argument() {
        let engine = MockAnalysisEngine::with_seed(1).with_delay(Duration::ZERO);
        assert_eq!(
            engine.analyze(None, &CancelToken::new()),
            Err(AnalysisError::InvalidArgument)
        );
    }

    #[test]
    fn test_results_stay_in_range() {
        let engine = MockAnalysisEngine::with_seed(42).with_delay(Duration::ZERO);
        let asset = asset();
        let cancel = CancelToken::new();

        for _ in 0..1000 {
            let result = engine.analyze(Some(&asset), &cancel).unwrap();
            assert!((10..210).contains(&result.count), "count {}", result.count);
            assert!(
                (85.0..95.0).contains(&result.confidence),
                "confidence {}",
                result.confidence
            );
            assert!((2.5..4.5).contains(&result.duration_seconds));
            assert!(QualityLabel::ALL.contains(&result.quality));
        }
    }

    #[test]
    fn test_all_quality_labels_occur() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(random_result(&mut rng).quality);
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn test_cancel_interrupts_delay() {
        let engine = MockAnalysisEngine::with_seed(3).with_delay(Duration::from_secs(30));
        let cancel = CancelToken::new();
        cancel.cancel();

        let started = Instant::now();
        assert_eq!(
            engine.analyze(Some(&asset()), &cancel),
            Err(AnalysisError::Cancelled)
        );
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_delay_is_honored() {
        let engine = MockAnalysisEngine::with_seed(5).with_delay(Duration::from_millis(60));
        let started = Instant::now();
        engine.analyze(Some(&asset()), &CancelToken::new()).unwrap();
        assert!(started.elapsed() >= Duration::from_millis(60));
    }
}
