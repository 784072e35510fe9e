// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Live progress simulation for the results screen.
//!
//! Every 100 ms tick the percentage grows by 2 and, with probability 0.3,
//! a random detection box is added to a list holding the 5 most recent.
//! The boxes are cosmetic and unrelated to any result. Ticks are driven by
//! frame time, so dropping the simulation stops it.

use crate::models::analysis::{AnalysisResult, DetectionBox, QualityLabel};
use rand::Rng;
use std::collections::VecDeque;
use std::time::Duration;

pub const TICK: Duration = Duration::from_millis(100);
const PERCENT_PER_TICK: u32 = 2;
const BOX_PROBABILITY: f64 = 0.3;
pub const MAX_BOXES: usize = 5;
const INITIAL_REMAINING_SECS: f32 = 5.0;
const FINAL_DURATION_SECS: f64 = 4.2;

pub struct ProgressSimulation<R: Rng> {
    rng: R,
    percent: u32,
    remaining_secs: f32,
    boxes: VecDeque<DetectionBox>,
    pending: Duration,
    finished: bool,
}

impl<R: Rng> ProgressSimulation<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            percent: 0,
            remaining_secs: INITIAL_REMAINING_SECS,
            boxes: VecDeque::with_capacity(MAX_BOXES),
            pending: Duration::ZERO,
            finished: false,
        }
    }

    pub fn percent(&self) -> u32 {
        self.percent
    }

    pub fn remaining_secs(&self) -> f32 {
        self.remaining_secs
    }

    /// Frames reported as processed so far.
    pub fn frames_processed(&self) -> u32 {
        (self.percent as f32 * 0.3).round() as u32
    }

    pub fn boxes(&self) -> impl Iterator<Item = &DetectionBox> {
        self.boxes.iter()
    }

    /// Advance by elapsed time. Returns the final result on the tick that
    /// completes the simulation, `None` otherwise.
    pub fn advance(&mut self, elapsed: Duration) -> Option<AnalysisResult> {
        self.pending += elapsed;
        while self.pending >= TICK && !self.finished {
            self.pending -= TICK;
            if let Some(result) = self.tick() {
                return Some(result);
            }
        }
        None
    }

    /// One tick. The tick after reaching 100% completes the simulation.
    pub fn tick(&mut self) -> Option<AnalysisResult> {
        if self.finished {
            return None;
        }
        if self.percent >= 100 {
            self.finished = true;
            return Some(self.final_result());
        }

        self.percent = (self.percent + PERCENT_PER_TICK).min(100);
        self.remaining_secs = (self.remaining_secs - 0.1).max(0.0);

        if self.rng.random_bool(BOX_PROBABILITY) {
            let detection = self.random_box();
            if self.boxes.len() == MAX_BOXES {
                self.boxes.pop_front();
            }
            self.boxes.push_back(detection);
        }
        None
    }

    fn random_box(&mut self) -> DetectionBox {
        DetectionBox {
            x: self.rng.random_range(10.0..90.0),
            y: self.rng.random_range(20.0..80.0),
            width: self.rng.random_range(4.0..12.0),
            height: self.rng.random_range(4.0..12.0),
        }
    }

    fn final_result(&mut self) -> AnalysisResult {
        AnalysisResult {
            count: self.rng.random_range(10..210),
            confidence: self.rng.random_range(85.0..95.0),
            duration_seconds: FINAL_DURATION_SECS,
            quality: QualityLabel::Excellent,
        }
    }
}
