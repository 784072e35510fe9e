// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Simulated analysis: engine, background runner and progress animation.

pub mod engine;
pub mod progress;
pub mod runner;
