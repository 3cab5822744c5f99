//! Shared data structures for well-log zone detection
//!
//! This module defines the core types for the analysis pipeline:
//! - Input: RawRecord (loader output, metric units)
//! - Analysis unit: AnalyzedSample, collected into AnalysisMemory
//! - Dispatch: Application (quality-metric selection per use case)
//! - Output: ZoneDetectionResult, TrapPrediction, AnalysisReport

mod application;
mod sample;
mod zone;

pub use application::*;
pub use sample::*;
pub use zone::*;
