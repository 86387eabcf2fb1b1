//! # BPE Engines
//!
//! The merge engine is a collaborator behind the [`BpeEngine`] trait;
//! [`MergeScanBpeEngine`] is the bundled implementation.

mod bpe_engine;
mod merge_scan_engine;

pub use bpe_engine::*;
pub use merge_scan_engine::*;
