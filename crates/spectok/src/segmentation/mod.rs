//! # Special-Token Segmentation
//!
//! Splits text into plain spans, bound for the BPE engine, and
//! special-token references, which bypass it.

mod special_segmentor;

pub use special_segmentor::*;
