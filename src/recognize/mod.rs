//! Recognition Module: Hand detection, classification, and the capture loop
//!
//! # Components
//! - `landmarks.rs`: Frames, keypoints, and feature flattening
//! - `handpose.rs`: Candle landmark detector with presence gating
//! - `classifier.rs`: kNN sign classifier over stored examples
//! - `capture.rs`: Train/recognize session with the delayed target advance

pub mod capture;
pub mod classifier;
pub mod handpose;
pub mod landmarks;

pub use capture::{CaptureOutcome, CaptureSession, ReplayCamera, TargetToken};
pub use classifier::Prediction;
pub use handpose::HandposeModel;
pub use landmarks::{Frame, Hand};

// These are only used internally or through their defining modules
#[allow(unused_imports)]
pub use capture::FrameSource;
#[allow(unused_imports)]
pub use classifier::KnnClassifier;
#[allow(unused_imports)]
pub use handpose::{HandposeConfig, LandmarkDetector};
#[allow(unused_imports)]
pub use landmarks::{FEATURE_DIM, LANDMARK_COUNT};
