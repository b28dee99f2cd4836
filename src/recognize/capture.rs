//! Capture, train, and recognize loop
//!
//! Handles:
//! - Frame acquisition through the `FrameSource` seam
//! - Training the classifier on the current practice target
//! - Recognition with a delayed, token-guarded target advance
//! - Dataset persistence after every successful training capture
//!
//! The session owns its camera, detector, classifier, and store; nothing
//! here touches globals. Drivers schedule the advance delay themselves: a
//! correct recognition arms a `TargetToken`, and `advance_target` honors it
//! only while the same target life is still current. Skipping, clearing, or
//! releasing bumps the generation, so late timers fall on the floor.

use std::fs;
use std::path::{Path, PathBuf};

use crate::content;
use crate::recognize::classifier::{KnnClassifier, Prediction};
use crate::recognize::handpose::LandmarkDetector;
use crate::recognize::landmarks::{Frame, Hand};
use crate::storage::{LocalStore, DATASET_KEY};

/// How long a correct recognition keeps showing before the target advances.
pub const TARGET_ADVANCE_DELAY_MS: u64 = 2000;

/// Anything that can hand out camera frames.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>>;
}

/// Frame source that replays serialized frames from a directory, looping
/// forever in file-name order.
pub struct ReplayCamera {
    frames: Vec<PathBuf>,
    cursor: usize,
}

impl ReplayCamera {
    /// Open a replay directory. At least one `.frame` file must be present.
    pub fn open(dir: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let mut frames = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("frame") {
                frames.push(path);
            }
        }
        frames.sort();
        if frames.is_empty() {
            return Err(format!("no .frame files in {}", dir.display()).into());
        }
        Ok(ReplayCamera { frames, cursor: 0 })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for ReplayCamera {
    fn next_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
        let bytes = fs::read(&self.frames[self.cursor])?;
        let frame: Frame = bincode::deserialize(&bytes)?;
        self.cursor = (self.cursor + 1) % self.frames.len();
        Ok(frame)
    }
}

/// What one train or recognize attempt produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Example stored and persisted; count is the label's new total.
    Trained { label: String, examples: usize },
    /// Prediction matched the current target.
    Correct { label: String },
    /// Prediction named some other sign.
    Incorrect { detected: String },
    /// Detector saw no hand in the frame.
    NoHand,
    /// Recognition needs at least one trained example.
    EmptyClassifier,
    /// Camera or detector is not attached.
    NotReady,
}

/// Token armed by a correct recognition. Skips, clears, and releases bump
/// the generation, making older tokens stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetToken {
    generation: u64,
}

/// One practice session against the letter targets.
pub struct CaptureSession {
    detector: Option<Box<dyn LandmarkDetector>>,
    camera: Option<Box<dyn FrameSource>>,
    classifier: KnnClassifier,
    store: LocalStore,
    targets: Vec<char>,
    target_index: usize,
    last_prediction: Option<Prediction>,
    pending: Option<TargetToken>,
    generation: u64,
}

impl CaptureSession {
    /// Session over the default practice letters; attach a camera and a
    /// detector before capturing.
    pub fn new(store: LocalStore) -> Self {
        CaptureSession {
            detector: None,
            camera: None,
            classifier: KnnClassifier::new(),
            store,
            targets: content::PRACTICE_LETTERS.to_vec(),
            target_index: 0,
            last_prediction: None,
            pending: None,
            generation: 0,
        }
    }

    pub fn attach_detector(&mut self, detector: Box<dyn LandmarkDetector>) {
        self.detector = Some(detector);
    }

    pub fn attach_camera(&mut self, camera: Box<dyn FrameSource>) {
        self.camera = Some(camera);
    }

    pub fn has_detector(&self) -> bool {
        self.detector.is_some()
    }

    pub fn has_camera(&self) -> bool {
        self.camera.is_some()
    }

    /// Both resources attached.
    pub fn is_ready(&self) -> bool {
        self.detector.is_some() && self.camera.is_some()
    }

    /// Restore previously trained examples from the store. Returns how many
    /// labels are loaded afterwards; a missing or damaged snapshot restores
    /// none.
    pub fn initialize(&mut self) -> Result<usize, Box<dyn std::error::Error>> {
        if let Some(snapshot) = self.store.load_dataset() {
            self.classifier.import(snapshot)?;
        }
        Ok(self.classifier.num_labels())
    }

    /// Grab one frame and run detection. Ok(None) means the frame held no
    /// hand; errors mean a resource failed.
    fn capture_features(&mut self) -> Result<Option<Vec<f32>>, Box<dyn std::error::Error>> {
        let camera = self.camera.as_mut().ok_or("no camera attached")?;
        let detector = self.detector.as_ref().ok_or("no detector attached")?;

        let frame = camera.next_frame()?;
        let hands = detector.detect(&frame)?;
        Ok(hands.first().map(|hand| hand.features()))
    }

    /// Capture the current frame as a training example for the current
    /// target, then persist the whole dataset. Nothing is written when no
    /// hand is visible.
    pub fn train_current(&mut self) -> Result<CaptureOutcome, Box<dyn std::error::Error>> {
        if !self.is_ready() {
            return Ok(CaptureOutcome::NotReady);
        }
        let features = match self.capture_features()? {
            Some(f) => f,
            None => return Ok(CaptureOutcome::NoHand),
        };

        let label = self.current_target().to_string();
        let examples = self.classifier.add_example(&label, &features)?;
        self.persist()?;
        Ok(CaptureOutcome::Trained { label, examples })
    }

    /// Capture the current frame and classify it against the trained
    /// examples. A correct answer arms the delayed target advance once; the
    /// armed token survives further recognitions until it is spent or
    /// invalidated. A detection miss changes nothing, the last prediction
    /// included.
    pub fn recognize(&mut self) -> Result<CaptureOutcome, Box<dyn std::error::Error>> {
        if !self.is_ready() {
            return Ok(CaptureOutcome::NotReady);
        }
        if self.classifier.is_empty() {
            return Ok(CaptureOutcome::EmptyClassifier);
        }
        let features = match self.capture_features()? {
            Some(f) => f,
            None => return Ok(CaptureOutcome::NoHand),
        };

        let prediction = match self.classifier.predict(&features)? {
            Some(p) => p,
            None => return Ok(CaptureOutcome::EmptyClassifier),
        };
        let label = prediction.label.clone();
        self.last_prediction = Some(prediction);

        if label == self.current_target().to_string() {
            if self.pending.is_none() {
                self.pending = Some(TargetToken {
                    generation: self.generation,
                });
            }
            Ok(CaptureOutcome::Correct { label })
        } else {
            Ok(CaptureOutcome::Incorrect { detected: label })
        }
    }

    /// The armed delayed advance, if any.
    pub fn pending_advance(&self) -> Option<TargetToken> {
        self.pending
    }

    /// Apply the delayed advance. Returns false and changes nothing when the
    /// token is stale.
    pub fn advance_target(&mut self, token: TargetToken) -> bool {
        match self.pending {
            Some(armed) if armed == token && token.generation == self.generation => {}
            _ => return false,
        }
        self.pending = None;
        self.step_target();
        true
    }

    /// Jump to the next target by hand, abandoning any armed advance.
    pub fn skip_target(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.step_target();
    }

    fn step_target(&mut self) {
        self.target_index = (self.target_index + 1) % self.targets.len();
        self.last_prediction = None;
    }

    /// Forget every trained example, in memory and on disk.
    pub fn clear_dataset(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.classifier.clear();
        self.store.remove(DATASET_KEY)?;
        self.generation += 1;
        self.pending = None;
        self.last_prediction = None;
        Ok(())
    }

    /// Grab a frame with its detections for the live preview. Failures here
    /// just skip the preview update.
    pub fn overlay_frame(&mut self) -> Option<(Frame, Vec<Hand>)> {
        if !self.is_ready() {
            return None;
        }
        let camera = self.camera.as_mut()?;
        let frame = camera.next_frame().ok()?;
        let hands = self
            .detector
            .as_ref()
            .and_then(|d| d.detect(&frame).ok())
            .unwrap_or_default();
        Some((frame, hands))
    }

    /// Drop the camera and invalidate any armed advance. The trained
    /// examples stay loaded.
    pub fn release(&mut self) {
        self.camera = None;
        self.generation += 1;
        self.pending = None;
    }

    fn persist(&self) -> Result<(), Box<dyn std::error::Error>> {
        let snapshot = self.classifier.export()?;
        self.store.save_dataset(&snapshot)
    }

    pub fn current_target(&self) -> char {
        self.targets[self.target_index]
    }

    pub fn targets(&self) -> &[char] {
        &self.targets
    }

    pub fn target_index(&self) -> usize {
        self.target_index
    }

    pub fn last_prediction(&self) -> Option<&Prediction> {
        self.last_prediction.as_ref()
    }

    pub fn example_count(&self, label: &str) -> usize {
        self.classifier.example_count(label)
    }

    pub fn total_examples(&self) -> usize {
        self.classifier.total_examples()
    }

    pub fn trained_labels(&self) -> Vec<String> {
        self.classifier.labels()
    }
}
