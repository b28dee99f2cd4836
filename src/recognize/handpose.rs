//! Candle hand landmark detector
//!
//! Handles:
//! - Loading detector weights from bincode format
//! - Forward pass from a downsampled frame to keypoints
//! - Presence gating so empty frames report no hand
//!
//! The network is a two-layer MLP over a mean-pooled grayscale grid. Its
//! output row is one presence logit followed by 63 normalized coordinates;
//! presence must clear 0.5 after the sigmoid or the frame counts as empty.

use candle_core::{Device, Tensor};
use std::fs;

use crate::recognize::landmarks::{Frame, Hand, FEATURE_DIM, LANDMARK_COUNT};

/// Metadata about the detector network
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct HandposeConfig {
    /// Side of the square input grid the frame is pooled down to.
    pub input_side: usize,
    pub hidden_size: usize,
}

impl Default for HandposeConfig {
    fn default() -> Self {
        HandposeConfig {
            input_side: 32,
            hidden_size: 128,
        }
    }
}

impl HandposeConfig {
    /// Flat weight count for this shape: input layer plus output layer.
    pub fn weight_count(&self) -> usize {
        let input = self.input_side * self.input_side;
        input * self.hidden_size + self.hidden_size * (1 + FEATURE_DIM)
    }
}

/// Anything that can turn a frame into detected hands.
pub trait LandmarkDetector {
    fn detect(&self, frame: &Frame) -> Result<Vec<Hand>, Box<dyn std::error::Error>>;
}

/// Detector wrapper around the Candle forward pass
pub struct HandposeModel {
    config: HandposeConfig,
    device: Device,
    /// Input projection: (input_side^2, hidden_size)
    input_weights: Option<Tensor>,
    /// Output projection: (hidden_size, 1 + 63)
    output_weights: Option<Tensor>,
    weights_loaded: bool,
}

impl HandposeModel {
    /// Create a detector with no weights; it reports every frame as empty.
    pub fn new(config: HandposeConfig) -> Result<Self, Box<dyn std::error::Error>> {
        // Use Metal GPU on macOS, fallback to CPU
        #[cfg(target_os = "macos")]
        let device = Device::new_metal(0).unwrap_or(Device::Cpu);
        #[cfg(not(target_os = "macos"))]
        let device = Device::Cpu;

        Ok(HandposeModel {
            config,
            device,
            input_weights: None,
            output_weights: None,
            weights_loaded: false,
        })
    }

    /// Load detector weights from a bincode file. A missing or unreadable
    /// bundle leaves the detector in the no-weights state instead of failing
    /// the whole app.
    pub fn load(weights_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        // Use Metal GPU on macOS, fallback to CPU
        #[cfg(target_os = "macos")]
        let device = Device::new_metal(0).unwrap_or(Device::Cpu);
        #[cfg(not(target_os = "macos"))]
        let device = Device::Cpu;

        if !std::path::Path::new(weights_path).exists() {
            eprintln!("⚠️  Detector weights not found at: {}", weights_path);
            eprintln!("   Hand tracking will report no hands");
            return Ok(HandposeModel {
                config: HandposeConfig::default(),
                device,
                input_weights: None,
                output_weights: None,
                weights_loaded: false,
            });
        }

        let file_size = fs::metadata(weights_path)?.len();
        eprintln!(
            "📦 Loading detector from {} ({} bytes)",
            weights_path, file_size
        );

        let weights_bytes = fs::read(weights_path)?;
        match bincode::deserialize::<(HandposeConfig, Vec<f32>)>(&weights_bytes) {
            Ok((config, weights_flat)) => {
                let input_size = config.input_side * config.input_side * config.hidden_size;
                let output_size = config.hidden_size * (1 + FEATURE_DIM);

                let input_weights = if weights_flat.len() >= input_size {
                    Some(Tensor::from_slice(
                        &weights_flat[..input_size],
                        (config.input_side * config.input_side, config.hidden_size),
                        &device,
                    )?)
                } else {
                    None
                };

                let output_weights = if weights_flat.len() >= input_size + output_size {
                    let out_slice = &weights_flat[input_size..input_size + output_size];
                    Some(Tensor::from_slice(
                        out_slice,
                        (config.hidden_size, 1 + FEATURE_DIM),
                        &device,
                    )?)
                } else {
                    None
                };

                let weights_loaded = input_weights.is_some() && output_weights.is_some();
                if weights_loaded {
                    eprintln!("✅ Detector loaded successfully!");
                    eprintln!("   Input grid: {0}x{0}", config.input_side);
                    eprintln!("   Hidden size: {}", config.hidden_size);
                } else {
                    eprintln!("⚠️  Detector bundle is truncated, running without weights");
                }

                Ok(HandposeModel {
                    config,
                    device,
                    input_weights,
                    output_weights,
                    weights_loaded,
                })
            }
            Err(_) => {
                eprintln!("⚠️  Could not deserialize detector weights");
                Ok(HandposeModel {
                    config: HandposeConfig::default(),
                    device,
                    input_weights: None,
                    output_weights: None,
                    weights_loaded: false,
                })
            }
        }
    }

    /// Check if the detector has valid weights loaded
    pub fn is_loaded(&self) -> bool {
        self.weights_loaded
    }

    /// Get the detector configuration
    pub fn config(&self) -> &HandposeConfig {
        &self.config
    }

    /// Run the forward pass and decode the output row into keypoints.
    fn forward(&self, frame: &Frame) -> Result<Option<Hand>, Box<dyn std::error::Error>> {
        let input_weights = match &self.input_weights {
            Some(w) => w,
            None => return Ok(None),
        };
        let output_weights = match &self.output_weights {
            Some(w) => w,
            None => return Ok(None),
        };

        let grid = frame.downsample(self.config.input_side);
        let input = Tensor::from_slice(&grid, (1, grid.len()), &self.device)?;

        // input @ input_weights -> (1, hidden_size)
        let hidden = input.matmul(input_weights)?.relu()?;
        // hidden @ output_weights -> (1, 1 + 63)
        let logits = hidden.matmul(output_weights)?;
        let activated = candle_nn::ops::sigmoid(&logits)?;

        let rows = activated.to_vec2::<f32>()?;
        let row = match rows.first() {
            Some(r) if r.len() == 1 + FEATURE_DIM => r,
            _ => return Ok(None),
        };

        // Presence must strictly clear the threshold.
        if row[0] <= 0.5 {
            return Ok(None);
        }

        let mut landmarks = Vec::with_capacity(LANDMARK_COUNT);
        for i in 0..LANDMARK_COUNT {
            let x = row[1 + i * 3] * frame.width as f32;
            let y = row[2 + i * 3] * frame.height as f32;
            // Depth stays relative, centered on zero.
            let z = row[3 + i * 3] - 0.5;
            landmarks.push([x, y, z]);
        }
        Ok(Some(Hand { landmarks }))
    }
}

impl LandmarkDetector for HandposeModel {
    /// Detect hands in a frame. The network tracks a single hand, so the
    /// result holds at most one entry.
    fn detect(&self, frame: &Frame) -> Result<Vec<Hand>, Box<dyn std::error::Error>> {
        match self.forward(frame)? {
            Some(hand) => Ok(vec![hand]),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unloaded_detector_sees_no_hands() {
        let model = HandposeModel::new(HandposeConfig::default()).unwrap();
        assert!(!model.is_loaded());
        let hands = model.detect(&Frame::blank(64, 64)).unwrap();
        assert!(hands.is_empty());
    }

    #[test]
    fn test_missing_weights_file_falls_back() {
        let model = HandposeModel::load("/no/such/weights.bin").unwrap();
        assert!(!model.is_loaded());
    }

    #[test]
    fn test_weight_count_matches_layer_shapes() {
        let config = HandposeConfig::default();
        let expected = 32 * 32 * 128 + 128 * 64;
        assert_eq!(config.weight_count(), expected);
    }
}
