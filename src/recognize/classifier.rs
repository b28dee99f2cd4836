//! k-nearest-neighbor sign classifier
//!
//! Holds:
//! - One example matrix per label, rows are 63-value feature vectors
//! - Squared-euclidean nearest neighbor voting with k capped at 3
//! - Export/import of the example set for persistence
//!
//! Ties between labels with equal votes go to the label owning the nearest
//! neighbor among them, so a given dataset and query always produce the same
//! answer.

use candle_core::{Device, Tensor};
use rustc_hash::FxHashMap;

use crate::recognize::landmarks::FEATURE_DIM;

/// Neighbors consulted per prediction, capped by the dataset size.
pub const K_NEIGHBORS: usize = 3;

/// Serializable example matrix for one label.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct StoredTensor {
    pub data: Vec<f32>,
    /// (example rows, feature columns)
    pub shape: (usize, usize),
}

/// Winning label plus the vote share every known label received.
#[derive(Clone, Debug)]
pub struct Prediction {
    pub label: String,
    pub confidences: FxHashMap<String, f32>,
}

/// In-memory kNN model over per-label Candle tensors.
pub struct KnnClassifier {
    device: Device,
    examples: FxHashMap<String, Tensor>,
}

impl KnnClassifier {
    pub fn new() -> Self {
        // Use Metal GPU on macOS, fallback to CPU
        #[cfg(target_os = "macos")]
        let device = Device::new_metal(0).unwrap_or(Device::Cpu);
        #[cfg(not(target_os = "macos"))]
        let device = Device::Cpu;

        KnnClassifier {
            device,
            examples: FxHashMap::default(),
        }
    }

    /// Append one example row under a label. Returns the label's new example
    /// count.
    pub fn add_example(
        &mut self,
        label: &str,
        features: &[f32],
    ) -> Result<usize, Box<dyn std::error::Error>> {
        if features.len() != FEATURE_DIM {
            return Err(format!(
                "expected {} features, got {}",
                FEATURE_DIM,
                features.len()
            )
            .into());
        }

        let row = Tensor::from_slice(features, (1, FEATURE_DIM), &self.device)?;
        let merged = match self.examples.get(label) {
            Some(existing) => Tensor::cat(&[existing, &row], 0)?,
            None => row,
        };
        let count = merged.dim(0)?;
        self.examples.insert(label.to_string(), merged);
        Ok(count)
    }

    /// Vote among the k nearest stored examples. Returns None when the
    /// dataset is empty.
    pub fn predict(
        &self,
        features: &[f32],
    ) -> Result<Option<Prediction>, Box<dyn std::error::Error>> {
        if self.examples.is_empty() {
            return Ok(None);
        }
        if features.len() != FEATURE_DIM {
            return Err(format!(
                "expected {} features, got {}",
                FEATURE_DIM,
                features.len()
            )
            .into());
        }

        let query = Tensor::from_slice(features, (1, FEATURE_DIM), &self.device)?;

        // Squared distances from the query to every stored row.
        let mut neighbors: Vec<(f32, &str)> = Vec::new();
        for (label, rows) in &self.examples {
            let diff = rows.broadcast_sub(&query)?;
            let distances = diff.sqr()?.sum(1)?.to_vec1::<f32>()?;
            for d in distances {
                neighbors.push((d, label.as_str()));
            }
        }
        neighbors.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let k = K_NEIGHBORS.min(neighbors.len());
        let mut votes: FxHashMap<&str, usize> = FxHashMap::default();
        for (_, label) in &neighbors[..k] {
            *votes.entry(label).or_insert(0) += 1;
        }
        let max_votes = votes.values().copied().max().unwrap_or(0);

        // Nearest neighbor among the top-voted labels breaks ties.
        let mut winner = neighbors[0].1;
        for (_, label) in &neighbors[..k] {
            if votes.get(label) == Some(&max_votes) {
                winner = label;
                break;
            }
        }

        let mut confidences: FxHashMap<String, f32> = self
            .examples
            .keys()
            .map(|label| (label.clone(), 0.0))
            .collect();
        for (label, count) in votes {
            confidences.insert(label.to_string(), count as f32 / k as f32);
        }

        Ok(Some(Prediction {
            label: winner.to_string(),
            confidences,
        }))
    }

    pub fn example_count(&self, label: &str) -> usize {
        self.examples
            .get(label)
            .and_then(|t| t.dim(0).ok())
            .unwrap_or(0)
    }

    pub fn total_examples(&self) -> usize {
        self.examples
            .values()
            .filter_map(|t| t.dim(0).ok())
            .sum()
    }

    pub fn num_labels(&self) -> usize {
        self.examples.len()
    }

    /// Known labels in sorted order.
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.examples.keys().cloned().collect();
        labels.sort();
        labels
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    /// Drop every stored example.
    pub fn clear(&mut self) {
        self.examples.clear();
    }

    /// Snapshot the example set in its serializable form.
    pub fn export(&self) -> Result<FxHashMap<String, StoredTensor>, Box<dyn std::error::Error>> {
        let mut out = FxHashMap::default();
        for (label, rows) in &self.examples {
            let shape = (rows.dim(0)?, rows.dim(1)?);
            let data: Vec<f32> = rows.to_vec2::<f32>()?.into_iter().flatten().collect();
            out.insert(label.clone(), StoredTensor { data, shape });
        }
        Ok(out)
    }

    /// Replace the example set from a snapshot. Entries whose shape does not
    /// line up with their data are skipped rather than poisoning the rest.
    /// Returns the number of labels restored.
    pub fn import(
        &mut self,
        snapshot: FxHashMap<String, StoredTensor>,
    ) -> Result<usize, Box<dyn std::error::Error>> {
        self.examples.clear();
        let mut restored = 0;
        for (label, stored) in snapshot {
            let (rows, cols) = stored.shape;
            if cols != FEATURE_DIM || rows == 0 || stored.data.len() != rows * cols {
                eprintln!("⚠️  Skipping malformed examples for '{}'", label);
                continue;
            }
            let tensor = Tensor::from_slice(&stored.data, (rows, cols), &self.device)?;
            self.examples.insert(label, tensor);
            restored += 1;
        }
        Ok(restored)
    }
}

impl Default for KnnClassifier {
    fn default() -> Self {
        KnnClassifier::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feat(value: f32) -> Vec<f32> {
        vec![value; FEATURE_DIM]
    }

    #[test]
    fn test_empty_classifier_predicts_none() {
        let classifier = KnnClassifier::new();
        assert!(classifier.predict(&feat(0.5)).unwrap().is_none());
    }

    #[test]
    fn test_single_label_wins_with_full_confidence() {
        let mut classifier = KnnClassifier::new();
        classifier.add_example("A", &feat(0.1)).unwrap();
        classifier.add_example("A", &feat(0.2)).unwrap();
        classifier.add_example("A", &feat(0.3)).unwrap();

        let prediction = classifier.predict(&feat(0.2)).unwrap().unwrap();
        assert_eq!(prediction.label, "A");
        assert_eq!(prediction.confidences.get("A"), Some(&1.0));
    }

    #[test]
    fn test_nearest_label_wins() {
        let mut classifier = KnnClassifier::new();
        for v in [0.0, 0.05, 0.1] {
            classifier.add_example("A", &feat(v)).unwrap();
        }
        for v in [0.9, 0.95, 1.0] {
            classifier.add_example("B", &feat(v)).unwrap();
        }

        let near_b = classifier.predict(&feat(0.92)).unwrap().unwrap();
        assert_eq!(near_b.label, "B");
        assert_eq!(near_b.confidences.get("B"), Some(&1.0));
        assert_eq!(near_b.confidences.get("A"), Some(&0.0));
    }

    #[test]
    fn test_majority_overrules_single_nearest() {
        // One B sits exactly on the query but two nearby A rows outvote it.
        let mut classifier = KnnClassifier::new();
        classifier.add_example("B", &feat(0.5)).unwrap();
        classifier.add_example("A", &feat(0.52)).unwrap();
        classifier.add_example("A", &feat(0.54)).unwrap();
        classifier.add_example("A", &feat(0.9)).unwrap();

        let prediction = classifier.predict(&feat(0.5)).unwrap().unwrap();
        assert_eq!(prediction.label, "A");
        let a = prediction.confidences.get("A").copied().unwrap();
        let b = prediction.confidences.get("B").copied().unwrap();
        assert!((a - 2.0 / 3.0).abs() < 1e-6);
        assert!((b - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_vote_tie_goes_to_nearest_neighbor() {
        // Two labels, one example each: k=2, one vote apiece.
        let mut classifier = KnnClassifier::new();
        classifier.add_example("A", &feat(0.2)).unwrap();
        classifier.add_example("B", &feat(0.8)).unwrap();

        let prediction = classifier.predict(&feat(0.3)).unwrap().unwrap();
        assert_eq!(prediction.label, "A");
        assert_eq!(prediction.confidences.get("A"), Some(&0.5));
        assert_eq!(prediction.confidences.get("B"), Some(&0.5));
    }

    #[test]
    fn test_add_example_rejects_wrong_dimension() {
        let mut classifier = KnnClassifier::new();
        assert!(classifier.add_example("A", &[0.5; 10]).is_err());
        assert!(classifier.is_empty());
    }

    #[test]
    fn test_export_import_restores_predictions() {
        let mut classifier = KnnClassifier::new();
        classifier.add_example("A", &feat(0.1)).unwrap();
        classifier.add_example("B", &feat(0.9)).unwrap();
        classifier.add_example("B", &feat(0.8)).unwrap();

        let snapshot = classifier.export().unwrap();
        let mut restored = KnnClassifier::new();
        let labels = restored.import(snapshot).unwrap();

        assert_eq!(labels, 2);
        assert_eq!(restored.num_labels(), classifier.num_labels());
        assert_eq!(restored.example_count("A"), 1);
        assert_eq!(restored.example_count("B"), 2);
        assert_eq!(restored.predict(&feat(0.85)).unwrap().unwrap().label, "B");
    }

    #[test]
    fn test_import_skips_malformed_entries() {
        let mut snapshot: FxHashMap<String, StoredTensor> = FxHashMap::default();
        snapshot.insert(
            "good".to_string(),
            StoredTensor {
                data: feat(0.4),
                shape: (1, FEATURE_DIM),
            },
        );
        snapshot.insert(
            "bad".to_string(),
            StoredTensor {
                data: vec![0.1; 7],
                shape: (1, FEATURE_DIM),
            },
        );

        let mut classifier = KnnClassifier::new();
        let restored = classifier.import(snapshot).unwrap();
        assert_eq!(restored, 1);
        assert_eq!(classifier.labels(), vec!["good".to_string()]);
    }
}
