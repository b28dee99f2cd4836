//! Frames and hand landmarks
//!
//! Shared geometry for the recognition pipeline:
//! - `Frame`: a grayscale camera image
//! - `Hand`: 21 detected keypoints with feature flattening
//!
//! A hand flattens to 63 features (21 points, x/y/z each) in keypoint order.
//! Every stage of the pipeline agrees on that layout, from detector output
//! through stored examples to classifier queries.

/// Keypoints reported per detected hand.
pub const LANDMARK_COUNT: usize = 21;
/// Flattened feature length: x, y, z per keypoint.
pub const FEATURE_DIM: usize = LANDMARK_COUNT * 3;

/// One grayscale camera frame, row-major, values in 0.0..=1.0.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub luma: Vec<f32>,
}

impl Frame {
    /// An all-black frame.
    pub fn blank(width: usize, height: usize) -> Self {
        Frame {
            width,
            height,
            luma: vec![0.0; width * height],
        }
    }

    /// Mean-pool down to a `side` x `side` grid, row-major. This is the
    /// fixed-size input the detector consumes regardless of camera
    /// resolution.
    pub fn downsample(&self, side: usize) -> Vec<f32> {
        let mut out = vec![0.0; side * side];
        if self.width == 0 || self.height == 0 || side == 0 {
            return out;
        }
        for (cell, value) in out.iter_mut().enumerate() {
            let cy = cell / side;
            let cx = cell % side;
            let y0 = cy * self.height / side;
            let y1 = (((cy + 1) * self.height) / side).max(y0 + 1).min(self.height);
            let x0 = cx * self.width / side;
            let x1 = (((cx + 1) * self.width) / side).max(x0 + 1).min(self.width);

            let mut sum = 0.0;
            let mut count = 0usize;
            for y in y0..y1 {
                for x in x0..x1 {
                    sum += self.luma[y * self.width + x];
                    count += 1;
                }
            }
            if count > 0 {
                *value = sum / count as f32;
            }
        }
        out
    }
}

/// One detected hand: keypoints in pixel coordinates, z relative.
#[derive(Clone, Debug)]
pub struct Hand {
    pub landmarks: Vec<[f32; 3]>,
}

impl Hand {
    /// Flatten to the 63-value feature row every consumer expects.
    pub fn features(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(FEATURE_DIM);
        for point in &self.landmarks {
            out.extend_from_slice(point);
        }
        out
    }

    /// Axis-aligned box around the keypoints: (min_x, min_y, max_x, max_y).
    pub fn bounding_box(&self) -> (f32, f32, f32, f32) {
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for point in &self.landmarks {
            min_x = min_x.min(point[0]);
            min_y = min_y.min(point[1]);
            max_x = max_x.max(point[0]);
            max_y = max_y.max(point[1]);
        }
        if self.landmarks.is_empty() {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            (min_x, min_y, max_x, max_y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_with(points: &[[f32; 3]]) -> Hand {
        Hand {
            landmarks: points.to_vec(),
        }
    }

    #[test]
    fn test_features_flatten_in_keypoint_order() {
        let hand = hand_with(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        assert_eq!(hand.features(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_full_hand_feature_dim() {
        let hand = hand_with(&[[0.5, 0.5, 0.0]; LANDMARK_COUNT]);
        assert_eq!(hand.features().len(), FEATURE_DIM);
    }

    #[test]
    fn test_bounding_box_spans_keypoints() {
        let hand = hand_with(&[[10.0, 40.0, 0.0], [30.0, 20.0, 0.0], [25.0, 35.0, 0.0]]);
        assert_eq!(hand.bounding_box(), (10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn test_downsample_averages_cells() {
        // 4x4 frame with the left half lit: 2x2 grid keeps the split.
        let mut frame = Frame::blank(4, 4);
        for y in 0..4 {
            for x in 0..2 {
                frame.luma[y * 4 + x] = 1.0;
            }
        }
        let grid = frame.downsample(2);
        assert_eq!(grid, vec![1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_downsample_handles_non_divisible_sizes() {
        let frame = Frame::blank(5, 3);
        let grid = frame.downsample(2);
        assert_eq!(grid.len(), 4);
        assert!(grid.iter().all(|&v| v == 0.0));
    }
}
