use crate::constants::{IMAGE_NORMALIZATION_OFFSET, IMAGE_NORMALIZATION_SCALE};
use crate::utils::safe_cast::usize_to_i32;
use crate::Result;
use ndarray::{Array2, Array4, CowArray};
use opencv::core::{Mat, Rect, Scalar, Size, CV_32F};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::prelude::*;
use ort::{Environment, Session, Value};
use std::path::Path;
use std::sync::Arc;

/// Default palm detector input size
const DEFAULT_DETECTOR_INPUT_SIZE: i32 = 192;

/// Anchor grid strides and anchors-per-cell of the SSD head
const ANCHOR_LAYERS: [(i32, usize); 2] = [(8, 2), (16, 6)];

/// Hand detection result
#[derive(Debug, Clone)]
pub struct HandDetection {
    /// Bounding box of the detected hand in frame coordinates
    pub bbox: Rect,
    /// Confidence score of the detection
    pub score: f32,
}

/// Palm detector using `ONNX` Runtime.
///
/// Wraps an SSD-style palm detection model: a fixed anchor grid over the
/// input, one score and one center-offset/size box per anchor.
pub struct HandDetector {
    session: Session,
    input_size: (i32, i32),
    conf_threshold: f32,
    nms_threshold: f32,
    anchors: Array2<f32>,
}

impl HandDetector {
    /// Create a new palm detector from an `ONNX` model file
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be loaded or the ONNX runtime
    /// environment cannot be created.
    pub fn new<P: AsRef<Path>>(model_path: P, conf_threshold: f32, nms_threshold: f32) -> Result<Self> {
        log::info!(
            "Initializing HandDetector with model: {}",
            model_path.as_ref().display()
        );
        let environment = Arc::new(
            Environment::builder()
                .with_name("hand_detector")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        let input_meta = session
            .inputs
            .first()
            .ok_or_else(|| crate::error::Error::ModelInputError("Model has no inputs".to_string()))?;

        // Input shape is [batch, channels, height, width]
        let input_shape = &input_meta.dimensions;
        let input_size = if input_shape.len() >= 4 {
            let height = input_shape[2].unwrap_or(192) as i32;
            let width = input_shape[3].unwrap_or(192) as i32;
            (width, height)
        } else {
            (DEFAULT_DETECTOR_INPUT_SIZE, DEFAULT_DETECTOR_INPUT_SIZE)
        };

        let anchors = Self::generate_anchors(input_size);

        Ok(Self {
            session,
            input_size,
            conf_threshold,
            nms_threshold,
            anchors,
        })
    }

    /// Detect hands in a frame.
    ///
    /// Returns detections sorted by descending confidence after NMS, in
    /// frame pixel coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing, inference, or output decoding
    /// fails.
    pub fn detect(&self, frame: &Mat) -> Result<Vec<HandDetection>> {
        let frame_width = frame.cols();
        let frame_height = frame.rows();
        if frame_width <= 0 || frame_height <= 0 {
            return Ok(Vec::new());
        }

        // Letterbox into the square model input, keeping aspect ratio
        let (input_width, input_height) = self.input_size;
        let scale = (input_width as f32 / frame_width as f32).min(input_height as f32 / frame_height as f32);
        let scaled_width = (frame_width as f32 * scale) as i32;
        let scaled_height = (frame_height as f32 * scale) as i32;

        let mut resized = Mat::default();
        imgproc::resize(
            frame,
            &mut resized,
            Size::new(scaled_width, scaled_height),
            0.0,
            0.0,
            InterpolationFlags::INTER_LINEAR as i32,
        )?;

        let mut input_img = Mat::new_rows_cols_with_default(
            input_height,
            input_width,
            opencv::core::CV_8UC3,
            Scalar::all(0.0),
        )?;
        let mut roi = input_img.roi_mut(Rect::new(0, 0, scaled_width, scaled_height))?;
        resized.copy_to(&mut roi)?;

        let inputs = self.preprocess(&input_img)?;
        let (scores, boxes) = self.forward(inputs)?;
        self.postprocess(&scores, &boxes, scale)
    }

    /// Preprocess the letterboxed image for the model
    #[allow(clippy::cast_sign_loss)] // OpenCV dimensions are positive
    fn preprocess(&self, image: &Mat) -> Result<Array4<f32>> {
        let mut rgb_image = Mat::default();
        imgproc::cvt_color(image, &mut rgb_image, imgproc::COLOR_BGR2RGB, 0)?;

        let mut float_image = Mat::default();
        rgb_image.convert_to(&mut float_image, CV_32F, 1.0, 0.0)?;

        let height = float_image.rows() as usize;
        let width = float_image.cols() as usize;
        let channels = 3;

        let mut data = vec![0.0f32; height * width * channels];
        for row in 0..height {
            for col in 0..width {
                let pixel = float_image.at_2d::<opencv::core::Vec3f>(usize_to_i32(row)?, usize_to_i32(col)?)?;
                for ch in 0..channels {
                    let idx = (row * width + col) * channels + ch;
                    data[idx] = (pixel[ch] - IMAGE_NORMALIZATION_OFFSET) / IMAGE_NORMALIZATION_SCALE;
                }
            }
        }

        let array = Array4::from_shape_vec((1, height, width, channels), data)
            .map_err(|e| crate::error::Error::ModelError(format!("Failed to create array: {e}")))?;

        // NHWC to NCHW
        Ok(array.permuted_axes([0, 3, 1, 2]))
    }

    /// Run forward pass, returning (score logits, raw box regressions)
    fn forward(&self, inputs: Array4<f32>) -> Result<(Vec<f32>, Vec<f32>)> {
        let cow_array = CowArray::from(inputs.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;

        let outputs = self.session.run(vec![input_tensor])?;
        if outputs.len() < 2 {
            return Err(crate::error::Error::ModelOutputError(format!(
                "Expected scores and boxes outputs, got {}",
                outputs.len()
            )));
        }

        let mut scores = None;
        let mut boxes = None;
        for output in outputs {
            let tensor = output.try_extract::<f32>()?;
            let view = tensor.view();
            let last_dim = view.shape().last().copied().unwrap_or(0);
            let data = view
                .as_slice()
                .ok_or_else(|| crate::error::Error::ModelOutputError("Failed to get output data".to_string()))?
                .to_vec();
            // The scores head ends in a singleton dimension, the box head
            // carries the per-anchor regression vector
            if last_dim == 1 {
                scores = Some(data);
            } else {
                boxes = Some(data);
            }
        }

        match (scores, boxes) {
            (Some(s), Some(b)) => Ok((s, b)),
            _ => Err(crate::error::Error::ModelOutputError(
                "Model outputs missing scores or boxes".to_string(),
            )),
        }
    }

    /// Decode anchors, threshold, apply NMS and map back to frame space
    fn postprocess(&self, scores: &[f32], boxes: &[f32], det_scale: f32) -> Result<Vec<HandDetection>> {
        let n_anchors = self.anchors.shape()[0];
        let box_stride = boxes.len() / n_anchors.max(1);
        if box_stride < 4 {
            return Err(crate::error::Error::ModelOutputError(format!(
                "Box regression stride {box_stride} too small"
            )));
        }

        let mut candidates: Vec<(f32, [f32; 4])> = Vec::new();
        for i in 0..n_anchors.min(scores.len()) {
            let score = sigmoid(scores[i]);
            if score < self.conf_threshold {
                continue;
            }

            let ax = self.anchors[[i, 0]];
            let ay = self.anchors[[i, 1]];
            let cx = ax + boxes[i * box_stride];
            let cy = ay + boxes[i * box_stride + 1];
            let w = boxes[i * box_stride + 2];
            let h = boxes[i * box_stride + 3];

            candidates.push((score, [cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0]));
        }

        candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        let keep = self.nms(&candidates);

        Ok(keep
            .into_iter()
            .map(|i| {
                let (score, b) = candidates[i];
                let bbox = Rect::new(
                    (b[0] / det_scale) as i32,
                    (b[1] / det_scale) as i32,
                    ((b[2] - b[0]) / det_scale) as i32,
                    ((b[3] - b[1]) / det_scale) as i32,
                );
                HandDetection { bbox, score }
            })
            .collect())
    }

    /// Greedy IoU non-maximum suppression over score-sorted candidates
    fn nms(&self, candidates: &[(f32, [f32; 4])]) -> Vec<usize> {
        let mut keep = Vec::new();
        let mut order: Vec<usize> = (0..candidates.len()).collect();

        while let Some(&i) = order.first() {
            keep.push(i);
            let a = candidates[i].1;
            let area_a = (a[2] - a[0]).max(0.0) * (a[3] - a[1]).max(0.0);

            order = order
                .into_iter()
                .skip(1)
                .filter(|&j| {
                    let b = candidates[j].1;
                    let area_b = (b[2] - b[0]).max(0.0) * (b[3] - b[1]).max(0.0);
                    let w = (a[2].min(b[2]) - a[0].max(b[0])).max(0.0);
                    let h = (a[3].min(b[3]) - a[1].max(b[1])).max(0.0);
                    let inter = w * h;
                    let union = area_a + area_b - inter;
                    union <= 0.0 || inter / union <= self.nms_threshold
                })
                .collect();
        }

        keep
    }

    /// Anchor centers in input pixels for the fixed layer layout
    #[allow(clippy::cast_precision_loss)] // Grid coordinates are small
    fn generate_anchors(input_size: (i32, i32)) -> Array2<f32> {
        let (input_width, input_height) = input_size;
        let mut centers = Vec::new();

        for &(stride, per_cell) in &ANCHOR_LAYERS {
            let rows = input_height / stride;
            let cols = input_width / stride;
            for y in 0..rows {
                for x in 0..cols {
                    let cx = (x * stride) as f32 + stride as f32 / 2.0;
                    let cy = (y * stride) as f32 + stride as f32 / 2.0;
                    for _ in 0..per_cell {
                        centers.push(cx);
                        centers.push(cy);
                    }
                }
            }
        }

        let n_points = centers.len() / 2;
        Array2::from_shape_vec((n_points, 2), centers).expect("anchor layout is consistent")
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_grid_size() {
        let anchors = HandDetector::generate_anchors((192, 192));
        // 24x24 cells x2 at stride 8, 12x12 cells x6 at stride 16
        assert_eq!(anchors.shape(), &[24 * 24 * 2 + 12 * 12 * 6, 2]);
    }

    #[test]
    fn test_anchor_centers_within_input() {
        let anchors = HandDetector::generate_anchors((192, 192));
        for row in anchors.rows() {
            assert!(row[0] > 0.0 && row[0] < 192.0);
            assert!(row[1] > 0.0 && row[1] < 192.0);
        }
    }

    #[test]
    fn test_sigmoid_range() {
        assert!(sigmoid(0.0) - 0.5 < 1e-6);
        assert!(sigmoid(10.0) > 0.99);
        assert!(sigmoid(-10.0) < 0.01);
    }
}
