use crate::constants::NUM_HAND_LANDMARKS;
use crate::gesture::LandmarkSet;
use crate::utils::safe_cast::{f32_to_i32_clamp, usize_to_i32};
use crate::Result;
use ndarray::{Array1, Array4, CowArray};
use opencv::core::{Mat, Point, Point2f, Rect, Size, CV_32F};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::prelude::*;
use ort::{Environment, Session, Value};
use std::path::Path;
use std::sync::Arc;

/// Default hand landmark model input size
const DEFAULT_LANDMARK_INPUT_SIZE: i32 = 224;

/// Values emitted per landmark (x, y, z); z is relative depth and unused here
const VALUES_PER_LANDMARK: usize = 3;

/// Hand landmark detector using `ONNX` Runtime.
///
/// Regresses the 21 hand keypoints from a square hand crop. Output
/// coordinates are in crop pixel space; [`landmarks_to_frame`] maps them
/// into the full frame.
pub struct HandLandmarkDetector {
    session: Session,
    input_size: i32,
}

impl HandLandmarkDetector {
    /// Create a new landmark detector from an `ONNX` model file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The ONNX model file cannot be loaded
    /// - The ONNX runtime environment cannot be created
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        log::info!(
            "Initializing HandLandmarkDetector with model: {}",
            model_path.as_ref().display()
        );
        let environment = Arc::new(
            Environment::builder()
                .with_name("hand_landmarks")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        if session.inputs.is_empty() {
            return Err(crate::error::Error::ModelInputError("Model has no inputs".to_string()));
        }
        if session.outputs.is_empty() {
            return Err(crate::error::Error::ModelOutputError("Model has no outputs".to_string()));
        }

        Ok(Self {
            session,
            input_size: DEFAULT_LANDMARK_INPUT_SIZE,
        })
    }

    /// Detect the 21 hand keypoints in a hand crop.
    ///
    /// Returned points are in crop pixel coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing or inference fails, or if the
    /// model emits something other than 21 keypoints.
    pub fn detect(&self, hand_image: &Mat) -> Result<Vec<Point2f>> {
        let preprocessed = self.preprocess(hand_image)?;
        let output = self.forward(preprocessed)?;
        self.postprocess(&output, hand_image)
    }

    /// Preprocess the hand crop for the model
    #[allow(clippy::cast_sign_loss)] // OpenCV dimensions are positive
    fn preprocess(&self, image: &Mat) -> Result<Array4<f32>> {
        let size = self.input_size as usize;
        let channels = 3;

        let mut resized = Mat::default();
        imgproc::resize(
            image,
            &mut resized,
            Size::new(self.input_size, self.input_size),
            0.0,
            0.0,
            InterpolationFlags::INTER_LINEAR as i32,
        )?;

        let mut rgb_image = Mat::default();
        imgproc::cvt_color(&resized, &mut rgb_image, imgproc::COLOR_BGR2RGB, 0)?;

        // Normalize to [0, 1]
        let mut float_image = Mat::default();
        rgb_image.convert_to(&mut float_image, CV_32F, 1.0 / 255.0, 0.0)?;

        let mut data = vec![0.0f32; size * size * channels];
        for row in 0..size {
            for col in 0..size {
                let pixel = float_image.at_2d::<opencv::core::Vec3f>(usize_to_i32(row)?, usize_to_i32(col)?)?;
                for ch in 0..channels {
                    data[(row * size + col) * channels + ch] = pixel[ch];
                }
            }
        }

        let array = Array4::from_shape_vec((1, size, size, channels), data)
            .map_err(|e| crate::error::Error::ModelError(format!("Failed to create array: {e}")))?;

        // NHWC to NCHW
        Ok(array.permuted_axes([0, 3, 1, 2]))
    }

    /// Run forward pass through the model
    fn forward(&self, inputs: Array4<f32>) -> Result<Array1<f32>> {
        let cow_array = CowArray::from(inputs.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;

        let outputs = self.session.run(vec![input_tensor])?;

        let marks_output = outputs
            .into_iter()
            .next()
            .ok_or_else(|| crate::error::Error::ModelOutputError("No output from model".to_string()))?;

        let marks_tensor = marks_output.try_extract::<f32>()?;
        let marks_view = marks_tensor.view();
        let marks_data = marks_view
            .as_slice()
            .ok_or_else(|| crate::error::Error::ModelOutputError("Failed to get output data".to_string()))?;

        Ok(Array1::from(marks_data.to_vec()))
    }

    /// Convert model output to keypoints in crop pixel coordinates
    #[allow(clippy::cast_precision_loss)] // Precision loss acceptable for pixel coordinates
    fn postprocess(&self, marks: &Array1<f32>, hand_image: &Mat) -> Result<Vec<Point2f>> {
        if marks.len() != NUM_HAND_LANDMARKS * VALUES_PER_LANDMARK {
            return Err(crate::error::Error::ModelOutputError(format!(
                "Expected {} output values, got {}",
                NUM_HAND_LANDMARKS * VALUES_PER_LANDMARK,
                marks.len()
            )));
        }

        let crop_width = hand_image.cols() as f32;
        let crop_height = hand_image.rows() as f32;
        let input = self.input_size as f32;

        let landmarks = (0..NUM_HAND_LANDMARKS)
            .map(|i| {
                let idx = i * VALUES_PER_LANDMARK;
                // Coordinates are in model input space; z is discarded
                Point2f::new(marks[idx] * crop_width / input, marks[idx + 1] * crop_height / input)
            })
            .collect();

        Ok(landmarks)
    }
}

/// Map crop-space keypoints into frame coordinates, clamped to the frame.
///
/// # Errors
///
/// Returns an error if the keypoint count is not 21.
pub fn landmarks_to_frame(marks: &[Point2f], crop: Rect, frame_width: i32, frame_height: i32) -> Result<LandmarkSet> {
    #[allow(clippy::cast_precision_loss)] // Crop origin fits in f32 at pixel scale
    let points: Vec<Point> = marks
        .iter()
        .map(|m| {
            Point::new(
                f32_to_i32_clamp(crop.x as f32 + m.x, 0, frame_width.saturating_sub(1)),
                f32_to_i32_clamp(crop.y as f32 + m.y, 0, frame_height.saturating_sub(1)),
            )
        })
        .collect();

    LandmarkSet::from_points(&points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{INDEX_TIP, WRIST};

    #[test]
    fn test_output_cardinality() {
        assert_eq!(NUM_HAND_LANDMARKS * VALUES_PER_LANDMARK, 63);
    }

    #[test]
    fn test_landmarks_to_frame_offsets_and_clamps() {
        let mut marks = vec![Point2f::new(10.0, 10.0); NUM_HAND_LANDMARKS];
        marks[WRIST] = Point2f::new(0.0, 0.0);
        marks[INDEX_TIP] = Point2f::new(700.0, -300.0);

        let lm = landmarks_to_frame(&marks, Rect::new(100, 200, 128, 128), 640, 480).unwrap();

        assert_eq!(lm.point(WRIST), Point::new(100, 200));
        // Far-out coordinates clamp to the frame
        assert_eq!(lm.point(INDEX_TIP), Point::new(639, 0));
    }

    #[test]
    fn test_landmarks_to_frame_rejects_wrong_count() {
        let marks = vec![Point2f::new(0.0, 0.0); 5];
        assert!(landmarks_to_frame(&marks, Rect::new(0, 0, 10, 10), 640, 480).is_err());
    }
}
