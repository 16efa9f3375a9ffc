//! Configuration management for the hand sketching application

use crate::constants::{
    DEFAULT_BOX_MARGIN, DEFAULT_BRIGHTNESS, DEFAULT_CAPTURE_RADIUS, DEFAULT_EXPONENTIAL_ALPHA,
    DEFAULT_MIN_STROKE_SPACING, DEFAULT_MOVING_AVERAGE_WINDOW, DEFAULT_ONE_EURO_BETA, DEFAULT_ONE_EURO_MIN_CUTOFF,
    DEFAULT_PINCH_THRESHOLD,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model configuration
    pub models: ModelConfig,

    /// Hand detection configuration
    pub hand_detection: HandDetectionConfig,

    /// Gesture and interaction thresholds
    pub gestures: GestureConfig,

    /// Filter configuration
    pub filter: FilterConfig,

    /// Display configuration
    pub display: DisplayConfig,
}

/// Model file paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to palm detection ONNX model
    pub palm_detector: PathBuf,

    /// Path to hand landmarks ONNX model
    pub hand_landmarks: PathBuf,
}

/// Hand detection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandDetectionConfig {
    /// Confidence threshold for palm detection (0.0-1.0)
    pub confidence_threshold: f32,

    /// IOU threshold for non-maximum suppression (0.0-1.0)
    pub iou_threshold: f32,

    /// Hand region expansion factor before the landmark crop
    pub box_margin: f32,
}

/// Gesture and stroke interaction thresholds, in pixels.
///
/// All three are resolution-dependent and tuned for a 640x480 capture
/// frame; scale them with the frame size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Thumb-tip/index-tip distance below which a pinch is recognized
    pub pinch_threshold: f64,

    /// Maximum distance at which a pinch onset may claim a stroke
    pub capture_radius: f64,

    /// Minimum spacing between consecutive stroke points
    pub min_stroke_spacing: f64,
}

/// Filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Default filter type
    pub default_filter: String,

    /// Moving average window size
    pub moving_average_window: usize,

    /// Exponential filter alpha value
    pub exponential_alpha: f64,

    /// One-euro minimum cutoff frequency
    pub one_euro_min_cutoff: f64,

    /// One-euro speed coefficient
    pub one_euro_beta: f64,
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Target framerate
    pub target_fps: u32,

    /// Window width
    pub window_width: i32,

    /// Window height
    pub window_height: i32,

    /// Default GUI mode
    pub gui_mode: String,

    /// Mirror the image horizontally (selfie view)
    pub flip_x: bool,

    /// Flip image vertically
    pub flip_y: bool,

    /// Brightness adjustment (-100 to 100)
    pub brightness: i32,

    /// Draw the hand skeleton on the overlay
    pub show_skeleton: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            models: ModelConfig::default(),
            hand_detection: HandDetectionConfig::default(),
            gestures: GestureConfig::default(),
            filter: FilterConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            palm_detector: PathBuf::from("assets/palm_detector.onnx"),
            hand_landmarks: PathBuf::from("assets/hand_landmarks.onnx"),
        }
    }
}

impl Default for HandDetectionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.5,
            iou_threshold: 0.4,
            box_margin: DEFAULT_BOX_MARGIN,
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: DEFAULT_PINCH_THRESHOLD,
            capture_radius: DEFAULT_CAPTURE_RADIUS,
            min_stroke_spacing: DEFAULT_MIN_STROKE_SPACING,
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            default_filter: "none".to_string(),
            moving_average_window: DEFAULT_MOVING_AVERAGE_WINDOW,
            exponential_alpha: DEFAULT_EXPONENTIAL_ALPHA,
            one_euro_min_cutoff: DEFAULT_ONE_EURO_MIN_CUTOFF,
            one_euro_beta: DEFAULT_ONE_EURO_BETA,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            target_fps: 30,
            window_width: 640,
            window_height: 480,
            gui_mode: "all".to_string(),
            flip_x: true,
            flip_y: false,
            brightness: DEFAULT_BRIGHTNESS,
            show_skeleton: true,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Create a landmark filter from configuration
    pub fn create_filter(&self) -> Result<Box<dyn crate::filters::PointFilter>> {
        use crate::filters::{
            create_filter, exponential::ExponentialFilter, moving_average::MovingAverageFilter, one_euro::OneEuroFilter,
        };

        match self.filter.default_filter.as_str() {
            "moving_average" => Ok(Box::new(MovingAverageFilter::new(self.filter.moving_average_window))),
            "exponential" => Ok(Box::new(ExponentialFilter::new(self.filter.exponential_alpha))),
            "one_euro" => Ok(Box::new(OneEuroFilter::new(
                self.filter.one_euro_min_cutoff,
                self.filter.one_euro_beta,
            ))),
            name => create_filter(name),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        // Validate detection thresholds
        if !(0.0..=1.0).contains(&self.hand_detection.confidence_threshold) {
            return Err(Error::ConfigError(
                "Confidence threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.hand_detection.iou_threshold) {
            return Err(Error::ConfigError(
                "IOU threshold must be between 0.0 and 1.0".to_string(),
            ));
        }

        // Validate gesture thresholds
        if self.gestures.pinch_threshold <= 0.0 {
            return Err(Error::ConfigError("Pinch threshold must be positive".to_string()));
        }
        if self.gestures.capture_radius <= 0.0 {
            return Err(Error::ConfigError("Capture radius must be positive".to_string()));
        }
        if self.gestures.min_stroke_spacing < 0.0 {
            return Err(Error::ConfigError(
                "Minimum stroke spacing must not be negative".to_string(),
            ));
        }

        // Validate filter parameters
        if self.filter.moving_average_window == 0 {
            return Err(Error::ConfigError(
                "Moving average window size must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.filter.exponential_alpha) {
            return Err(Error::ConfigError(
                "Exponential alpha must be between 0.0 and 1.0".to_string(),
            ));
        }

        // Validate display settings
        if self.display.target_fps == 0 {
            return Err(Error::ConfigError("Target FPS must be greater than 0".to_string()));
        }
        if !(-100..=100).contains(&self.display.brightness) {
            return Err(Error::ConfigError(
                "Brightness must be between -100 and 100".to_string(),
            ));
        }

        // Validate model paths exist
        if !self.models.palm_detector.exists() {
            return Err(Error::ConfigError(format!(
                "Palm detector model not found: {}",
                self.models.palm_detector.display()
            )));
        }
        if !self.models.hand_landmarks.exists() {
            return Err(Error::ConfigError(format!(
                "Hand landmarks model not found: {}",
                self.models.hand_landmarks.display()
            )));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Hand Sketch Configuration

# Model paths
models:
  palm_detector: "assets/palm_detector.onnx"
  hand_landmarks: "assets/hand_landmarks.onnx"

# Hand detection parameters
hand_detection:
  confidence_threshold: 0.5
  iou_threshold: 0.4
  box_margin: 0.25

# Gesture thresholds (pixels, tuned for 640x480)
gestures:
  pinch_threshold: 32.0
  capture_radius: 26.0
  min_stroke_spacing: 4.0

# Landmark smoothing
filter:
  default_filter: "none"
  moving_average_window: 5
  exponential_alpha: 0.5
  one_euro_min_cutoff: 1.0
  one_euro_beta: 0.15

# Display settings
display:
  target_fps: 30
  window_width: 640
  window_height: 480
  gui_mode: "all"
  flip_x: true
  flip_y: false
  brightness: 0
  show_skeleton: true
"#;
