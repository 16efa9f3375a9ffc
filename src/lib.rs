//! Hand sketching library for gesture-driven freehand drawing.
//!
//! This library turns a stream of hand-pose observations into a persistent,
//! editable set of vector strokes:
//! - ONNX Runtime for palm detection and 21-keypoint hand landmark inference
//! - `OpenCV` for camera capture and overlay rendering
//! - A pure gesture classifier and two small state machines for the
//!   interactions: pointing draws, pinching grabs and relocates the nearest
//!   stroke
//!
//! The per-frame pipeline is:
//! 1. Palm detection to locate the hand in the frame
//! 2. Landmark regression on the refined hand crop (21 keypoints)
//! 3. Gesture classification from landmark geometry
//! 4. One engine step mutating the stroke store
//! 5. Overlay rendering of strokes plus cursor/grab markers
//!
//! # Examples
//!
//! ## Stepping the engine with synthetic frames
//!
//! The engine is independent of any camera or model; it consumes landmark
//! sets and can be driven entirely from scripted data:
//!
//! ```
//! use hand_sketch::constants::{INDEX_PIP, INDEX_TIP, NUM_HAND_LANDMARKS};
//! use hand_sketch::engine::SketchEngine;
//! use hand_sketch::gesture::LandmarkSet;
//! use opencv::core::Point;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut engine = SketchEngine::new();
//!
//! // A hand with only the index finger raised, fingertip at (50, 40)
//! let mut points = vec![Point::new(50, 140); NUM_HAND_LANDMARKS];
//! points[INDEX_PIP] = Point::new(50, 90);
//! points[INDEX_TIP] = Point::new(50, 40);
//! let landmarks = LandmarkSet::from_points(&points)?;
//!
//! let output = engine.step(Some(&landmarks));
//! assert_eq!(output.cursor, Some(Point::new(50, 40)));
//! assert_eq!(engine.strokes().len(), 1);
//!
//! // Hand disappears: the draw session ends, the stroke stays
//! engine.step(None);
//! assert_eq!(engine.strokes().len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Running the full application
//!
//! ```no_run
//! use hand_sketch::app::{AppConfig, GuiMode, InvertMode, SketchApp, VideoSource};
//! use hand_sketch::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig {
//!     video_source: VideoSource::Camera(0),
//!     gui_mode: GuiMode::All,
//!     invert_mode: InvertMode::X,
//!     brightness: 0.0,
//!     settings: Config::default(),
//! };
//!
//! let mut app = SketchApp::new(config)?;
//! app.run()?;
//! # Ok(())
//! # }
//! ```

/// Palm detection module for finding hands in frames
pub mod hand_detection;

/// Hand landmark detection module for finding the 21 keypoints
pub mod landmark_detection;

/// Gesture classification from landmark geometry
pub mod gesture;

/// Stroke data model: strokes and the stroke store
pub mod sketch;

/// Draw controller state machine
pub mod draw;

/// Grab controller state machine
pub mod grab;

/// Per-frame engine orchestration
pub mod engine;

/// Landmark smoothing filters
pub mod filters;

/// Utility functions for pixel geometry and crop handling
pub mod utils;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
