//! Per-frame orchestration: one engine object owns the stroke store and both
//! interaction controllers, stepped once per frame.

use crate::config::GestureConfig;
use crate::draw::DrawController;
use crate::gesture::{GestureClassifier, GestureState, LandmarkSet};
use crate::grab::GrabController;
use crate::sketch::StrokeStore;
use opencv::core::Point;

/// What one frame produced, for the render boundary.
///
/// The markers are ephemeral: present only when a hand was observed this
/// frame, never stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameOutput {
    /// Gesture flags for the frame, if a hand was present
    pub gesture: Option<GestureState>,
    /// Draw cursor (index fingertip), if a hand was present
    pub cursor: Option<Point>,
    /// Grab point (thumb/index midpoint), if a hand was present
    pub grab_point: Option<Point>,
}

/// The gesture-driven stroke interaction engine.
///
/// Holds the stroke store and the draw/grab sessions explicitly, so the
/// whole interaction surface is steppable from synthetic landmark frames in
/// tests. Single-threaded by design: one `step` per frame, no locking.
#[derive(Debug, Clone, Default)]
pub struct SketchEngine {
    store: StrokeStore,
    classifier: GestureClassifier,
    draw: DrawController,
    grab: GrabController,
}

impl SketchEngine {
    /// Create an engine with the default gesture thresholds
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with thresholds from configuration
    #[must_use]
    pub fn with_config(config: &GestureConfig) -> Self {
        Self {
            store: StrokeStore::new(),
            classifier: GestureClassifier::new(config.pinch_threshold),
            draw: DrawController::new(config.min_stroke_spacing),
            grab: GrabController::new(config.capture_radius),
        }
    }

    /// Advance one frame.
    ///
    /// With a hand present: classify, run the draw step, then the grab step.
    /// Without one, both controllers receive the ended transition and the
    /// store is left as the previous frame's mutations produced it.
    pub fn step(&mut self, landmarks: Option<&LandmarkSet>) -> FrameOutput {
        match landmarks {
            Some(lm) => {
                let gesture = self.classifier.classify(lm);
                self.draw.step(gesture.point, lm.cursor(), &mut self.store);
                self.grab.step(gesture.pinch, lm.grab_point(), &mut self.store);
                FrameOutput {
                    gesture: Some(gesture),
                    cursor: Some(lm.cursor()),
                    grab_point: Some(lm.grab_point()),
                }
            }
            None => {
                self.draw.end_session();
                self.grab.end_session();
                FrameOutput::default()
            }
        }
    }

    /// The stroke store, read-only, reflecting this frame's mutations
    #[must_use]
    pub fn strokes(&self) -> &StrokeStore {
        &self.store
    }

    /// Index of the stroke currently being drawn, if any
    #[must_use]
    pub fn active_stroke(&self) -> Option<usize> {
        self.draw.active()
    }

    /// Index of the currently grabbed stroke, if any
    #[must_use]
    pub fn grabbed_stroke(&self) -> Option<usize> {
        self.grab.grabbed()
    }
}
