//! Grab controller: on pinch onset captures the nearest stroke and rigidly
//! drags it while the pinch holds.

use crate::constants::DEFAULT_CAPTURE_RADIUS;
use crate::sketch::StrokeStore;
use opencv::core::Point;

/// State machine for the grab interaction.
///
/// The nearest-stroke scan runs only at pinch onset; while the drag holds
/// the controller applies frame-to-frame displacement deltas, so the stroke
/// follows the hand without re-deciding what is grabbed mid-drag.
#[derive(Debug, Clone)]
pub struct GrabController {
    grabbed: Option<usize>,
    anchor: Option<Point>,
    capture_radius: f64,
}

impl Default for GrabController {
    fn default() -> Self {
        Self::new(DEFAULT_CAPTURE_RADIUS)
    }
}

impl GrabController {
    /// Create a controller with a capture radius in pixels
    #[must_use]
    pub fn new(capture_radius: f64) -> Self {
        Self {
            grabbed: None,
            anchor: None,
            capture_radius,
        }
    }

    /// Advance one frame with a hand present.
    ///
    /// Onset scans every point of every stroke for the closest one within
    /// the capture radius; an empty result leaves the controller idle for
    /// the frame, so the scan re-runs on the next frame while the pinch
    /// still holds. Continuation translates the grabbed stroke by the
    /// displacement since the previous frame and re-anchors.
    pub fn step(&mut self, pinching: bool, grab_point: Point, store: &mut StrokeStore) {
        if !pinching {
            self.grabbed = None;
            self.anchor = None;
            return;
        }

        match self.grabbed {
            None => {
                if let Some(index) = store.nearest_stroke_within(grab_point, self.capture_radius) {
                    self.grabbed = Some(index);
                    self.anchor = Some(grab_point);
                }
            }
            Some(index) => {
                if let Some(anchor) = self.anchor {
                    let dx = grab_point.x - anchor.x;
                    let dy = grab_point.y - anchor.y;
                    if let Some(stroke) = store.get_mut(index) {
                        stroke.translate(dx, dy);
                    }
                }
                self.anchor = Some(grab_point);
            }
        }
    }

    /// End the session, e.g. when no hand is present this frame
    pub fn end_session(&mut self) {
        self.grabbed = None;
        self.anchor = None;
    }

    /// Index of the grabbed stroke, if any
    #[must_use]
    pub fn grabbed(&self) -> Option<usize> {
        self.grabbed
    }
}
