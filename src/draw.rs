//! Draw controller: starts, extends and ends a stroke from the "point"
//! gesture and the cursor position.

use crate::constants::DEFAULT_MIN_STROKE_SPACING;
use crate::sketch::{Stroke, StrokeStore};
use crate::utils::point_distance;
use opencv::core::Point;

/// State machine for the draw interaction.
///
/// Holds at most one session: the index of the stroke currently being
/// extended. The session lives exactly as long as the "point" gesture holds;
/// once it ends the referenced stroke is immutable history.
#[derive(Debug, Clone)]
pub struct DrawController {
    active: Option<usize>,
    min_spacing: f64,
}

impl Default for DrawController {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_STROKE_SPACING)
    }
}

impl DrawController {
    /// Create a controller with a minimum point spacing in pixels.
    ///
    /// Spacing decimates near-duplicate samples so stroke density stays
    /// roughly uniform regardless of frame rate.
    #[must_use]
    pub fn new(min_spacing: f64) -> Self {
        Self {
            active: None,
            min_spacing,
        }
    }

    /// Advance one frame with a hand present.
    ///
    /// On "point" onset a new stroke seeded with the cursor is appended to
    /// the store; while the gesture holds the cursor extends the active
    /// stroke whenever it has moved more than the minimum spacing from the
    /// stroke's last point. When the gesture drops the session ends.
    pub fn step(&mut self, pointing: bool, cursor: Point, store: &mut StrokeStore) {
        if !pointing {
            self.active = None;
            return;
        }

        match self.active {
            None => {
                self.active = Some(store.push_stroke(Stroke::starting_at(cursor)));
            }
            Some(index) => {
                // Index is always valid: strokes are never removed.
                if let Some(stroke) = store.get_mut(index) {
                    if stroke.last().map_or(true, |last| point_distance(last, cursor) > self.min_spacing) {
                        stroke.push(cursor);
                    }
                }
            }
        }
    }

    /// End the session, e.g. when no hand is present this frame
    pub fn end_session(&mut self) {
        self.active = None;
    }

    /// Index of the stroke currently being drawn, if any
    #[must_use]
    pub fn active(&self) -> Option<usize> {
        self.active
    }
}
