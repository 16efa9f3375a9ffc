//! Smoothing filters for noisy landmark positions.
//!
//! Hand-tracking output jitters at pixel scale; these filters smooth a 2-D
//! pixel position stream before it reaches the interaction engine. The
//! default is no filtering, so gesture behavior is driven by the raw
//! detector output.

/// Moving average filter for simple smoothing
pub mod moving_average;

/// Exponential filter for responsive smoothing
pub mod exponential;

/// One-euro filter: adaptive smoothing for hand tracking
pub mod one_euro;

use crate::Result;

/// Trait for all landmark position filters
pub trait PointFilter: Send + Sync {
    /// Apply filter to a pixel position
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64);

    /// Reset filter state
    fn reset(&mut self);

    /// Get filter name
    fn name(&self) -> &str;
}

/// No-op filter that passes positions through unchanged
pub struct NoFilter;

impl PointFilter for NoFilter {
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64) {
        (x, y)
    }

    fn reset(&mut self) {}

    fn name(&self) -> &str {
        "NoFilter"
    }
}

/// Create a position filter by type name
pub fn create_filter(filter_type: &str) -> Result<Box<dyn PointFilter>> {
    match filter_type.to_lowercase().as_str() {
        "none" | "nofilter" => Ok(Box::new(NoFilter)),
        "moving_average" | "movingaverage" => Ok(Box::new(moving_average::MovingAverageFilter::new(
            crate::constants::DEFAULT_MOVING_AVERAGE_WINDOW,
        ))),
        "exponential" => Ok(Box::new(exponential::ExponentialFilter::new(
            crate::constants::DEFAULT_EXPONENTIAL_ALPHA,
        ))),
        "one_euro" | "oneeuro" => Ok(Box::new(one_euro::OneEuroFilter::new(
            crate::constants::DEFAULT_ONE_EURO_MIN_CUTOFF,
            crate::constants::DEFAULT_ONE_EURO_BETA,
        ))),
        _ => Err(crate::Error::FilterError(format!("Unknown filter type: {filter_type}"))),
    }
}
