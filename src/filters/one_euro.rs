use super::PointFilter;
use std::f64::consts::PI;
use std::time::Instant;

/// One-euro filter: adaptive low-pass smoothing.
///
/// Smooths hard when the hand is still (kills jitter) and loosens when it
/// moves fast (keeps lag low). `min_cutoff` sets smoothing at rest, `beta`
/// how quickly the cutoff opens with speed.
pub struct OneEuroFilter {
    min_cutoff: f64,
    beta: f64,
    d_cutoff: f64,
    x: AxisState,
    y: AxisState,
    epoch: Instant,
    last_t: Option<f64>,
}

#[derive(Default, Clone, Copy)]
struct AxisState {
    value: f64,
    derivative: f64,
}

impl OneEuroFilter {
    pub fn new(min_cutoff: f64, beta: f64) -> Self {
        Self {
            min_cutoff,
            beta,
            d_cutoff: 1.0,
            x: AxisState::default(),
            y: AxisState::default(),
            epoch: Instant::now(),
            last_t: None,
        }
    }

    fn smoothing_factor(elapsed: f64, cutoff: f64) -> f64 {
        let r = 2.0 * PI * cutoff * elapsed;
        r / (r + 1.0)
    }

    fn filter_axis(&self, state: AxisState, raw: f64, elapsed: f64) -> AxisState {
        let a_d = Self::smoothing_factor(elapsed, self.d_cutoff);
        let dv = (raw - state.value) / elapsed;
        let dv_hat = a_d * dv + (1.0 - a_d) * state.derivative;

        let cutoff = self.min_cutoff + self.beta * dv_hat.abs();
        let a = Self::smoothing_factor(elapsed, cutoff);

        AxisState {
            value: a * raw + (1.0 - a) * state.value,
            derivative: dv_hat,
        }
    }

    /// Filter a sample at an explicit timestamp in seconds.
    ///
    /// The trait implementation feeds wall-clock time; tests feed scripted
    /// timestamps.
    pub fn apply_at(&mut self, t: f64, x: f64, y: f64) -> (f64, f64) {
        let Some(last_t) = self.last_t else {
            self.x = AxisState { value: x, derivative: 0.0 };
            self.y = AxisState { value: y, derivative: 0.0 };
            self.last_t = Some(t);
            return (x, y);
        };

        let elapsed = t - last_t;
        if elapsed <= 0.0 {
            return (self.x.value, self.y.value);
        }

        self.x = self.filter_axis(self.x, x, elapsed);
        self.y = self.filter_axis(self.y, y, elapsed);
        self.last_t = Some(t);

        (self.x.value, self.y.value)
    }
}

impl PointFilter for OneEuroFilter {
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64) {
        let t = self.epoch.elapsed().as_secs_f64();
        self.apply_at(t, x, y)
    }

    fn reset(&mut self) {
        self.last_t = None;
        self.x = AxisState::default();
        self.y = AxisState::default();
    }

    fn name(&self) -> &str {
        "OneEuroFilter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_passes_through() {
        let mut filter = OneEuroFilter::new(1.0, 0.15);
        assert_eq!(filter.apply_at(0.0, 100.0, 200.0), (100.0, 200.0));
    }

    #[test]
    fn test_smooths_small_jitter() {
        let mut filter = OneEuroFilter::new(1.0, 0.0);
        filter.apply_at(0.0, 100.0, 100.0);

        // A 1px jump at 30fps should be damped below the raw input
        let (x, _) = filter.apply_at(1.0 / 30.0, 101.0, 100.0);
        assert!(x > 100.0 && x < 101.0);
    }

    #[test]
    fn test_tracks_fast_motion_more_closely() {
        let mut slow = OneEuroFilter::new(1.0, 0.5);
        let mut still = OneEuroFilter::new(1.0, 0.5);
        slow.apply_at(0.0, 0.0, 0.0);
        still.apply_at(0.0, 0.0, 0.0);

        // Large jump opens the adaptive cutoff further than a small one
        let (fast_x, _) = slow.apply_at(1.0 / 30.0, 300.0, 0.0);
        let (slow_x, _) = still.apply_at(1.0 / 30.0, 3.0, 0.0);
        assert!(fast_x / 300.0 > slow_x / 3.0);
    }

    #[test]
    fn test_non_advancing_time_returns_previous() {
        let mut filter = OneEuroFilter::new(1.0, 0.15);
        filter.apply_at(1.0, 50.0, 50.0);
        assert_eq!(filter.apply_at(1.0, 500.0, 500.0), (50.0, 50.0));
    }

    #[test]
    fn test_reset_forgets_history() {
        let mut filter = OneEuroFilter::new(1.0, 0.15);
        filter.apply_at(0.0, 10.0, 10.0);
        filter.apply_at(0.1, 20.0, 20.0);

        filter.reset();
        assert_eq!(filter.apply_at(5.0, 77.0, 88.0), (77.0, 88.0));
    }
}
