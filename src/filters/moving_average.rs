use super::PointFilter;
use std::collections::VecDeque;

/// Moving average filter
pub struct MovingAverageFilter {
    window_size: usize,
    x_buffer: VecDeque<f64>,
    y_buffer: VecDeque<f64>,
}

impl MovingAverageFilter {
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size,
            x_buffer: VecDeque::with_capacity(window_size),
            y_buffer: VecDeque::with_capacity(window_size),
        }
    }
}

impl PointFilter for MovingAverageFilter {
    fn apply(&mut self, x: f64, y: f64) -> (f64, f64) {
        if self.x_buffer.len() >= self.window_size {
            self.x_buffer.pop_front();
        }
        if self.y_buffer.len() >= self.window_size {
            self.y_buffer.pop_front();
        }

        self.x_buffer.push_back(x);
        self.y_buffer.push_back(y);

        let x_avg = self.x_buffer.iter().sum::<f64>() / self.x_buffer.len() as f64;
        let y_avg = self.y_buffer.iter().sum::<f64>() / self.y_buffer.len() as f64;

        (x_avg, y_avg)
    }

    fn reset(&mut self) {
        self.x_buffer.clear();
        self.y_buffer.clear();
    }

    fn name(&self) -> &str {
        "MovingAverageFilter"
    }
}
