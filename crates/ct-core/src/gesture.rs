//! Swipe gesture mapping.
//!
//! 上滑超过阈值：下一个作品；下滑超过阈值：随机作品。

use serde::{Deserialize, Serialize};

/// Vertical distance, in CSS pixels, a swipe must strictly exceed.
pub const DEFAULT_SWIPE_THRESHOLD_PX: f64 = 50.0;

/// Navigation intent derived from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedIntent {
    Next,
    Random,
}

/// Touch start/end points in screen coordinates (y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwipeGesture {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

impl SwipeGesture {
    pub fn new(start: (f64, f64), end: (f64, f64)) -> Self {
        Self {
            start_x: start.0,
            start_y: start.1,
            end_x: end.0,
            end_y: end.1,
        }
    }

    pub fn vertical(start_y: f64, end_y: f64) -> Self {
        Self::new((0.0, start_y), (0.0, end_y))
    }

    /// Horizontal travel is ignored; vertical travel must strictly exceed
    /// `threshold` in either direction.
    pub fn intent(&self, threshold: f64) -> Option<FeedIntent> {
        if self.end_y < self.start_y - threshold {
            Some(FeedIntent::Next)
        } else if self.end_y > self.start_y + threshold {
            Some(FeedIntent::Random)
        } else {
            None
        }
    }
}
