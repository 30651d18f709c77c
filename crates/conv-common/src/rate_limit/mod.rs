//! In-memory request limiting

mod sliding_window;

pub use sliding_window::{RateDecision, SlidingWindowLimiter};
