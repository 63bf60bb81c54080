pub mod deviation;
pub mod stats;
pub mod vix;
pub mod yield_curve;
