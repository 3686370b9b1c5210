//! Route annotation: cumulative arrival time and distance per stop.

mod annotator;

pub use annotator::annotate_route;
