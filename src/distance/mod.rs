//! Location graph and shortest path distances.
//!
//! Provides an undirected weighted graph whose all-pairs shortest path
//! table is rebuilt lazily after edge updates.

mod graph;

pub use graph::{DistanceGraph, PathTable, ShortestPath};
