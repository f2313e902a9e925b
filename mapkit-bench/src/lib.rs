//! Mapkit Benchmark Library
//!
//! Builds synthetic type graphs and property paths for the resolution
//! benchmarks.

pub mod model_gen;
