//! Boundary traits
//!
//! These traits define the interface between the link engine and the
//! presentation layer that consumes its events.

pub mod sink;

pub use sink::DispatchSink;
