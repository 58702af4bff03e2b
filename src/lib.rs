//! Planar street graphs and Steiner tree approximation.
//!
//! A [`PlanarGraph`] keys vertices by coordinate. Points such as building
//! entrances are attached at their closest location on the network, flagged
//! as terminals, and connected by an approximate minimum Steiner tree.

pub mod error;
pub mod geometry;
pub mod math;
pub mod network;
pub mod operations;
pub mod snapshot;
pub mod topology;

pub use error::{ReblockError, Result};
pub use topology::PlanarGraph;
