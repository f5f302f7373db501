#![warn(clippy::all)]

//! Core data structures for working with the vertices of scanned meshes
//!
//! Plinth treats a mesh as an unordered set of 3D points. The position of a point within its slice is
//! the point id that every other structure refers to. This crate provides the geometric primitives
//! ([Point](crate::math::Point), [Axis](crate::math::Axis), [AABB](crate::math::AABB)) and the
//! [SpatialIndex](crate::index::SpatialIndex) trait together with its three backends.

pub extern crate nalgebra;

/// Spatial indices answering fixed-radius neighbour queries
pub mod index;
/// Geometric primitives
pub mod math;
