#![warn(clippy::all)]
//! Algorithms that operate on the vertex sets of scanned meshes.
//!
//! The typical pipeline builds a spatial index over all vertices, clusters them with [dbscan](crate::dbscan),
//! keeps the dominant cluster and finally strips the floor with [remove_floor](crate::floor::remove_floor)
//! while keeping the bases of columns that rise above it.

// Bounding box and per-axis range of a point set.
pub mod bounds;
// Per-cluster statistics (size, centroid, radius) computed from a label array.
pub mod cluster_summary;
// Density based clustering (DBSCAN) on top of any `SpatialIndex`, plus helpers to pick the dominant cluster.
pub mod dbscan;
// Floor band extraction and floor removal that protects vertical structures.
pub mod floor;
