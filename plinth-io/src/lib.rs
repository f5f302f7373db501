#![warn(clippy::all)]
//! Reading and writing of the point formats plinth works with.
//!
//! The [ascii] module contains readers and writers for plain text vertex lists (`.xyz`) and for the vertex
//! records of Wavefront OBJ meshes. The [base] module picks the right one based on the file extension.

pub mod ascii;
pub mod base;
