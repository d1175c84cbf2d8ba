//! Diagram reconstruction from detected primitives

pub mod associate;
pub mod classify;
pub mod geometry;
