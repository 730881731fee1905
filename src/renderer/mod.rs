//! Canvas 2D rendering module
//!
//! Draws the simulation snapshot with plain canvas primitives.

pub mod canvas;

pub use canvas::CanvasRenderer;
