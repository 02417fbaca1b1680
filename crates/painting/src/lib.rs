//! Symmetra painting system - symmetric strokes and their rendering
//!
//! This crate provides the drawing core:
//! - [`types`] - Palette, brush, symmetry and stroke data types
//! - [`symmetry`] - N-fold rotation and mirror transform
//! - [`history`] - Append-only stroke history and gesture recording
//! - [`brush`] - Style strategies that turn strokes into draw commands
//! - [`canvas`] - The drawing interface and a recording canvas
//! - [`tiles`] - Tiled CPU surface with dirty tracking and rasterization
//! - [`render`] - Static and audio-reactive full redraws
//! - [`reactive`] - Per-frame rotation, scale and color modulation
//! - [`particles`] - Particle bursts for reactive frames
//! - [`pipeline`] - Complete painting pipeline driven by pointer input

pub mod brush;
pub mod canvas;
pub mod constants;
pub mod history;
pub mod particles;
pub mod pipeline;
pub mod reactive;
pub mod render;
pub mod shapes;
pub mod surface;
pub mod symmetry;
pub mod tiles;
pub mod types;
pub mod validation;

pub use brush::*;
pub use canvas::*;
pub use constants::*;
pub use history::*;
pub use particles::*;
pub use pipeline::*;
pub use reactive::*;
pub use render::*;
pub use shapes::*;
pub use surface::*;
pub use symmetry::*;
pub use tiles::*;
pub use types::*;
pub use validation::*;
