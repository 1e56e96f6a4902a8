//! WebGPU rendering module
//!
//! `Scene` describes a frame as plain drawables; `RenderState` tessellates
//! the shapes and draws them. Text is left to the DOM overlay.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, playfield_to_ndc};
pub use scene::{Drawable, LabelId, Scene, Stroke, TextLabel};
pub use vertex::Vertex;
