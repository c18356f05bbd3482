//! WebGPU rendering module
//!
//! Scenes are built as flat-colored triangle lists from simulation state, then
//! mapped to the viewport and drawn in a single pass.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState, viewport_to_world, world_to_ndc};
pub use scene::{Scene, build_scene, clear_color};
pub use vertex::Vertex;
