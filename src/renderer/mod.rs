//! WebGPU rendering module
//!
//! The scene is rebuilt as a vertex-colored triangle list every frame.

pub mod pipeline;
pub mod scene_mesh;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use scene_mesh::build_scene;
pub use vertex::Vertex;
