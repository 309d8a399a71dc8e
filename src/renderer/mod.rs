//! WebGPU rendering module
//!
//! `scene` builds a triangle list from the render snapshot in canvas space;
//! `pipeline` maps it to NDC, uploads and draws it.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState, frame_vertices, world_to_ndc};
pub use scene::build_frame;
pub use vertex::Vertex;
