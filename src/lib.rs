//! Building blocks of a small interactive Blinn-Phong viewer.
//!
//! The crate separates the pure parts (mesh parsing, shader vocabulary,
//! matrix composition, interaction math) from the thin GL layer so the
//! pipeline logic stays testable without a window or a GPU. The binary
//! wires both halves to a winit event loop.

pub mod assets;
pub mod buffer;
pub mod input;
pub mod mesh;
pub mod render;
pub mod scene;
pub mod shader;
pub mod shapes;
pub mod texture;

pub use buffer::MeshBuffers;
pub use input::{apply_light_key, wrap_degrees, DragRotate};
pub use mesh::{parse_mesh, Mesh};
pub use render::{draw_scene, model_view_matrix, normal_matrix, projection_matrix};
pub use scene::{Actor, BlinnPhong, Scene, SharedLighting, SharedRotation};
pub use shader::{Attribute, ShaderError, ShaderProgram, ShaderSource, Uniform};
pub use texture::Texture;
