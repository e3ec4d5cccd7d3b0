use std::sync::Arc;

use glam::Vec3;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::buffer::MeshBuffers;
use crate::mesh::Mesh;
use crate::shader::ShaderProgram;
use crate::texture::Texture;

/// Blinn-Phong lighting rig: one point light plus material response.
/// Created once at startup, nudged around by the keyboard handlers, read
/// by the renderer every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlinnPhong {
    pub light_pos: Vec3,
    pub light_color: Vec3,
    pub light_power: f32,
    pub ambient_color: Vec3,
    pub diffuse_color: Vec3,
    pub specular_color: Vec3,
    pub shininess: f32,
}

impl Default for BlinnPhong {
    fn default() -> Self {
        Self {
            light_pos: Vec3::new(0.0, 0.0, -10.0),
            light_color: Vec3::ONE,
            light_power: 400.0,
            ambient_color: Vec3::splat(0.1),
            diffuse_color: Vec3::splat(0.1),
            specular_color: Vec3::ONE,
            shininess: 16.0,
        }
    }
}

/// Aliasing handle to a rotation vector in degrees.
///
/// Clones share the underlying value, so every actor built from the same
/// handle rotates in lock-step with the input handlers. The lock exists
/// for the day input and rendering stop sharing one thread; today both
/// sides run on the event loop and never contend.
#[derive(Debug, Clone, Default)]
pub struct SharedRotation(Arc<RwLock<Vec3>>);

impl SharedRotation {
    pub fn new(rotation: Vec3) -> Self {
        Self(Arc::new(RwLock::new(rotation)))
    }

    pub fn get(&self) -> Vec3 {
        *self.0.read()
    }

    pub fn set(&self, rotation: Vec3) {
        *self.0.write() = rotation;
    }
}

/// Aliasing handle to the lighting rig, same sharing discipline as
/// [`SharedRotation`].
#[derive(Debug, Clone, Default)]
pub struct SharedLighting(Arc<RwLock<BlinnPhong>>);

impl SharedLighting {
    pub fn new(rig: BlinnPhong) -> Self {
        Self(Arc::new(RwLock::new(rig)))
    }

    pub fn snapshot(&self) -> BlinnPhong {
        self.0.read().clone()
    }

    pub fn update<R>(&self, mutate: impl FnOnce(&mut BlinnPhong) -> R) -> R {
        mutate(&mut self.0.write())
    }
}

/// One drawable: geometry, its GPU buffers, a shader, a texture and a
/// placement. The shader is shared, the rotation aliases interaction
/// state.
pub struct Actor {
    pub mesh: Mesh,
    pub buffers: MeshBuffers,
    pub shader: Arc<ShaderProgram>,
    pub texture: Texture,
    pub position: Vec3,
    pub rotation: SharedRotation,
}

/// Draw order is scene order; overlap is left to the depth test.
pub type Scene = Vec<Actor>;
