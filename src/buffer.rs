use glow::HasContext;
use log::debug;

use crate::mesh::Mesh;
use crate::shader::Attribute;

/// One GPU buffer per mesh channel, tightly packed, plus the element index
/// buffer. The color channel is absent when the mesh carries no colors.
#[derive(Debug, Clone, Copy)]
pub struct MeshBuffers {
    pub position: glow::NativeBuffer,
    pub color: Option<glow::NativeBuffer>,
    pub tex_coord: glow::NativeBuffer,
    pub normal: glow::NativeBuffer,
    pub index: glow::NativeBuffer,
}

impl MeshBuffers {
    /// Uploads every channel of the mesh as a STATIC_DRAW buffer.
    pub fn upload(gl: &glow::Context, mesh: &Mesh) -> Result<Self, String> {
        debug!(
            "uploading mesh buffers: {} position floats, {} indices",
            mesh.positions.len(),
            mesh.indices.len()
        );
        let position = upload_f32(gl, &mesh.positions)?;
        let color = match &mesh.colors {
            Some(colors) => Some(upload_f32(gl, colors)?),
            None => None,
        };
        let tex_coord = upload_f32(gl, &mesh.tex_coords)?;
        let normal = upload_f32(gl, &mesh.normals)?;
        let index = upload_u16(gl, &mesh.indices)?;
        Ok(Self {
            position,
            color,
            tex_coord,
            normal,
            index,
        })
    }

    /// Buffer backing one attribute channel, if the mesh has that channel.
    pub fn channel(&self, attribute: Attribute) -> Option<glow::NativeBuffer> {
        match attribute {
            Attribute::Position => Some(self.position),
            Attribute::Color => self.color,
            Attribute::TexCoord => Some(self.tex_coord),
            Attribute::Normal => Some(self.normal),
        }
    }
}

fn upload_f32(gl: &glow::Context, data: &[f32]) -> Result<glow::NativeBuffer, String> {
    unsafe {
        let buffer = gl.create_buffer()?;
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
        gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, bytemuck::cast_slice(data), glow::STATIC_DRAW);
        gl.bind_buffer(glow::ARRAY_BUFFER, None);
        Ok(buffer)
    }
}

fn upload_u16(gl: &glow::Context, data: &[u16]) -> Result<glow::NativeBuffer, String> {
    unsafe {
        let buffer = gl.create_buffer()?;
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(buffer));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            bytemuck::cast_slice(data),
            glow::STATIC_DRAW,
        );
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);
        Ok(buffer)
    }
}
