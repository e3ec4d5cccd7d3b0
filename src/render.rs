use glam::{Mat4, Vec3};
use glow::HasContext;

use crate::buffer::MeshBuffers;
use crate::scene::{Actor, BlinnPhong, Scene};
use crate::shader::{Attribute, ShaderProgram, Uniform};

const FIELD_OF_VIEW_DEG: f32 = 45.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;

/// Shared projection for one frame. A zero-area viewport degenerates the
/// aspect ratio to 0, which produces a useless but perfectly constructible
/// matrix; the offscreen case must never panic.
pub fn projection_matrix(width: u32, height: u32) -> Mat4 {
    let aspect = if width == 0 || height == 0 {
        0.0
    } else {
        width as f32 / height as f32
    };
    Mat4::perspective_rh_gl(FIELD_OF_VIEW_DEG.to_radians(), aspect, Z_NEAR, Z_FAR)
}

/// Model-to-camera transform for one actor.
///
/// Rotation components map to axes in the order the mouse handlers expect:
/// rotation.x turns about the Y axis and rotation.y about the X axis, so a
/// horizontal drag spins the model about the vertical axis. Angles are
/// degrees.
pub fn model_view_matrix(position: Vec3, rotation: Vec3) -> Mat4 {
    Mat4::from_translation(position)
        * Mat4::from_rotation_y(rotation.x.to_radians())
        * Mat4::from_rotation_x(rotation.y.to_radians())
        * Mat4::from_rotation_z(rotation.z.to_radians())
}

/// Inverse-transpose of the model-view matrix. Keeps normals correct even
/// under non-uniform scale; no scale occurs today but the derivation stays
/// general.
pub fn normal_matrix(model_view: Mat4) -> Mat4 {
    model_view.inverse().transpose()
}

/// Resolved plan for binding one attribute channel: location, backing
/// buffer and component count. `None` when the shader does not expose the
/// symbol or the mesh has no such channel; both cases skip the bind
/// entirely rather than failing.
fn attribute_binding(
    program: &ShaderProgram,
    attribute: Attribute,
    buffers: &MeshBuffers,
) -> Option<(u32, glow::NativeBuffer, i32)> {
    let location = program.attribute(attribute)?;
    let buffer = buffers.channel(attribute)?;
    Some((location, buffer, attribute.components()))
}

/// Points a shader attribute at its tightly packed buffer and enables the
/// slot. No-op for absent symbols or channels.
pub fn bind_attribute(
    gl: &glow::Context,
    program: &ShaderProgram,
    attribute: Attribute,
    buffers: &MeshBuffers,
) {
    let Some((location, buffer, components)) = attribute_binding(program, attribute, buffers)
    else {
        return;
    };
    unsafe {
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
        // Tightly packed per-attribute buffers: no normalization, no
        // stride, no offset.
        gl.vertex_attrib_pointer_f32(location, components, glow::FLOAT, false, 0, 0);
        gl.enable_vertex_attrib_array(location);
    }
}

/// Uploads a 4x4 matrix if the program declares the uniform.
pub fn set_mat4(gl: &glow::Context, program: &ShaderProgram, uniform: Uniform, matrix: &Mat4) {
    if let Some(location) = program.uniform(uniform) {
        unsafe {
            gl.uniform_matrix_4_f32_slice(Some(location), false, &matrix.to_cols_array());
        }
    }
}

/// Uploads a 3-component vector if the program declares the uniform.
pub fn set_vec3(gl: &glow::Context, program: &ShaderProgram, uniform: Uniform, value: Vec3) {
    if let Some(location) = program.uniform(uniform) {
        unsafe {
            gl.uniform_3_f32(Some(location), value.x, value.y, value.z);
        }
    }
}

/// Uploads a scalar if the program declares the uniform.
pub fn set_f32(gl: &glow::Context, program: &ShaderProgram, uniform: Uniform, value: f32) {
    if let Some(location) = program.uniform(uniform) {
        unsafe {
            gl.uniform_1_f32(Some(location), value);
        }
    }
}

/// Uploads an integer pair if the program declares the uniform.
pub fn set_ivec2(gl: &glow::Context, program: &ShaderProgram, uniform: Uniform, x: i32, y: i32) {
    if let Some(location) = program.uniform(uniform) {
        unsafe {
            gl.uniform_2_i32(Some(location), x, y);
        }
    }
}

fn draw_actor(gl: &glow::Context, actor: &Actor, projection: &Mat4, lighting: Option<&BlinnPhong>) {
    let program = actor.shader.as_ref();
    unsafe {
        gl.use_program(Some(program.program));
    }

    let model_view = model_view_matrix(actor.position, actor.rotation.get());
    let normal = normal_matrix(model_view);

    for attribute in Attribute::ALL {
        bind_attribute(gl, program, attribute, &actor.buffers);
    }
    unsafe {
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(actor.buffers.index));
    }

    set_mat4(gl, program, Uniform::Projection, projection);
    set_mat4(gl, program, Uniform::ModelView, &model_view);
    set_mat4(gl, program, Uniform::NormalMatrix, &normal);

    // The sampler is always bound to texture unit 0.
    if let Some(location) = program.uniform(Uniform::Sampler) {
        unsafe {
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(actor.texture.handle));
            gl.uniform_1_i32(Some(location), 0);
        }
    }
    set_ivec2(
        gl,
        program,
        Uniform::TextureSize,
        actor.texture.width as i32,
        actor.texture.height as i32,
    );

    if let Some(rig) = lighting {
        set_vec3(gl, program, Uniform::LightPosition, rig.light_pos);
        set_vec3(gl, program, Uniform::LightColor, rig.light_color);
        set_f32(gl, program, Uniform::LightPower, rig.light_power);
        set_vec3(gl, program, Uniform::AmbientColor, rig.ambient_color);
        set_vec3(gl, program, Uniform::DiffuseColor, rig.diffuse_color);
        set_vec3(gl, program, Uniform::SpecularColor, rig.specular_color);
        set_f32(gl, program, Uniform::Shininess, rig.shininess);
    }

    unsafe {
        gl.draw_elements(
            glow::TRIANGLES,
            actor.mesh.element_count() as i32,
            glow::UNSIGNED_SHORT,
            0,
        );
    }
}

/// Draws every actor in scene order into the current framebuffer.
///
/// Clears color and depth, enables a less-or-equal depth test so later
/// draws at equal depth still land, builds one projection for the frame
/// and hands each actor to the binder. A shader missing a capability
/// simply renders without it; nothing here fails per actor.
pub fn draw_scene(
    gl: &glow::Context,
    scene: &Scene,
    viewport: (u32, u32),
    lighting: Option<&BlinnPhong>,
) {
    unsafe {
        gl.clear_color(0.0, 0.0, 0.0, 1.0);
        gl.enable(glow::DEPTH_TEST);
        gl.depth_func(glow::LEQUAL);
        gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
    }

    let projection = projection_matrix(viewport.0, viewport.1);

    for actor in scene {
        draw_actor(gl, actor, &projection, lighting);
    }
}
