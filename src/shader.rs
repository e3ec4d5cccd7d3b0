use std::collections::HashMap;

use glow::HasContext;
use thiserror::Error;

/// Per-vertex inputs a shader may declare. The vocabulary is closed: a
/// shader maps any subset of these onto its own variable names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Position,
    Color,
    TexCoord,
    Normal,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::Position,
        Attribute::Color,
        Attribute::TexCoord,
        Attribute::Normal,
    ];

    /// Float components per vertex in the matching buffer channel.
    pub fn components(self) -> i32 {
        match self {
            Attribute::Position => 3,
            Attribute::Color => 4,
            Attribute::TexCoord => 2,
            Attribute::Normal => 3,
        }
    }
}

/// Per-draw-call constants a shader may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Uniform {
    Projection,
    ModelView,
    NormalMatrix,
    Sampler,
    TextureSize,
    LightPosition,
    LightColor,
    LightPower,
    AmbientColor,
    DiffuseColor,
    SpecularColor,
    Shininess,
}

/// Shader text plus the sparse symbol-to-variable-name tables.
///
/// Only mapped symbols are expected to exist in the compiled program; a
/// plain textured shader has no lighting uniforms, a lit untextured shader
/// has no sampler, and the draw routine never needs to know which is which.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub name: String,
    pub vertex: String,
    pub fragment: String,
    pub attributes: HashMap<Attribute, String>,
    pub uniforms: HashMap<Uniform, String>,
}

impl ShaderSource {
    pub fn new(name: impl Into<String>, vertex: String, fragment: String) -> Self {
        Self {
            name: name.into(),
            vertex,
            fragment,
            attributes: HashMap::new(),
            uniforms: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute, variable: &str) -> Self {
        self.attributes.insert(attribute, variable.to_string());
        self
    }

    pub fn with_uniform(mut self, uniform: Uniform, variable: &str) -> Self {
        self.uniforms.insert(uniform, variable.to_string());
        self
    }

    /// Untextured Blinn-Phong: position/normal in, full lighting rig.
    pub fn blinn_phong(vertex: String, fragment: String) -> Self {
        Self::new("blinn_phong", vertex, fragment)
            .with_attribute(Attribute::Position, "aVertexPosition")
            .with_attribute(Attribute::Normal, "aVertexNormal")
            .with_uniform(Uniform::Projection, "uProjectionMatrix")
            .with_uniform(Uniform::ModelView, "uModelViewMatrix")
            .with_uniform(Uniform::NormalMatrix, "uNormalMatrix")
            .with_uniform(Uniform::LightPosition, "lightPos")
            .with_uniform(Uniform::LightColor, "lightColor")
            .with_uniform(Uniform::LightPower, "lightPower")
            .with_uniform(Uniform::AmbientColor, "ambientColor")
            .with_uniform(Uniform::DiffuseColor, "diffuseColor")
            .with_uniform(Uniform::SpecularColor, "specColor")
            .with_uniform(Uniform::Shininess, "shininess")
    }

    /// Blinn-Phong with a diffuse texture on unit 0.
    pub fn textured_blinn_phong(vertex: String, fragment: String) -> Self {
        Self::blinn_phong(vertex, fragment)
            .with_name("textured_blinn_phong")
            .with_attribute(Attribute::TexCoord, "aTextureCoord")
            .with_uniform(Uniform::Sampler, "uSampler")
    }

    /// Texture and per-vertex lighting only, no Blinn-Phong rig.
    pub fn basic_textured(vertex: String, fragment: String) -> Self {
        Self::new("basic_textured", vertex, fragment)
            .with_attribute(Attribute::Position, "aVertexPosition")
            .with_attribute(Attribute::TexCoord, "aTextureCoord")
            .with_attribute(Attribute::Normal, "aVertexNormal")
            .with_uniform(Uniform::Projection, "uProjectionMatrix")
            .with_uniform(Uniform::ModelView, "uModelViewMatrix")
            .with_uniform(Uniform::NormalMatrix, "uNormalMatrix")
            .with_uniform(Uniform::Sampler, "uSampler")
            .with_uniform(Uniform::TextureSize, "uTextureSize")
    }

    fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

/// Hard failures while turning shader text into a GPU program. Everything
/// past a successful link is soft: a stripped variable is just an absent
/// location.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to allocate GPU object for shader {name}: {reason}")]
    Allocate { name: String, reason: String },
    #[error("failed to compile {stage} stage of shader {name}: {log}")]
    Compile {
        name: String,
        stage: &'static str,
        log: String,
    },
    #[error("failed to link shader {name}: {log}")]
    Link { name: String, log: String },
}

/// Compiled counterpart of a [`ShaderSource`]: the same symbolic keys, each
/// resolved to a GPU location or recorded as absent when the linker never
/// assigned one.
#[derive(Debug)]
pub struct ShaderProgram {
    pub name: String,
    pub program: glow::NativeProgram,
    pub(crate) attributes: HashMap<Attribute, Option<u32>>,
    pub(crate) uniforms: HashMap<Uniform, Option<glow::NativeUniformLocation>>,
}

impl ShaderProgram {
    /// Compiles both stages, links them, and resolves a location for every
    /// mapped symbol. A location the driver reports as missing is stored as
    /// `None`; the binder treats it as "not actually bound".
    pub fn compile(gl: &glow::Context, source: &ShaderSource) -> Result<Self, ShaderError> {
        unsafe {
            let vertex = compile_stage(gl, source, glow::VERTEX_SHADER, "vertex", &source.vertex)?;
            let fragment =
                match compile_stage(gl, source, glow::FRAGMENT_SHADER, "fragment", &source.fragment)
                {
                    Ok(fragment) => fragment,
                    Err(err) => {
                        gl.delete_shader(vertex);
                        return Err(err);
                    }
                };

            let program = match gl.create_program() {
                Ok(program) => program,
                Err(reason) => {
                    gl.delete_shader(vertex);
                    gl.delete_shader(fragment);
                    return Err(ShaderError::Allocate {
                        name: source.name.clone(),
                        reason,
                    });
                }
            };
            gl.attach_shader(program, vertex);
            gl.attach_shader(program, fragment);
            gl.link_program(program);
            gl.delete_shader(vertex);
            gl.delete_shader(fragment);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(ShaderError::Link {
                    name: source.name.clone(),
                    log,
                });
            }

            let attributes = source
                .attributes
                .iter()
                .map(|(&symbol, variable)| (symbol, gl.get_attrib_location(program, variable)))
                .collect();
            let uniforms = source
                .uniforms
                .iter()
                .map(|(&symbol, variable)| (symbol, gl.get_uniform_location(program, variable)))
                .collect();

            Ok(Self {
                name: source.name.clone(),
                program,
                attributes,
                uniforms,
            })
        }
    }

    /// Location of an attribute, or `None` when the shader never mapped the
    /// symbol or the linker stripped the variable.
    pub fn attribute(&self, attribute: Attribute) -> Option<u32> {
        self.attributes.get(&attribute).copied().flatten()
    }

    /// Location of a uniform, with the same absent-is-fine semantics.
    pub fn uniform(&self, uniform: Uniform) -> Option<&glow::NativeUniformLocation> {
        self.uniforms.get(&uniform).and_then(|location| location.as_ref())
    }
}

unsafe fn compile_stage(
    gl: &glow::Context,
    source: &ShaderSource,
    kind: u32,
    stage: &'static str,
    text: &str,
) -> Result<glow::NativeShader, ShaderError> {
    let shader = gl.create_shader(kind).map_err(|reason| ShaderError::Allocate {
        name: source.name.clone(),
        reason,
    })?;
    gl.shader_source(shader, text);
    gl.compile_shader(shader);
    if !gl.get_shader_compile_status(shader) {
        let log = gl.get_shader_info_log(shader);
        gl.delete_shader(shader);
        return Err(ShaderError::Compile {
            name: source.name.clone(),
            stage,
            log,
        });
    }
    Ok(shader)
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;

    pub(crate) fn stub_program(
        attributes: HashMap<Attribute, Option<u32>>,
        uniforms: HashMap<Uniform, Option<glow::NativeUniformLocation>>,
    ) -> ShaderProgram {
        ShaderProgram {
            name: "stub".to_string(),
            program: glow::NativeProgram(NonZeroU32::new(1).unwrap()),
            attributes,
            uniforms,
        }
    }

    #[test]
    fn component_counts_match_buffer_layout() {
        assert_eq!(Attribute::Position.components(), 3);
        assert_eq!(Attribute::Color.components(), 4);
        assert_eq!(Attribute::TexCoord.components(), 2);
        assert_eq!(Attribute::Normal.components(), 3);
    }

    #[test]
    fn blinn_phong_maps_no_sampler() {
        let source = ShaderSource::blinn_phong(String::new(), String::new());
        assert!(source.uniforms.contains_key(&Uniform::LightPower));
        assert!(!source.uniforms.contains_key(&Uniform::Sampler));
        assert!(!source.attributes.contains_key(&Attribute::Color));
    }

    #[test]
    fn textured_variant_adds_texcoord_and_sampler() {
        let source = ShaderSource::textured_blinn_phong(String::new(), String::new());
        assert_eq!(source.name, "textured_blinn_phong");
        assert!(source.attributes.contains_key(&Attribute::TexCoord));
        assert!(source.uniforms.contains_key(&Uniform::Sampler));
        assert!(source.uniforms.contains_key(&Uniform::Shininess));
    }

    #[test]
    fn basic_textured_has_no_lighting_rig() {
        let source = ShaderSource::basic_textured(String::new(), String::new());
        assert!(source.uniforms.contains_key(&Uniform::Sampler));
        assert!(source.uniforms.contains_key(&Uniform::TextureSize));
        assert!(!source.uniforms.contains_key(&Uniform::LightPosition));
    }

    #[test]
    fn unmapped_and_stripped_symbols_both_read_as_absent() {
        let mut attributes = HashMap::new();
        attributes.insert(Attribute::Position, Some(0));
        attributes.insert(Attribute::Normal, None);
        let mut uniforms = HashMap::new();
        uniforms.insert(Uniform::Projection, Some(glow::NativeUniformLocation(2)));
        uniforms.insert(Uniform::Shininess, None);
        let program = stub_program(attributes, uniforms);

        assert_eq!(program.attribute(Attribute::Position), Some(0));
        assert_eq!(program.attribute(Attribute::Normal), None);
        assert_eq!(program.attribute(Attribute::Color), None);
        assert!(program.uniform(Uniform::Projection).is_some());
        assert!(program.uniform(Uniform::Shininess).is_none());
        assert!(program.uniform(Uniform::Sampler).is_none());
    }
}
