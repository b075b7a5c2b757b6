// src/program/backend.rs
//
// Defines the `GraphicsBackend` trait, which abstracts over the graphics API
// that compiles, links and feeds shader programs.

use std::fmt;

use anyhow::Result;

/// A resolved uniform or attribute location.
pub type Location = i32;

/// Location reported for names the linked program does not expose, and for
/// every name when linking failed.
pub const INACTIVE_LOCATION: Location = -1;

/// Pipeline stage a shader source is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    TessellationControl,
    TessellationEvaluation,
    Geometry,
    Fragment,
    Compute,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::TessellationControl => "tessellation control",
            ShaderStage::TessellationEvaluation => "tessellation evaluation",
            ShaderStage::Geometry => "geometry",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Compute => "compute",
        };
        f.write_str(name)
    }
}

/// A value written to a uniform location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue<'a> {
    F32(f32),
    F64(f64),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    DVec2([f64; 2]),
    DVec3([f64; 3]),
    DVec4([f64; 4]),
    /// Column-major 3x3 matrix.
    Mat3([f32; 9]),
    /// Column-major 4x4 matrix.
    Mat4([f32; 16]),
    DMat3([f64; 9]),
    DMat4([f64; 16]),
    U32(u32),
    U32Array(&'a [u32]),
    I32(i32),
    /// Texture unit bound to a sampler uniform.
    Texture(i32),
}

/// The graphics API operations a [`ShaderProgram`](super::ShaderProgram)
/// needs.
///
/// Errors returned by `compile` and `link` should carry the API's info log;
/// the program object copies it into its own log buffer.
pub trait GraphicsBackend {
    /// Handle of a compiled shader object.
    type Shader: Copy + fmt::Debug;
    /// Handle of a linked program object.
    type Program: Copy + fmt::Debug + PartialEq;

    /// Compiles one shader stage.
    fn compile(&mut self, stage: ShaderStage, source: &str) -> Result<Self::Shader>;

    /// Links compiled shaders into a program.
    fn link(&mut self, shaders: &[Self::Shader]) -> Result<Self::Program>;

    /// Resolves a uniform name; [`INACTIVE_LOCATION`] if the program has none.
    fn uniform_location(&mut self, program: Self::Program, name: &str) -> Location;

    /// Resolves an attribute name; [`INACTIVE_LOCATION`] if the program has none.
    fn attribute_location(&mut self, program: Self::Program, name: &str) -> Location;

    /// Makes `program` current, or unbinds with `None`.
    fn use_program(&mut self, program: Option<Self::Program>);

    fn delete_shader(&mut self, shader: Self::Shader);

    fn delete_program(&mut self, program: Self::Program);

    /// Writes a value to a uniform location of the current program.
    fn set_uniform(&mut self, location: Location, value: &UniformValue<'_>);
}
