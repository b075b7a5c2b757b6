//! Shader interface scanning.
//!
//! `scanner` discovers the `uniform`/`attribute` declarations of GLSL-style
//! source text and flattens struct-typed ones into addressable leaf names;
//! `program` drives a graphics backend through compile, link and location
//! resolution using those names.

pub mod config;
pub mod program;
pub mod scanner;

pub use scanner::{scan_attributes, scan_uniforms, ShaderScanner};
