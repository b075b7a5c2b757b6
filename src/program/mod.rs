// src/program/mod.rs

//! Host-side shader program.
//!
//! A `ShaderProgram` compiles shader sources through a [`GraphicsBackend`],
//! scans each source for uniform and attribute declarations, links the
//! compiled stages and then resolves every scanned name, struct leaves
//! included, to a location once. Lookups and uniform writes afterwards go
//! through the cached locations.

pub mod backend;
pub mod mock;

use std::collections::HashMap;
use std::fmt::Write as _;

use anyhow::{anyhow, bail, Result};
use log::{debug, info, warn};

pub use backend::{GraphicsBackend, Location, ShaderStage, UniformValue, INACTIVE_LOCATION};

use crate::scanner::{BuiltinRegistry, ShaderScanner};

/// Compiled stages, scanned names and resolved locations of one program.
pub struct ShaderProgram<B: GraphicsBackend> {
    backend: B,
    scanner: ShaderScanner,
    shaders: Vec<B::Shader>,
    program: Option<B::Program>,
    pending_uniforms: Vec<String>,
    pending_attributes: Vec<String>,
    uniforms: HashMap<String, Location>,
    attributes: HashMap<String, Location>,
    log: String,
}

impl<B: GraphicsBackend> ShaderProgram<B> {
    pub fn new(backend: B, scanner: ShaderScanner) -> Self {
        ShaderProgram {
            backend,
            scanner,
            shaders: Vec::new(),
            program: None,
            pending_uniforms: Vec::new(),
            pending_attributes: Vec::new(),
            uniforms: HashMap::new(),
            attributes: HashMap::new(),
            log: String::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Builtin registry used for sources loaded from now on.
    pub fn registry_mut(&mut self) -> &mut BuiltinRegistry {
        self.scanner.registry_mut()
    }

    /// Accumulated compile/link diagnostics, if any.
    pub fn log(&self) -> Option<&str> {
        if self.log.is_empty() {
            None
        } else {
            Some(&self.log)
        }
    }

    /// Names scanned from loaded sources and not yet resolved.
    pub fn pending_uniforms(&self) -> &[String] {
        &self.pending_uniforms
    }

    pub fn pending_attributes(&self) -> &[String] {
        &self.pending_attributes
    }

    pub fn is_linked(&self) -> bool {
        self.program.is_some()
    }

    /// Compiles `source` for `stage` and queues its declarations.
    ///
    /// The source is scanned even when compilation fails. Names from several
    /// sources accumulate without deduplication until [`finalize`].
    ///
    /// [`finalize`]: ShaderProgram::finalize
    pub fn load(&mut self, stage: ShaderStage, source: &str) -> Result<()> {
        let compiled = self.backend.compile(stage, source);

        let uniforms = self.scanner.scan_uniforms(source);
        let attributes = self.scanner.scan_attributes(source);
        debug!(
            "{} shader declares {} uniform(s), {} attribute(s)",
            stage,
            uniforms.len(),
            attributes.len()
        );
        self.pending_uniforms.extend(uniforms);
        self.pending_attributes.extend(attributes);

        match compiled {
            Ok(shader) => {
                self.shaders.push(shader);
                Ok(())
            }
            Err(e) => {
                let _ = writeln!(self.log, "LD:{:#}", e);
                Err(e.context(format!("Failed to compile {} shader", stage)))
            }
        }
    }

    /// Links every compiled stage and resolves all queued names.
    ///
    /// If linking fails the names are still cached, at
    /// [`INACTIVE_LOCATION`], and the error is returned afterwards. The
    /// log is cleared on success.
    pub fn finalize(&mut self) -> Result<()> {
        if self.shaders.is_empty() {
            self.log.push_str("finalize(): no compiled shaders found\n");
            bail!("No compiled shaders to link");
        }

        if let Some(previous) = self.program.take() {
            let _ = writeln!(
                self.log,
                "finalize(): previous program {:?} is still active, shutting it down",
                previous
            );
            warn!("replacing still active program {:?}", previous);
            self.backend.use_program(None);
            self.backend.delete_program(previous);
        }

        let link_error = match self.backend.link(&self.shaders) {
            Ok(program) => {
                self.program = Some(program);
                None
            }
            Err(e) => {
                let _ = writeln!(self.log, "LNK:{:#}", e);
                Some(e)
            }
        };

        for shader in self.shaders.drain(..) {
            self.backend.delete_shader(shader);
        }

        self.uniforms.clear();
        self.attributes.clear();
        for name in std::mem::take(&mut self.pending_attributes) {
            let location = match self.program {
                Some(program) => self.backend.attribute_location(program, &name),
                None => INACTIVE_LOCATION,
            };
            self.attributes.entry(name).or_insert(location);
        }
        for name in std::mem::take(&mut self.pending_uniforms) {
            let location = match self.program {
                Some(program) => self.backend.uniform_location(program, &name),
                None => INACTIVE_LOCATION,
            };
            self.uniforms.entry(name).or_insert(location);
        }

        match link_error {
            Some(e) => Err(e.context("Failed to link shader program")),
            None => {
                info!(
                    "program linked: {} uniform(s), {} attribute(s)",
                    self.uniforms.len(),
                    self.attributes.len()
                );
                self.log.clear();
                Ok(())
            }
        }
    }

    /// Cached location of a scanned uniform name such as `light.color`.
    pub fn uniform(&self, name: &str) -> Option<Location> {
        self.uniforms.get(name).copied()
    }

    /// Cached location of a scanned attribute name.
    pub fn attribute(&self, name: &str) -> Option<Location> {
        self.attributes.get(name).copied()
    }

    pub fn uniform_names(&self) -> impl Iterator<Item = &str> {
        self.uniforms.keys().map(String::as_str)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn bind(&mut self) -> Result<()> {
        let program = self.program.ok_or_else(|| anyhow!("Program is not linked"))?;
        self.backend.use_program(Some(program));
        Ok(())
    }

    pub fn unbind(&mut self) {
        self.backend.use_program(None);
    }

    /// Writes `value` to a uniform by name. Names that were never scanned
    /// are ignored.
    pub fn set_uniform(&mut self, name: &str, value: UniformValue<'_>) {
        match self.uniform(name) {
            Some(location) => self.backend.set_uniform(location, &value),
            None => debug!("uniform '{}' is not resolved, write ignored", name),
        }
    }

    /// Writes `value` to an already resolved location.
    pub fn set_uniform_at(&mut self, location: Location, value: UniformValue<'_>) {
        self.backend.set_uniform(location, &value);
    }

    /// Releases the program and every compiled stage and forgets all names.
    pub fn unload(&mut self) {
        if let Some(program) = self.program.take() {
            self.unbind();
            self.backend.delete_program(program);
        }
        for shader in self.shaders.drain(..) {
            self.backend.delete_shader(shader);
        }
        self.pending_uniforms.clear();
        self.pending_attributes.clear();
        self.uniforms.clear();
        self.attributes.clear();
    }
}

impl<B: GraphicsBackend> Drop for ShaderProgram<B> {
    fn drop(&mut self) {
        self.unload();
    }
}
