// src/program/mock.rs

use std::collections::HashMap;

use anyhow::{anyhow, Result};

use super::backend::{GraphicsBackend, Location, ShaderStage, UniformValue, INACTIVE_LOCATION};

/// Sources containing this marker fail to compile.
pub const COMPILE_ERROR_MARKER: &str = "#error";

/// In-memory backend recording every call it receives.
///
/// Names are given sequential locations from 0 in first-request order.
/// Names listed with [`MockBackend::set_inactive`] resolve to
/// [`INACTIVE_LOCATION`].
#[derive(Debug, Default)]
pub struct MockBackend {
    next_handle: u32,
    next_location: Location,
    locations: HashMap<String, Location>,
    inactive: Vec<String>,
    fail_link: bool,
    compiled: Vec<(ShaderStage, u32)>,
    linked: Vec<Vec<u32>>,
    bound: Option<u32>,
    deleted_shaders: Vec<u32>,
    deleted_programs: Vec<u32>,
    uniform_writes: Vec<(Location, String)>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `link` call fail.
    pub fn fail_link(&mut self, fail: bool) {
        self.fail_link = fail;
    }

    pub fn set_inactive(&mut self, name: &str) {
        self.inactive.push(name.to_owned());
    }

    pub fn compiled(&self) -> &[(ShaderStage, u32)] {
        &self.compiled
    }

    /// Shader handles passed to each `link` call.
    pub fn linked(&self) -> &[Vec<u32>] {
        &self.linked
    }

    pub fn bound(&self) -> Option<u32> {
        self.bound
    }

    pub fn deleted_shaders(&self) -> &[u32] {
        &self.deleted_shaders
    }

    pub fn deleted_programs(&self) -> &[u32] {
        &self.deleted_programs
    }

    /// Location and debug rendering of every uniform write.
    pub fn uniform_writes(&self) -> &[(Location, String)] {
        &self.uniform_writes
    }

    fn handle(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    fn resolve(&mut self, name: &str) -> Location {
        if self.inactive.iter().any(|n| n == name) {
            return INACTIVE_LOCATION;
        }
        if let Some(&location) = self.locations.get(name) {
            return location;
        }
        let location = self.next_location;
        self.next_location += 1;
        self.locations.insert(name.to_owned(), location);
        location
    }
}

impl GraphicsBackend for MockBackend {
    type Shader = u32;
    type Program = u32;

    fn compile(&mut self, stage: ShaderStage, source: &str) -> Result<u32> {
        if let Some(line) = source.lines().position(|l| l.contains(COMPILE_ERROR_MARKER)) {
            return Err(anyhow!("0:{}: error directive", line + 1));
        }
        let shader = self.handle();
        self.compiled.push((stage, shader));
        Ok(shader)
    }

    fn link(&mut self, shaders: &[u32]) -> Result<u32> {
        self.linked.push(shaders.to_vec());
        if self.fail_link {
            return Err(anyhow!("link error: unresolved stage inputs"));
        }
        Ok(self.handle())
    }

    fn uniform_location(&mut self, _program: u32, name: &str) -> Location {
        self.resolve(name)
    }

    fn attribute_location(&mut self, _program: u32, name: &str) -> Location {
        self.resolve(name)
    }

    fn use_program(&mut self, program: Option<u32>) {
        self.bound = program;
    }

    fn delete_shader(&mut self, shader: u32) {
        self.deleted_shaders.push(shader);
    }

    fn delete_program(&mut self, program: u32) {
        self.deleted_programs.push(program);
    }

    fn set_uniform(&mut self, location: Location, value: &UniformValue<'_>) {
        self.uniform_writes.push((location, format!("{:?}", value)));
    }
}
