// src/scanner/builtins.rs

//! Registry of builtin shading-language types.
//!
//! Builtins are never expanded into fields. Scalar-ish names match exactly;
//! vector, matrix, sampler and image types come in so many sized and typed
//! variants that they are matched by family: any type token that *contains*
//! a family name (`sampler2DArrayShadow` contains `sampler`) is a builtin.
//! A user struct whose name happens to contain a family name is therefore
//! treated as a builtin too.

/// Exact-match builtin names registered by default.
pub const DEFAULT_EXACT_TYPES: &[&str] = &["int", "uint", "bool", "float", "double", "atomic_uint"];

/// Family names registered by default.
pub const DEFAULT_FAMILY_TYPES: &[&str] = &["vec", "mat", "image", "sampler"];

/// How a registered builtin name is matched against a type token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinMatch {
    /// The type token must equal the name.
    Exact,
    /// The type token must contain the name.
    Family,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinRegistry {
    exact: Vec<String>,
    family: Vec<String>,
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        BuiltinRegistry {
            exact: DEFAULT_EXACT_TYPES.iter().map(|s| s.to_string()).collect(),
            family: DEFAULT_FAMILY_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl BuiltinRegistry {
    /// Creates a registry holding the default builtin set.
    pub fn new() -> Self {
        BuiltinRegistry::default()
    }

    /// Creates a registry with nothing registered.
    pub fn empty() -> Self {
        BuiltinRegistry {
            exact: Vec::new(),
            family: Vec::new(),
        }
    }

    /// Registers an additional builtin name.
    pub fn register(&mut self, name: impl Into<String>, matching: BuiltinMatch) {
        let name = name.into();
        if name.is_empty() {
            return;
        }
        match matching {
            BuiltinMatch::Exact => self.exact.push(name),
            BuiltinMatch::Family => self.family.push(name),
        }
    }

    /// Drops every registration and reinstalls the defaults.
    pub fn reset_to_defaults(&mut self) {
        *self = BuiltinRegistry::default();
    }

    pub fn exact(&self) -> &[String] {
        &self.exact
    }

    pub fn family(&self) -> &[String] {
        &self.family
    }

    /// Returns `true` if `token` names a builtin type.
    pub fn is_builtin(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        self.exact.iter().any(|name| name == token)
            || self.family.iter().any(|name| token.contains(name.as_str()))
    }
}
