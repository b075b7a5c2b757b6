// src/scanner/mod.rs

//! Shader interface declaration scanning.
//!
//! Given shading-language source text, finds every `uniform` or `attribute`
//! declaration and flattens struct-typed ones into the dot-separated leaf
//! names a graphics API resolves individually (`light.color`).
//!
//! A scan is two passes over the source: the struct table is built from the
//! whole buffer first, then declarations are extracted against it.

mod builtins;
mod declarations;
mod lexer;
mod structs;

pub use builtins::{BuiltinMatch, BuiltinRegistry, DEFAULT_EXACT_TYPES, DEFAULT_FAMILY_TYPES};
pub use declarations::extract_declarations;
pub use lexer::{find_keyword, next_token, skip_whitespace_and_comments, KeywordSearch};
pub use structs::{build_struct_table, StructRedefinition, StructTable};

use log::debug;

use crate::config::Config;

/// Qualifier introducing uniform declarations.
pub const UNIFORM: &str = "uniform";
/// Qualifier introducing vertex attribute declarations.
pub const ATTRIBUTE: &str = "attribute";

/// Behavioural switches for a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanOptions {
    pub keyword_search: KeywordSearch,
    pub struct_redefinition: StructRedefinition,
}

/// Scans shader sources with a fixed builtin registry and options.
///
/// The scanner holds no per-scan state: every call rebuilds its struct table
/// from the given source, so scanning the same text twice gives the same
/// result and a `&ShaderScanner` can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct ShaderScanner {
    registry: BuiltinRegistry,
    options: ScanOptions,
}

impl ShaderScanner {
    /// Creates a scanner with the default builtins and options.
    pub fn new() -> Self {
        ShaderScanner::default()
    }

    pub fn with_options(registry: BuiltinRegistry, options: ScanOptions) -> Self {
        ShaderScanner { registry, options }
    }

    /// Builds a scanner from a loaded configuration: default builtins plus
    /// the configured extras.
    pub fn from_config(config: &Config) -> Self {
        let mut registry = BuiltinRegistry::new();
        for name in &config.extra_exact_types {
            registry.register(name.as_str(), BuiltinMatch::Exact);
        }
        for name in &config.extra_family_types {
            registry.register(name.as_str(), BuiltinMatch::Family);
        }
        let options = ScanOptions {
            keyword_search: config.keyword_search,
            struct_redefinition: config.struct_redefinition,
        };
        ShaderScanner::with_options(registry, options)
    }

    pub fn registry(&self) -> &BuiltinRegistry {
        &self.registry
    }

    /// Mutable access for registering extra builtins before scanning.
    pub fn registry_mut(&mut self) -> &mut BuiltinRegistry {
        &mut self.registry
    }

    pub fn options(&self) -> ScanOptions {
        self.options
    }

    /// Builds the struct table of `src` on its own.
    pub fn struct_table(&self, src: &str) -> StructTable {
        build_struct_table(src, &self.registry, &self.options)
    }

    /// Returns the flattened names of every declaration introduced by
    /// `qualifier`, in declaration order then struct leaf order.
    pub fn scan_declarations(&self, src: &str, qualifier: &str) -> Vec<String> {
        let table = self.struct_table(src);
        debug!("scanning '{}' declarations against {} struct(s)", qualifier, table.len());
        extract_declarations(src, qualifier, &self.registry, &table, self.options.keyword_search)
    }

    pub fn scan_uniforms(&self, src: &str) -> Vec<String> {
        self.scan_declarations(src, UNIFORM)
    }

    pub fn scan_attributes(&self, src: &str) -> Vec<String> {
        self.scan_declarations(src, ATTRIBUTE)
    }
}

/// Scans `src` for uniforms with a default scanner.
pub fn scan_uniforms(src: &str) -> Vec<String> {
    ShaderScanner::new().scan_uniforms(src)
}

/// Scans `src` for attributes with a default scanner.
pub fn scan_attributes(src: &str) -> Vec<String> {
    ShaderScanner::new().scan_attributes(src)
}

#[cfg(test)]
mod tests;
