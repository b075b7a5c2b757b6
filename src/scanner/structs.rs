// src/scanner/structs.rs

//! Struct table construction.
//!
//! Every `struct Name { ... }` block in a source is flattened into the ordered
//! list of dot-joined leaf paths it exposes. Members typed with a struct that
//! was defined earlier in the source are expanded through that struct's
//! already flattened entry, so no entry ever contains a struct-typed leaf.

use std::collections::HashMap;

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use super::builtins::BuiltinRegistry;
use super::declarations::{classify, read_declarators, TypeClass};
use super::lexer::{find_keyword, next_token, skip_whitespace_and_comments};
use super::ScanOptions;

const STRUCT_KEYWORD: &str = "struct";

/// What happens when a struct name is defined twice in one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructRedefinition {
    /// The later definition replaces the earlier one.
    #[default]
    LastWins,
    /// The first definition is kept and later ones are dropped.
    KeepFirst,
}

/// Struct name to flattened leaf paths, in member order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructTable {
    entries: HashMap<String, Vec<String>>,
}

impl StructTable {
    pub fn new() -> Self {
        StructTable::default()
    }

    /// Leaf paths of `name`, if such a struct was scanned.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn insert(&mut self, name: &str, leaves: Vec<String>, policy: StructRedefinition) {
        match (self.entries.contains_key(name), policy) {
            (true, StructRedefinition::KeepFirst) => {
                debug!("struct '{}' redefined, keeping the first definition", name);
            }
            (exists, _) => {
                if exists {
                    debug!("struct '{}' redefined, replacing the earlier definition", name);
                }
                trace!("struct '{}' -> {:?}", name, leaves);
                self.entries.insert(name.to_owned(), leaves);
            }
        }
    }
}

/// Scans the whole source for struct definitions.
///
/// A `struct` keyword that is not followed by a name and a `{` stops the
/// scan; entries collected before that point are kept. A body that never
/// closes is not registered.
pub fn build_struct_table(src: &str, registry: &BuiltinRegistry, options: &ScanOptions) -> StructTable {
    let bytes = src.as_bytes();
    let mut table = StructTable::new();
    let mut cursor = 0;

    while let Some(hit) = find_keyword(src, STRUCT_KEYWORD, cursor, options.keyword_search) {
        let pos = skip_whitespace_and_comments(src, hit + STRUCT_KEYWORD.len());
        let (name, after_name) = next_token(src, pos);
        let mut pos = skip_whitespace_and_comments(src, after_name);

        if pos >= bytes.len() || bytes[pos] != b'{' {
            warn!(
                "malformed struct '{}' at byte {}: expected '{{', abandoning struct scan",
                name, hit
            );
            break;
        }
        pos += 1;

        let mut leaves = Vec::new();
        loop {
            pos = skip_whitespace_and_comments(src, pos);
            if pos >= bytes.len() {
                warn!("struct '{}' at byte {} is never closed", name, hit);
                return table;
            }
            if bytes[pos] == b'}' {
                break;
            }

            let (type_token, after_type) = next_token(src, pos);
            if type_token.is_empty() {
                // Stray delimiter such as a lone ';'.
                pos += 1;
                continue;
            }

            let (declarators, end) = read_declarators(src, after_type);
            pos = end;

            // Precision or other qualifiers push the real type right before
            // the first name: `mediump vec3 c, d;`.
            let member_type = match declarators.first() {
                Some(first) if first.len() > 1 => first[first.len() - 2],
                _ => type_token,
            };
            let members: Vec<&str> = declarators.iter().filter_map(|tokens| tokens.last().copied()).collect();

            match classify(member_type, registry, &table) {
                TypeClass::Builtin => {
                    leaves.extend(members.iter().map(|member| member.to_string()));
                }
                TypeClass::Struct(nested) => {
                    for member in &members {
                        leaves.extend(nested.iter().map(|leaf| format!("{}.{}", member, leaf)));
                    }
                }
                TypeClass::Unknown => {
                    debug!(
                        "struct '{}': member type '{}' is unknown or not yet defined, keeping {:?} as plain leaves",
                        name, member_type, members
                    );
                    leaves.extend(members.iter().map(|member| member.to_string()));
                }
            }
        }

        if name.is_empty() {
            debug!("anonymous struct at byte {} skipped", hit);
        } else {
            table.insert(name, leaves, options.struct_redefinition);
        }
        cursor = pos + 1;
    }

    table
}
