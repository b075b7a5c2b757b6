// src/scanner/declarations.rs

//! Qualified declaration extraction.
//!
//! Finds every `<qualifier> <type> name[, name...];` declaration and turns it
//! into the flat list of names a graphics API exposes: the bare name for a
//! builtin type, or one `name.leaf` entry per leaf for a struct type.

use log::{debug, trace};

use super::builtins::BuiltinRegistry;
use super::lexer::{
    find_keyword, next_token, skip_array_suffix, skip_initializer, skip_whitespace_and_comments,
    KeywordSearch,
};
use super::structs::StructTable;

/// Classification of a type token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TypeClass<'t> {
    Builtin,
    /// A known struct, carrying its flattened leaves.
    Struct(&'t [String]),
    Unknown,
}

/// Builtins win over structs, so a struct named like a builtin family is
/// never expanded.
pub(super) fn classify<'t>(token: &str, registry: &BuiltinRegistry, table: &'t StructTable) -> TypeClass<'t> {
    if registry.is_builtin(token) {
        return TypeClass::Builtin;
    }
    match table.get(token) {
        Some(leaves) => TypeClass::Struct(leaves),
        None => TypeClass::Unknown,
    }
}

/// Reads comma-separated declarators starting right after a type token.
///
/// Each declarator is the run of tokens up to its `,` or `;`; normally a
/// single name, but qualified members such as `mediump vec3 c` leave the
/// real type in front of the name. Array suffixes and `= ...` initializers
/// are skipped. Stops after the terminating `;`, or on a `}` (left
/// unconsumed) or the end of input. Returns the declarators in source order
/// and the offset where reading stopped.
pub(super) fn read_declarators(src: &str, offset: usize) -> (Vec<Vec<&str>>, usize) {
    let bytes = src.as_bytes();
    let mut declarators = Vec::new();
    let mut current = Vec::new();
    let mut pos = offset;

    let end = loop {
        pos = skip_whitespace_and_comments(src, pos);
        if pos >= bytes.len() {
            break bytes.len();
        }

        match bytes[pos] {
            b';' => break pos + 1,
            b'}' => break pos,
            b',' => {
                declarators.push(std::mem::take(&mut current));
                pos += 1;
            }
            b'[' => pos = skip_array_suffix(src, pos),
            b'=' => pos = skip_initializer(src, pos),
            _ => {
                let (token, after) = next_token(src, pos);
                if token.is_empty() {
                    pos += 1;
                    continue;
                }
                // `x=1.0` reaches us as one token.
                match token.find('=') {
                    Some(eq) => {
                        if eq > 0 {
                            current.push(&token[..eq]);
                        }
                        pos += eq;
                    }
                    None => {
                        current.push(token);
                        pos = after;
                    }
                }
            }
        }
    };

    declarators.push(current);
    declarators.retain(|tokens: &Vec<&str>| !tokens.is_empty());
    (declarators, end)
}

/// Extracts every name declared with `qualifier` in `src`.
///
/// `table` must already describe the whole source. Declarations whose type is
/// neither builtin nor a known struct produce nothing.
pub fn extract_declarations(
    src: &str,
    qualifier: &str,
    registry: &BuiltinRegistry,
    table: &StructTable,
    search: KeywordSearch,
) -> Vec<String> {
    let mut declared = Vec::new();
    let mut cursor = 0;

    while let Some(hit) = find_keyword(src, qualifier, cursor, search) {
        let after_qualifier = hit + qualifier.len();
        let pos = skip_whitespace_and_comments(src, after_qualifier);
        let (type_token, after_type) = next_token(src, pos);

        let class = classify(type_token, registry, table);
        if class == TypeClass::Unknown {
            debug!(
                "{} at byte {}: type '{}' is neither builtin nor a known struct, skipped",
                qualifier, hit, type_token
            );
            cursor = after_type.max(after_qualifier);
            continue;
        }

        let (declarators, end) = read_declarators(src, after_type);
        for name in declarators.into_iter().flatten() {
            match class {
                TypeClass::Struct(leaves) => {
                    declared.extend(leaves.iter().map(|leaf| format!("{}.{}", name, leaf)));
                }
                _ => declared.push(name.to_owned()),
            }
        }
        cursor = end.max(after_qualifier);
    }

    trace!("{} declarations: {:?}", qualifier, declared);
    declared
}
