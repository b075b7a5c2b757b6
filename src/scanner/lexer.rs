// src/scanner/lexer.rs

//! Lexical helpers for the declaration scanner.
//!
//! Everything here is a pure function of `(source, offset)`. Offsets are byte
//! offsets into the source; every delimiter the scanner cares about is ASCII,
//! so a token boundary always falls on a `char` boundary.

use log::trace;
use serde::{Deserialize, Serialize};

/// Bytes that terminate a token in addition to whitespace.
const TOKEN_DELIMITERS: &[u8] = b";{},/[";

/// How qualifier and `struct` keywords are located in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordSearch {
    /// Plain substring search. `myuniformColor` matches `uniform`, and so
    /// does an occurrence inside a comment.
    RawSubstring,
    /// The match must not be glued to identifier characters on either side,
    /// and occurrences inside comments are ignored.
    #[default]
    WordBoundary,
}

/// ASCII whitespace as shader sources use it: `u8::is_ascii_whitespace`
/// plus vertical tab.
#[inline]
fn is_whitespace_byte(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == b'\x0B'
}

#[inline]
fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Skips whitespace (including vertical tab), `//` line comments and `/* */` block comments,
/// repeating until neither applies. Never returns more than `src.len()`.
pub fn skip_whitespace_and_comments(src: &str, offset: usize) -> usize {
    let bytes = src.as_bytes();
    let len = bytes.len();
    let mut pos = offset.min(len);

    loop {
        while pos < len && is_whitespace_byte(bytes[pos]) {
            pos += 1;
        }

        match comment_end(bytes, pos) {
            Some(end) => pos = end,
            None => return pos,
        }
    }
}

/// If a comment starts at `pos`, returns the offset just past it.
///
/// A line comment stops at (not past) the first `\n` or `\r`. A block
/// comment stops right after `*/`, or at the end of input if unterminated.
fn comment_end(bytes: &[u8], pos: usize) -> Option<usize> {
    if pos + 1 >= bytes.len() || bytes[pos] != b'/' {
        return None;
    }

    match bytes[pos + 1] {
        b'/' => {
            let body = &bytes[pos + 2..];
            let end = body
                .iter()
                .position(|&b| b == b'\n' || b == b'\r')
                .map_or(bytes.len(), |i| pos + 2 + i);
            Some(end)
        }
        b'*' => {
            let body = &bytes[pos + 2..];
            let end = body
                .windows(2)
                .position(|w| w == b"*/")
                .map_or(bytes.len(), |i| pos + 2 + i + 2);
            Some(end)
        }
        _ => None,
    }
}

/// Reads a token starting exactly at `offset`.
///
/// A token runs until whitespace (including vertical tab), one of `; { } , / [`, or the end of
/// input. Leading whitespace is not skipped; if `offset` already sits on a
/// delimiter the returned token is empty and the offset is unchanged.
pub fn next_token(src: &str, offset: usize) -> (&str, usize) {
    let bytes = src.as_bytes();
    let start = offset.min(bytes.len());
    let end = bytes[start..]
        .iter()
        .position(|&b| is_whitespace_byte(b) || TOKEN_DELIMITERS.contains(&b))
        .map_or(bytes.len(), |i| start + i);

    (&src[start..end], end)
}

/// Given `offset` on a `[`, returns the offset just past the matching `]`
/// (or the end of input). The bracket contents are discarded.
pub fn skip_array_suffix(src: &str, offset: usize) -> usize {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut pos = offset;

    while pos < bytes.len() {
        match bytes[pos] {
            b'[' => depth += 1,
            b']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return pos + 1;
                }
            }
            _ => {}
        }
        pos += 1;
    }

    bytes.len()
}

/// Given `offset` on an `=`, skips the initializer expression and returns the
/// offset of the `,` or `;` that ends it (outside any parentheses or
/// braces), or the end of input.
pub fn skip_initializer(src: &str, offset: usize) -> usize {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut pos = offset + 1;

    while pos < bytes.len() {
        match bytes[pos] {
            b'(' | b'{' | b'[' => depth += 1,
            b')' | b'}' | b']' => depth = depth.saturating_sub(1),
            b',' | b';' if depth == 0 => return pos,
            _ => {}
        }
        pos += 1;
    }

    bytes.len()
}

/// Finds the next occurrence of `keyword` at or after `from`, returning the
/// byte offset of its first character.
pub fn find_keyword(src: &str, keyword: &str, from: usize, search: KeywordSearch) -> Option<usize> {
    if keyword.is_empty() || from >= src.len() {
        return None;
    }

    match search {
        KeywordSearch::RawSubstring => src[from..].find(keyword).map(|i| from + i),
        KeywordSearch::WordBoundary => find_keyword_bounded(src, keyword, from),
    }
}

/// Single forward pass: comments are jumped over whole, so every byte is
/// looked at a bounded number of times.
fn find_keyword_bounded(src: &str, keyword: &str, from: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    let needle = keyword.as_bytes();
    let mut pos = from;

    while pos < bytes.len() {
        if bytes[pos] == b'/' {
            pos = comment_end(bytes, pos).unwrap_or(pos + 1);
            continue;
        }

        if bytes[pos..].starts_with(needle) {
            let end = pos + needle.len();
            let before_ok = pos == 0 || !is_ident_byte(bytes[pos - 1]);
            let after_ok = end >= bytes.len() || !is_ident_byte(bytes[end]);
            if before_ok && after_ok {
                return Some(pos);
            }
            trace!("ignoring embedded '{}' at byte {}", keyword, pos);
        }
        pos += 1;
    }

    None
}
