// Dweve Graphbind - Typed Object-Graph Mapper
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Identifier escaping for generated Cypher.
//!
//! Labels, relationship types, and property names are the only pieces of
//! caller-controlled text that are interpolated into query strings (all
//! values travel as parameters). This module keeps that interpolation
//! injection-safe: identifiers are NFC-normalized, stripped of control and
//! invisible formatting characters, and backtick-quoted when they are not
//! plain identifiers or collide with a Cypher keyword.

use unicode_normalization::UnicodeNormalization;

/// Check if a string is a plain Cypher identifier: a letter or underscore
/// followed by letters, digits, and underscores.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Characters that must never survive into query text: controls, zero-width
/// characters, and bidirectional formatting marks.
fn is_dangerous(c: char) -> bool {
    c.is_control()
        || matches!(
            c,
            '\u{200B}'..='\u{200D}'
                | '\u{FEFF}'
                | '\u{202A}'..='\u{202E}'
                | '\u{2066}'..='\u{2069}'
                | '\u{00AD}'
                | '\u{061C}'
                | '\u{180E}'
        )
}

/// Escape an identifier (label, relationship type, or property name) for
/// interpolation into Cypher.
///
/// The identifier is NFC-normalized and filtered of dangerous characters
/// first; the result is backtick-quoted unless it is a plain identifier
/// that is not a Cypher keyword.
pub fn escape_identifier(s: &str) -> String {
    let sanitized: String = s.nfc().filter(|c| !is_dangerous(*c)).collect();

    if is_valid_identifier(&sanitized) && !is_cypher_keyword(&sanitized) {
        sanitized
    } else {
        format!("`{}`", sanitized.replace('`', "``"))
    }
}

/// Convert a string to a plain identifier by replacing invalid characters
/// with underscores. Used for derived names such as constraint names,
/// which may not be backtick-quoted in all store versions.
pub fn to_identifier(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 1);
    for (i, c) in s.nfc().filter(|c| !is_dangerous(*c)).enumerate() {
        if i == 0 && c.is_ascii_digit() {
            result.push('_');
        }
        if c.is_ascii_alphanumeric() || c == '_' {
            result.push(c);
        } else {
            result.push('_');
        }
    }
    if result.is_empty() {
        result.push('_');
    }
    result
}

/// Check if a string is a Cypher reserved keyword.
fn is_cypher_keyword(s: &str) -> bool {
    matches!(
        s.to_uppercase().as_str(),
        "ALL" | "AND"
            | "AS"
            | "ASC"
            | "BY"
            | "CALL"
            | "CASE"
            | "CONSTRAINT"
            | "CONTAINS"
            | "CREATE"
            | "DELETE"
            | "DESC"
            | "DETACH"
            | "DISTINCT"
            | "DROP"
            | "ELSE"
            | "END"
            | "ENDS"
            | "EXISTS"
            | "FALSE"
            | "FOR"
            | "IN"
            | "IS"
            | "LIMIT"
            | "MATCH"
            | "MERGE"
            | "NOT"
            | "NULL"
            | "ON"
            | "OPTIONAL"
            | "OR"
            | "ORDER"
            | "REMOVE"
            | "REQUIRE"
            | "RETURN"
            | "SET"
            | "SKIP"
            | "STARTS"
            | "THEN"
            | "TRUE"
            | "UNION"
            | "UNIQUE"
            | "UNWIND"
            | "WHEN"
            | "WHERE"
            | "WITH"
            | "XOR"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(is_valid_identifier("name"));
        assert!(is_valid_identifier("_private"));
        assert!(is_valid_identifier("Movie2"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("2movie"));
        assert!(!is_valid_identifier("my-label"));
        assert!(!is_valid_identifier("café"));
    }

    #[test]
    fn test_escape_plain_identifier_unchanged() {
        assert_eq!(escape_identifier("Movie"), "Movie");
        assert_eq!(escape_identifier("rel_type"), "rel_type");
    }

    #[test]
    fn test_escape_backticks_when_needed() {
        assert_eq!(escape_identifier("My Label"), "`My Label`");
        assert_eq!(escape_identifier("123name"), "`123name`");
        assert_eq!(escape_identifier("MATCH"), "`MATCH`");
        assert_eq!(escape_identifier("back`tick"), "`back``tick`");
    }

    #[test]
    fn test_escape_strips_control_characters() {
        assert_eq!(escape_identifier("Mo\u{0000}vie"), "Movie");
        assert_eq!(escape_identifier("Mo\u{200B}vie"), "Movie");
        assert_eq!(escape_identifier("Mo\u{202E}vie"), "Movie");
    }

    #[test]
    fn test_escape_normalizes_unicode() {
        // Composed and decomposed forms of "é" escape identically.
        let composed = "caf\u{00E9}";
        let decomposed = "cafe\u{0301}";
        assert_eq!(escape_identifier(composed), escape_identifier(decomposed));
    }

    #[test]
    fn test_to_identifier() {
        assert_eq!(to_identifier("Movie_title_unique"), "Movie_title_unique");
        assert_eq!(to_identifier("My Label"), "My_Label");
        assert_eq!(to_identifier("2fast"), "_2fast");
        assert_eq!(to_identifier(""), "_");
    }

    #[test]
    fn test_keywords_detected_case_insensitively() {
        assert!(is_cypher_keyword("match"));
        assert!(is_cypher_keyword("Require"));
        assert!(!is_cypher_keyword("Movie"));
    }
}
