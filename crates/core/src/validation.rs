//! Grammar checks for caller-supplied strings
//!
//! Both predicates are pure and context-free, so they can run before any
//! request work starts.
//!
//! # Literal bounding box (WSEN)
//!
//! ```text
//! wsen   := number "," number "," number "," number
//! number := [+-]? digit+ ("." digit*)?
//! ```
//!
//! # JSONP callback
//!
//! ```text
//! callback := segment ("." segment)*
//! segment  := identifier ("[" digit+ "]")*
//! identifier := id_start id_part*      (not a reserved word)
//! id_start := Unicode letter | letter number | "$" | "_"
//! id_part  := id_start | combining mark | decimal digit | connector punctuation
//! ```
//!
//! Anything else (whitespace, parentheses, semicolons, quotes, escapes) is
//! rejected.

use once_cell::sync::Lazy;
use regex::Regex;

/// Anchored WSEN pattern: four comma-separated signed decimals.
static WSEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?[0-9]+(?:\.[0-9]*)?(?:,[+-]?[0-9]+(?:\.[0-9]*)?){3}$")
        .unwrap()
});

/// One dotted segment of a callback: identifier plus optional numeric indexes.
static CALLBACK_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([\p{L}\p{Nl}$_][\p{L}\p{Nl}\p{Mn}\p{Mc}\p{Nd}\p{Pc}$_]*)(?:\[[0-9]+\])*$")
        .unwrap()
});

/// Reserved words, future reserved words and literals that cannot name a function.
const RESERVED_WORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "implements",
    "import", "in", "instanceof", "interface", "let", "new", "null", "package", "private",
    "protected", "public", "return", "static", "super", "switch", "this", "throw", "true", "try",
    "typeof", "var", "void", "while", "with", "yield", "await",
];

/// Message returned in place of the payload when a callback fails validation.
pub const INVALID_CALLBACK_MESSAGE: &str =
    "Callback must be valid Javascript identifier as defined in the ECMAScript specification";

/// Returns true if `value` is a structurally valid literal WSEN bounding box.
///
/// This checks shape only. Ordering (W ≤ E, S ≤ N) is checked once the
/// corners have been parsed.
pub fn is_valid_wsen(value: &str) -> bool {
    WSEN_PATTERN.is_match(value)
}

/// Returns true if `name` may be used as a JSONP callback.
pub fn is_valid_callback(name: &str) -> bool {
    if name.is_empty() {
        return false;
    }

    name.split('.').all(|segment| {
        CALLBACK_SEGMENT
            .captures(segment)
            .and_then(|caps| caps.get(1))
            .is_some_and(|ident| !is_reserved_word(ident.as_str()))
    })
}

fn is_reserved_word(identifier: &str) -> bool {
    RESERVED_WORDS.contains(&identifier)
}
