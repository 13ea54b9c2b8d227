use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

const LIGATURES: [(char, &str); 7] = [
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"),
    ('\u{FB06}', "st"),
];

/// Clean up the text of a single extracted span.
///
/// NFC-normalizes, expands ligatures, drops replacement and control
/// characters, and collapses whitespace runs to one space. The result is
/// trimmed; an empty string means the span carries no text.
pub fn clean_span_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.nfc() {
        match LIGATURES.iter().find(|(lig, _)| *lig == c) {
            Some((_, expanded)) => result.push_str(expanded),
            None if c == '\u{FFFD}' => {}
            None if c.is_control() && !c.is_whitespace() => {}
            None => result.push(c),
        }
    }

    static RE_WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let re_whitespace = RE_WHITESPACE.get_or_init(|| Regex::new(r"\s+").unwrap());
    re_whitespace.replace_all(result.trim(), " ").into_owned()
}
