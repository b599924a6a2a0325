//! Korean-aware name collation.
//!
//! Approximates the `ko` locale ordering without a full UCA table:
//! punctuation and symbols < digits < Hangul < Han < Latin and other scripts.
//! Hangul syllables are already laid out in 가나다 order in Unicode, so code
//! point order inside the Hangul class is the dictionary order.

use core::cmp::Ordering;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Script {
    Separator,
    Digit,
    Hangul,
    Han,
    Other,
}

fn script_of(c: char) -> Script {
    match c as u32 {
        0xAC00..=0xD7A3 | 0x1100..=0x11FF | 0x3130..=0x318F | 0xA960..=0xA97F
        | 0xD7B0..=0xD7FF => Script::Hangul,
        0x4E00..=0x9FFF | 0x3400..=0x4DBF | 0xF900..=0xFAFF | 0x20000..=0x2FFFF => Script::Han,
        _ if c.is_numeric() => Script::Digit,
        _ if c.is_alphabetic() => Script::Other,
        _ => Script::Separator,
    }
}

fn primary_key(c: char) -> (Script, u32) {
    let script = script_of(c);
    let weight = match script {
        Script::Digit => c.to_digit(10).unwrap_or(c as u32),
        _ => c.to_lowercase().next().unwrap_or(c) as u32,
    };
    (script, weight)
}

/// Total order over names.
///
/// Case only decides between names that are otherwise equal (lowercase
/// first); byte order settles whatever is left so distinct names never tie.
pub fn collate(a: &str, b: &str) -> Ordering {
    a.chars()
        .map(primary_key)
        .cmp(b.chars().map(primary_key))
        .then_with(|| {
            a.chars()
                .map(|c| c.is_uppercase())
                .cmp(b.chars().map(|c| c.is_uppercase()))
        })
        .then_with(|| a.cmp(b))
}
