//! Command text expansion.
//!
//! Caller-supplied SQL uses the generic `?` marker for every parameter; this
//! module rewrites those markers into the dialect's real tokens. A doubled
//! `??` escapes a literal question mark and does not consume an argument.
//!
//! The argument counter is an explicit local owned by the caller: the command
//! builder threads one running counter across all predicates of a fetch, and
//! starts a fresh counter for each ad-hoc command string.

use crate::dialect::ParamStyle;

/// Expand generic `?` markers in `text` into `style` parameter tokens.
///
/// `counter` holds the zero-based ordinal of the next parameter and is
/// advanced once per non-escaped marker.
pub fn expand_text(text: &str, style: ParamStyle, counter: &mut usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '?' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'?') {
            // Escaped literal: emit one '?', consume both, count nothing.
            chars.next();
            out.push('?');
            continue;
        }
        style.write_name(*counter, &mut out);
        *counter += 1;
    }

    out
}

/// Count the non-escaped `?` markers in `text`.
///
/// This is the number of arguments the expanded command will bind.
pub fn count_markers(text: &str) -> usize {
    let mut count = 0;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '?' {
            if chars.peek() == Some(&'?') {
                chars.next();
            } else {
                count += 1;
            }
        }
    }
    count
}
