//! Single-key escape and unescape.

use std::borrow::Cow;

const BACKSLASH: &str = "\\\\";
const DOLLAR: &str = "\\u0024";
const DOT: &str = "\\u002e";

/// Encode a key so that it neither starts with `$` nor contains `.`.
///
/// Keys that need no change are returned borrowed.
pub fn escape_key(key: &str) -> Cow<'_, str> {
    if is_store_safe(key) && !key.contains('\\') {
        return Cow::Borrowed(key);
    }
    let mut out = String::with_capacity(key.len() + 8);
    for (i, ch) in key.char_indices() {
        match ch {
            '\\' => out.push_str(BACKSLASH),
            '$' if i == 0 => out.push_str(DOLLAR),
            '.' => out.push_str(DOT),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Decode a key produced by [`escape_key`].
///
/// A backslash that does not start a known sequence is kept as-is.
pub fn unescape_key(key: &str) -> Cow<'_, str> {
    if !key.contains('\\') {
        return Cow::Borrowed(key);
    }
    let mut out = String::with_capacity(key.len());
    let mut rest = key;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        rest = if let Some(r) = tail.strip_prefix(BACKSLASH) {
            out.push('\\');
            r
        } else if let Some(r) = tail.strip_prefix(DOT) {
            out.push('.');
            r
        } else if let Some(r) = tail.strip_prefix(DOLLAR) {
            out.push('$');
            r
        } else {
            out.push('\\');
            &tail[1..]
        };
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Whether the backing store would accept `key` verbatim.
pub fn is_store_safe(key: &str) -> bool {
    !key.starts_with('$') && !key.contains('.')
}
