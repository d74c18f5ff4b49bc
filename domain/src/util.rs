//! Shared utility functions.

/// Shorten `s` to at most `max_bytes` bytes for log lines.
///
/// Cuts on a UTF-8 character boundary and appends `…` when anything was
/// dropped. Line breaks are flattened to spaces so one preview stays on one
/// log line.
pub fn preview(s: &str, max_bytes: usize) -> String {
    let cut = if s.len() <= max_bytes {
        s
    } else {
        let mut end = max_bytes;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    };

    let mut out: String = cut
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    if cut.len() < s.len() {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_unchanged() {
        assert_eq!(preview("hi", 10), "hi");
    }

    #[test]
    fn long_text_gets_ellipsis() {
        assert_eq!(preview("stream relay", 6), "stream…");
    }

    #[test]
    fn never_splits_a_character() {
        // 3 bytes per character
        assert_eq!(preview("程序员", 4), "程…");
        assert_eq!(preview("程序员", 9), "程序员");
    }

    #[test]
    fn newlines_are_flattened() {
        assert_eq!(preview("a\nb\r\nc", 64), "a b  c");
    }
}
