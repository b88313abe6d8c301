//! Terminal display width helpers.
//!
//! ANSI-aware width calculation so slide text can be padded and truncated to
//! the carousel region without counting escape sequences.

/// Compute the display width of a string after stripping ANSI escapes.
pub fn display_width(text: &str) -> usize {
    let clean = strip_ansi_escapes::strip(text);
    let clean_str = String::from_utf8_lossy(&clean);
    unicode_width::UnicodeWidthStr::width(&*clean_str)
}

/// Truncate `text` so it occupies at most `max_width` cells, marking the cut with `…`.
pub fn truncate_display(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }

    let mut result = String::new();
    let mut width = 0usize;
    for ch in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + w >= max_width {
            if width < max_width {
                result.push('…');
            }
            break;
        }
        width += w;
        result.push(ch);
    }
    result
}
