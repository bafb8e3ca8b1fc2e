use std::mem;

use unicode_width::UnicodeWidthChar;

/// Hard-wraps `text` to `width` display columns.
///
/// Breaks at character boundaries; wide characters never straddle a break.
/// An empty line yields one empty row.
pub fn wrap_line(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut row = String::new();
    let mut used = 0;

    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width && !row.is_empty() {
            rows.push(mem::take(&mut row));
            used = 0;
        }
        row.push(ch);
        used += w;
    }
    rows.push(row);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_line_unchanged() {
        assert_eq!(wrap_line("1 2 +", 10), vec!["1 2 +"]);
        assert_eq!(wrap_line("", 10), vec![""]);
    }

    #[test]
    fn test_long_line_breaks_at_width() {
        assert_eq!(wrap_line("abcdefg", 3), vec!["abc", "def", "g"]);
    }

    #[test]
    fn test_wide_chars_do_not_split() {
        assert_eq!(wrap_line("a中中", 3), vec!["a中", "中"]);
    }
}
