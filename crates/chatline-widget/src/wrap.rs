//! Character-based hard wrapping shared by the log and the input box.

/// Hard-wrap `text` to `width` characters, keeping explicit line breaks.
///
/// An empty line stays one empty row, so the result is never empty.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for line in text.split('\n') {
        let chars: Vec<char> = line.chars().collect();
        if chars.is_empty() {
            out.push(String::new());
            continue;
        }
        out.extend(chars.chunks(width).map(|c| c.iter().collect::<String>()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_long_lines_and_keeps_breaks() {
        assert_eq!(wrap("abcdef", 4), vec!["abcd", "ef"]);
        assert_eq!(wrap("a\n\nb", 4), vec!["a", "", "b"]);
        assert_eq!(wrap("", 4), vec![""]);
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(wrap("ééé", 2), vec!["éé", "é"]);
    }

    #[test]
    fn zero_width_wraps_per_character() {
        assert_eq!(wrap("ab", 0), vec!["a", "b"]);
    }
}
