//! Plain-text layout helpers: word wrapping and two-column tables.

/// Total width help output is wrapped to.
pub const MAX_WIDTH: usize = 80;

/// Narrowest description column before descriptions move below their name.
const MIN_DESCRIPTION_WIDTH: usize = 20;

/// Gap between the name and description columns.
const COLUMN_GAP: usize = 2;

/// Word-wraps `text` to `width` columns.
///
/// Explicit line breaks are kept. Words longer than `width` are not split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_len = 0;
        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if line_len > 0 && line_len + 1 + word_len > width {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.push_str(word);
            line_len += word_len;
        }
        lines.push(line);
    }

    lines
}

/// Wraps `text` to `max_width`, indenting every line by `indent` spaces.
pub fn indented(text: &str, indent: usize, max_width: usize) -> String {
    let pad = " ".repeat(indent);
    let mut out = String::new();
    for line in wrap(text, max_width.saturating_sub(indent)) {
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str(&format!("{pad}{line}\n"));
        }
    }
    out
}

/// Writes `head` followed by `text`, wrapping continuation lines so they
/// line up after `head`.
pub fn hanging(head: &str, text: &str, max_width: usize) -> String {
    if text.is_empty() {
        return format!("{}\n", head.trim_end());
    }
    let indent = head.chars().count() + 1;
    let pad = " ".repeat(indent);
    let mut out = String::new();
    for (i, line) in wrap(text, max_width.saturating_sub(indent)).iter().enumerate() {
        if i == 0 {
            out.push_str(&format!("{head} {line}\n"));
        } else {
            out.push_str(&format!("{pad}{line}\n"));
        }
    }
    out
}

/// Lays out `(name, description)` rows in two columns.
///
/// Names are indented by `indent`; descriptions start in a shared column and
/// wrap within `max_width`. When that column would be too narrow, each
/// description goes on the lines below its name instead.
pub fn two_columns(rows: &[(String, String)], indent: usize, max_width: usize) -> String {
    let name_width = rows
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0);
    let pad = " ".repeat(indent);
    let desc_col = indent + name_width + COLUMN_GAP;
    let desc_width = max_width.saturating_sub(desc_col);

    let mut out = String::new();
    for (name, description) in rows {
        if description.trim().is_empty() {
            out.push_str(&format!("{pad}{name}\n"));
            continue;
        }

        if desc_width < MIN_DESCRIPTION_WIDTH {
            out.push_str(&format!("{pad}{name}\n"));
            out.push_str(&indented(description, indent + 4, max_width));
            continue;
        }

        let lines = wrap(description, desc_width);
        for (i, line) in lines.iter().enumerate() {
            if i == 0 {
                out.push_str(&format!(
                    "{pad}{name:<width$}{gap}{line}\n",
                    width = name_width,
                    gap = " ".repeat(COLUMN_GAP)
                ));
            } else {
                out.push_str(&format!("{}{line}\n", " ".repeat(desc_col)));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_breaks_on_words() {
        let lines = wrap("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_wrap_keeps_long_words_and_newlines() {
        let lines = wrap("abcdefghijkl x\nnext", 5);
        assert_eq!(lines, vec!["abcdefghijkl", "x", "next"]);
    }

    #[test]
    fn test_two_columns_align() {
        let rows = vec![
            ("-h, --help".to_string(), "Prints help message".to_string()),
            ("--int <int>".to_string(), "A number".to_string()),
        ];
        let out = two_columns(&rows, 2, MAX_WIDTH);
        assert_eq!(
            out,
            "  -h, --help   Prints help message\n  --int <int>  A number\n"
        );
    }

    #[test]
    fn test_two_columns_wraps_descriptions() {
        let rows = vec![("name".to_string(), "word ".repeat(30))];
        let out = two_columns(&rows, 2, 40);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 40));
        assert!(lines[1].starts_with("        word"));
    }

    #[test]
    fn test_two_columns_narrow_falls_below() {
        let rows = vec![("x".repeat(70), "described here".to_string())];
        let out = two_columns(&rows, 2, MAX_WIDTH);
        assert_eq!(out.lines().nth(1), Some("      described here"));
    }

    #[test]
    fn test_hanging_indent() {
        let out = hanging("  prog", &"arg ".repeat(30), 40);
        for line in out.lines().skip(1) {
            assert!(line.starts_with("       arg"));
        }
    }
}
