use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Collapse runs of whitespace (including newlines) into single spaces.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate a string to fit within `max_cells` terminal cells, appending `…` if truncated.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    let budget = max_cells - 1; // one cell for '…'
    let mut width = 0;
    let mut result = String::new();
    for grapheme in s.graphemes(true) {
        let gw = UnicodeWidthStr::width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        result.push_str(grapheme);
    }
    result.push('\u{2026}');
    result
}

/// Right-pad with spaces to `cells` display cells. Longer strings are returned as-is.
pub fn pad_to_width(s: &str, cells: usize) -> String {
    let w = display_width(s);
    if w >= cells {
        return s.to_string();
    }
    format!("{}{}", s, " ".repeat(cells - w))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_width_ascii_and_wide() {
        assert_eq!(display_width("Vendas"), 6);
        assert_eq!(display_width("販売"), 4);
        assert_eq!(display_width("cafe\u{0301}"), 4);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn single_line_collapses_whitespace() {
        assert_eq!(single_line("  Monthly\n  revenue\tby region "), "Monthly revenue by region");
    }

    #[test]
    fn truncate_no_truncation_needed() {
        assert_eq!(truncate_to_width("Sales", 10), "Sales");
        assert_eq!(truncate_to_width("Sales", 5), "Sales");
    }

    #[test]
    fn truncate_ascii() {
        assert_eq!(truncate_to_width("Monthly revenue", 8), "Monthly\u{2026}");
    }

    #[test]
    fn truncate_wide_boundary() {
        // 4 cells of budget fit "販売", the third wide char would overflow
        assert_eq!(truncate_to_width("販売報告", 5), "販売\u{2026}");
        let result = truncate_to_width("販売報告", 4);
        assert!(display_width(&result) <= 4);
    }

    #[test]
    fn truncate_tiny_widths() {
        assert_eq!(truncate_to_width("hello", 0), "");
        assert_eq!(truncate_to_width("hello", 1), "\u{2026}");
    }

    #[test]
    fn pad_respects_display_width() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("販", 4), "販  ");
        assert_eq!(pad_to_width("toolong", 3), "toolong");
    }
}
