use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::element::TextAlign;

pub fn display_width(s: &str) -> usize {
    s.width()
}

pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Collapse line breaks and tabs so a cell stays on one terminal line.
pub fn single_line(s: &str) -> String {
    s.chars()
        .map(|c| if c == '\n' || c == '\t' || c == '\r' { ' ' } else { c })
        .collect()
}

pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    let current_width = display_width(s);
    if current_width <= max_width {
        return s.to_string();
    }

    if max_width == 0 {
        return String::new();
    }

    let ellipsis = "…";
    let target_width = max_width.saturating_sub(1);

    let mut result = String::new();
    let mut width = 0;

    for ch in s.chars() {
        let ch_width = char_width(ch);
        if width + ch_width > target_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }

    result.push_str(ellipsis);
    result
}

pub fn align_offset(text_width: usize, available_width: usize, align: TextAlign) -> usize {
    if text_width >= available_width {
        return 0;
    }

    match align {
        TextAlign::Left => 0,
        TextAlign::Center => (available_width - text_width) / 2,
        TextAlign::Right => available_width - text_width,
    }
}

/// Truncate or pad `s` to exactly `width` display columns.
pub fn fit_to_width(s: &str, width: usize, align: TextAlign) -> String {
    let truncated = truncate_to_width(s, width);
    let text_width = display_width(&truncated);
    let left = align_offset(text_width, width, align);
    let right = width.saturating_sub(text_width + left);
    format!("{}{}{}", " ".repeat(left), truncated, " ".repeat(right))
}
