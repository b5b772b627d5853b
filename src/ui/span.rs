use crate::ui::style::Style;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::default(),
        }
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn width(&self) -> usize {
        UnicodeWidthStr::width(self.text.as_str())
    }
}

pub type SpanLine = Vec<Span>;

/// Cuts `line` so it occupies at most `width` terminal columns. Wide
/// characters that would straddle the edge are dropped.
pub fn clip_line(line: SpanLine, width: usize) -> SpanLine {
    let mut remaining = width;
    let mut out = Vec::with_capacity(line.len());
    for span in line {
        if remaining == 0 {
            break;
        }
        let span_width = span.width();
        if span_width <= remaining {
            remaining -= span_width;
            out.push(span);
            continue;
        }
        let mut text = String::new();
        for ch in span.text.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if ch_width > remaining {
                break;
            }
            remaining -= ch_width;
            text.push(ch);
        }
        out.push(Span::styled(text, span.style));
        break;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &SpanLine) -> String {
        line.iter().map(|span| span.text.as_str()).collect()
    }

    #[test]
    fn clip_keeps_short_lines() {
        let line = vec![Span::new("ab"), Span::new("cd")];
        assert_eq!(text(&clip_line(line, 10)), "abcd");
    }

    #[test]
    fn clip_cuts_inside_span() {
        let line = vec![Span::new("ab"), Span::new("cdef")];
        assert_eq!(text(&clip_line(line, 3)), "abc");
    }

    #[test]
    fn clip_counts_wide_characters() {
        let line = vec![Span::new("日本語")];
        assert_eq!(text(&clip_line(line, 5)), "日本");
    }
}
