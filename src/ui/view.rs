use crate::core::value::ValueKind;
use crate::ui::rows::TreeRow;
use crate::ui::scroll::ScrollState;
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};

/// Cursor and scroll position over a list of visible rows. Rows are rebuilt
/// by the caller after every change, so the view only keeps indices.
#[derive(Debug, Clone, Default)]
pub struct TreeView {
    active: usize,
    scroll: ScrollState,
}

impl TreeView {
    pub fn new(max_visible: Option<usize>) -> Self {
        Self {
            active: 0,
            scroll: ScrollState::new(max_visible),
        }
    }

    pub fn set_max_visible(&mut self, max_visible: usize) {
        self.scroll.max_visible = Some(max_visible.max(1));
    }

    pub fn max_visible(&self) -> Option<usize> {
        self.scroll.max_visible
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_row<'a>(&self, rows: &'a [TreeRow]) -> Option<&'a TreeRow> {
        rows.get(self.active)
    }

    pub fn set_active(&mut self, index: usize, total: usize) {
        self.active = index;
        self.clamp(total);
    }

    pub fn clamp(&mut self, total: usize) {
        ScrollState::clamp_active(&mut self.active, total);
        self.scroll.ensure_visible(self.active, total);
    }

    pub fn move_by(&mut self, delta: isize, total: usize) -> bool {
        if total == 0 {
            return false;
        }
        let len = total as isize;
        let next = ((self.active as isize + delta).rem_euclid(len)) as usize;
        if next == self.active {
            return false;
        }
        self.active = next;
        self.scroll.ensure_visible(self.active, total);
        true
    }

    /// Moves by `delta` without wrapping, stopping at either end.
    pub fn page_by(&mut self, delta: isize, total: usize) -> bool {
        if total == 0 {
            return false;
        }
        let next = (self.active as isize + delta).clamp(0, total as isize - 1) as usize;
        if next == self.active {
            return false;
        }
        self.set_active(next, total);
        true
    }

    pub fn focus_row(&mut self, id: &str, rows: &[TreeRow]) -> bool {
        let Some(index) = rows.iter().position(|row| row.id == id) else {
            return false;
        };
        self.set_active(index, rows.len());
        true
    }

    pub fn parent_index(&self, rows: &[TreeRow]) -> Option<usize> {
        let row = rows.get(self.active)?;
        let target_depth = row.depth.checked_sub(1)?;
        (0..self.active).rev().find(|&idx| rows[idx].depth == target_depth)
    }

    pub fn render_lines(&self, rows: &[TreeRow], loading: bool) -> Vec<SpanLine> {
        let total = rows.len();
        let (start, end) = self.scroll.visible_range(total);
        let inactive_style = Style::new().color(Color::DarkGrey);
        let active_style = Style::new().color(Color::Cyan).bold();

        let mut lines = Vec::with_capacity(end - start + 1);
        for (index, row) in rows.iter().enumerate().take(end).skip(start) {
            let active = index == self.active;
            let cursor = if active {
                Span::styled("❯ ", Style::new().color(Color::Yellow))
            } else {
                Span::new("  ")
            };
            let icon = match (row.has_children, row.expanded) {
                (false, _) => "  ",
                (true, _) if loading => "⟳ ",
                (true, true) => "▼ ",
                (true, false) => "▶ ",
            };
            let label_style = if active {
                active_style
            } else if row.has_children {
                Style::new().color(Color::Blue).bold()
            } else {
                Style::default()
            };

            lines.push(vec![
                cursor,
                Span::new("  ".repeat(row.depth)),
                Span::styled(icon, if active { active_style } else { inactive_style }),
                Span::styled(row.label.clone(), label_style),
                Span::styled(": ", inactive_style),
                Span::styled(row.display.clone(), value_style(row)),
            ]);
        }

        if let Some(text) = self.scroll.footer(total) {
            lines.push(vec![Span::styled(text, inactive_style)]);
        }
        lines
    }
}

fn value_style(row: &TreeRow) -> Style {
    if row.has_children {
        return Style::new().color(Color::DarkGrey);
    }
    match row.kind {
        ValueKind::String => Style::new().color(Color::Green),
        ValueKind::Number => Style::new().color(Color::Yellow),
        ValueKind::Bool => Style::new().color(Color::Magenta),
        ValueKind::Null | ValueKind::Object | ValueKind::Array => {
            Style::new().color(Color::DarkGrey)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model_path::ModelPath;
    use crate::state::expansion::ExpansionStore;
    use crate::ui::rows::visible_rows;
    use serde_json::json;

    fn sample_rows() -> Vec<TreeRow> {
        let root = json!({"a": {"b": 0, "c": [1, 2]}, "d": true});
        let mut store = ExpansionStore::new();
        store.expand(&ModelPath::from(["a", "c"]), true);
        visible_rows(&root, store.map())
    }

    fn line_text(line: &SpanLine) -> String {
        line.iter().map(|span| span.text.as_str()).collect()
    }

    #[test]
    fn move_wraps_around() {
        let rows = sample_rows();
        let mut view = TreeView::new(None);
        assert!(view.move_by(-1, rows.len()));
        assert_eq!(view.active_index(), rows.len() - 1);
        assert!(view.move_by(1, rows.len()));
        assert_eq!(view.active_index(), 0);
    }

    #[test]
    fn page_stops_at_ends() {
        let rows = sample_rows();
        let mut view = TreeView::new(None);
        assert!(view.page_by(100, rows.len()));
        assert_eq!(view.active_index(), rows.len() - 1);
        assert!(!view.page_by(1, rows.len()));
    }

    #[test]
    fn focus_row_by_id_and_find_parent() {
        let rows = sample_rows();
        let mut view = TreeView::new(Some(2));
        assert!(view.focus_row("a.c.1", &rows));
        assert_eq!(view.active_row(&rows).map(|row| row.id.as_str()), Some("a.c.1"));
        let parent = view.parent_index(&rows).expect("has parent");
        assert_eq!(rows[parent].id, "a.c");
        assert!(!view.focus_row("missing", &rows));
    }

    #[test]
    fn render_marks_active_row_and_icons() {
        let rows = sample_rows();
        let view = TreeView::new(None);
        let lines = view.render_lines(&rows, false);
        assert_eq!(lines.len(), rows.len());
        assert_eq!(line_text(&lines[0]), "❯ ▼ Root: {2}");
        assert_eq!(line_text(&lines[2]), "        b: 0");
        assert_eq!(line_text(&lines[3]), "      ▼ c: [2]");
        assert_eq!(line_text(&lines[5]), "          1: 2");
    }

    #[test]
    fn render_shows_loading_icon_and_footer() {
        let rows = sample_rows();
        let view = TreeView::new(Some(3));
        let lines = view.render_lines(&rows, true);
        assert_eq!(lines.len(), 4);
        assert!(line_text(&lines[0]).contains('⟳'));
        assert!(line_text(&lines[3]).starts_with("[1-3 of"));
    }
}
