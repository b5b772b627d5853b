use crate::core::model_path::ModelPath;
use crate::state::explorer::Explorer;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers, TerminalSize};
use crate::ui::rows::TreeRow;
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};
use crate::ui::view::TreeView;

/// Header, scroll footer, status and hint lines around the tree.
const CHROME_ROWS: usize = 4;
const PAGE_SIZE: isize = 10;
const BROWSE_HINTS: &str = "↑↓ move  → expand  ← collapse  e edit  d delete  t text  \
    E expand all  C collapse all  q quit";
const TEXT_HINTS: &str = "Ctrl+S apply  Ctrl+U clear  Esc cancel";
const EXPANDING_STATUS: &str = "Expanding all nodes";

enum Mode {
    Browse,
    Edit { path: ModelPath, buffer: String },
    /// Whole-document editing; starts from the current text form.
    Text { buffer: String },
}

/// Terminal front end over an [`Explorer`]: keys in, frames out.
pub struct App {
    explorer: Explorer,
    view: TreeView,
    mode: Mode,
    status: Option<String>,
    row_limit: Option<usize>,
    should_exit: bool,
}

impl App {
    pub fn new(explorer: Explorer, row_limit: Option<usize>) -> Self {
        Self {
            explorer,
            view: TreeView::new(row_limit),
            mode: Mode::Browse,
            status: None,
            row_limit,
            should_exit: false,
        }
    }

    pub fn explorer(&self) -> &Explorer {
        &self.explorer
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub fn has_pending_work(&self) -> bool {
        self.explorer.has_pending_work()
    }

    pub fn active_row(&self) -> Option<TreeRow> {
        self.view.active_row(&self.explorer.rows()).cloned()
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, Mode::Edit { .. })
    }

    pub fn is_editing_text(&self) -> bool {
        matches!(self.mode, Mode::Text { .. })
    }

    pub fn resize(&mut self, size: TerminalSize) {
        let available = (size.height as usize).saturating_sub(CHROME_ROWS).max(1);
        let limit = self.row_limit.map_or(available, |limit| limit.min(available));
        self.view.set_max_visible(limit);
        self.view.clamp(self.explorer.rows().len());
    }

    /// Runs one deferred turn and applies any scroll request it produced.
    pub fn tick(&mut self) -> bool {
        let ran = self.explorer.tick();
        if !self.explorer.is_loading() && self.status.as_deref() == Some(EXPANDING_STATUS) {
            self.status = None;
        }
        if let Some(id) = self.explorer.take_scroll_request() {
            let rows = self.explorer.rows();
            self.view.focus_row(&id, &rows);
        }
        ran
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_exit = true;
            return;
        }
        match self.mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::Edit { .. } => self.handle_edit_key(key),
            Mode::Text { .. } => self.handle_text_key(key),
        }
        self.view.clamp(self.explorer.rows().len());
    }

    /// Pasted text goes into whichever buffer is open. In browse mode it
    /// opens the text editor with the pasted text as the whole document.
    pub fn handle_paste(&mut self, text: &str) {
        if let Mode::Edit { buffer, .. } | Mode::Text { buffer } = &mut self.mode {
            buffer.push_str(text);
            return;
        }
        self.mode = Mode::Text {
            buffer: text.to_string(),
        };
        self.status = None;
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        let rows = self.explorer.rows();
        let total = rows.len();
        let active = self.view.active_row(&rows).cloned();

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.view.move_by(-1, total);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.view.move_by(1, total);
            }
            KeyCode::PageUp => {
                self.view.page_by(-PAGE_SIZE, total);
            }
            KeyCode::PageDown => {
                self.view.page_by(PAGE_SIZE, total);
            }
            KeyCode::Home => self.view.set_active(0, total),
            KeyCode::End => self.view.set_active(total.saturating_sub(1), total),
            KeyCode::Right | KeyCode::Char('l') => {
                let Some(row) = active else {
                    return;
                };
                if row.has_children && !row.expanded {
                    self.explorer.expand(&row.path, true);
                } else if row.has_children {
                    self.view.move_by(1, total);
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                let Some(row) = active else {
                    return;
                };
                if row.expanded {
                    self.explorer.collapse(&row.path);
                } else if let Some(parent) = self.view.parent_index(&rows) {
                    self.view.set_active(parent, total);
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let Some(row) = active else {
                    return;
                };
                if row.has_children {
                    self.explorer.toggle(&row.path);
                } else {
                    self.begin_edit(&row.path);
                }
            }
            KeyCode::Char('e') => {
                if let Some(row) = active {
                    self.begin_edit(&row.path);
                }
            }
            KeyCode::Char('d') => {
                if let Some(row) = active {
                    self.remove(&row.path);
                }
            }
            KeyCode::Char('E') => {
                self.explorer.expand_all();
                self.status = Some(EXPANDING_STATUS.to_string());
            }
            KeyCode::Char('t') => {
                self.mode = Mode::Text {
                    buffer: self.explorer.text().to_string(),
                };
                self.status = None;
            }
            KeyCode::Char('C') => {
                self.explorer.collapse_all();
                self.view.set_active(0, total);
            }
            KeyCode::Char('q') | KeyCode::Esc => self.should_exit = true,
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let Mode::Edit { buffer, .. } = &mut self.mode else {
            return;
        };
        match key.code {
            KeyCode::Char(ch) => buffer.push(ch),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Esc => {
                self.explorer.cancel_edit();
                self.mode = Mode::Browse;
                self.status = None;
            }
            KeyCode::Enter => {
                let raw = std::mem::take(buffer);
                self.mode = Mode::Browse;
                match self.explorer.commit_edit(&raw) {
                    Ok(path) => {
                        self.status = Some(format!("Updated {path}"));
                        self.explorer.reveal(&path);
                    }
                    Err(err) => self.status = Some(err.to_string()),
                }
            }
            _ => {}
        }
    }

    fn handle_text_key(&mut self, key: KeyEvent) {
        let Mode::Text { buffer } = &mut self.mode else {
            return;
        };
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if control => {
                let raw = std::mem::take(buffer);
                self.mode = Mode::Browse;
                self.apply_text(raw);
            }
            KeyCode::Char('u') if control => buffer.clear(),
            KeyCode::Char(ch) => buffer.push(ch),
            KeyCode::Enter => buffer.push('\n'),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                self.status = None;
            }
            _ => {}
        }
    }

    /// A rejected document leaves the last good tree on screen; the
    /// validation line reports the parse error.
    fn apply_text(&mut self, raw: String) {
        match self.explorer.apply_editor_text(raw) {
            Ok(()) => {
                self.status = Some("Document replaced".to_string());
                self.view.set_active(0, self.explorer.rows().len());
            }
            Err(_) => self.status = None,
        }
    }

    fn begin_edit(&mut self, path: &ModelPath) {
        match self.explorer.begin_edit(path) {
            Ok(current) => {
                let buffer = current.to_string();
                self.mode = Mode::Edit {
                    path: path.clone(),
                    buffer,
                };
                self.status = None;
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    fn remove(&mut self, path: &ModelPath) {
        match self.explorer.remove_at(path) {
            Ok(_) => {
                self.status = Some(format!("Removed {path}"));
                if let Some(parent) = path.parent() {
                    self.explorer.reveal(&parent);
                }
            }
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    pub fn frame(&self) -> Vec<SpanLine> {
        let rows = self.explorer.rows();
        let mut lines = Vec::with_capacity(rows.len() + CHROME_ROWS);

        let mut header = vec![Span::styled(
            "JSON Explorer",
            Style::new().color(Color::Cyan).bold(),
        )];
        if self.explorer.is_loading() {
            header.push(Span::styled(
                "  ⟳ expanding…",
                Style::new().color(Color::Yellow),
            ));
        }
        lines.push(header);

        match &self.mode {
            Mode::Text { buffer } => lines.extend(self.text_lines(buffer)),
            _ => lines.extend(self.view.render_lines(&rows, self.explorer.is_loading())),
        }

        if let Some(message) = self.explorer.validation_message() {
            lines.push(vec![Span::styled(message, Style::new().color(Color::Red))]);
        } else if let Some(status) = &self.status {
            lines.push(vec![Span::styled(status.clone(), Style::new().color(Color::DarkGrey))]);
        }

        match &self.mode {
            Mode::Edit { path, buffer } => lines.push(vec![
                Span::styled(format!("{path} = "), Style::new().color(Color::Cyan)),
                Span::new(buffer.clone()),
                Span::styled("▏", Style::new().color(Color::Yellow)),
            ]),
            Mode::Text { .. } => lines.push(vec![Span::styled(
                TEXT_HINTS,
                Style::new().color(Color::DarkGrey),
            )]),
            Mode::Browse => lines.push(vec![Span::styled(
                BROWSE_HINTS,
                Style::new().color(Color::DarkGrey),
            )]),
        }

        lines
    }

    /// The tail of the buffer that fits the tree area, with a cursor after
    /// the last character.
    fn text_lines(&self, buffer: &str) -> Vec<SpanLine> {
        let all: Vec<&str> = buffer.split('\n').collect();
        let limit = self.view.max_visible().unwrap_or(all.len()).max(1);
        let start = all.len().saturating_sub(limit);
        let last = all.len() - 1;
        all[start..]
            .iter()
            .enumerate()
            .map(|(offset, line)| {
                let mut spans = vec![Span::new(line.to_string())];
                if start + offset == last {
                    spans.push(Span::styled("▏", Style::new().color(Color::Yellow)));
                }
                spans
            })
            .collect()
    }
}
