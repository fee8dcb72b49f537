use chatpane_core::TextInput;
use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use unicode_width::UnicodeWidthChar;

use crate::theme::Theme;

const PLACEHOLDER: &str = "Press i to type a message";

/// Single-line text input. The cursor is a char index, not a byte offset.
#[derive(Debug, Default)]
pub struct InputBox {
    text: String,
    cursor: usize,
    focused: bool,
}

impl InputBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' || c == '\r' {
            return;
        }
        let at = self.byte_index();
        self.text.insert(at, c);
        self.cursor += 1;
    }

    /// Inserts pasted text, flattening line breaks into spaces.
    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            match c {
                '\r' => {}
                '\n' => self.insert_char(' '),
                c => self.insert_char(c),
            }
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index();
        self.text.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.char_count() {
            return;
        }
        let at = self.byte_index();
        self.text.remove(at);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Terminal columns taken by the chars in `start..end`.
    fn columns(&self, start: usize, end: usize) -> usize {
        self.text
            .chars()
            .skip(start)
            .take(end.saturating_sub(start))
            .map(char_width)
            .sum()
    }

    /// First visible char so the cursor cell stays inside `width` columns.
    fn scroll_offset(&self, width: usize) -> usize {
        if width == 0 {
            return self.cursor;
        }

        let cursor_cell = self
            .text
            .chars()
            .nth(self.cursor)
            .map(char_width)
            .unwrap_or(1)
            .max(1);

        let mut offset = 0;
        while offset < self.cursor && self.columns(offset, self.cursor) + cursor_cell > width {
            offset += 1;
        }
        offset
    }

    /// Cursor position in columns from the left edge of the text area.
    fn cursor_column(&self, width: usize) -> usize {
        self.columns(self.scroll_offset(width), self.cursor)
    }

    fn visible_text(&self, width: usize) -> String {
        let mut used = 0;
        self.text
            .chars()
            .skip(self.scroll_offset(width))
            .take_while(|&c| {
                used += char_width(c);
                used <= width
            })
            .collect()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &dyn Theme) {
        let border_color = if self.focused {
            theme.accent()
        } else {
            theme.border()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .title(Span::styled(
                " Message ",
                Style::default()
                    .fg(theme.foreground())
                    .add_modifier(Modifier::BOLD),
            ));

        let inner = block.inner(area);
        let width = inner.width as usize;

        let line = if self.text.is_empty() && !self.focused {
            Line::from(Span::styled(
                PLACEHOLDER,
                Style::default()
                    .fg(theme.foreground_dim())
                    .add_modifier(Modifier::ITALIC),
            ))
        } else {
            Line::from(Span::styled(
                self.visible_text(width),
                Style::default().fg(theme.foreground()),
            ))
        };

        frame.render_widget(
            Paragraph::new(line)
                .block(block)
                .style(Style::default().bg(theme.background())),
            area,
        );

        if self.focused && inner.width > 0 && inner.height > 0 {
            let x = inner.x + self.cursor_column(width) as u16;
            frame.set_cursor_position(Position::new(x, inner.y));
        }
    }
}

fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

impl TextInput for InputBox {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn resign_focus(&mut self) {
        self.focused = false;
    }
}
