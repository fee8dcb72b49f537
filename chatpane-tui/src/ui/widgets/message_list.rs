use chatpane_core::{ConversationBinding, ListControl, Role};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::theme::Theme;

/// Scroll state of the conversation list.
///
/// The position is kept as a row offset from the bottom, so `0` means the
/// newest row is visible and new rows keep it pinned there.
#[derive(Debug, Default)]
pub struct MessageList {
    row_count: usize,
    offset_from_bottom: usize,
    reloads: u64,
}

impl MessageList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn reloads(&self) -> u64 {
        self.reloads
    }

    pub fn offset_from_bottom(&self) -> usize {
        self.offset_from_bottom
    }

    pub fn is_following_tail(&self) -> bool {
        self.offset_from_bottom == 0
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.offset_from_bottom = (self.offset_from_bottom + rows).min(self.max_offset());
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.offset_from_bottom = self.offset_from_bottom.saturating_sub(rows);
    }

    pub fn scroll_to_top(&mut self) {
        self.offset_from_bottom = self.max_offset();
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset_from_bottom = 0;
    }

    fn max_offset(&self) -> usize {
        self.row_count.saturating_sub(1)
    }

    /// Index one past the newest visible row.
    fn visible_end(&self) -> usize {
        self.row_count - self.offset_from_bottom
    }
}

impl ListControl for MessageList {
    fn reload_data(&mut self, row_count: usize) {
        if !self.is_following_tail() {
            let added = row_count.saturating_sub(self.row_count);
            self.offset_from_bottom += added;
        }
        self.row_count = row_count;
        self.offset_from_bottom = self.offset_from_bottom.min(self.max_offset());
        self.reloads += 1;
    }
}

pub struct MessageListView;

impl MessageListView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        binding: &ConversationBinding<MessageList>,
        theme: &dyn Theme,
    ) {
        let list = binding.list();

        let title = if list.is_following_tail() {
            " Conversation ".to_string()
        } else {
            format!(" Conversation (↑{}) ", list.offset_from_bottom())
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border()))
            .title(Span::styled(
                title,
                Style::default()
                    .fg(theme.accent())
                    .add_modifier(Modifier::BOLD),
            ));

        let inner = block.inner(area);

        if list.row_count() == 0 {
            let empty = Paragraph::new(Line::from(Span::styled(
                "No messages yet. Say hello!",
                Style::default().fg(theme.foreground_dim()),
            )))
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let width = inner.width.saturating_sub(1) as usize;
        let height = inner.height as usize;

        // Walk back from the newest visible row until the area is full.
        let mut lines: Vec<Line<'static>> = Vec::new();
        for index in (0..list.visible_end()).rev() {
            if lines.len() >= height {
                break;
            }
            if let Some(mut row) = Self::row_lines(binding, index, width, theme) {
                row.append(&mut lines);
                lines = row;
            }
        }

        // Oldest row may only partly fit: drop its top lines.
        if lines.len() > height {
            lines.drain(..lines.len() - height);
        }

        // Bottom-anchor short conversations.
        if lines.len() < height {
            let mut padded: Vec<Line<'static>> = vec![Line::default(); height - lines.len()];
            padded.append(&mut lines);
            lines = padded;
        }

        frame.render_widget(
            Paragraph::new(Text::from(lines))
                .block(block)
                .style(Style::default().bg(theme.background())),
            area,
        );
    }

    fn row_lines(
        binding: &ConversationBinding<MessageList>,
        index: usize,
        width: usize,
        theme: &dyn Theme,
    ) -> Option<Vec<Line<'static>>> {
        let text = match binding.render_row(index) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(code = e.code(), "Skipping row: {}", e);
                return None;
            }
        };
        let message = binding.message_at(index)?;

        let (color, alignment) = match message.role() {
            Role::User => (theme.accent(), Alignment::Right),
            Role::Business => (theme.accent_secondary(), Alignment::Left),
        };

        let time = message.sent_at().format("%H:%M").to_string();
        let mut lines: Vec<Line<'static>> = vec![Line::from(Span::styled(
            time,
            Style::default().fg(theme.foreground_dim()),
        ))
        .alignment(alignment)];

        lines.extend(body_lines(&text, width).into_iter().map(|chunk| {
            Line::from(Span::styled(chunk, Style::default().fg(color))).alignment(alignment)
        }));

        Some(lines)
    }
}

/// Wrapped body of a row. Always at least one line, even for empty text.
fn body_lines(text: &str, width: usize) -> Vec<String> {
    let mut chunks: Vec<String> = text.lines().flat_map(|line| wrap_text(line, width)).collect();
    if chunks.is_empty() {
        chunks.push(String::new());
    }
    chunks
}

/// Splits `text` into chunks of at most `width` chars, breaking at spaces
/// when possible.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split(' ') {
        let word_len = word.chars().count();

        if current_len > 0 && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }

        let mut chars = word.chars().peekable();
        while chars.peek().is_some() {
            if current_len == width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if let Some(c) = chars.next() {
                current.push(c);
                current_len += 1;
            }
        }
    }

    lines.push(current);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::PaletteTheme;
    use chatpane_core::{InMemoryConversation, InMemoryProvider, Message, NullTransport, RawMessage};
    use std::rc::Rc;

    fn list_with(rows: usize) -> MessageList {
        let mut list = MessageList::new();
        list.reload_data(rows);
        list
    }

    #[test]
    fn test_reload_records_row_count() {
        let list = list_with(3);
        assert_eq!(list.row_count(), 3);
        assert_eq!(list.reloads(), 1);
        assert!(list.is_following_tail());
    }

    #[test]
    fn test_new_rows_keep_tail_pinned() {
        let mut list = list_with(3);
        list.reload_data(5);
        assert!(list.is_following_tail());
    }

    #[test]
    fn test_new_rows_keep_scrolled_position() {
        let mut list = list_with(10);
        list.scroll_up(2);
        list.reload_data(12);
        assert_eq!(list.offset_from_bottom(), 4);
    }

    #[test]
    fn test_shrinking_clamps_offset() {
        let mut list = list_with(10);
        list.scroll_to_top();
        assert_eq!(list.offset_from_bottom(), 9);

        list.reload_data(2);
        assert_eq!(list.offset_from_bottom(), 1);

        list.reload_data(0);
        assert_eq!(list.offset_from_bottom(), 0);
    }

    #[test]
    fn test_scroll_bounds() {
        let mut list = list_with(3);
        list.scroll_up(100);
        assert_eq!(list.offset_from_bottom(), 2);
        list.scroll_down(100);
        assert!(list.is_following_tail());
    }

    #[test]
    fn test_wrap_text_breaks_at_spaces() {
        assert_eq!(wrap_text("hello big world", 9), vec!["hello big", "world"]);
    }

    #[test]
    fn test_wrap_text_splits_long_words() {
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_body_lines_keep_empty_text_visible() {
        assert_eq!(body_lines("", 10), vec![""]);
        assert_eq!(body_lines("a\nb", 10), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_message_row_has_body_line() {
        let provider = Rc::new(InMemoryProvider::new());
        provider.start(
            InMemoryConversation::new(Box::new(NullTransport))
                .with_history(vec![Message::from(RawMessage::default())]),
        );
        let mut binding = ConversationBinding::new(MessageList::new());
        binding.initialize(provider).unwrap();

        let lines =
            MessageListView::row_lines(&binding, 0, 20, &PaletteTheme::tokyo_night()).unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_wrap_text_short_and_empty() {
        assert_eq!(wrap_text("hi", 10), vec!["hi"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }
}
