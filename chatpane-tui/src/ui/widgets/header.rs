use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct Header;

impl Header {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.current_theme();

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(20),
                Constraint::Min(20),
                Constraint::Length(22),
            ])
            .split(area);

        let logo = Paragraph::new(Line::from(vec![
            Span::styled("▍", Style::default().fg(theme.accent())),
            Span::styled(
                "chatpane ",
                Style::default()
                    .fg(theme.foreground())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("v{}", VERSION),
                Style::default().fg(theme.foreground_dim()),
            ),
        ]))
        .block(Block::default().borders(Borders::NONE))
        .style(Style::default().bg(theme.background()));
        frame.render_widget(logo, chunks[0]);

        let status = if app.binding.has_conversation() {
            let peer = app.agent_name().unwrap_or("Business");
            Line::from(vec![
                Span::styled("● ", Style::default().fg(theme.success())),
                Span::styled(
                    format!("Chatting with {}", peer),
                    Style::default().fg(theme.foreground()),
                ),
                Span::styled(
                    format!("  {} message(s)", app.binding.row_count()),
                    Style::default().fg(theme.foreground_dim()),
                ),
            ])
        } else {
            Line::from(vec![
                Span::styled("○ ", Style::default().fg(theme.warning())),
                Span::styled(
                    "No conversation",
                    Style::default().fg(theme.foreground_dim()),
                ),
            ])
        };
        let status_widget = Paragraph::new(status)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::NONE))
            .style(Style::default().bg(theme.background()));
        frame.render_widget(status_widget, chunks[1]);

        let theme_widget = Paragraph::new(Line::from(Span::styled(
            theme.name(),
            Style::default().fg(theme.foreground_dim()),
        )))
        .alignment(Alignment::Right)
        .block(Block::default().borders(Borders::NONE))
        .style(Style::default().bg(theme.background()));
        frame.render_widget(theme_widget, chunks[2]);
    }
}
