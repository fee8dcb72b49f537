use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::events::InputMode;

pub struct Footer;

impl Footer {
    pub fn keybinds(mode: InputMode) -> &'static [(&'static str, &'static str)] {
        match mode {
            InputMode::Normal => &[
                ("i", "Type"),
                ("j/k", "Scroll"),
                ("g/G", "Top/Bottom"),
                ("t", "Theme"),
                ("q", "Quit"),
            ],
            InputMode::Editing => &[("Enter", "Send"), ("Esc", "Cancel"), ("Ctrl-C", "Quit")],
        }
    }

    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = app.current_theme();

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        let keybind_spans: Vec<Span> = Self::keybinds(app.event_handler.input_mode())
            .iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(
                        format!(" {key}"),
                        Style::default()
                            .fg(theme.accent())
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!(":{desc} "),
                        Style::default().fg(theme.foreground_dim()),
                    ),
                ]
            })
            .collect();

        let keybinds_widget = Paragraph::new(Line::from(keybind_spans))
            .block(Block::default().borders(Borders::NONE))
            .style(Style::default().bg(theme.surface()));
        frame.render_widget(keybinds_widget, chunks[0]);

        let status = app.status_message.as_deref().unwrap_or("Ready");
        let status_color = if app.status_is_error {
            theme.error()
        } else {
            theme.foreground_dim()
        };
        let status_widget = Paragraph::new(Line::from(Span::styled(
            status,
            Style::default().fg(status_color),
        )))
        .alignment(Alignment::Right)
        .block(Block::default().borders(Borders::NONE))
        .style(Style::default().bg(theme.surface()));
        frame.render_widget(status_widget, chunks[1]);
    }
}
