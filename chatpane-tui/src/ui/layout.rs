use ratatui::{
    layout::{Constraint, Direction, Layout, Margin},
    style::Style,
    widgets::Block,
    Frame,
};

use crate::app::App;
use crate::ui::widgets::{Footer, Header, MessageListView};

pub struct MainLayout;

impl MainLayout {
    pub fn render(frame: &mut Frame, app: &App) {
        let theme = app.current_theme();
        let size = frame.area();

        frame.render_widget(
            Block::default().style(
                Style::default()
                    .bg(theme.background())
                    .fg(theme.foreground()),
            ),
            size,
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(size);

        Header::render(frame, chunks[0], app);

        let content_area = chunks[1].inner(Margin::new(1, 0));
        MessageListView::render(frame, content_area, &app.binding, theme);

        let input_area = chunks[2].inner(Margin::new(1, 0));
        app.input.render(frame, input_area, theme);

        Footer::render(frame, chunks[3], app);
    }
}
