use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    FocusInput,
    Blur,
    Submit,
    InsertChar(char),
    InsertText(String),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    ScrollTop,
    ScrollBottom,
    ToggleTheme,
    Resize { width: u16, height: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// The message list has focus.
    Normal,
    /// The text input has focus.
    Editing,
}

pub struct EventHandler {
    input_mode: InputMode,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            input_mode: InputMode::Normal,
        }
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.input_mode = mode;
    }

    pub fn handle_event(&mut self, event: Event) -> Option<Action> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Key(_) => None,
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => Some(Action::Resize { width, height }),
            Event::Paste(text) if self.input_mode == InputMode::Editing => {
                Some(Action::InsertText(text))
            }
            Event::Paste(_) | Event::FocusGained | Event::FocusLost => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        let ctrl_pressed = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl_pressed && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal_mode_key(key),
            InputMode::Editing => self.handle_editing_mode_key(key),
        }
    }

    fn handle_normal_mode_key(&mut self, key: KeyEvent) -> Option<Action> {
        let ctrl_pressed = key.modifiers.contains(KeyModifiers::CONTROL);

        match (key.code, ctrl_pressed) {
            (KeyCode::Char('q'), false) => Some(Action::Quit),
            (KeyCode::Char('i'), false) | (KeyCode::Enter, _) => {
                self.input_mode = InputMode::Editing;
                Some(Action::FocusInput)
            }
            (KeyCode::Char('k'), false) | (KeyCode::Up, _) => Some(Action::ScrollUp),
            (KeyCode::Char('j'), false) | (KeyCode::Down, _) => Some(Action::ScrollDown),
            (KeyCode::PageUp, _) | (KeyCode::Char('u'), true) => Some(Action::PageUp),
            (KeyCode::PageDown, _) | (KeyCode::Char('d'), true) => Some(Action::PageDown),
            (KeyCode::Char('g'), false) | (KeyCode::Home, _) => Some(Action::ScrollTop),
            (KeyCode::Char('G'), false) | (KeyCode::End, _) => Some(Action::ScrollBottom),
            (KeyCode::Char('t'), false) => Some(Action::ToggleTheme),
            _ => None,
        }
    }

    fn handle_editing_mode_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                Some(Action::Blur)
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                Some(Action::Submit)
            }
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Delete => Some(Action::Delete),
            KeyCode::Left => Some(Action::CursorLeft),
            KeyCode::Right => Some(Action::CursorRight),
            KeyCode::Home => Some(Action::CursorHome),
            KeyCode::End => Some(Action::CursorEnd),
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                Some(Action::InsertChar(c))
            }
            _ => None,
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<Action> {
        match mouse.kind {
            MouseEventKind::ScrollUp => Some(Action::ScrollUp),
            MouseEventKind::ScrollDown => Some(Action::ScrollDown),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_normal_mode_keys() {
        let mut handler = EventHandler::new();
        assert_eq!(handler.handle_key(key(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(handler.handle_key(key(KeyCode::Char('k'))), Some(Action::ScrollUp));
        assert_eq!(handler.handle_key(key(KeyCode::Down)), Some(Action::ScrollDown));
        assert_eq!(handler.handle_key(ctrl('u')), Some(Action::PageUp));
        assert_eq!(handler.handle_key(key(KeyCode::Char('G'))), Some(Action::ScrollBottom));
        assert_eq!(handler.handle_key(key(KeyCode::Char('t'))), Some(Action::ToggleTheme));
        assert_eq!(handler.handle_key(key(KeyCode::Char('x'))), None);
        assert_eq!(handler.input_mode(), InputMode::Normal);
    }

    #[test]
    fn test_focus_enters_editing_mode() {
        let mut handler = EventHandler::new();
        assert_eq!(handler.handle_key(key(KeyCode::Char('i'))), Some(Action::FocusInput));
        assert_eq!(handler.input_mode(), InputMode::Editing);
    }

    #[test]
    fn test_editing_mode_types_letters_that_are_shortcuts_in_normal_mode() {
        let mut handler = EventHandler::new();
        handler.set_input_mode(InputMode::Editing);

        assert_eq!(
            handler.handle_key(key(KeyCode::Char('q'))),
            Some(Action::InsertChar('q'))
        );
        assert_eq!(
            handler.handle_key(KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT)),
            Some(Action::InsertChar('Q'))
        );
        assert_eq!(handler.input_mode(), InputMode::Editing);
    }

    #[test]
    fn test_enter_submits_and_leaves_editing() {
        let mut handler = EventHandler::new();
        handler.set_input_mode(InputMode::Editing);

        assert_eq!(handler.handle_key(key(KeyCode::Enter)), Some(Action::Submit));
        assert_eq!(handler.input_mode(), InputMode::Normal);
    }

    #[test]
    fn test_escape_blurs() {
        let mut handler = EventHandler::new();
        handler.set_input_mode(InputMode::Editing);

        assert_eq!(handler.handle_key(key(KeyCode::Esc)), Some(Action::Blur));
        assert_eq!(handler.input_mode(), InputMode::Normal);
    }

    #[test]
    fn test_ctrl_c_quits_in_any_mode() {
        let mut handler = EventHandler::new();
        assert_eq!(handler.handle_key(ctrl('c')), Some(Action::Quit));

        handler.set_input_mode(InputMode::Editing);
        assert_eq!(handler.handle_key(ctrl('c')), Some(Action::Quit));
    }

    #[test]
    fn test_paste_only_while_editing() {
        let mut handler = EventHandler::new();
        assert_eq!(handler.handle_event(Event::Paste("hi".to_string())), None);

        handler.set_input_mode(InputMode::Editing);
        assert_eq!(
            handler.handle_event(Event::Paste("hi".to_string())),
            Some(Action::InsertText("hi".to_string()))
        );
    }

    #[test]
    fn test_resize_event() {
        let mut handler = EventHandler::new();
        assert_eq!(
            handler.handle_event(Event::Resize(80, 24)),
            Some(Action::Resize {
                width: 80,
                height: 24
            })
        );
    }
}
