use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use chatpane_core::{
    ChatpaneConfig, ConversationBinding, InMemoryConversation, InMemoryProvider, Message,
    SubmitOutcome, TextInput,
};
use crossterm::event::{self, Event};
use ratatui::{backend::Backend, Frame, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::agent::{ChannelTransport, DemoAgent};
use crate::events::{Action, EventHandler, InputMode};
use crate::theme::{Theme, ThemeManager};
use crate::ui::layout::MainLayout;
use crate::ui::widgets::{InputBox, MessageList};

/// Rows the header, input and footer take away from the message list.
const CHROME_HEIGHT: u16 = 7;

pub struct App {
    pub should_quit: bool,
    pub theme_manager: ThemeManager,
    pub event_handler: EventHandler,
    pub input: InputBox,
    pub binding: ConversationBinding<MessageList>,
    pub provider: Rc<InMemoryProvider>,
    pub status_message: Option<String>,
    pub status_is_error: bool,
    pub terminal_size: Option<(u16, u16)>,
    tick_rate: Duration,
    agent_name: Option<String>,
    replies: UnboundedReceiver<Message>,
    agent_task: Option<JoinHandle<()>>,
}

impl App {
    /// Starts the demo agent, the in-memory conversation and binds the view
    /// to it. Must run inside a tokio runtime.
    pub fn new(config: &ChatpaneConfig) -> Result<Self> {
        let agent = DemoAgent::from_config(&config.agent);
        let agent_name = agent.display_name().map(str::to_string);

        let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        let agent_task = tokio::spawn(agent.run(outbox_rx, reply_tx));

        let provider = Rc::new(InMemoryProvider::new());
        provider.start(
            InMemoryConversation::new(Box::new(ChannelTransport::new(outbox_tx)))
                .with_history(config.initial_history()),
        );

        let mut binding = ConversationBinding::new(MessageList::new());
        binding
            .initialize(provider.clone())
            .context("Failed to bind conversation view")?;

        let theme_manager = ThemeManager::with_theme(&config.tui.theme);
        info!(
            "Started with theme '{}' and {} message(s)",
            theme_manager.current_theme_name(),
            binding.row_count()
        );

        Ok(Self {
            should_quit: false,
            theme_manager,
            event_handler: EventHandler::new(),
            input: InputBox::new(),
            binding,
            provider,
            status_message: Some("Press i to start typing, q to quit".to_string()),
            status_is_error: false,
            terminal_size: None,
            tick_rate: Duration::from_millis(config.tui.tick_rate_ms),
            agent_name,
            replies: reply_rx,
            agent_task: Some(agent_task),
        })
    }

    pub fn current_theme(&self) -> &dyn Theme {
        self.theme_manager.current_theme()
    }

    pub fn agent_name(&self) -> Option<&str> {
        self.agent_name.as_deref()
    }

    pub fn draw(&self, frame: &mut Frame) {
        MainLayout::render(frame, self);
    }

    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(self.tick_rate)? {
                let evt = event::read()?;
                self.handle_event(evt);
            }

            self.deliver_replies();

            if self.should_quit {
                break;
            }

            tokio::task::yield_now().await;
        }

        self.shutdown();
        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) {
        if let Some(action) = self.event_handler.handle_event(event) {
            self.apply_action(action);
        }
    }

    pub fn apply_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::FocusInput => {
                self.input.focus();
                self.set_status("Typing... Enter to send, Esc to cancel");
            }
            Action::Blur => {
                self.input.resign_focus();
                self.status_message = None;
                self.status_is_error = false;
            }
            Action::Submit => self.submit(),
            Action::InsertChar(c) => self.input.insert_char(c),
            Action::InsertText(text) => self.input.insert_str(&text),
            Action::Backspace => self.input.backspace(),
            Action::Delete => self.input.delete(),
            Action::CursorLeft => self.input.move_left(),
            Action::CursorRight => self.input.move_right(),
            Action::CursorHome => self.input.move_home(),
            Action::CursorEnd => self.input.move_end(),
            Action::ScrollUp => self.binding.list_mut().scroll_up(1),
            Action::ScrollDown => self.binding.list_mut().scroll_down(1),
            Action::PageUp => {
                let page = self.page_size();
                self.binding.list_mut().scroll_up(page);
            }
            Action::PageDown => {
                let page = self.page_size();
                self.binding.list_mut().scroll_down(page);
            }
            Action::ScrollTop => self.binding.list_mut().scroll_to_top(),
            Action::ScrollBottom => self.binding.list_mut().scroll_to_bottom(),
            Action::ToggleTheme => {
                self.theme_manager.cycle_theme();
                let name = self.theme_manager.current_theme_name();
                self.set_status(format!("Theme: {}", name));
            }
            Action::Resize { width, height } => {
                self.terminal_size = Some((width, height));
            }
        }

        let mode = if self.input.is_focused() {
            InputMode::Editing
        } else {
            InputMode::Normal
        };
        self.event_handler.set_input_mode(mode);
    }

    fn submit(&mut self) {
        match self.binding.on_submit(&mut self.input) {
            Ok(SubmitOutcome::Sent(text)) => {
                debug!("Sent message ({} chars)", text.len());
                self.binding.list_mut().scroll_to_bottom();
                self.set_status("Message sent");
            }
            Ok(SubmitOutcome::Empty) => {
                self.set_status("Nothing to send");
            }
            Ok(SubmitOutcome::NoConversation) => {
                self.set_status("No conversation available");
            }
            Err(e) => {
                if e.is_programming_error() {
                    error!(code = e.code(), "Submit failed: {}", e);
                } else {
                    warn!(code = e.code(), "Submit failed: {}", e);
                }
                self.set_error(e.to_string());
            }
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = true;
    }

    /// Feeds replies from the agent task into the conversation on this thread.
    pub fn deliver_replies(&mut self) -> usize {
        let mut incoming = Vec::new();
        while let Ok(message) = self.replies.try_recv() {
            incoming.push(message);
        }

        let count = incoming.len();
        if count == 0 {
            return 0;
        }

        match self.provider.conversation() {
            Some(conversation) => {
                conversation.receive(incoming);
                let status = match self.agent_name() {
                    Some(name) => format!("New message from {}", name),
                    None => "New message".to_string(),
                };
                self.set_status(status);
            }
            None => debug!("Dropping {} reply(ies) without a conversation", count),
        }

        count
    }

    fn page_size(&self) -> usize {
        self.terminal_size
            .map(|(_, height)| height.saturating_sub(CHROME_HEIGHT).max(1) as usize)
            .unwrap_or(10)
    }

    pub fn shutdown(&mut self) {
        if let Some(task) = self.agent_task.take() {
            task.abort();
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}
