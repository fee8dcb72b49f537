use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, trace};

use super::{ConversationDelegate, ConversationHandle, ConversationProvider};
use crate::models::Message;

/// Where a conversation hands outgoing messages once the delegate has seen them.
pub trait Transport {
    fn submit(&self, message: &Message);
}

/// Transport that drops every message. Useful when nothing answers.
pub struct NullTransport;

impl Transport for NullTransport {
    fn submit(&self, message: &Message) {
        trace!("Dropping outgoing message ({} chars)", message.text().len());
    }
}

/// A single conversation kept in memory.
///
/// Holds the authoritative history, notifies the registered delegate and
/// forwards sent messages to its [`Transport`]. No `RefCell` borrow is held
/// while the delegate runs, so the delegate may read history re-entrantly.
pub struct InMemoryConversation {
    history: RefCell<Vec<Message>>,
    delegate: RefCell<Option<Weak<dyn ConversationDelegate>>>,
    transport: Box<dyn Transport>,
}

impl InMemoryConversation {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            history: RefCell::new(Vec::new()),
            delegate: RefCell::new(None),
            transport,
        }
    }

    pub fn with_history(self, history: Vec<Message>) -> Self {
        *self.history.borrow_mut() = history;
        self
    }

    pub fn len(&self) -> usize {
        self.history.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.borrow().is_empty()
    }

    /// True while a delegate is registered and still alive.
    pub fn has_delegate(&self) -> bool {
        self.delegate().is_some()
    }

    /// Appends messages arriving from the other side and notifies the delegate.
    pub fn receive(&self, messages: Vec<Message>) {
        if messages.is_empty() {
            return;
        }

        self.history.borrow_mut().extend(messages.iter().cloned());
        debug!(
            "Received {} message(s), history now {}",
            messages.len(),
            self.len()
        );

        if let Some(delegate) = self.delegate() {
            delegate.did_receive_messages(self, &messages);
        }
    }

    fn delegate(&self) -> Option<Rc<dyn ConversationDelegate>> {
        self.delegate.borrow().as_ref().and_then(Weak::upgrade)
    }
}

impl ConversationHandle for InMemoryConversation {
    fn messages(&self) -> Vec<Message> {
        self.history.borrow().clone()
    }

    fn send_message(&self, message: Message) {
        let message = match self.delegate() {
            Some(delegate) => delegate.will_send(self, message),
            None => message,
        };

        self.history.borrow_mut().push(message.clone());
        self.transport.submit(&message);
    }

    fn set_delegate(&self, delegate: Option<Weak<dyn ConversationDelegate>>) {
        *self.delegate.borrow_mut() = delegate;
    }
}

/// Provider with at most one conversation, started explicitly.
#[derive(Default)]
pub struct InMemoryProvider {
    conversation: RefCell<Option<Rc<InMemoryConversation>>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `conversation` as the current one, replacing any previous.
    pub fn start(&self, conversation: InMemoryConversation) -> Rc<InMemoryConversation> {
        let conversation = Rc::new(conversation);
        *self.conversation.borrow_mut() = Some(Rc::clone(&conversation));
        conversation
    }

    pub fn conversation(&self) -> Option<Rc<InMemoryConversation>> {
        self.conversation.borrow().clone()
    }
}

impl ConversationProvider for InMemoryProvider {
    fn current_conversation(&self) -> Option<Rc<dyn ConversationHandle>> {
        self.conversation()
            .map(|conversation| conversation as Rc<dyn ConversationHandle>)
    }
}
