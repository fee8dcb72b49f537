//! Conversation view binding.
//!
//! Keeps a list control in sync with a provider's conversation history and
//! forwards typed text to the provider. The binding never merges: each
//! "messages changed" notification replaces local state with a fresh snapshot.
//!
//! The provider is asked for its current conversation every time one is
//! needed. When the answer changes, the delegate registration moves to the new
//! conversation and the rows are reloaded from it.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use tracing::{debug, info};

use crate::error::{ChatError, ChatResult};
use crate::models::Message;
use crate::provider::{ConversationDelegate, ConversationHandle, ConversationProvider};

/// Text entry control the binding reads from on submit.
pub trait TextInput {
    fn text(&self) -> String;

    fn clear(&mut self);

    /// Drops keyboard focus from the control.
    fn resign_focus(&mut self);
}

/// Scrollable list control that draws rows pulled from the binding.
pub trait ListControl {
    /// Full re-render request. `row_count` is the number of rows the control
    /// may ask for until the next reload.
    fn reload_data(&mut self, row_count: usize);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingPhase {
    Uninitialized,
    Bound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A message with this (trimmed) text went to the provider.
    Sent(String),
    /// Input was blank; nothing was sent.
    Empty,
    /// No conversation exists yet; the send was skipped.
    NoConversation,
}

/// Identity check on the data pointer; vtable pointers may differ between
/// codegen units for the same object.
fn same_conversation(a: &dyn ConversationHandle, b: &dyn ConversationHandle) -> bool {
    std::ptr::eq(a as *const _ as *const (), b as *const _ as *const ())
}

/// Shared part of the binding. This is what the conversation holds a `Weak` to.
struct BindingState<L> {
    phase: Cell<BindingPhase>,
    items: RefCell<Vec<Message>>,
    list: RefCell<L>,
    provider: RefCell<Option<Rc<dyn ConversationProvider>>>,
    registered: RefCell<Option<Rc<dyn ConversationHandle>>>,
    this: Weak<dyn ConversationDelegate>,
}

impl<L: ListControl + 'static> BindingState<L> {
    fn new(list: L) -> Rc<Self> {
        Rc::new_cyclic(|this: &Weak<Self>| Self {
            phase: Cell::new(BindingPhase::Uninitialized),
            items: RefCell::new(Vec::new()),
            list: RefCell::new(list),
            provider: RefCell::new(None),
            registered: RefCell::new(None),
            this: this.clone() as Weak<dyn ConversationDelegate>,
        })
    }
}

impl<L: ListControl> BindingState<L> {
    fn is_bound(&self) -> bool {
        self.phase.get() == BindingPhase::Bound
    }

    fn reload(&self) {
        let row_count = self.items.borrow().len();
        self.list.borrow_mut().reload_data(row_count);
    }

    fn replace_items(&self, items: Vec<Message>) {
        *self.items.borrow_mut() = items;
        self.reload();
    }

    fn is_registered(&self, conversation: &dyn ConversationHandle) -> bool {
        self.registered
            .borrow()
            .as_ref()
            .is_some_and(|registered| same_conversation(registered.as_ref(), conversation))
    }

    /// The provider's answer right now, without touching the registration.
    fn peek_conversation(&self) -> Option<Rc<dyn ConversationHandle>> {
        let provider = self.provider.borrow().clone();
        provider.and_then(|provider| provider.current_conversation())
    }

    /// Resolves the provider's current conversation. The flag is true when it
    /// differs from the registered one, in which case the registration moved
    /// and the rows were already reloaded from the new conversation.
    fn sync_conversation(&self) -> (Option<Rc<dyn ConversationHandle>>, bool) {
        let current = self.peek_conversation();
        let changed = {
            let registered = self.registered.borrow();
            match (registered.as_ref(), current.as_ref()) {
                (Some(old), Some(new)) => !same_conversation(old.as_ref(), new.as_ref()),
                (None, None) => false,
                _ => true,
            }
        };

        if changed {
            self.switch_to(current.clone());
        }
        (current, changed)
    }

    fn switch_to(&self, conversation: Option<Rc<dyn ConversationHandle>>) {
        let previous = self.registered.replace(conversation.clone());
        if let Some(previous) = previous {
            debug!("Provider conversation changed, releasing the previous one");
            previous.set_delegate(None);
        }

        let snapshot = match &conversation {
            Some(conversation) => {
                conversation.set_delegate(Some(self.this.clone()));
                conversation.messages()
            }
            None => {
                debug!("Provider has no conversation, showing empty history");
                Vec::new()
            }
        };

        info!("Showing conversation with {} message(s)", snapshot.len());
        self.replace_items(snapshot);
    }

    fn append_pending(&self, message: &Message) {
        if !self.is_bound() {
            debug!("Ignoring will-send before binding is initialized");
            return;
        }

        self.items.borrow_mut().push(message.clone());
        self.reload();
    }

    fn refresh(&self, payload_len: usize) {
        if !self.is_bound() {
            debug!("Ignoring received messages before binding is initialized");
            return;
        }

        let (conversation, switched) = self.sync_conversation();
        if switched {
            return;
        }

        match conversation {
            Some(conversation) => {
                let snapshot = conversation.messages();
                debug!(
                    "Conversation changed ({} new), replacing {} rows with {}",
                    payload_len,
                    self.items.borrow().len(),
                    snapshot.len()
                );
                self.replace_items(snapshot);
            }
            None => debug!("Received messages without a conversation, ignoring"),
        }
    }
}

impl<L: ListControl> ConversationDelegate for BindingState<L> {
    fn will_send(&self, conversation: &dyn ConversationHandle, message: Message) -> Message {
        if self.is_registered(conversation) {
            self.append_pending(&message);
        } else {
            debug!("Ignoring will-send from a conversation the provider replaced");
        }
        message
    }

    fn did_receive_messages(&self, _conversation: &dyn ConversationHandle, messages: &[Message]) {
        self.refresh(messages.len());
    }
}

/// Mediates between a text input, a list control and a conversation provider.
///
/// Single-threaded: the binding, its list control and the provider callbacks
/// all live on the UI thread. A conversation only keeps a weak reference to
/// the binding, so dropping the binding silently stops notifications.
pub struct ConversationBinding<L: ListControl + 'static> {
    state: Rc<BindingState<L>>,
}

impl<L: ListControl + 'static> ConversationBinding<L> {
    pub fn new(list: L) -> Self {
        Self {
            state: BindingState::new(list),
        }
    }

    pub fn phase(&self) -> BindingPhase {
        self.state.phase.get()
    }

    pub fn is_bound(&self) -> bool {
        self.state.is_bound()
    }

    /// Whether the provider currently has a conversation.
    pub fn has_conversation(&self) -> bool {
        self.state.peek_conversation().is_some()
    }

    /// Keeps `provider`, pulls the initial snapshot and registers for
    /// notifications.
    ///
    /// A provider without a conversation still leaves the binding bound, with
    /// no rows. A conversation the provider starts later is picked up on the
    /// next submit or notification.
    pub fn initialize(&mut self, provider: Rc<dyn ConversationProvider>) -> ChatResult<()> {
        if self.is_bound() {
            return Err(ChatError::AlreadyBound);
        }

        let conversation = provider.current_conversation();
        *self.state.provider.borrow_mut() = Some(provider);

        self.state.phase.set(BindingPhase::Bound);
        self.state.switch_to(conversation);
        Ok(())
    }

    /// Sends the trimmed input text, if any, to the provider's current
    /// conversation, then clears and unfocuses the input.
    pub fn on_submit<I: TextInput + ?Sized>(&self, input: &mut I) -> ChatResult<SubmitOutcome> {
        if !self.is_bound() {
            return Err(ChatError::NotBound("submit"));
        }

        let raw = input.text();
        let text = raw.trim();

        let outcome = if text.is_empty() {
            SubmitOutcome::Empty
        } else if let (Some(conversation), _) = self.state.sync_conversation() {
            conversation.send_message(Message::outgoing(text));
            SubmitOutcome::Sent(text.to_string())
        } else {
            debug!("Submit without a conversation, dropping input");
            SubmitOutcome::NoConversation
        };

        input.clear();
        input.resign_focus();

        Ok(outcome)
    }

    /// Pre-send hook: shows `message` immediately and passes it through unchanged.
    pub fn on_will_send(&self, message: Message) -> Message {
        self.state.append_pending(&message);
        message
    }

    /// Post-receive hook: replaces local state with the full history of the
    /// provider's current conversation. The payload itself is not used.
    pub fn on_messages_received(&self, new_messages: &[Message]) {
        self.state.refresh(new_messages.len());
    }

    pub fn row_count(&self) -> usize {
        self.state.items.borrow().len()
    }

    pub fn render_row(&self, index: usize) -> ChatResult<String> {
        let items = self.state.items.borrow();
        items
            .get(index)
            .map(Message::display_text)
            .ok_or(ChatError::RowOutOfBounds {
                index,
                len: items.len(),
            })
    }

    pub fn message_at(&self, index: usize) -> Option<Message> {
        self.state.items.borrow().get(index).cloned()
    }

    /// Snapshot of local state, oldest first.
    pub fn messages(&self) -> Vec<Message> {
        self.state.items.borrow().clone()
    }

    pub fn list(&self) -> Ref<'_, L> {
        self.state.list.borrow()
    }

    pub fn list_mut(&self) -> RefMut<'_, L> {
        self.state.list.borrow_mut()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::provider::{InMemoryConversation, InMemoryProvider, NullTransport};

    #[derive(Default)]
    struct MockList {
        reloads: usize,
        row_count: usize,
    }

    impl ListControl for MockList {
        fn reload_data(&mut self, row_count: usize) {
            self.reloads += 1;
            self.row_count = row_count;
        }
    }

    #[derive(Default)]
    struct MockInput {
        text: String,
        focused: bool,
    }

    impl MockInput {
        fn typed(text: &str) -> Self {
            Self {
                text: text.to_string(),
                focused: true,
            }
        }
    }

    impl TextInput for MockInput {
        fn text(&self) -> String {
            self.text.clone()
        }

        fn clear(&mut self) {
            self.text.clear();
        }

        fn resign_focus(&mut self) {
            self.focused = false;
        }
    }

    struct NoConversation;

    impl ConversationProvider for NoConversation {
        fn current_conversation(&self) -> Option<Rc<dyn ConversationHandle>> {
            None
        }
    }

    fn bound_without_conversation() -> ConversationBinding<MockList> {
        let mut binding = ConversationBinding::new(MockList::default());
        binding.initialize(Rc::new(NoConversation)).unwrap();
        binding
    }

    #[test]
    fn test_new_binding_is_uninitialized() {
        let binding = ConversationBinding::new(MockList::default());
        assert_eq!(binding.phase(), BindingPhase::Uninitialized);
        assert_eq!(binding.row_count(), 0);
        assert_eq!(binding.list().reloads, 0);
    }

    #[test]
    fn test_submit_before_initialize_fails_and_keeps_input() {
        let binding = ConversationBinding::new(MockList::default());
        let mut input = MockInput::typed("hello");

        let err = binding.on_submit(&mut input).unwrap_err();

        assert!(matches!(err, ChatError::NotBound(_)));
        assert_eq!(input.text, "hello");
        assert!(input.focused);
    }

    #[test]
    fn test_initialize_without_conversation_binds_empty() {
        let binding = bound_without_conversation();
        assert!(binding.is_bound());
        assert!(!binding.has_conversation());
        assert_eq!(binding.row_count(), 0);
        assert_eq!(binding.list().reloads, 1);
    }

    #[test]
    fn test_initialize_twice_fails() {
        let mut binding = bound_without_conversation();
        assert!(matches!(
            binding.initialize(Rc::new(NoConversation)),
            Err(ChatError::AlreadyBound)
        ));
    }

    #[test]
    fn test_submit_without_conversation_is_noop_but_clears() {
        let binding = bound_without_conversation();
        let mut input = MockInput::typed("  hi  ");

        let outcome = binding.on_submit(&mut input).unwrap();

        assert_eq!(outcome, SubmitOutcome::NoConversation);
        assert!(input.text.is_empty());
        assert!(!input.focused);
        assert_eq!(binding.row_count(), 0);
    }

    #[test]
    fn test_submit_blank_input() {
        let binding = bound_without_conversation();
        let mut input = MockInput::typed(" \t\n ");

        assert_eq!(binding.on_submit(&mut input).unwrap(), SubmitOutcome::Empty);
        assert!(input.text.is_empty());
        assert!(!input.focused);
    }

    #[test]
    fn test_will_send_appends_and_reloads() {
        let binding = bound_without_conversation();
        let before = binding.row_count();

        let message = Message::outgoing("pending");
        let returned = binding.on_will_send(message.clone());

        assert_eq!(returned, message);
        assert_eq!(binding.row_count(), before + 1);
        assert_eq!(binding.render_row(binding.row_count() - 1).unwrap(), "pending");
        assert_eq!(binding.list().row_count, binding.row_count());
    }

    #[test]
    fn test_will_send_does_not_dedup() {
        let binding = bound_without_conversation();
        let message = Message::outgoing("twice");

        binding.on_will_send(message.clone());
        binding.on_will_send(message);

        assert_eq!(binding.row_count(), 2);
        assert_eq!(binding.render_row(0).unwrap(), binding.render_row(1).unwrap());
    }

    #[test]
    fn test_will_send_before_initialize_passes_through() {
        let binding = ConversationBinding::new(MockList::default());
        let returned = binding.on_will_send(Message::outgoing("early"));

        assert_eq!(returned.text(), "early");
        assert_eq!(binding.row_count(), 0);
        assert_eq!(binding.list().reloads, 0);
    }

    #[test]
    fn test_render_row_rules() {
        let binding = bound_without_conversation();
        binding.on_will_send(Message::from_business("Hi", Some("Alice".to_string())));
        binding.on_will_send(Message::from_business("Hi", None));
        binding.on_will_send(Message::outgoing("Hi"));

        assert_eq!(binding.render_row(0).unwrap(), "Alice says: Hi");
        assert_eq!(binding.render_row(1).unwrap(), "Business says: Hi");
        assert_eq!(binding.render_row(2).unwrap(), "Hi");
        assert_eq!(binding.message_at(0).unwrap().role(), Role::Business);
    }

    #[test]
    fn test_render_row_is_idempotent() {
        let binding = bound_without_conversation();
        binding.on_will_send(Message::from_business("Same", Some("Bot".to_string())));

        assert_eq!(binding.render_row(0).unwrap(), binding.render_row(0).unwrap());
    }

    #[test]
    fn test_render_row_out_of_bounds() {
        let binding = bound_without_conversation();
        binding.on_will_send(Message::outgoing("only"));

        match binding.render_row(1) {
            Err(ChatError::RowOutOfBounds { index, len }) => {
                assert_eq!(index, 1);
                assert_eq!(len, 1);
            }
            other => panic!("expected RowOutOfBounds, got {other:?}"),
        }
        assert!(binding.message_at(1).is_none());
    }

    #[test]
    fn test_will_send_from_unregistered_conversation_is_ignored() {
        let binding = bound_without_conversation();
        let stray = InMemoryConversation::new(Box::new(NullTransport));

        let returned = binding.state.will_send(&stray, Message::outgoing("stray"));

        assert_eq!(returned.text(), "stray");
        assert_eq!(binding.row_count(), 0);
    }

    #[test]
    fn test_has_conversation_follows_provider() {
        let provider = Rc::new(InMemoryProvider::new());
        let mut binding = ConversationBinding::new(MockList::default());
        binding.initialize(provider.clone()).unwrap();
        assert!(!binding.has_conversation());

        provider.start(InMemoryConversation::new(Box::new(NullTransport)));
        assert!(binding.has_conversation());
    }

    #[test]
    fn test_same_conversation_compares_identity() {
        let a = InMemoryConversation::new(Box::new(NullTransport));
        let b = InMemoryConversation::new(Box::new(NullTransport));

        assert!(same_conversation(&a, &a));
        assert!(!same_conversation(&a, &b));
    }
}
