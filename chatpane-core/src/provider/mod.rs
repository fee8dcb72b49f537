//! Contract between the chat view binding and the conversation provider.
//!
//! The provider owns transport, persistence and delivery. The binding only
//! pulls history snapshots, submits outgoing messages, and listens through a
//! single non-owning delegate registration. Everything here runs on the UI
//! thread, so the contract is built on `Rc`/`Weak` rather than `Arc`.

mod memory;

use std::rc::{Rc, Weak};

use crate::models::Message;

pub use memory::{InMemoryConversation, InMemoryProvider, NullTransport, Transport};

/// Entry point of the provider. May have no conversation yet.
pub trait ConversationProvider {
    fn current_conversation(&self) -> Option<Rc<dyn ConversationHandle>>;
}

/// One chat thread owned by the provider.
pub trait ConversationHandle {
    /// Full history snapshot, oldest first.
    fn messages(&self) -> Vec<Message>;

    /// Fire-and-forget submission. Delivery and retries are the provider's concern.
    fn send_message(&self, message: Message);

    /// Replaces the registered delegate. `None` deregisters.
    fn set_delegate(&self, delegate: Option<Weak<dyn ConversationDelegate>>);
}

/// Notifications the provider pushes to its registered delegate.
pub trait ConversationDelegate {
    /// Called synchronously before transport begins. The returned message is
    /// what gets sent.
    fn will_send(&self, conversation: &dyn ConversationHandle, message: Message) -> Message;

    /// Called after new messages landed in the conversation history.
    fn did_receive_messages(&self, conversation: &dyn ConversationHandle, messages: &[Message]);
}
