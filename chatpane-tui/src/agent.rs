//! Scripted business agent standing in for the remote side of the conversation.

use std::time::Duration;

use chatpane_core::{AgentConfig, Message, Role, Transport};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

/// Transport that hands outgoing messages to the demo agent's task.
pub struct ChannelTransport {
    outbox: UnboundedSender<Message>,
}

impl ChannelTransport {
    pub fn new(outbox: UnboundedSender<Message>) -> Self {
        Self { outbox }
    }
}

impl Transport for ChannelTransport {
    fn submit(&self, message: &Message) {
        if self.outbox.send(message.clone()).is_err() {
            warn!("Demo agent has stopped, message not delivered");
        }
    }
}

#[derive(Debug, Clone)]
pub struct DemoAgent {
    display_name: Option<String>,
    reply_delay: Duration,
}

impl DemoAgent {
    pub fn new(display_name: Option<String>, reply_delay: Duration) -> Self {
        Self {
            display_name,
            reply_delay,
        }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(
            config.display_name.clone(),
            Duration::from_millis(config.reply_delay_ms),
        )
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn reply_to(&self, message: &Message) -> Message {
        Message::from_business(compose_reply(message.text()), self.display_name.clone())
    }

    /// Answers each user message after the configured delay, until either
    /// channel closes.
    pub async fn run(
        self,
        mut outbox: UnboundedReceiver<Message>,
        replies: UnboundedSender<Message>,
    ) {
        while let Some(message) = outbox.recv().await {
            if message.role() != Role::User {
                continue;
            }

            tokio::time::sleep(self.reply_delay).await;

            debug!("Demo agent replying to {} chars", message.text().len());
            if replies.send(self.reply_to(&message)).is_err() {
                break;
            }
        }

        debug!("Demo agent stopped");
    }
}

fn compose_reply(text: &str) -> String {
    let lower = text.to_lowercase();
    let first_word = lower
        .split(|c: char| !c.is_alphanumeric())
        .find(|w| !w.is_empty())
        .unwrap_or("");

    if matches!(first_word, "hi" | "hello" | "hey" | "howdy") {
        "Hello! What can I do for you?".to_string()
    } else if lower.contains("thank") || lower.contains("bye") {
        "You're welcome! Anything else?".to_string()
    } else if lower.trim_end().ends_with('?') {
        format!("Good question. Let me look into \"{}\" for you.", text)
    } else {
        format!("Got it: \"{}\". A teammate will follow up shortly.", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn agent() -> DemoAgent {
        DemoAgent::new(Some("Ava".to_string()), Duration::from_millis(1))
    }

    #[test]
    fn test_compose_reply_greeting() {
        assert_eq!(compose_reply("Hey there"), "Hello! What can I do for you?");
        assert_eq!(compose_reply("hi!"), "Hello! What can I do for you?");
    }

    #[test]
    fn test_compose_reply_does_not_match_word_prefixes() {
        assert!(compose_reply("history please").starts_with("Got it"));
    }

    #[test]
    fn test_compose_reply_question_and_thanks() {
        assert!(compose_reply("Where is my order?").starts_with("Good question"));
        assert_eq!(compose_reply("thanks a lot"), "You're welcome! Anything else?");
    }

    #[test]
    fn test_reply_is_business_with_display_name() {
        let reply = agent().reply_to(&Message::outgoing("hello"));
        assert_eq!(reply.role(), Role::Business);
        assert_eq!(reply.display_text(), "Ava says: Hello! What can I do for you?");
    }

    #[test]
    fn test_reply_without_display_name() {
        let agent = DemoAgent::new(None, Duration::ZERO);
        let reply = agent.reply_to(&Message::outgoing("ok"));
        assert!(reply.display_text().starts_with("Business says: "));
    }

    #[tokio::test]
    async fn test_run_replies_to_user_messages_only() {
        let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();
        let (reply_tx, mut reply_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(agent().run(outbox_rx, reply_tx));

        let transport = ChannelTransport::new(outbox_tx);
        transport.submit(&Message::from_business("echo?", None));
        transport.submit(&Message::outgoing("hello"));
        drop(transport);

        let reply = reply_rx.recv().await.unwrap();
        assert_eq!(reply.text(), "Hello! What can I do for you?");
        assert!(reply_rx.recv().await.is_none());

        task.await.unwrap();
    }
}
