use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[serde(alias = "appUser", alias = "app_user")]
    User,
    #[serde(alias = "appMaker", alias = "app_maker", alias = "agent")]
    Business,
}

impl Role {
    /// Lenient parse for roles coming from loosely-typed provider payloads.
    pub fn parse(value: &str) -> Option<Role> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" | "appuser" | "app_user" => Some(Role::User),
            "business" | "appmaker" | "app_maker" | "agent" => Some(Role::Business),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Business => write!(f, "business"),
        }
    }
}

/// One chat turn. Immutable once created; the provider owns the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    text: String,
    role: Role,
    display_name: Option<String>,
    sent_at: DateTime<Utc>,
}

impl Message {
    pub fn new(text: impl Into<String>, role: Role, display_name: Option<String>) -> Self {
        Self {
            text: text.into(),
            role,
            display_name: normalize_name(display_name),
            sent_at: Utc::now(),
        }
    }

    /// An outgoing message typed by the local user.
    pub fn outgoing(text: impl Into<String>) -> Self {
        Self::new(text, Role::User, None)
    }

    /// A message from the business side, optionally signed with a display name.
    pub fn from_business(text: impl Into<String>, display_name: Option<String>) -> Self {
        Self::new(text, Role::Business, display_name)
    }

    pub fn with_sent_at(mut self, sent_at: DateTime<Utc>) -> Self {
        self.sent_at = sent_at;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn sent_at(&self) -> DateTime<Utc> {
        self.sent_at
    }

    pub fn is_from_business(&self) -> bool {
        self.role == Role::Business
    }

    /// The line shown for this message in the conversation list.
    pub fn display_text(&self) -> String {
        match (self.role, self.display_name()) {
            (Role::Business, Some(name)) => format!("{} says: {}", name, self.text),
            (Role::Business, None) => format!("Business says: {}", self.text),
            (Role::User, _) => self.text.clone(),
        }
    }
}

/// Loosely-typed message as a provider may hand it over.
///
/// Every field is optional. Converting to [`Message`] substitutes defaults
/// instead of failing: empty text, `User` role, no display name, current time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, alias = "name")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
}

impl From<RawMessage> for Message {
    fn from(raw: RawMessage) -> Self {
        let role = match raw.role.as_deref() {
            Some(value) => Role::parse(value).unwrap_or_else(|| {
                tracing::debug!("Unknown message role '{}', treating as user", value);
                Role::User
            }),
            None => Role::User,
        };

        Message {
            text: raw.text.unwrap_or_default(),
            role,
            display_name: normalize_name(raw.display_name),
            sent_at: raw.sent_at.unwrap_or_else(Utc::now),
        }
    }
}

fn normalize_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}
