pub mod binding;
pub mod config;
pub mod error;
pub mod models;
pub mod provider;

pub use binding::{BindingPhase, ConversationBinding, ListControl, SubmitOutcome, TextInput};
pub use config::{
    get_cache_dir, get_config_dir, AgentConfig, ChatpaneConfig, ConfigLoadError,
    ConversationConfig, LoggingConfig, TuiConfig,
};
pub use error::{ChatError, ChatResult};
pub use models::{Message, RawMessage, Role};
pub use provider::{
    ConversationDelegate, ConversationHandle, ConversationProvider, InMemoryConversation,
    InMemoryProvider, NullTransport, Transport,
};
