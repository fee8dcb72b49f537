mod message;

pub use message::{Message, RawMessage, Role};
