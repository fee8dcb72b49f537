mod footer;
mod header;
mod input_box;
mod message_list;

pub use footer::Footer;
pub use header::Header;
pub use input_box::InputBox;
pub use message_list::{wrap_text, MessageList, MessageListView};
