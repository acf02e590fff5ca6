//! HTTP clients for the remote collaborators

pub mod http;
pub mod telegram;
pub mod todoist;

pub use http::ApiClient;
pub use telegram::{escape_markdown_v2, ChatNotifier, TelegramClient};
pub use todoist::{TaskTracker, TodoistClient};
