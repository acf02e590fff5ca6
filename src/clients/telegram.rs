//! Telegram chat notifications
//!
//! Messages go out through the Bot API `sendMessage` call in MarkdownV2
//! mode. When no token/chat-id pair is configured the client still
//! constructs, but `send_message` becomes a no-op.

use async_trait::async_trait;
use tracing::debug;

use crate::clients::http::ApiClient;
use crate::config::TelegramSettings;
use crate::error::Result;

const TELEGRAM_BASE_URL: &str = "https://api.telegram.org";

/// Chat notification sink
#[async_trait]
pub trait ChatNotifier: Send + Sync {
    async fn send_message(&self, text: &str) -> Result<()>;
}

/// Telegram-backed implementation of [`ChatNotifier`]
pub struct TelegramClient {
    api: ApiClient,
    config: Option<TelegramSettings>,
}

impl TelegramClient {
    pub fn new(config: Option<TelegramSettings>) -> Result<Self> {
        let api = ApiClient::new(TELEGRAM_BASE_URL)?;
        Ok(Self { api, config })
    }
}

#[async_trait]
impl ChatNotifier for TelegramClient {
    async fn send_message(&self, text: &str) -> Result<()> {
        let Some(config) = &self.config else {
            debug!("Telegram is not configured, dropping chat message");
            return Ok(());
        };

        let escaped = escape_markdown_v2(text);
        let path = format!("/bot{}/sendMessage", config.token);
        let params = [
            ("chat_id", config.chat_id.as_str()),
            ("text", escaped.as_str()),
            ("parse_mode", "MarkdownV2"),
            ("disable_web_page_preview", "true"),
        ];
        self.api.get_ok(&path, &params).await
    }
}

/// Backslash-escape the characters MarkdownV2 reserves, except the
/// `[ ] ( )` link delimiters. The messages this system sends are either
/// plain text or text containing one inline link; escaping everything
/// else keeps bare `.`/`-`/`!` characters from breaking the parse while
/// the link survives intact.
pub fn escape_markdown_v2(text: &str) -> String {
    const RESERVED: &[char] = &[
        '_', '*', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    ];
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if RESERVED.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
