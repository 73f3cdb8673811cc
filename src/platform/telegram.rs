use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, Recipient};
use tracing::{debug, error};

use crate::error::{BotError, BotResult};
use crate::platform::Notifier;

/// Telegram refuses messages longer than this many characters.
const MAX_MESSAGE_LEN: usize = 4096;

/// Split long messages for Telegram's message length limit, counted in chars
fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.chars().count() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        // Byte offset of the first char past the limit, if any
        let end = text[start..]
            .char_indices()
            .nth(max_len)
            .map(|(pos, _)| start + pos)
            .unwrap_or(text.len());
        let actual_end = if end < text.len() {
            text[start..end]
                .rfind('\n')
                .or_else(|| text[start..end].rfind(' '))
                .map(|pos| start + pos + 1)
                .unwrap_or(end)
        } else {
            end
        };

        chunks.push(text[start..actual_end].to_string());
        start = actual_end;
    }

    chunks
}

/// Numeric ids address a chat directly; anything else is a channel username.
fn recipient(destination: &str) -> Recipient {
    match destination.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(destination.to_string()),
    }
}

pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(token: &str) -> Self {
        Self {
            bot: Bot::new(token),
        }
    }

    #[cfg(test)]
    fn with_bot(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, destination: &str, text: &str) -> BotResult<()> {
        debug!("Sending message to Telegram chat {}", destination);

        for chunk in split_message(text, MAX_MESSAGE_LEN) {
            if let Err(e) = self.bot.send_message(recipient(destination), chunk).await {
                error!("Failed to send message to Telegram: {}", e);
                return Err(BotError::Delivery(e.to_string()));
            }
        }

        debug!("Message delivered to Telegram chat {}", destination);
        Ok(())
    }
}
