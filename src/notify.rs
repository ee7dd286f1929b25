use async_trait::async_trait;
use std::fmt;
use teloxide::prelude::*;
use teloxide::types::{ChatId, Recipient};
use tracing::{info, instrument};

use crate::config::Config;
use crate::error::PollError;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> Result<(), PollError>;
}

pub struct TelegramNotifier {
    bot: Bot,
    chat: Recipient,
}

impl fmt::Debug for TelegramNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramNotifier")
            .field("chat", &self.chat)
            .finish_non_exhaustive()
    }
}

/// Numeric ids address a chat directly; anything else is a channel username.
pub fn parse_recipient(chat_id: &str) -> Recipient {
    let chat_id = chat_id.trim();
    match chat_id.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(chat_id.to_string()),
    }
}

impl TelegramNotifier {
    pub fn new(bot: Bot, chat: Recipient) -> Self {
        Self { bot, chat }
    }

    pub fn from_config(cfg: &Config) -> Self {
        let bot = Bot::new(cfg.telegram.bot_token.clone());
        Self::new(bot, parse_recipient(&cfg.telegram.chat_id))
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    #[instrument(skip_all)]
    async fn notify(&self, text: &str) -> Result<(), PollError> {
        self.bot
            .send_message(self.chat.clone(), text)
            .await
            .map_err(|err| PollError::Delivery(err.to_string()))?;
        info!(chat = ?self.chat, message = text, "sent Telegram message");
        Ok(())
    }
}
