//! Notification sinks

use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode};
use tracing::error;

/// Outbound notification sink.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    /// Deliver `message`; `true` on success. Delivery failures are
    /// logged, never propagated.
    async fn send(&self, message: &str) -> bool;
}

/// Telegram delivery via the bot API, HTML parse mode.
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    pub fn new(token: &str, chat_id: i64) -> Self {
        Self {
            bot: Bot::new(token),
            chat_id: ChatId(chat_id),
        }
    }
}

impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) -> bool {
        match self
            .bot
            .send_message(self.chat_id, message)
            .parse_mode(ParseMode::Html)
            .await
        {
            Ok(_) => true,
            Err(err) => {
                error!("telegram send failed: {}", err);
                false
            }
        }
    }
}
