//! Best-effort delivery of messages to the configured chat.

use tracing::{error, info};

use crate::error::Error;
use crate::http::Transport;
use crate::telegram::TelegramClient;

/// Sends text to a single fixed chat.
///
/// Failures are logged and reported as `false`, never returned as errors:
/// an undeliverable message must not take the poll loop down with it.
#[derive(Debug, Clone)]
pub struct Notifier {
    client: TelegramClient,
    chat_id: String,
}

impl Notifier {
    pub fn new(client: TelegramClient, chat_id: &str) -> Self {
        Self {
            client,
            chat_id: chat_id.to_string(),
        }
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// Send `message`, returning whether the bot API accepted it.
    pub fn notify<T: Transport + ?Sized>(&self, transport: &T, message: &str) -> bool {
        match self.send(transport, message) {
            Ok(()) => {
                info!(chat_id = %self.chat_id, %message, "message sent");
                true
            }
            Err(err) => {
                error!(chat_id = %self.chat_id, %message, error = %err, "message was not sent");
                false
            }
        }
    }

    fn send<T: Transport + ?Sized>(&self, transport: &T, message: &str) -> Result<(), Error> {
        let request = self.client.build_send_message(&self.chat_id, message);
        let response = transport.execute(&request)?;
        self.client.parse_send_message(response)
    }
}
