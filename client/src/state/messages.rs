//! Direct-message inbox state.

#[cfg(test)]
#[path = "messages_test.rs"]
mod messages_test;

use crate::net::types::Message;

#[derive(Clone, Debug, Default)]
pub struct MessagesState {
    /// Inbox and sent mail combined, newest first (server order).
    pub items: Vec<Message>,
    pub loading: bool,
    pub error: Option<String>,
    pub send_pending: bool,
}

impl MessagesState {
    pub fn set_loaded(&mut self, items: Vec<Message>) {
        self.items = items;
        self.loading = false;
        self.error = None;
    }

    pub fn set_failed(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.send_pending = false;
        self.error = Some(message.into());
    }

    /// Prepend a message the server just accepted.
    pub fn record_sent(&mut self, message: Message) {
        self.items.insert(0, message);
        self.send_pending = false;
    }

    pub fn mark_read(&mut self, message_id: &str, read_at: impl Into<String>) {
        if let Some(message) = self.items.iter_mut().find(|m| m.id == message_id) {
            message.read_at = Some(read_at.into());
        }
    }

    /// Unread messages addressed to `user_id`.
    #[must_use]
    pub fn unread_count(&self, user_id: &str) -> usize {
        self.items
            .iter()
            .filter(|m| m.recipient_id == user_id && m.read_at.is_none())
            .count()
    }
}
