//! Chats that receive scheduled pushes
//!
//! Held in memory for the life of the process.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriberStore {
    chats: BTreeSet<i64>,
}

impl SubscriberStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the chat was already subscribed
    pub fn subscribe(&mut self, chat_id: i64) -> bool {
        self.chats.insert(chat_id)
    }

    /// Returns `false` if the chat was not subscribed
    pub fn unsubscribe(&mut self, chat_id: i64) -> bool {
        self.chats.remove(&chat_id)
    }

    pub fn contains(&self, chat_id: i64) -> bool {
        self.chats.contains(&chat_id)
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.chats.iter().copied()
    }
}
