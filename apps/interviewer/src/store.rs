//! Message store: the ordered, append-only chat history of the current session.
//!
//! The store is an owned handle rather than a global. The shell and the chat
//! controller hold clones of the same handle; tests build their own.

use std::sync::{Arc, PoisonError, RwLock};

use crate::models::Message;

#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    inner: Arc<RwLock<Vec<Message>>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a turn at the end. No deduplication, no size bound.
    pub fn append(&self, message: Message) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message);
    }

    /// Drops every turn. Used when a new session begins.
    pub fn clear(&self) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Snapshot of the history in append order.
    pub fn messages(&self) -> Vec<Message> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_append_preserves_order_and_duplicates() {
        let store = MessageStore::new();
        store.append(Message::now(Role::Assistant, "q1"));
        store.append(Message::now(Role::User, "same"));
        store.append(Message::now(Role::User, "same"));

        let contents: Vec<_> = store.messages().into_iter().map(|m| m.content).collect();
        assert_eq!(contents, vec!["q1", "same", "same"]);
    }

    #[test]
    fn test_clear_empties_history() {
        let store = MessageStore::new();
        store.append(Message::now(Role::User, "a"));
        store.clear();
        assert!(store.is_empty());
        assert!(store.messages().pop().is_none());
    }

    #[test]
    fn test_clones_share_history() {
        let store = MessageStore::new();
        let other = store.clone();
        other.append(Message::now(Role::User, "shared"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.messages().pop().unwrap().content, "shared");
    }

    #[test]
    fn test_separate_stores_are_isolated() {
        let a = MessageStore::new();
        let b = MessageStore::new();
        a.append(Message::now(Role::User, "only a"));
        assert!(b.is_empty());
    }
}
