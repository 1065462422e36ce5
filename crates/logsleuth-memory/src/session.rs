use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use logsleuth_core::{Memory, Result};

use crate::InMemoryStore;

pub type MemoryFactory = Box<dyn Fn() -> Arc<dyn Memory> + Send + Sync>;

/// Maps opaque session keys to memory instances. Sessions are created on
/// first use and live for the process lifetime unless cleared or removed;
/// there is no cross-session sharing.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<dyn Memory>>>,
    factory: MemoryFactory,
}

impl SessionStore {
    /// Store backed by unbounded [`InMemoryStore`] instances.
    pub fn new() -> Self {
        Self::with_factory(Box::new(|| Arc::new(InMemoryStore::new()) as Arc<dyn Memory>))
    }

    pub fn with_factory(factory: MemoryFactory) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            factory,
        }
    }

    pub fn get_or_create(&self, session_id: &str) -> Arc<dyn Memory> {
        if let Some(memory) = self.sessions.read().get(session_id) {
            return Arc::clone(memory);
        }

        let mut sessions = self.sessions.write();
        Arc::clone(
            sessions
                .entry(session_id.to_string())
                .or_insert_with(|| (self.factory)()),
        )
    }

    /// Empty the session's history, keeping the session alive.
    pub async fn clear(&self, session_id: &str) -> Result<()> {
        let memory = self.sessions.read().get(session_id).cloned();
        if let Some(memory) = memory {
            memory.clear().await?;
        }
        Ok(())
    }

    /// Drop the session entirely.
    pub fn remove(&self, session_id: &str) {
        self.sessions.write().remove(session_id);
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsleuth_core::ChatMessage;

    #[tokio::test]
    async fn test_create_on_first_use() {
        let store = SessionStore::new();
        assert!(store.is_empty());

        let memory = store.get_or_create("session-a");
        assert_eq!(store.len(), 1);
        assert!(memory.is_empty());
    }

    #[tokio::test]
    async fn test_same_key_returns_same_memory() {
        let store = SessionStore::new();

        let first = store.get_or_create("s1");
        first.add_message(ChatMessage::user("hi")).await.unwrap();

        let second = store.get_or_create("s1");
        assert_eq!(second.len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new();

        store
            .get_or_create("a")
            .add_message(ChatMessage::user("for a"))
            .await
            .unwrap();

        assert!(store.get_or_create("b").is_empty());
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_clear_keeps_session() {
        let store = SessionStore::new();
        let memory = store.get_or_create("s1");
        memory.add_message(ChatMessage::user("hi")).await.unwrap();

        store.clear("s1").await.unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get_or_create("s1").is_empty());
    }

    #[tokio::test]
    async fn test_remove_drops_session() {
        let store = SessionStore::new();
        store.get_or_create("s1");
        store.remove("s1");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_custom_factory() {
        let store = SessionStore::with_factory(Box::new(|| {
            Arc::new(InMemoryStore::with_max_messages(2)) as Arc<dyn Memory>
        }));

        let memory = store.get_or_create("bounded");
        for i in 0..4 {
            memory
                .add_message(ChatMessage::user(format!("msg{}", i)))
                .await
                .unwrap();
        }
        assert_eq!(memory.len(), 2);
    }
}
