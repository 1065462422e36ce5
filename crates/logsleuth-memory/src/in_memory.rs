use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use logsleuth_core::{ChatMessage, Memory, Result};

/// In-process conversation store. Unbounded by default: a long-running
/// session accumulates history indefinitely unless a cap is opted into with
/// [`InMemoryStore::with_max_messages`], which evicts oldest-first.
pub struct InMemoryStore {
    messages: Arc<RwLock<Vec<ChatMessage>>>,
    max_messages: Option<usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
            max_messages: None,
        }
    }

    pub fn with_max_messages(max_messages: usize) -> Self {
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
            max_messages: Some(max_messages),
        }
    }

    pub fn max_messages(&self) -> Option<usize> {
        self.max_messages
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryStore {
    fn clone(&self) -> Self {
        Self {
            messages: Arc::clone(&self.messages),
            max_messages: self.max_messages,
        }
    }
}

#[async_trait]
impl Memory for InMemoryStore {
    async fn add_message(&self, message: ChatMessage) -> Result<()> {
        let mut messages = self.messages.write();
        messages.push(message);

        if let Some(max) = self.max_messages {
            while messages.len() > max {
                messages.remove(0);
            }
        }

        Ok(())
    }

    async fn get_messages(&self, limit: Option<usize>) -> Result<Vec<ChatMessage>> {
        let messages = self.messages.read();
        match limit {
            Some(n) => {
                let start = messages.len().saturating_sub(n);
                Ok(messages[start..].to_vec())
            }
            None => Ok(messages.clone()),
        }
    }

    async fn clear(&self) -> Result<()> {
        self.messages.write().clear();
        Ok(())
    }

    fn len(&self) -> usize {
        self.messages.read().len()
    }
}
