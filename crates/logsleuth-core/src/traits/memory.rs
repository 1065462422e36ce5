//! Memory trait for conversation storage

use async_trait::async_trait;

use crate::error::Result;
use crate::message::ChatMessage;

/// Append-only conversation history for one session. Insertion order is the
/// canonical chronological order; the store only changes at whole-turn
/// granularity, and only shrinks on explicit `clear`.
#[async_trait]
pub trait Memory: Send + Sync {
    async fn add_message(&self, message: ChatMessage) -> Result<()>;
    async fn get_messages(&self, limit: Option<usize>) -> Result<Vec<ChatMessage>>;
    async fn clear(&self) -> Result<()>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
