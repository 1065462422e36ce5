//! Conversation memory for the logsleuth agent

mod in_memory;
mod session;

pub use in_memory::InMemoryStore;
pub use logsleuth_core::Memory;
pub use session::{MemoryFactory, SessionStore};
