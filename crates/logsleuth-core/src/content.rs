//! Model response payload shapes and text normalization.
//!
//! Providers hand back a textual payload in one of three shapes: a plain
//! string, a sequence of content blocks, or something opaque. All of them
//! normalize to a `String` through [`MessageContent::extract_text`], which is
//! total: a shape it cannot interpret falls back to its default rendering
//! rather than failing the turn.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
    Opaque(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentBlock {
    Text { text: String },
    Plain(String),
    Other(Value),
}

impl ContentBlock {
    /// Textual portion of the block, if it carries one.
    pub fn text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Plain(text) => Some(text),
            ContentBlock::Other(_) => None,
        }
    }
}

impl MessageContent {
    /// Normalize to a plain string. Block sequences concatenate their textual
    /// portions in order with no separators; non-text blocks contribute
    /// nothing.
    pub fn extract_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Blocks(blocks) => {
                blocks.iter().filter_map(ContentBlock::text).collect()
            }
            MessageContent::Opaque(value) => match value.as_str() {
                Some(text) => text.to_string(),
                None => value.to_string(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            MessageContent::Text(text) => text.is_empty(),
            MessageContent::Blocks(blocks) => blocks.iter().all(|b| match b.text() {
                Some(text) => text.is_empty(),
                None => true,
            }),
            MessageContent::Opaque(value) => value.is_null(),
        }
    }
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}
