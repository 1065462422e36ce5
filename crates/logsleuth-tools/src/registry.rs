use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::{Tool, ToolError, ToolInfo};

/// Fixed collection of named capabilities. Read-only after start-up
/// initialization, so it is shared by all sessions without further locking
/// discipline.
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: RwLock::new(HashMap::new()),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let mut tools = self.tools.write();
        let id = tool.id().to_string();

        if tools.contains_key(&id) {
            return Err(ToolError::Duplicate(id));
        }

        tools.insert(id, tool);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Tool>> {
        self.tools.read().get(id).cloned()
    }

    /// Declarations for advertising to the model.
    pub fn list_infos(&self) -> Vec<ToolInfo> {
        self.tools.read().values().map(|tool| tool.info()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.read().is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
