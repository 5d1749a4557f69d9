// Content registry — stable content name → numeric id mapping

use std::collections::HashMap;

/// Numeric content identifier, assigned from 1 upwards
pub type ContentId = u32;

/// Assigns ids to content names on first use.
///
/// Ids are never reused and existing mappings never change.
#[derive(Debug, Clone)]
pub struct ContentRegistry {
    ids: HashMap<String, ContentId>,
    /// Names indexed by `id - 1`
    names: Vec<String>,
}

impl Default for ContentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            names: Vec::new(),
        }
    }

    /// Id for `name`, registering it if this is the first time it is seen
    pub fn get_or_create_id(&mut self, name: &str) -> ContentId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        self.names.push(name.to_string());
        let id = self.names.len() as ContentId;
        self.ids.insert(name.to_string(), id);
        id
    }

    pub fn id_of(&self, name: &str) -> Option<ContentId> {
        self.ids.get(name).copied()
    }

    pub fn name_of(&self, id: ContentId) -> Option<&str> {
        let pos = (id as usize).checked_sub(1)?;
        self.names.get(pos).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
