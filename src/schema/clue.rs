use serde::{Deserialize, Serialize};

/// Newtype wrapper for clue ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClueId(pub u64);

/// A collectible piece of case knowledge: opaque identity plus the
/// display name shown in clue menus and evidence selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clue {
    pub id: ClueId,
    pub name: String,
}

impl Clue {
    pub fn new(id: ClueId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
