use serde::{Deserialize, Serialize};

/// Newtype wrapper for NPC ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NpcId(pub u64);

/// Who delivers a line.
///
/// A tagged variant rather than a character-class hierarchy: the few
/// places that branch on speaker kind (text styling, focus targeting)
/// match on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speaker {
    Player,
    Npc(NpcId),
    /// Tutorial prompts have no sprite and no focus target.
    Tutorial,
}

impl Speaker {
    /// Returns true if this speaker is an NPC.
    pub fn is_npc(&self) -> bool {
        matches!(self, Self::Npc(_))
    }
}

/// Sprite emotion tag attached to a line. Selection of the actual
/// sprite is the presentation layer's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    Normal,
    Alternative,
    Happy,
    Surprised,
    Angry,
    Mad,
    Accusing,
    Shocked,
    /// The speaker is listening; keep whatever sprite is showing.
    Listening,
}

impl Default for Emotion {
    fn default() -> Self {
        Self::Normal
    }
}

impl Emotion {
    /// Whether presenting a line with this emotion swaps the speaker's
    /// sprite.
    pub fn changes_sprite(&self) -> bool {
        !matches!(self, Self::Listening)
    }
}

/// A world-space point, used as a camera focus target.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Text styling class for a line, decided by speaker kind and the
/// inner-thought flag. Exhaustive so the presentation layer can map
/// each class to a color/icon pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineStyle {
    NpcSpeech,
    PlayerSpeech,
    PlayerThought,
    Tutorial,
}

impl LineStyle {
    pub fn classify(speaker: Speaker, player_thought: bool) -> LineStyle {
        match speaker {
            Speaker::Npc(_) => Self::NpcSpeech,
            Speaker::Player if player_thought => Self::PlayerThought,
            Speaker::Player => Self::PlayerSpeech,
            Speaker::Tutorial => Self::Tutorial,
        }
    }
}
