/// Shared session state — the character roster, the player's clue set,
/// the registered dialogue scripts, and the signal bus. Constructed by
/// the host game and passed by `&mut` into every sequencer operation;
/// there is no ambient global lookup.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::core::signal::SignalBus;
use crate::schema::clue::{Clue, ClueId};
use crate::schema::dialogue::DialogueScript;
use crate::schema::speaker::{NpcId, Position, Speaker};

/// Authored identity of an NPC.
#[derive(Debug, Clone)]
pub struct NpcProfile {
    pub id: NpcId,
    pub name: String,
    /// Where the camera looks when this character speaks.
    pub position: Position,
}

/// Mutable acquaintance state. Both flags only ever go from false to
/// true within a session.
#[derive(Debug, Clone, Copy, Default)]
pub struct NpcState {
    pub name_revealed: bool,
    pub nice_with_player: bool,
}

#[derive(Debug, Clone)]
struct NpcEntry {
    profile: NpcProfile,
    state: NpcState,
}

/// Registry of every character that can deliver a line.
#[derive(Debug, Clone)]
pub struct CharacterRoster {
    player_name: String,
    player_position: Position,
    npcs: FxHashMap<NpcId, NpcEntry>,
}

impl CharacterRoster {
    pub fn new(player_name: impl Into<String>, player_position: Position) -> Self {
        Self {
            player_name: player_name.into(),
            player_position,
            npcs: FxHashMap::default(),
        }
    }

    pub fn register(&mut self, profile: NpcProfile) {
        self.npcs.insert(
            profile.id,
            NpcEntry {
                profile,
                state: NpcState::default(),
            },
        );
    }

    pub fn set_player_position(&mut self, position: Position) {
        self.player_position = position;
    }

    pub fn player_position(&self) -> Position {
        self.player_position
    }

    /// Display name for a speaker. NPCs render as "???" until a line
    /// has revealed their name.
    pub fn display_name(&self, speaker: Speaker) -> &str {
        match speaker {
            Speaker::Player => &self.player_name,
            Speaker::Tutorial => "Tutorial",
            Speaker::Npc(id) => match self.npcs.get(&id) {
                Some(entry) if entry.state.name_revealed => &entry.profile.name,
                _ => "???",
            },
        }
    }

    /// Focus target for a speaker; tutorial prompts have none.
    pub fn position_of(&self, speaker: Speaker) -> Option<Position> {
        match speaker {
            Speaker::Player => Some(self.player_position),
            Speaker::Tutorial => None,
            Speaker::Npc(id) => self.npcs.get(&id).map(|entry| entry.profile.position),
        }
    }

    pub fn reveal_name(&mut self, id: NpcId) {
        if let Some(entry) = self.npcs.get_mut(&id) {
            entry.state.name_revealed = true;
        }
    }

    pub fn is_name_revealed(&self, id: NpcId) -> bool {
        self.npcs
            .get(&id)
            .map(|entry| entry.state.name_revealed)
            .unwrap_or(false)
    }

    pub fn set_nice_with_player(&mut self, id: NpcId) {
        if let Some(entry) = self.npcs.get_mut(&id) {
            entry.state.nice_with_player = true;
        }
    }

    pub fn is_nice_with_player(&self, id: NpcId) -> bool {
        self.npcs
            .get(&id)
            .map(|entry| entry.state.nice_with_player)
            .unwrap_or(false)
    }
}

/// The player's collected clues, plus the notifications deferred until
/// the end of the session that produced them.
#[derive(Debug, Clone, Default)]
pub struct PlayerContext {
    clues: Vec<Clue>,
    clue_ids: FxHashSet<ClueId>,
    pending_clues: Vec<ClueId>,
    pending_investigation: bool,
}

impl PlayerContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clue if not already held. Returns whether it was new; new
    /// clues queue a deferred `ClueFound` notification.
    pub fn add_clue(&mut self, clue: Clue) -> bool {
        if !self.clue_ids.insert(clue.id) {
            return false;
        }
        self.pending_clues.push(clue.id);
        self.clues.push(clue);
        true
    }

    pub fn has_clue(&self, id: ClueId) -> bool {
        self.clue_ids.contains(&id)
    }

    /// Held clues in collection order.
    pub fn clues(&self) -> &[Clue] {
        &self.clues
    }

    /// Queue a deferred `InvestigationStarted` notification.
    pub fn start_investigation(&mut self) {
        self.pending_investigation = true;
    }

    /// Drain the deferred notifications. Called once when presentation
    /// of a session ends.
    pub(crate) fn take_pending(&mut self) -> (Vec<ClueId>, bool) {
        (
            std::mem::take(&mut self.pending_clues),
            std::mem::replace(&mut self.pending_investigation, false),
        )
    }
}

/// Everything the sequencers read and mutate while driving a session.
pub struct SessionState {
    pub roster: CharacterRoster,
    pub player: PlayerContext,
    pub scripts: FxHashMap<NpcId, DialogueScript>,
    pub bus: SignalBus,
}

impl SessionState {
    pub fn new(roster: CharacterRoster) -> Self {
        Self {
            roster,
            player: PlayerContext::new(),
            scripts: FxHashMap::default(),
            bus: SignalBus::new(),
        }
    }

    pub fn register_script(&mut self, npc: NpcId, script: DialogueScript) {
        self.scripts.insert(npc, script);
    }
}
