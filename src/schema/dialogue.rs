/// Dialogue script schema — authored conversation bundles and the
/// session-scoped read/selection state that gates which bundle plays.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::clue::Clue;
use super::speaker::{Emotion, Speaker};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("intro dialogue has no lines")]
    EmptyIntro,
    #[error("interactive intro has no lines but {0} branches are authored")]
    EmptyInteractiveIntro(usize),
    #[error("interactive branch {0} has no lines")]
    EmptyBranch(usize),
    #[error("'{0}' fallback comment has no lines")]
    EmptyFallback(&'static str),
    #[error("thought script has no lines for the {0:?} phase")]
    EmptyThought(ChapterPhase),
    #[error("tutorial has no lines")]
    EmptyTutorial,
    #[error("debate script has no arguments")]
    NoArguments,
    #[error("argument {0} has no intro lines")]
    EmptyArgumentIntro(usize),
    #[error("argument {0} has no debate lines")]
    EmptyArgumentLines(usize),
    #[error("argument {0} expects a Disagree reaction but names no evidence")]
    MissingEvidence(usize),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// A single authored line. Immutable once authored; the flags describe
/// the side effects of presenting it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueLine {
    pub speaker: Speaker,
    pub speech: String,
    #[serde(default)]
    pub emotion: Emotion,
    /// Collected when the line is presented, if not already held.
    #[serde(default)]
    pub clue: Option<Clue>,
    /// Replaces the "???" placeholder with the speaker's real name.
    #[serde(default)]
    pub reveals_speaker_name: bool,
    #[serde(default)]
    pub triggers_nice_impression: bool,
    /// Inner monologue; styled as a thought rather than spoken text.
    #[serde(default)]
    pub player_thought: bool,
}

impl DialogueLine {
    pub fn new(speaker: Speaker, speech: impl Into<String>) -> Self {
        Self {
            speaker,
            speech: speech.into(),
            emotion: Emotion::Normal,
            clue: None,
            reveals_speaker_name: false,
            triggers_nice_impression: false,
            player_thought: false,
        }
    }
}

/// A labelled choice in the interactive conversation menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueOption {
    pub label: String,
    #[serde(default)]
    pub description: String,
}

/// One selectable branch: its menu entry plus the lines it leads to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueBranch {
    pub option: DialogueOption,
    pub lines: Vec<DialogueLine>,
    #[serde(default)]
    pub triggers_nice_impression: bool,
}

/// A conversation overheard between several characters. Played once;
/// finishing it can cancel the other group dialogues still pending in
/// the area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDialogue {
    pub lines: Vec<DialogueLine>,
    #[serde(default)]
    pub cancel_other_group_dialogues: bool,
    /// Speaker layout hints for the presentation layer.
    pub left_speaker: Speaker,
    pub right_speaker: Speaker,
}

/// An intro sequence followed by player-selectable branches.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InteractiveConversation {
    #[serde(default)]
    pub intro: Vec<DialogueLine>,
    #[serde(default)]
    pub branches: Vec<DialogueBranch>,
}

/// The full authored conversation bundle for one NPC, plus the
/// session-scoped flags that gate which bundle plays next.
///
/// The flags are skipped by serde: they are runtime state, not authored
/// content, and once set they never revert within a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogueScript {
    pub intro_lines: Vec<DialogueLine>,
    #[serde(default)]
    pub group_dialogue: Option<GroupDialogue>,
    #[serde(default)]
    pub interactive: InteractiveConversation,
    pub nice_comment: Vec<DialogueLine>,
    pub rude_comment: Vec<DialogueLine>,

    #[serde(skip)]
    pub intro_read: bool,
    #[serde(skip)]
    pub group_dialogue_read: bool,
    #[serde(skip)]
    pub interaction_option_selected: bool,
}

impl DialogueScript {
    /// Load a dialogue script from a RON file, validating it.
    pub fn load_from_ron(path: &Path) -> Result<DialogueScript, ScriptError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a dialogue script from a RON string, validating it.
    pub fn parse_ron(input: &str) -> Result<DialogueScript, ScriptError> {
        let script: DialogueScript = ron::from_str(input)?;
        script.validate()?;
        Ok(script)
    }

    /// Fail fast on malformed content. An empty group dialogue is legal
    /// (it is skipped during bundle resolution); everything that can be
    /// selected for playback must have lines.
    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.intro_lines.is_empty() {
            return Err(ScriptError::EmptyIntro);
        }
        if !self.interactive.branches.is_empty() && self.interactive.intro.is_empty() {
            return Err(ScriptError::EmptyInteractiveIntro(
                self.interactive.branches.len(),
            ));
        }
        for (i, branch) in self.interactive.branches.iter().enumerate() {
            if branch.lines.is_empty() {
                return Err(ScriptError::EmptyBranch(i));
            }
        }
        if self.nice_comment.is_empty() {
            return Err(ScriptError::EmptyFallback("nice"));
        }
        if self.rude_comment.is_empty() {
            return Err(ScriptError::EmptyFallback("rude"));
        }
        Ok(())
    }
}

/// Which phase of a chapter the player is in; decides which thought
/// variant an object inspection plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChapterPhase {
    Exploration,
    Investigation,
}

/// Inner-monologue lines attached to an inspectable object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThoughtScript {
    #[serde(default)]
    pub exploration: Vec<DialogueLine>,
    #[serde(default)]
    pub investigation: Vec<DialogueLine>,
    /// Inspecting this object moves the chapter into its investigation
    /// phase.
    #[serde(default)]
    pub triggers_investigation: bool,
}

impl ThoughtScript {
    pub fn lines_for(&self, phase: ChapterPhase) -> &[DialogueLine] {
        match phase {
            ChapterPhase::Exploration => &self.exploration,
            ChapterPhase::Investigation => &self.investigation,
        }
    }
}
