/// Debate script schema — cross-examination arguments and the
/// references that score a player's answers.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::clue::ClueId;
use super::dialogue::{DialogueLine, ScriptError};
use super::speaker::{Emotion, Speaker};

/// The player's top-level classification of an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reaction {
    Agree,
    Disagree,
}

/// A single statement inside an argument's cross-examination round.
/// Unlike dialogue speech, argument text is shown whole; the panel
/// emphasis animation paces it instead of a character reveal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateLine {
    pub speaker: Speaker,
    pub argument: String,
    #[serde(default)]
    pub emotion: Emotion,
}

impl DebateLine {
    pub fn new(speaker: Speaker, argument: impl Into<String>) -> Self {
        Self {
            speaker,
            argument: argument.into(),
            emotion: Emotion::Normal,
        }
    }
}

fn default_timed() -> bool {
    true
}

/// One unit of the debate mini-game: intro dialogue, the statements to
/// cross-examine, and what the correct answer looks like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub intro: Vec<DialogueLine>,
    pub lines: Vec<DebateLine>,
    pub correct_reaction: Reaction,
    /// Required when `correct_reaction` is `Disagree`.
    #[serde(default)]
    pub correct_evidence: Option<ClueId>,
    /// Whether the answer window for this argument is timed.
    #[serde(default = "default_timed")]
    pub timed_answer: bool,
}

impl Argument {
    /// Score an Agree reaction.
    pub fn score_agree(&self) -> Outcome {
        Outcome {
            reaction_correct: self.correct_reaction == Reaction::Agree,
            evidence_correct: None,
        }
    }

    /// Score a Disagree reaction backed by the given evidence. Both
    /// halves are reported so the presentation layer can render partial
    /// feedback: right to disagree but wrong clue, and so on.
    pub fn score_evidence(&self, evidence: ClueId) -> Outcome {
        Outcome {
            reaction_correct: self.correct_reaction == Reaction::Disagree,
            evidence_correct: Some(self.correct_evidence == Some(evidence)),
        }
    }
}

/// Result of scoring a player's answer to one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub reaction_correct: bool,
    /// Present only when evidence was part of the answer.
    pub evidence_correct: Option<bool>,
}

/// An ordered list of arguments played as one debate session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebateScript {
    pub arguments: Vec<Argument>,
}

impl DebateScript {
    /// Load a debate script from a RON file, validating it.
    pub fn load_from_ron(path: &Path) -> Result<DebateScript, ScriptError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a debate script from a RON string, validating it.
    pub fn parse_ron(input: &str) -> Result<DebateScript, ScriptError> {
        let script: DebateScript = ron::from_str(input)?;
        script.validate()?;
        Ok(script)
    }

    /// Fail fast on malformed content: every argument needs intro and
    /// debate lines, and a Disagree answer is meaningless without the
    /// evidence that proves it.
    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.arguments.is_empty() {
            return Err(ScriptError::NoArguments);
        }
        for (i, argument) in self.arguments.iter().enumerate() {
            if argument.intro.is_empty() {
                return Err(ScriptError::EmptyArgumentIntro(i));
            }
            if argument.lines.is_empty() {
                return Err(ScriptError::EmptyArgumentLines(i));
            }
            if argument.correct_reaction == Reaction::Disagree
                && argument.correct_evidence.is_none()
            {
                return Err(ScriptError::MissingEvidence(i));
            }
        }
        Ok(())
    }
}
