/// Dialogue sequencing — bundle resolution, line playback, and the
/// focus-then-reveal animation handoff.

use thiserror::Error;
use tracing::debug;

use crate::core::context::SessionState;
use crate::core::focus::{target_yaw_toward, FocusConfig, FocusTransitionController};
use crate::core::reveal::{RevealConfig, TextRevealController};
use crate::core::signal::Signal;
use crate::schema::dialogue::{
    ChapterPhase, DialogueLine, DialogueScript, ScriptError, ThoughtScript,
};
use crate::schema::speaker::{NpcId, Speaker};

#[derive(Debug, Error)]
pub enum SequencerError {
    #[error("no dialogue script registered for {0:?}")]
    UnknownSpeaker(NpcId),
    #[error("{op} is not valid in the {state:?} state")]
    InvalidOperation {
        op: &'static str,
        state: SequencerState,
    },
    #[error("option {index} selected but only {available} options exist")]
    OutOfRangeSelection { index: usize, available: usize },
    #[error(transparent)]
    Script(#[from] ScriptError),
}

/// Where the sequencer is in its presentation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Idle,
    /// A line's focus transition or text reveal is animating.
    PlayingLine,
    /// The line is fully presented; waiting for a continue input.
    AwaitingAdvance,
    /// The interactive option menu is up.
    ChoosingOption,
}

/// Which bundle the current lines came from. Decides the flags to set
/// and the follow-up when the bundle runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bundle {
    Intro,
    Group,
    InteractiveIntro,
    Branch,
    NiceComment,
    RudeComment,
    Thought,
    Tutorial,
}

/// Animation pacing for dialogue presentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequencerConfig {
    pub reveal: RevealConfig,
    pub focus: FocusConfig,
}

/// Drives one conversation at a time: which line plays, how it is
/// paced, and when player input is accepted.
///
/// At most one of the sequencer and the debate engine presents at any
/// moment; the host game decides which one receives input and ticks.
pub struct DialogueSequencer {
    config: SequencerConfig,
    state: SequencerState,
    lines: Vec<DialogueLine>,
    bundle: Option<Bundle>,
    line_index: usize,
    npc: Option<NpcId>,
    previous_speaker: Option<Speaker>,
    focus: FocusTransitionController,
    reveal: TextRevealController,
    camera_yaw: f32,
}

impl DialogueSequencer {
    pub fn new(config: SequencerConfig) -> Self {
        Self {
            config,
            state: SequencerState::Idle,
            lines: Vec::new(),
            bundle: None,
            line_index: 0,
            npc: None,
            previous_speaker: None,
            focus: FocusTransitionController::new(),
            reveal: TextRevealController::new(),
            camera_yaw: 0.0,
        }
    }

    /// Begin a conversation with `npc`.
    ///
    /// The opening bundle is resolved by strict priority, evaluated
    /// once: the unread intro; then an unread, non-empty group
    /// dialogue; then the interactive conversation while no option has
    /// been chosen; then the nice or rude fallback comment depending on
    /// the NPC's impression of the player.
    pub fn begin(&mut self, npc: NpcId, state: &mut SessionState) -> Result<(), SequencerError> {
        if self.state != SequencerState::Idle {
            return Err(SequencerError::InvalidOperation {
                op: "begin",
                state: self.state,
            });
        }
        let script = state
            .scripts
            .get(&npc)
            .ok_or(SequencerError::UnknownSpeaker(npc))?;
        script.validate()?;

        let (bundle, lines) = if !script.intro_read {
            (Bundle::Intro, script.intro_lines.clone())
        } else if let Some(group) = script
            .group_dialogue
            .as_ref()
            .filter(|group| !script.group_dialogue_read && !group.lines.is_empty())
        {
            (Bundle::Group, group.lines.clone())
        } else if !script.interaction_option_selected && !script.interactive.intro.is_empty() {
            (Bundle::InteractiveIntro, script.interactive.intro.clone())
        } else if state.roster.is_nice_with_player(npc) {
            (Bundle::NiceComment, script.nice_comment.clone())
        } else {
            (Bundle::RudeComment, script.rude_comment.clone())
        };

        debug!(?npc, ?bundle, "dialogue session begins");
        self.npc = Some(npc);
        state.bus.schedule(Signal::AreaShown);
        self.start_bundle(bundle, lines, state);
        state.bus.flush();
        Ok(())
    }

    /// Begin an inner-monologue session over an inspected object,
    /// picking the thought variant for the current chapter phase.
    pub fn begin_thought(
        &mut self,
        thought: &ThoughtScript,
        phase: ChapterPhase,
        state: &mut SessionState,
    ) -> Result<(), SequencerError> {
        if self.state != SequencerState::Idle {
            return Err(SequencerError::InvalidOperation {
                op: "begin_thought",
                state: self.state,
            });
        }
        let lines = thought.lines_for(phase);
        if lines.is_empty() {
            return Err(ScriptError::EmptyThought(phase).into());
        }
        if thought.triggers_investigation {
            state.player.start_investigation();
        }
        self.npc = None;
        state.bus.schedule(Signal::AreaShown);
        self.start_bundle(Bundle::Thought, lines.to_vec(), state);
        state.bus.flush();
        Ok(())
    }

    /// Begin a tutorial prompt session over plain lines.
    pub fn begin_tutorial(
        &mut self,
        lines: &[DialogueLine],
        state: &mut SessionState,
    ) -> Result<(), SequencerError> {
        if self.state != SequencerState::Idle {
            return Err(SequencerError::InvalidOperation {
                op: "begin_tutorial",
                state: self.state,
            });
        }
        if lines.is_empty() {
            return Err(ScriptError::EmptyTutorial.into());
        }
        self.npc = None;
        state.bus.schedule(Signal::AreaShown);
        self.start_bundle(Bundle::Tutorial, lines.to_vec(), state);
        state.bus.flush();
        Ok(())
    }

    /// Handle a continue input.
    ///
    /// A press first fast-forwards whatever is animating — the focus
    /// transition, then the text reveal — without touching the line
    /// index; animation pacing is skippable, narrative content is not.
    /// Only when nothing is active does the line index move, playing
    /// the next line or resolving the exhausted bundle.
    pub fn advance(&mut self, state: &mut SessionState) -> Result<(), SequencerError> {
        match self.state {
            SequencerState::Idle | SequencerState::ChoosingOption => {
                return Err(SequencerError::InvalidOperation {
                    op: "advance",
                    state: self.state,
                });
            }
            SequencerState::PlayingLine | SequencerState::AwaitingAdvance => {}
        }

        if self.focus.is_active() {
            self.focus.cancel();
            self.camera_yaw = self.focus.current_yaw();
            let speech = self.lines[self.line_index].speech.clone();
            self.start_reveal(&speech);
            state.bus.flush();
            return Ok(());
        }
        if self.reveal.is_active() {
            self.reveal.cancel();
            self.state = SequencerState::AwaitingAdvance;
            state.bus.flush();
            return Ok(());
        }

        self.line_index += 1;
        if self.line_index < self.lines.len() {
            self.play_current_line(state);
        } else {
            self.finish_bundle(state);
        }
        state.bus.flush();
        Ok(())
    }

    /// Pick an interactive option. Valid only while the option menu is
    /// up; marks the conversation as answered and plays the branch.
    pub fn select_option(
        &mut self,
        index: usize,
        state: &mut SessionState,
    ) -> Result<(), SequencerError> {
        if self.state != SequencerState::ChoosingOption {
            return Err(SequencerError::InvalidOperation {
                op: "select_option",
                state: self.state,
            });
        }
        let npc = match self.npc {
            Some(npc) => npc,
            None => {
                return Err(SequencerError::InvalidOperation {
                    op: "select_option",
                    state: self.state,
                })
            }
        };
        let script = state
            .scripts
            .get_mut(&npc)
            .ok_or(SequencerError::UnknownSpeaker(npc))?;
        let available = script.interactive.branches.len();
        if index >= available {
            return Err(SequencerError::OutOfRangeSelection { index, available });
        }

        script.interaction_option_selected = true;
        let branch = &script.interactive.branches[index];
        let lines = branch.lines.clone();
        let nice = branch.triggers_nice_impression;
        if nice {
            state.roster.set_nice_with_player(npc);
        }
        debug!(index, "interactive option selected");
        self.start_bundle(Bundle::Branch, lines, state);
        state.bus.flush();
        Ok(())
    }

    /// Advance the active animation controller. Call once per game
    /// tick; text reveal starts the moment the focus transition lands.
    pub fn tick(&mut self, dt: f32, state: &mut SessionState) {
        if self.state != SequencerState::PlayingLine {
            return;
        }
        if self.focus.is_active() {
            self.focus.tick(dt);
            self.camera_yaw = self.focus.current_yaw();
            if !self.focus.is_active() {
                let speech = self.lines[self.line_index].speech.clone();
                self.start_reveal(&speech);
            }
        } else if self.reveal.is_active() {
            self.reveal.tick(dt);
            if !self.reveal.is_active() {
                self.state = SequencerState::AwaitingAdvance;
            }
        }
        state.bus.flush();
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// The line being presented, if any.
    pub fn current_line(&self) -> Option<&DialogueLine> {
        match self.state {
            SequencerState::PlayingLine | SequencerState::AwaitingAdvance => {
                self.lines.get(self.line_index)
            }
            SequencerState::Idle | SequencerState::ChoosingOption => None,
        }
    }

    pub fn focus(&self) -> &FocusTransitionController {
        &self.focus
    }

    pub fn reveal(&self) -> &TextRevealController {
        &self.reveal
    }

    pub fn camera_yaw(&self) -> f32 {
        self.camera_yaw
    }

    fn start_bundle(&mut self, bundle: Bundle, lines: Vec<DialogueLine>, state: &mut SessionState) {
        self.bundle = Some(bundle);
        self.lines = lines;
        self.line_index = 0;
        self.play_current_line(state);
    }

    fn play_current_line(&mut self, state: &mut SessionState) {
        let line = self.lines[self.line_index].clone();

        // Pickup and acquaintance side effects land when the line is
        // presented, not when its animation finishes.
        if let Some(clue) = line.clue.clone() {
            state.player.add_clue(clue);
        }
        if let Speaker::Npc(id) = line.speaker {
            if line.reveals_speaker_name {
                state.roster.reveal_name(id);
            }
            if line.triggers_nice_impression {
                state.roster.set_nice_with_player(id);
            }
        }

        self.state = SequencerState::PlayingLine;

        if self.previous_speaker != Some(line.speaker) {
            state.bus.schedule(Signal::SpeakerChanged(line.speaker));
            self.previous_speaker = Some(line.speaker);
            // Only NPC speakers pull the camera: the player is the
            // camera in conversation scenes, and tutorial prompts have
            // no position.
            if line.speaker.is_npc() {
                if let Some(position) = state.roster.position_of(line.speaker) {
                    let target = target_yaw_toward(state.roster.player_position(), position);
                    self.focus.start(self.camera_yaw, target, &self.config.focus);
                }
            }
        }

        if !self.focus.is_active() {
            self.start_reveal(&line.speech);
        }
    }

    fn start_reveal(&mut self, speech: &str) {
        self.reveal.start(speech, &self.config.reveal);
        if !self.reveal.is_active() {
            self.state = SequencerState::AwaitingAdvance;
        }
    }

    /// The exhausted bundle marks its read flag and resolves what comes
    /// next. Follow-ups cover the group dialogue and the interactive
    /// conversation; the fallback comments are a begin-time resolution
    /// only, so every session terminates.
    fn finish_bundle(&mut self, state: &mut SessionState) {
        let bundle = match self.bundle {
            Some(bundle) => bundle,
            None => return,
        };
        match bundle {
            Bundle::Intro => {
                let mut follow = None;
                if let Some(script) = self.npc.and_then(|id| state.scripts.get_mut(&id)) {
                    script.intro_read = true;
                    follow = Self::resolve_follow_up(script);
                }
                match follow {
                    Some((next, lines)) => self.start_bundle(next, lines, state),
                    None => self.end_session(state),
                }
            }
            Bundle::Group => {
                let mut follow = None;
                let mut cancel_others = false;
                if let Some(script) = self.npc.and_then(|id| state.scripts.get_mut(&id)) {
                    script.group_dialogue_read = true;
                    cancel_others = script
                        .group_dialogue
                        .as_ref()
                        .is_some_and(|group| group.cancel_other_group_dialogues);
                    follow = Self::resolve_follow_up(script);
                }
                if cancel_others {
                    state.bus.schedule(Signal::GroupDialoguesCancelled);
                }
                match follow {
                    Some((next, lines)) => self.start_bundle(next, lines, state),
                    None => self.end_session(state),
                }
            }
            Bundle::InteractiveIntro => {
                let selected = self
                    .npc
                    .and_then(|id| state.scripts.get(&id))
                    .map(|script| script.interaction_option_selected)
                    .unwrap_or(false);
                if selected {
                    self.end_session(state);
                } else {
                    self.bundle = None;
                    self.lines.clear();
                    self.line_index = 0;
                    self.state = SequencerState::ChoosingOption;
                }
            }
            Bundle::Branch
            | Bundle::NiceComment
            | Bundle::RudeComment
            | Bundle::Thought
            | Bundle::Tutorial => self.end_session(state),
        }
    }

    fn resolve_follow_up(script: &DialogueScript) -> Option<(Bundle, Vec<DialogueLine>)> {
        if let Some(group) = script
            .group_dialogue
            .as_ref()
            .filter(|group| !script.group_dialogue_read && !group.lines.is_empty())
        {
            return Some((Bundle::Group, group.lines.clone()));
        }
        if !script.interaction_option_selected && !script.interactive.intro.is_empty() {
            return Some((Bundle::InteractiveIntro, script.interactive.intro.clone()));
        }
        None
    }

    /// Dismiss the presentation area and release the deferred
    /// notifications gathered during the session.
    fn end_session(&mut self, state: &mut SessionState) {
        debug!("dialogue session ends");
        self.state = SequencerState::Idle;
        self.bundle = None;
        self.lines.clear();
        self.line_index = 0;
        self.npc = None;
        self.previous_speaker = None;

        state.bus.schedule(Signal::AreaHidden);
        let (clues, investigation) = state.player.take_pending();
        for clue in clues {
            state.bus.schedule(Signal::ClueFound(clue));
        }
        if investigation {
            state.bus.schedule(Signal::InvestigationStarted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::{CharacterRoster, NpcProfile};
    use crate::schema::clue::{Clue, ClueId};
    use crate::schema::dialogue::{
        DialogueBranch, DialogueOption, GroupDialogue, InteractiveConversation,
    };
    use crate::schema::speaker::Position;

    const VERA: NpcId = NpcId(1);

    fn npc_line(text: &str) -> DialogueLine {
        DialogueLine::new(Speaker::Npc(VERA), text)
    }

    fn make_state(script: DialogueScript) -> SessionState {
        let mut roster = CharacterRoster::new("Irene", Position::default());
        roster.register(NpcProfile {
            id: VERA,
            name: "Vera".to_string(),
            position: Position::new(0.0, 0.0, 2.0),
        });
        let mut state = SessionState::new(roster);
        state.register_script(VERA, script);
        state
    }

    fn make_script() -> DialogueScript {
        DialogueScript {
            intro_lines: vec![npc_line("Who let you in?")],
            interactive: InteractiveConversation {
                intro: vec![npc_line("What do you want to know?")],
                branches: vec![DialogueBranch {
                    option: DialogueOption {
                        label: "The night of the party".to_string(),
                        description: String::new(),
                    },
                    lines: vec![npc_line("I retired early. Ask the maid.")],
                    triggers_nice_impression: true,
                }],
            },
            nice_comment: vec![npc_line("You again? Fine.")],
            rude_comment: vec![npc_line("We're done talking.")],
            ..DialogueScript::default()
        }
    }

    fn sequencer() -> DialogueSequencer {
        DialogueSequencer::new(SequencerConfig::default())
    }

    /// Run ticks until the current line has finished presenting.
    fn settle(seq: &mut DialogueSequencer, state: &mut SessionState) {
        for _ in 0..10_000 {
            if seq.state() != SequencerState::PlayingLine {
                return;
            }
            seq.tick(0.05, state);
        }
        panic!("line never finished presenting");
    }

    #[test]
    fn begin_plays_unread_intro_first() {
        let mut state = make_state(make_script());
        let mut seq = sequencer();
        seq.begin(VERA, &mut state).unwrap();

        assert_eq!(seq.state(), SequencerState::PlayingLine);
        assert_eq!(seq.current_line().unwrap().speech, "Who let you in?");
        assert!(!state.scripts[&VERA].intro_read);
    }

    #[test]
    fn full_interactive_session() {
        let mut state = make_state(make_script());
        let mut seq = sequencer();
        seq.begin(VERA, &mut state).unwrap();

        // Intro line finishes; advancing past it marks the intro read
        // and falls through to the interactive intro.
        settle(&mut seq, &mut state);
        seq.advance(&mut state).unwrap();
        assert!(state.scripts[&VERA].intro_read);
        assert_eq!(
            seq.current_line().unwrap().speech,
            "What do you want to know?"
        );

        // Interactive intro finishes; the option menu comes up.
        settle(&mut seq, &mut state);
        seq.advance(&mut state).unwrap();
        assert_eq!(seq.state(), SequencerState::ChoosingOption);

        // Picking the branch marks the selection and plays its lines.
        seq.select_option(0, &mut state).unwrap();
        assert!(state.scripts[&VERA].interaction_option_selected);
        assert!(state.roster.is_nice_with_player(VERA));
        assert_eq!(
            seq.current_line().unwrap().speech,
            "I retired early. Ask the maid."
        );

        // Branch finishes; the session ends.
        settle(&mut seq, &mut state);
        seq.advance(&mut state).unwrap();
        assert_eq!(seq.state(), SequencerState::Idle);
    }

    #[test]
    fn revisit_plays_fallback_comment() {
        let mut state = make_state(make_script());
        let mut seq = sequencer();

        // Exhaust intro, interactive intro, and the branch.
        seq.begin(VERA, &mut state).unwrap();
        settle(&mut seq, &mut state);
        seq.advance(&mut state).unwrap();
        settle(&mut seq, &mut state);
        seq.advance(&mut state).unwrap();
        seq.select_option(0, &mut state).unwrap();
        settle(&mut seq, &mut state);
        seq.advance(&mut state).unwrap();
        assert_eq!(seq.state(), SequencerState::Idle);

        // The chosen branch was flagged nice, so the revisit is warm.
        seq.begin(VERA, &mut state).unwrap();
        assert_eq!(seq.current_line().unwrap().speech, "You again? Fine.");
    }

    #[test]
    fn rude_fallback_without_nice_impression() {
        let mut script = make_script();
        script.interactive.branches[0].triggers_nice_impression = false;
        let mut state = make_state(script);
        let mut seq = sequencer();

        seq.begin(VERA, &mut state).unwrap();
        settle(&mut seq, &mut state);
        seq.advance(&mut state).unwrap();
        settle(&mut seq, &mut state);
        seq.advance(&mut state).unwrap();
        seq.select_option(0, &mut state).unwrap();
        settle(&mut seq, &mut state);
        seq.advance(&mut state).unwrap();

        seq.begin(VERA, &mut state).unwrap();
        assert_eq!(seq.current_line().unwrap().speech, "We're done talking.");
    }

    #[test]
    fn group_dialogue_plays_after_intro_and_cancels_others() {
        let mut script = make_script();
        script.group_dialogue = Some(GroupDialogue {
            lines: vec![npc_line("Keep your voice down."), npc_line("Too late.")],
            cancel_other_group_dialogues: true,
            left_speaker: Speaker::Npc(VERA),
            right_speaker: Speaker::Player,
        });
        let mut state = make_state(script);

        use crate::core::signal::SignalKind;
        use std::cell::RefCell;
        use std::rc::Rc;
        let cancelled = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&cancelled);
        state
            .bus
            .subscribe(SignalKind::GroupDialoguesCancelled, move |_| {
                *sink.borrow_mut() += 1;
            });

        let mut seq = sequencer();
        seq.begin(VERA, &mut state).unwrap();
        settle(&mut seq, &mut state);
        seq.advance(&mut state).unwrap();
        assert_eq!(seq.current_line().unwrap().speech, "Keep your voice down.");

        settle(&mut seq, &mut state);
        seq.advance(&mut state).unwrap();
        settle(&mut seq, &mut state);
        seq.advance(&mut state).unwrap();
        assert!(state.scripts[&VERA].group_dialogue_read);
        assert_eq!(*cancelled.borrow(), 1);
        // The interactive conversation follows the group dialogue.
        assert_eq!(
            seq.current_line().unwrap().speech,
            "What do you want to know?"
        );
    }

    #[test]
    fn advance_fast_forwards_before_moving_on() {
        let mut state = make_state(make_script());
        let mut seq = sequencer();
        seq.begin(VERA, &mut state).unwrap();

        // The NPC is straight ahead, so there is no focus transition
        // and the reveal is animating.
        assert!(seq.reveal().is_active());
        let before = seq.reveal().visible_chars();
        assert!(before < seq.reveal().total_chars());

        // First press: snap the reveal, keep the line.
        seq.advance(&mut state).unwrap();
        assert_eq!(seq.state(), SequencerState::AwaitingAdvance);
        assert_eq!(seq.reveal().visible_chars(), seq.reveal().total_chars());
        assert_eq!(seq.current_line().unwrap().speech, "Who let you in?");

        // Second press: now the index moves.
        seq.advance(&mut state).unwrap();
        assert_eq!(
            seq.current_line().unwrap().speech,
            "What do you want to know?"
        );
    }

    #[test]
    fn focus_transition_gates_text_reveal() {
        let mut script = make_script();
        // Put the NPC off to the side so the camera has to turn.
        let mut state = make_state(script.clone());
        state.roster.register(NpcProfile {
            id: VERA,
            name: "Vera".to_string(),
            position: Position::new(3.0, 0.0, 0.0),
        });
        script.intro_lines = vec![npc_line("Over here.")];
        state.register_script(VERA, script);

        let mut seq = sequencer();
        seq.begin(VERA, &mut state).unwrap();
        assert!(seq.focus().is_active());
        assert!(!seq.reveal().is_active());
        assert_eq!(seq.reveal().visible_chars(), 0);

        // 90 degrees at 60 deg/s: reveal starts once the camera lands.
        seq.tick(1.0, &mut state);
        assert!(seq.focus().is_active());
        assert!(!seq.reveal().is_active());
        seq.tick(0.5, &mut state);
        assert!(!seq.focus().is_active());
        assert!(seq.reveal().is_active());
        assert!((seq.camera_yaw() - 90.0).abs() < 1e-3);
    }

    #[test]
    fn clue_signal_deferred_until_session_end() {
        use crate::core::signal::SignalKind;
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut script = make_script();
        script.intro_lines = vec![DialogueLine {
            clue: Some(Clue::new(ClueId(7), "Torn letter")),
            ..npc_line("Take this. Tell no one.")
        }];
        script.interactive = InteractiveConversation::default();
        let mut state = make_state(script);

        let found = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&found);
        state.bus.subscribe(SignalKind::ClueFound, move |signal| {
            sink.borrow_mut().push(*signal);
        });

        let mut seq = sequencer();
        seq.begin(VERA, &mut state).unwrap();

        // Held immediately, announced later.
        assert!(state.player.has_clue(ClueId(7)));
        assert!(found.borrow().is_empty());

        settle(&mut seq, &mut state);
        seq.advance(&mut state).unwrap();
        assert_eq!(seq.state(), SequencerState::Idle);
        assert_eq!(*found.borrow(), vec![Signal::ClueFound(ClueId(7))]);
    }

    #[test]
    fn invalid_operations_are_rejected_without_mutation() {
        let mut state = make_state(make_script());
        let mut seq = sequencer();

        assert!(matches!(
            seq.advance(&mut state),
            Err(SequencerError::InvalidOperation { op: "advance", .. })
        ));
        assert!(matches!(
            seq.select_option(0, &mut state),
            Err(SequencerError::InvalidOperation {
                op: "select_option",
                ..
            })
        ));

        seq.begin(VERA, &mut state).unwrap();
        assert!(matches!(
            seq.begin(VERA, &mut state),
            Err(SequencerError::InvalidOperation { op: "begin", .. })
        ));
    }

    #[test]
    fn out_of_range_option_rejected() {
        let mut state = make_state(make_script());
        let mut seq = sequencer();
        seq.begin(VERA, &mut state).unwrap();
        settle(&mut seq, &mut state);
        seq.advance(&mut state).unwrap();
        settle(&mut seq, &mut state);
        seq.advance(&mut state).unwrap();
        assert_eq!(seq.state(), SequencerState::ChoosingOption);

        assert!(matches!(
            seq.select_option(5, &mut state),
            Err(SequencerError::OutOfRangeSelection {
                index: 5,
                available: 1,
            })
        ));
        // Rejection did not mutate the selection state.
        assert!(!state.scripts[&VERA].interaction_option_selected);
        assert_eq!(seq.state(), SequencerState::ChoosingOption);
    }

    #[test]
    fn unknown_speaker_rejected() {
        let mut state = make_state(make_script());
        let mut seq = sequencer();
        assert!(matches!(
            seq.begin(NpcId(42), &mut state),
            Err(SequencerError::UnknownSpeaker(NpcId(42)))
        ));
    }

    #[test]
    fn thought_session_defers_investigation_signal() {
        use crate::core::signal::SignalKind;
        use std::cell::RefCell;
        use std::rc::Rc;

        let thought = ThoughtScript {
            exploration: vec![DialogueLine {
                player_thought: true,
                ..DialogueLine::new(Speaker::Player, "Scratches around the keyhole.")
            }],
            investigation: Vec::new(),
            triggers_investigation: true,
        };
        let mut state = make_state(make_script());
        let started = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&started);
        state
            .bus
            .subscribe(SignalKind::InvestigationStarted, move |_| {
                *sink.borrow_mut() += 1;
            });

        let mut seq = sequencer();
        seq.begin_thought(&thought, ChapterPhase::Exploration, &mut state)
            .unwrap();
        assert_eq!(*started.borrow(), 0);

        settle(&mut seq, &mut state);
        seq.advance(&mut state).unwrap();
        assert_eq!(seq.state(), SequencerState::Idle);
        assert_eq!(*started.borrow(), 1);

        // The investigation variant is empty: rejected up front.
        assert!(matches!(
            seq.begin_thought(&thought, ChapterPhase::Investigation, &mut state),
            Err(SequencerError::Script(ScriptError::EmptyThought(
                ChapterPhase::Investigation
            )))
        ));
    }

    #[test]
    fn intro_read_set_exactly_once_at_completion() {
        let mut script = make_script();
        script.intro_lines = vec![npc_line("One."), npc_line("Two.")];
        let mut state = make_state(script);
        let mut seq = sequencer();
        seq.begin(VERA, &mut state).unwrap();

        settle(&mut seq, &mut state);
        assert!(!state.scripts[&VERA].intro_read);
        seq.advance(&mut state).unwrap();
        // Second line is still part of the intro bundle.
        assert!(!state.scripts[&VERA].intro_read);
        settle(&mut seq, &mut state);
        seq.advance(&mut state).unwrap();
        assert!(state.scripts[&VERA].intro_read);
    }
}
