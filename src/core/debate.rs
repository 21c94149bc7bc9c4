/// Debate engine — argument playback, reaction and evidence scoring,
/// and the adaptively timed answer window.

use thiserror::Error;
use tracing::debug;

use crate::core::context::SessionState;
use crate::core::focus::{target_yaw_toward, FocusConfig, FocusTransitionController};
use crate::core::panel::{PanelConfig, PanelMotionController};
use crate::core::reveal::{RevealConfig, TextRevealController};
use crate::core::signal::Signal;
use crate::core::timer::{AnswerTimer, TimerConfig, TimerEvent};
use crate::schema::clue::Clue;
use crate::schema::debate::{DebateScript, Outcome};
use crate::schema::dialogue::ScriptError;
use crate::schema::speaker::{Position, Speaker};

#[derive(Debug, Error)]
pub enum DebateError {
    #[error("{op} is not valid in the {state:?} state")]
    InvalidOperation {
        op: &'static str,
        state: DebateState,
    },
    #[error("evidence {index} selected but only {available} clues are held")]
    OutOfRangeSelection { index: usize, available: usize },
    #[error(transparent)]
    Script(#[from] ScriptError),
}

/// Where the engine is in a debate session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebateState {
    Inactive,
    /// The current argument's intro dialogue is playing.
    IntroPlayback,
    /// The argument's statements are playing, paced by the panel zoom.
    ArguePlayback,
    /// The reaction options are up; the answer timer may be running.
    AwaitingReaction,
    /// The held-clue list is up, waiting for an evidence pick.
    EvidenceSelection,
    /// Every argument has been answered; control is back with the host.
    SessionComplete,
}

/// Animation, pacing, timing, and camera settings for debate
/// presentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebateConfig {
    pub reveal: RevealConfig,
    pub focus: FocusConfig,
    pub panel: PanelConfig,
    pub timer: TimerConfig,
    /// Where the debate camera sits; focus yaw is computed from here.
    pub camera_position: Position,
}

/// Runs one cross-examination session: argument playback, the player's
/// reaction, evidence matching, and the timed answer window.
///
/// At most one of the debate engine and the dialogue sequencer presents
/// at any moment; the host game decides which one receives input and
/// ticks.
pub struct DebateEngine {
    config: DebateConfig,
    state: DebateState,
    script: DebateScript,
    argument_index: usize,
    line_index: usize,
    held_clues: Vec<Clue>,
    previous_speaker: Option<Speaker>,
    focus: FocusTransitionController,
    reveal: TextRevealController,
    panel: PanelMotionController,
    timer: AnswerTimer,
    camera_yaw: f32,
}

impl DebateEngine {
    pub fn new(config: DebateConfig) -> Self {
        Self {
            config,
            state: DebateState::Inactive,
            script: DebateScript::default(),
            argument_index: 0,
            line_index: 0,
            held_clues: Vec::new(),
            previous_speaker: None,
            focus: FocusTransitionController::new(),
            reveal: TextRevealController::new(),
            panel: PanelMotionController::new(),
            timer: AnswerTimer::new(config.timer),
            camera_yaw: 0.0,
        }
    }

    /// Start a debate session. The player's held clues are snapshotted
    /// as the evidence choices for every argument in the session.
    pub fn initialize(
        &mut self,
        script: DebateScript,
        held_clues: &[Clue],
        state: &mut SessionState,
    ) -> Result<(), DebateError> {
        if !matches!(
            self.state,
            DebateState::Inactive | DebateState::SessionComplete
        ) {
            return Err(DebateError::InvalidOperation {
                op: "initialize",
                state: self.state,
            });
        }
        script.validate()?;
        debug!(
            arguments = script.arguments.len(),
            clues = held_clues.len(),
            "debate session begins"
        );
        self.script = script;
        self.argument_index = 0;
        self.held_clues = held_clues.to_vec();
        self.previous_speaker = None;
        self.panel.reset();
        state.bus.schedule(Signal::AreaShown);
        self.start_intro(state);
        state.bus.flush();
        Ok(())
    }

    /// Handle a continue input during playback.
    ///
    /// A press fast-forwards the active animation — focus transition,
    /// then panel zoom, then text reveal — and only moves the line
    /// index when nothing is animating. Argument statements are never
    /// skipped, only their pacing.
    pub fn advance(&mut self, state: &mut SessionState) -> Result<(), DebateError> {
        if !matches!(
            self.state,
            DebateState::IntroPlayback | DebateState::ArguePlayback
        ) {
            return Err(DebateError::InvalidOperation {
                op: "advance",
                state: self.state,
            });
        }

        if self.focus.is_active() {
            self.focus.cancel();
            self.camera_yaw = self.focus.current_yaw();
            self.present_current_line();
            state.bus.flush();
            return Ok(());
        }
        if self.panel.is_active() {
            self.panel.cancel();
            self.after_panel_motion();
            state.bus.flush();
            return Ok(());
        }
        if self.reveal.is_active() {
            self.reveal.cancel();
            state.bus.flush();
            return Ok(());
        }

        self.line_index += 1;
        match self.state {
            DebateState::IntroPlayback => {
                if self.line_index < self.script.arguments[self.argument_index].intro.len() {
                    self.play_current_line(state);
                } else {
                    debug!(argument = self.argument_index, "argument phase begins");
                    self.state = DebateState::ArguePlayback;
                    self.line_index = 0;
                    self.play_current_line(state);
                }
            }
            DebateState::ArguePlayback => {
                if self.line_index < self.script.arguments[self.argument_index].lines.len() {
                    self.play_current_line(state);
                } else {
                    self.enter_reaction();
                }
            }
            _ => {}
        }
        state.bus.flush();
        Ok(())
    }

    /// Score an Agree reaction against the current argument and move to
    /// the next one.
    pub fn choose_agree(&mut self, state: &mut SessionState) -> Result<Outcome, DebateError> {
        if self.state != DebateState::AwaitingReaction {
            return Err(DebateError::InvalidOperation {
                op: "choose_agree",
                state: self.state,
            });
        }
        self.timer.stop();
        let outcome = self.script.arguments[self.argument_index].score_agree();
        debug!(
            argument = self.argument_index,
            reaction_correct = outcome.reaction_correct,
            "agree chosen"
        );
        self.next_argument(state);
        state.bus.flush();
        Ok(outcome)
    }

    /// Contest the argument. The player must then back the objection
    /// with evidence, or step back with `return_to_reaction`.
    pub fn choose_disagree(&mut self) -> Result<(), DebateError> {
        if self.state != DebateState::AwaitingReaction {
            return Err(DebateError::InvalidOperation {
                op: "choose_disagree",
                state: self.state,
            });
        }
        self.state = DebateState::EvidenceSelection;
        Ok(())
    }

    /// Score the selected evidence for a Disagree reaction and move to
    /// the next argument. Both halves of the outcome are reported:
    /// whether disagreeing was right at all, and whether this clue is
    /// the one that proves it.
    pub fn choose_evidence(
        &mut self,
        index: usize,
        state: &mut SessionState,
    ) -> Result<Outcome, DebateError> {
        if self.state != DebateState::EvidenceSelection {
            return Err(DebateError::InvalidOperation {
                op: "choose_evidence",
                state: self.state,
            });
        }
        let available = self.held_clues.len();
        if index >= available {
            return Err(DebateError::OutOfRangeSelection { index, available });
        }
        self.timer.stop();
        let outcome =
            self.script.arguments[self.argument_index].score_evidence(self.held_clues[index].id);
        debug!(
            argument = self.argument_index,
            reaction_correct = outcome.reaction_correct,
            evidence_correct = ?outcome.evidence_correct,
            "evidence presented"
        );
        self.next_argument(state);
        state.bus.flush();
        Ok(outcome)
    }

    /// Back out of evidence selection to the reaction options, without
    /// penalty.
    pub fn return_to_reaction(&mut self) -> Result<(), DebateError> {
        if self.state != DebateState::EvidenceSelection {
            return Err(DebateError::InvalidOperation {
                op: "return_to_reaction",
                state: self.state,
            });
        }
        self.state = DebateState::AwaitingReaction;
        Ok(())
    }

    /// Advance animations and the answer timer. Call once per game
    /// tick. The timer keeps counting through evidence selection;
    /// running out schedules `TimedOut` and leaves the state where it
    /// is — deciding what answer a timeout implies is the host's call.
    pub fn tick(&mut self, dt: f32, state: &mut SessionState) {
        match self.state {
            DebateState::IntroPlayback | DebateState::ArguePlayback => {
                if self.focus.is_active() {
                    self.focus.tick(dt);
                    self.camera_yaw = self.focus.current_yaw();
                    if !self.focus.is_active() {
                        self.present_current_line();
                    }
                } else if self.panel.is_active() {
                    self.panel.tick(dt);
                    if !self.panel.is_active() {
                        self.after_panel_motion();
                    }
                } else if self.reveal.is_active() {
                    self.reveal.tick(dt);
                }
            }
            DebateState::AwaitingReaction | DebateState::EvidenceSelection => {
                if let Some(event) = self.timer.tick(dt) {
                    match event {
                        TimerEvent::UrgencyChanged(urgency) => {
                            state.bus.schedule(Signal::UrgencyChanged(urgency));
                        }
                        TimerEvent::TimedOut => {
                            debug!(argument = self.argument_index, "answer timed out");
                            state.bus.schedule(Signal::TimedOut);
                        }
                    }
                }
            }
            DebateState::Inactive | DebateState::SessionComplete => {}
        }
        state.bus.flush();
    }

    pub fn state(&self) -> DebateState {
        self.state
    }

    /// Index of the argument currently in play.
    pub fn argument_index(&self) -> usize {
        self.argument_index
    }

    /// The clues offered as evidence choices, in collection order. How
    /// the list is laid out (padding, centering) is a presentation
    /// concern.
    pub fn evidence_choices(&self) -> &[Clue] {
        &self.held_clues
    }

    /// The text being presented: intro speech or argument statement.
    pub fn current_line_text(&self) -> Option<&str> {
        let argument = self.script.arguments.get(self.argument_index)?;
        match self.state {
            DebateState::IntroPlayback => {
                argument.intro.get(self.line_index).map(|line| line.speech.as_str())
            }
            DebateState::ArguePlayback => argument
                .lines
                .get(self.line_index)
                .map(|line| line.argument.as_str()),
            _ => None,
        }
    }

    pub fn timer(&self) -> &AnswerTimer {
        &self.timer
    }

    pub fn focus(&self) -> &FocusTransitionController {
        &self.focus
    }

    pub fn reveal(&self) -> &TextRevealController {
        &self.reveal
    }

    pub fn panel(&self) -> &PanelMotionController {
        &self.panel
    }

    pub fn camera_yaw(&self) -> f32 {
        self.camera_yaw
    }

    fn start_intro(&mut self, state: &mut SessionState) {
        self.state = DebateState::IntroPlayback;
        self.line_index = 0;
        self.play_current_line(state);
    }

    fn play_current_line(&mut self, state: &mut SessionState) {
        let speaker = match self.state {
            DebateState::IntroPlayback => {
                self.script.arguments[self.argument_index].intro[self.line_index].speaker
            }
            DebateState::ArguePlayback => {
                self.panel.reset();
                self.script.arguments[self.argument_index].lines[self.line_index].speaker
            }
            _ => return,
        };

        if self.previous_speaker != Some(speaker) {
            state.bus.schedule(Signal::SpeakerChanged(speaker));
            self.previous_speaker = Some(speaker);
            if let Some(position) = state.roster.position_of(speaker) {
                let target = target_yaw_toward(self.config.camera_position, position);
                self.focus.start(self.camera_yaw, target, &self.config.focus);
            }
        }

        if !self.focus.is_active() {
            self.present_current_line();
        }
    }

    /// Start the line's presentation animation once the camera is on
    /// its speaker: text reveal for intro dialogue, panel zoom for
    /// argument statements.
    fn present_current_line(&mut self) {
        match self.state {
            DebateState::IntroPlayback => {
                let speech =
                    self.script.arguments[self.argument_index].intro[self.line_index].speech.clone();
                self.reveal.start(&speech, &self.config.reveal);
            }
            DebateState::ArguePlayback => {
                self.panel.emphasize(&self.config.panel);
                if !self.panel.is_active() {
                    self.after_panel_motion();
                }
            }
            _ => {}
        }
    }

    /// The final statement's zoom finishing is what surfaces the
    /// reaction options.
    fn after_panel_motion(&mut self) {
        let last =
            self.line_index + 1 == self.script.arguments[self.argument_index].lines.len();
        if self.state == DebateState::ArguePlayback && last {
            self.enter_reaction();
        }
    }

    fn enter_reaction(&mut self) {
        self.state = DebateState::AwaitingReaction;
        if self.script.arguments[self.argument_index].timed_answer {
            self.timer.start();
        }
        debug!(argument = self.argument_index, "awaiting player reaction");
    }

    /// Move to the next argument, or wrap up the session. The previous
    /// speaker carries across the boundary, so a continuing speaker
    /// does not retrigger a focus transition.
    fn next_argument(&mut self, state: &mut SessionState) {
        self.argument_index += 1;
        self.panel.reset();
        if self.argument_index < self.script.arguments.len() {
            self.start_intro(state);
        } else {
            debug!("debate session complete");
            self.state = DebateState::SessionComplete;
            state.bus.schedule(Signal::AreaHidden);
        }
    }
}
