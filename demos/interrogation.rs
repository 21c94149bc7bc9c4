/// Interrogation demo — one conversation and one cross-examination,
/// driven by simulated ticks and scripted player input.
///
/// Run with: cargo run --example interrogation

use dialogue_engine::core::context::{CharacterRoster, NpcProfile, SessionState};
use dialogue_engine::core::debate::{DebateConfig, DebateEngine, DebateState};
use dialogue_engine::core::sequencer::{DialogueSequencer, SequencerConfig, SequencerState};
use dialogue_engine::core::signal::SignalKind;
use dialogue_engine::schema::clue::{Clue, ClueId};
use dialogue_engine::schema::debate::{Argument, DebateLine, DebateScript, Reaction};
use dialogue_engine::schema::dialogue::{
    DialogueBranch, DialogueLine, DialogueOption, DialogueScript, InteractiveConversation,
};
use dialogue_engine::schema::speaker::{Emotion, NpcId, Position, Speaker};

const GROVES: NpcId = NpcId(1);

fn groves(text: &str) -> DialogueLine {
    DialogueLine::new(Speaker::Npc(GROVES), text)
}

fn dialogue_script() -> DialogueScript {
    DialogueScript {
        intro_lines: vec![
            groves("You're the one they sent about the Pemberton affair?"),
            DialogueLine {
                reveals_speaker_name: true,
                ..groves("Groves. Head butler. Ask what you must.")
            },
        ],
        interactive: InteractiveConversation {
            intro: vec![groves("Though I doubt I can tell you anything new.")],
            branches: vec![DialogueBranch {
                option: DialogueOption {
                    label: "The cellar key".to_string(),
                    description: "Who else could get downstairs?".to_string(),
                },
                lines: vec![DialogueLine {
                    clue: Some(Clue::new(ClueId(9), "Spare cellar key")),
                    emotion: Emotion::Surprised,
                    ..groves("There is... a spare key. In the pantry. I never mention it.")
                }],
                triggers_nice_impression: true,
            }],
        },
        nice_comment: vec![groves("Always glad to help, inspector.")],
        rude_comment: vec![groves("I have duties to attend to.")],
        ..DialogueScript::default()
    }
}

fn debate_script() -> DebateScript {
    DebateScript {
        arguments: vec![Argument {
            intro: vec![groves("You accuse me? Very well.")],
            lines: vec![
                DebateLine::new(Speaker::Npc(GROVES), "Only I hold a key to the cellar."),
                DebateLine {
                    emotion: Emotion::Accusing,
                    ..DebateLine::new(Speaker::Npc(GROVES), "No one else could have gone down.")
                },
            ],
            correct_reaction: Reaction::Disagree,
            correct_evidence: Some(ClueId(9)),
            timed_answer: true,
        }],
    }
}

/// Tick the sequencer until the current line is fully presented, then
/// print it the way a speech panel would.
fn present_line(seq: &mut DialogueSequencer, state: &mut SessionState) {
    while seq.state() == SequencerState::PlayingLine {
        seq.tick(0.05, state);
    }
    if let Some(line) = seq.current_line() {
        let name = state.roster.display_name(line.speaker).to_string();
        println!("  [{}] {}", name, line.speech);
    }
}

fn settle_debate(engine: &mut DebateEngine, state: &mut SessionState) {
    while engine.focus().is_active() || engine.panel().is_active() || engine.reveal().is_active() {
        engine.tick(0.05, state);
    }
}

fn present_debate_line(engine: &mut DebateEngine, state: &mut SessionState) {
    if let Some(text) = engine.current_line_text() {
        println!("  [{}] {}", state.roster.display_name(Speaker::Npc(GROVES)), text);
    }
    settle_debate(engine, state);
}

fn main() {
    let mut roster = CharacterRoster::new("Inspector Wren", Position::default());
    roster.register(NpcProfile {
        id: GROVES,
        name: "Groves".to_string(),
        position: Position::new(1.0, 0.0, 3.0),
    });
    let mut state = SessionState::new(roster);
    state.register_script(GROVES, dialogue_script());

    state.bus.subscribe(SignalKind::ClueFound, |signal| {
        println!("  *** clue found: {:?}", signal);
    });

    println!("--- Conversation ---");
    let mut seq = DialogueSequencer::new(SequencerConfig::default());
    seq.begin(GROVES, &mut state).expect("begin conversation");

    loop {
        match seq.state() {
            SequencerState::PlayingLine | SequencerState::AwaitingAdvance => {
                present_line(&mut seq, &mut state);
                seq.advance(&mut state).expect("advance");
            }
            SequencerState::ChoosingOption => {
                println!("  > choosing: \"The cellar key\"");
                seq.select_option(0, &mut state).expect("select option");
            }
            SequencerState::Idle => break,
        }
    }

    println!("\n--- Cross-examination ---");
    let held: Vec<Clue> = state.player.clues().to_vec();
    let mut engine = DebateEngine::new(DebateConfig::default());
    engine
        .initialize(debate_script(), &held, &mut state)
        .expect("initialize debate");

    while matches!(
        engine.state(),
        DebateState::IntroPlayback | DebateState::ArguePlayback
    ) {
        present_debate_line(&mut engine, &mut state);
        if engine.state() == DebateState::AwaitingReaction {
            break;
        }
        engine.advance(&mut state).expect("advance debate");
    }

    println!("  > objection! presenting the spare cellar key");
    engine.choose_disagree().expect("disagree");
    let spare_key = engine
        .evidence_choices()
        .iter()
        .position(|clue| clue.id == ClueId(9))
        .expect("spare key in evidence");
    let outcome = engine
        .choose_evidence(spare_key, &mut state)
        .expect("present evidence");

    println!(
        "  reaction correct: {}, evidence correct: {:?}",
        outcome.reaction_correct, outcome.evidence_correct
    );
    assert_eq!(engine.state(), DebateState::SessionComplete);
    println!("\nCase advanced.");
}
