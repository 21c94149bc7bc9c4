/// Script Linter — validates dialogue and debate script content.
///
/// Usage: script_linter <dialogue_dir> [--debates-dir <dir>]

use std::collections::HashSet;
use std::path::Path;
use std::process;

use dialogue_engine::schema::clue::ClueId;
use dialogue_engine::schema::debate::{DebateScript, Reaction};
use dialogue_engine::schema::dialogue::{DialogueLine, DialogueScript};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: script_linter <dialogue_dir> [--debates-dir <dir>]");
        process::exit(0);
    }

    let dialogue_dir = &args[1];
    let mut debates_dir = None;

    let mut i = 2;
    while i < args.len() {
        if args[i] == "--debates-dir" && i + 1 < args.len() {
            i += 1;
            debates_dir = Some(args[i].clone());
        }
        i += 1;
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let mut dialogues = Vec::new();
    load_scripts_recursive(Path::new(dialogue_dir), &mut dialogues, &mut errors, |path| {
        DialogueScript::load_from_ron(path).map_err(|e| e.to_string())
    });
    println!("Loaded {} dialogue scripts", dialogues.len());

    let mut debates = Vec::new();
    if let Some(ref dir) = debates_dir {
        load_scripts_recursive(Path::new(dir), &mut debates, &mut errors, |path| {
            DebateScript::load_from_ron(path).map_err(|e| e.to_string())
        });
        println!("Loaded {} debate scripts", debates.len());
    }

    lint_dialogues(&dialogues, &mut warnings);
    lint_debates(&debates, &dialogues, &mut warnings);

    println!("\n=== Script Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn load_scripts_recursive<T, F>(
    dir: &Path,
    scripts: &mut Vec<(String, T)>,
    errors: &mut Vec<String>,
    loader: F,
) where
    F: Fn(&Path) -> Result<T, String> + Copy,
{
    if dir.is_file() {
        match loader(dir) {
            Ok(script) => scripts.push((dir.display().to_string(), script)),
            Err(e) => errors.push(format!("{}: {}", dir.display(), e)),
        }
        return;
    }
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                load_scripts_recursive(&path, scripts, errors, loader);
            } else if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                match loader(&path) {
                    Ok(script) => {
                        println!("  Loaded: {}", path.display());
                        scripts.push((path.display().to_string(), script));
                    }
                    Err(e) => errors.push(format!("{}: {}", path.display(), e)),
                }
            }
        }
    }
}

fn lines_of(script: &DialogueScript) -> Vec<&DialogueLine> {
    let mut lines: Vec<&DialogueLine> = Vec::new();
    lines.extend(&script.intro_lines);
    if let Some(ref group) = script.group_dialogue {
        lines.extend(&group.lines);
    }
    lines.extend(&script.interactive.intro);
    for branch in &script.interactive.branches {
        lines.extend(&branch.lines);
    }
    lines.extend(&script.nice_comment);
    lines.extend(&script.rude_comment);
    lines
}

fn lint_dialogues(dialogues: &[(String, DialogueScript)], warnings: &mut Vec<String>) {
    for (name, script) in dialogues {
        // An interactive intro that leads nowhere dead-ends the
        // conversation at the option menu.
        if !script.interactive.intro.is_empty() && script.interactive.branches.is_empty() {
            warnings.push(format!(
                "{}: interactive conversation has an intro but no branches",
                name
            ));
        }

        for line in lines_of(script) {
            if line.speech.trim().is_empty() {
                warnings.push(format!("{}: line with blank speech text", name));
            }
        }
    }
}

fn lint_debates(
    debates: &[(String, DebateScript)],
    dialogues: &[(String, DialogueScript)],
    warnings: &mut Vec<String>,
) {
    // Every clue any dialogue script can hand out.
    let collectible: HashSet<ClueId> = dialogues
        .iter()
        .flat_map(|(_, script)| lines_of(script))
        .filter_map(|line| line.clue.as_ref().map(|clue| clue.id))
        .collect();

    for (name, script) in debates {
        for (i, argument) in script.arguments.iter().enumerate() {
            if argument.correct_reaction == Reaction::Agree && argument.correct_evidence.is_some()
            {
                warnings.push(format!(
                    "{}: argument {} expects Agree but names evidence that can never be used",
                    name, i
                ));
            }

            // Evidence the player has no way of collecting makes the
            // argument unwinnable. Only checkable when dialogue
            // scripts were loaded alongside.
            if !dialogues.is_empty() {
                if let Some(evidence) = argument.correct_evidence {
                    if !collectible.contains(&evidence) {
                        warnings.push(format!(
                            "{}: argument {} requires clue {:?} which no dialogue script hands out",
                            name, i, evidence
                        ));
                    }
                }
            }
        }
    }
}
