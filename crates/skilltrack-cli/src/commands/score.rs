//! The `skilltrack score` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use skilltrack_core::input;
use skilltrack_core::model::AbilityState;
use skilltrack_core::report::AbilitySnapshot;
use skilltrack_core::scoring::ScoringEngine;

pub fn execute(
    state_path: Option<PathBuf>,
    events_path: PathBuf,
    output: Option<PathBuf>,
    learner: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = crate::config::load(config_path)?;

    let mut state = match &state_path {
        Some(path) => input::load_state(path).context("loading ability state")?,
        None => AbilityState::baseline(),
    };
    let events = input::load_events(&events_path).context("loading practice events")?;

    for warning in input::validate_events(&events) {
        eprintln!("warning: event #{}: {}", warning.index, warning.message);
    }

    let engine = ScoringEngine::new(config.scoring_config());
    let changes = engine.batch_update(&mut state, &events);

    print_changes(&changes);
    println!(
        "\nApplied {} event(s); state now tracks {} abilities.",
        changes.len(),
        state.len()
    );

    if let Some(output) = output {
        let snapshot = AbilitySnapshot::capture(&learner, state, changes);
        snapshot.save_json(&output)?;
        println!("Saved snapshot to {}", output.display());
    }

    Ok(())
}

fn print_changes(changes: &[skilltrack_core::scoring::AbilityChange]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Ability",
        "Before",
        "After",
        "Delta",
        "Performance",
        "Focus",
        "Rules fired",
    ]);

    for change in changes {
        table.add_row(vec![
            Cell::new(change.ability),
            Cell::new(format!("{:.1}", change.old_value)),
            Cell::new(format!("{:.1}", change.new_value)),
            Cell::new(format!("{:+.2}", change.delta)),
            Cell::new(format!("{:.1}", change.performance)),
            Cell::new(format!("{:?}", change.focus).to_lowercase()),
            Cell::new(change.fired_rules.join(", ")),
        ]);
    }

    println!("{table}");
}
