//! The `skilltrack insights` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use skilltrack_core::input;
use skilltrack_core::insights::{detect_anomalies, identify_weak_points};

pub fn execute(state_path: PathBuf, history_path: PathBuf) -> Result<()> {
    let state = input::load_state(&state_path).context("loading ability state")?;
    let history = input::load_events(&history_path).context("loading practice history")?;

    let weak_points = identify_weak_points(&state, &history);
    if weak_points.is_empty() {
        println!("No weak points detected.");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["Kind", "Name", "Level", "Priority", "Reason"]);
        for wp in &weak_points {
            table.add_row(vec![
                Cell::new(format!("{:?}", wp.kind).to_lowercase()),
                Cell::new(&wp.name),
                Cell::new(format!("{:.1}", wp.current_level)),
                Cell::new(format!("{:?}", wp.priority).to_lowercase()),
                Cell::new(&wp.reason),
            ]);
        }
        println!("Weak points:\n{table}");
    }

    // The newest event is checked against the history that preceded it.
    match history.split_last() {
        Some((latest, earlier)) => {
            let anomalies = detect_anomalies(latest, earlier);
            if anomalies.is_empty() {
                println!("\nNo anomalies in the latest result.");
            } else {
                let mut table = Table::new();
                table.set_header(vec!["Anomaly", "Severity", "Detail", "Suggestion"]);
                for anomaly in &anomalies {
                    table.add_row(vec![
                        Cell::new(format!("{:?}", anomaly.kind)),
                        Cell::new(format!("{:?}", anomaly.severity).to_lowercase()),
                        Cell::new(&anomaly.detail),
                        Cell::new(&anomaly.suggestion),
                    ]);
                }
                println!("\nAnomalies in the latest result:\n{table}");
            }
        }
        None => println!("\nHistory is empty; nothing to check for anomalies."),
    }

    Ok(())
}
