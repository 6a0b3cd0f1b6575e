//! The `skilltrack compare` command.

use std::path::PathBuf;

use anyhow::Result;

use skilltrack_core::report::AbilitySnapshot;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: f64,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    let baseline = AbilitySnapshot::load_json(&baseline_path)?;
    let current = AbilitySnapshot::load_json(&current_path)?;

    let report = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            // text format
            println!(
                "Comparison: {} regressions, {} improvements, {} unchanged",
                report.regressions.len(),
                report.improvements.len(),
                report.unchanged
            );

            if !report.regressions.is_empty() {
                println!("\nRegressions:");
                for shift in &report.regressions {
                    println!(
                        "  {} {:.1} -> {:.1} ({:+.1})",
                        shift.ability, shift.baseline_score, shift.current_score, shift.delta
                    );
                }
            }

            if !report.improvements.is_empty() {
                println!("\nImprovements:");
                for shift in &report.improvements {
                    println!(
                        "  {} {:.1} -> {:.1} (+{:.1})",
                        shift.ability, shift.baseline_score, shift.current_score, shift.delta
                    );
                }
            }

            if report.newly_tracked > 0 {
                println!("\n{} newly tracked ability(ies)", report.newly_tracked);
            }
        }
    }

    if fail_on_regression && report.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}
