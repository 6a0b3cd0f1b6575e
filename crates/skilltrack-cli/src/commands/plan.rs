//! The `skilltrack plan` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use comfy_table::{Cell, Table};

use skilltrack_core::input;
use skilltrack_core::scheduler::todays_plan;

pub fn execute(
    mistakes_path: PathBuf,
    limit: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = crate::config::load(config_path)?;
    let records = input::load_mistakes(&mistakes_path).context("loading mistake records")?;

    let now = Utc::now();
    let plan = todays_plan(&records, now, limit.unwrap_or(config.plan_limit));

    println!(
        "Today's plan: {} item(s) ({} overdue, {} urgent, {} new)",
        plan.items.len(),
        plan.overdue_count,
        plan.urgent_count,
        plan.new_count
    );

    if plan.items.is_empty() {
        println!("Nothing to review today.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Priority",
        "Question",
        "Topic",
        "Misses",
        "Reviews",
        "Due",
        "Overdue",
    ]);
    for item in &plan.items {
        table.add_row(vec![
            Cell::new(format!("{:.0}", item.priority)),
            Cell::new(&item.record.question),
            Cell::new(&item.record.topic),
            Cell::new(item.record.mistake_count),
            Cell::new(item.record.review_count),
            Cell::new(item.next_review_at.format("%Y-%m-%d %H:%M")),
            Cell::new(if item.overdue {
                format!("{:.0}h", item.hours_overdue)
            } else {
                "-".to_string()
            }),
        ]);
    }
    println!("{table}");

    Ok(())
}
