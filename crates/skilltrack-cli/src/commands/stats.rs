//! The `skilltrack stats` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use comfy_table::{Cell, Table};

use skilltrack_core::input;
use skilltrack_core::scheduler::statistics;

pub fn execute(mistakes_path: PathBuf) -> Result<()> {
    let records = input::load_mistakes(&mistakes_path).context("loading mistake records")?;
    let stats = statistics(&records, Utc::now());

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("total"), Cell::new(stats.total)]);
    table.add_row(vec![Cell::new("pending"), Cell::new(stats.pending)]);
    table.add_row(vec![Cell::new("reviewing"), Cell::new(stats.reviewing)]);
    table.add_row(vec![Cell::new("mastered"), Cell::new(stats.mastered)]);
    table.add_row(vec![Cell::new("ignored"), Cell::new(stats.ignored)]);
    table.add_row(vec![
        Cell::new("mastery rate"),
        Cell::new(format!("{:.1}%", stats.mastery_rate * 100.0)),
    ]);
    table.add_row(vec![
        Cell::new("reviewed today"),
        Cell::new(stats.reviewed_today),
    ]);
    table.add_row(vec![Cell::new("overdue"), Cell::new(stats.overdue)]);
    table.add_row(vec![Cell::new("streak"), Cell::new(stats.streak)]);
    println!("{table}");

    Ok(())
}
