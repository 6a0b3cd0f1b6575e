//! The `skilltrack calendar` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use comfy_table::{Cell, Table};

use skilltrack_core::input;
use skilltrack_core::scheduler::review_calendar;

pub fn execute(mistakes_path: PathBuf, days: usize) -> Result<()> {
    let records = input::load_mistakes(&mistakes_path).context("loading mistake records")?;
    let calendar = review_calendar(&records, Utc::now(), days);

    let mut table = Table::new();
    table.set_header(vec!["Date", "Due", "Top item"]);
    for day in &calendar {
        let top = day
            .items
            .first()
            .map(|item| item.record.question.clone())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(day.date),
            Cell::new(day.items.len()),
            Cell::new(top),
        ]);
    }
    println!("Review calendar ({days} day(s)):\n{table}");

    Ok(())
}
