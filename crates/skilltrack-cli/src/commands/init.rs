//! The `skilltrack init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create skilltrack.toml
    if std::path::Path::new("skilltrack.toml").exists() {
        println!("skilltrack.toml already exists, skipping.");
    } else {
        std::fs::write("skilltrack.toml", SAMPLE_CONFIG)?;
        println!("Created skilltrack.toml");
    }

    // Create example inputs
    if std::path::Path::new("events.json").exists() {
        println!("events.json already exists, skipping.");
    } else {
        std::fs::write("events.json", EXAMPLE_EVENTS)?;
        println!("Created events.json");
    }

    if std::path::Path::new("mistakes.json").exists() {
        println!("mistakes.json already exists, skipping.");
    } else {
        std::fs::write("mistakes.json", EXAMPLE_MISTAKES)?;
        println!("Created mistakes.json");
    }

    println!("\nNext steps:");
    println!("  1. Run: skilltrack score --events events.json --output snapshot.json");
    println!("  2. Run: skilltrack plan --mistakes mistakes.json");
    println!("  3. Run: skilltrack stats --mistakes mistakes.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# skilltrack configuration

# Maximum items in the daily review plan.
plan_limit = 20

[scoring]
# All fields optional; the engine defaults apply when omitted.
# learning_rate = 0.1
# max_delta_scale = 10.0
# time_budget_secs = 600.0
"#;

const EXAMPLE_EVENTS: &str = r#"[
  {
    "topic": "reading",
    "difficulty": "intermediate",
    "score": 85,
    "correct_rate": 0.85,
    "time_spent_secs": 300
  },
  {
    "topic": "grammar",
    "difficulty": "beginner",
    "score": 40,
    "correct_rate": 0.4,
    "time_spent_secs": 300
  }
]
"#;

const EXAMPLE_MISTAKES: &str = r#"[
  {
    "id": "q-1001",
    "question": "Choose the correct past participle of 'go'.",
    "wrong_answer": "goed",
    "correct_answer": "gone",
    "category": "tense",
    "topic": "grammar",
    "mistake_count": 2,
    "review_count": 0,
    "first_mistaken_at": "2026-08-20T09:00:00Z",
    "status": "pending"
  },
  {
    "id": "q-1002",
    "question": "Pick the synonym of 'rapid'.",
    "wrong_answer": "slow",
    "correct_answer": "swift",
    "category": "synonyms",
    "topic": "vocabulary",
    "mistake_count": 1,
    "review_count": 1,
    "first_mistaken_at": "2026-08-15T10:30:00Z",
    "last_reviewed_at": "2026-08-22T18:00:00Z",
    "status": "reviewing"
  }
]
"#;
