use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use skilltrack_core::model::{MistakeRecord, MistakeStatus};
use skilltrack_core::scheduler::{priority_score, review_calendar, todays_plan};

fn make_records(count: usize) -> Vec<MistakeRecord> {
    let base = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    (0..count)
        .map(|i| MistakeRecord {
            id: format!("q{i}"),
            question: "question".into(),
            wrong_answer: "wrong".into(),
            correct_answer: "right".into(),
            category: "tense".into(),
            topic: "grammar".into(),
            mistake_count: (i % 6) as u32 + 1,
            review_count: (i % 5) as u32,
            first_mistaken_at: base - Duration::days((i % 30) as i64),
            last_reviewed_at: if i % 3 == 0 {
                Some(base - Duration::days((i % 10) as i64))
            } else {
                None
            },
            status: MistakeStatus::Pending,
        })
        .collect()
}

fn bench_priority_score(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
    let record = &make_records(1)[0];

    c.bench_function("priority_score", |b| {
        b.iter(|| priority_score(black_box(record), black_box(now)))
    });
}

fn bench_todays_plan(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
    let mut group = c.benchmark_group("todays_plan");

    for size in [50usize, 500, 5000] {
        let records = make_records(size);
        group.bench_function(format!("records={size}"), |b| {
            b.iter(|| todays_plan(black_box(&records), black_box(now), 20))
        });
    }

    group.finish();
}

fn bench_review_calendar(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
    let records = make_records(500);

    c.bench_function("review_calendar_7d", |b| {
        b.iter(|| review_calendar(black_box(&records), black_box(now), 7))
    });
}

criterion_group!(benches, bench_priority_score, bench_todays_plan, bench_review_calendar);
criterion_main!(benches);
