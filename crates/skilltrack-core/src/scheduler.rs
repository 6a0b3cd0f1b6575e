//! Spaced-repetition review scheduling.
//!
//! Every query here is a pure function of the mistake records plus a caller
//! supplied "now"; nothing is persisted and nothing is random, so results are
//! fully deterministic and safe to recompute on every render.
//!
//! The forgetting-curve schedule is a fixed interval ladder indexed by how
//! often the item has already been reviewed. The anchor is the most recent
//! review, or the first miss for an item never reviewed.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{MistakeRecord, MistakeStatus};

/// Review interval ladder, in days, indexed by `min(review_count, 4)`.
pub const REVIEW_INTERVALS_DAYS: [i64; 5] = [1, 3, 7, 14, 30];

/// Items due within this window count as urgent.
const URGENT_WINDOW_HOURS: i64 = 24;

/// At most this many never-reviewed items enter a daily plan.
const MAX_NEW_PER_DAY: usize = 5;

/// Days after the first miss during which an item still counts as fresh.
const FRESH_MISTAKE_DAYS: i64 = 7;

/// Interval to the next ideal review for an item reviewed `review_count`
/// times.
pub fn review_interval_days(review_count: u32) -> i64 {
    REVIEW_INTERVALS_DAYS[(review_count as usize).min(REVIEW_INTERVALS_DAYS.len() - 1)]
}

/// Next ideal review time: the interval ladder applied to the last review,
/// or to the first miss if the item was never reviewed.
pub fn next_review_at(record: &MistakeRecord) -> DateTime<Utc> {
    let anchor = record.last_reviewed_at.unwrap_or(record.first_mistaken_at);
    anchor + Duration::days(review_interval_days(record.review_count))
}

/// Whether the ideal review time has passed.
pub fn is_overdue(record: &MistakeRecord, now: DateTime<Utc>) -> bool {
    now > next_review_at(record)
}

/// Whether the item is due within the next 24 hours, including already
/// overdue items.
pub fn is_urgent(record: &MistakeRecord, now: DateTime<Utc>) -> bool {
    now >= next_review_at(record) - Duration::hours(URGENT_WINDOW_HOURS)
}

/// Hours past the ideal review time, zero if not yet due.
pub fn hours_overdue(record: &MistakeRecord, now: DateTime<Utc>) -> f64 {
    let late = now - next_review_at(record);
    (late.num_seconds() as f64 / 3600.0).max(0.0)
}

/// Priority score in `[0, 100]`, higher reviews first.
///
/// A pure function of the record fields and `now`: overdue magnitude (up to
/// 40 points, 20 flat when urgent but not yet due), mistake count (up to 30),
/// a 10-point bump for never-reviewed items, review-count freshness (up to
/// 20, shrinking as reviews accumulate), and 10 points for items first missed
/// within the last week.
pub fn priority_score(record: &MistakeRecord, now: DateTime<Utc>) -> f64 {
    let mut score = 0.0;

    if is_overdue(record, now) {
        let overdue_days = (now - next_review_at(record)).num_days();
        score += (overdue_days as f64 * 10.0 + 20.0).min(40.0);
    } else if is_urgent(record, now) {
        score += 20.0;
    }

    score += (record.mistake_count as f64 * 6.0).min(30.0);

    if record.review_count == 0 {
        score += 10.0;
    }
    score += (20.0 - record.review_count as f64 * 4.0).max(0.0);

    if now - record.first_mistaken_at <= Duration::days(FRESH_MISTAKE_DAYS) {
        score += 10.0;
    }

    score.clamp(0.0, 100.0)
}

/// Derived review view of one mistake record. Recomputed on every query,
/// never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewItem {
    pub record: MistakeRecord,
    pub next_review_at: DateTime<Utc>,
    pub overdue: bool,
    pub hours_overdue: f64,
    pub priority: f64,
}

impl ReviewItem {
    pub fn build(record: &MistakeRecord, now: DateTime<Utc>) -> Self {
        Self {
            next_review_at: next_review_at(record),
            overdue: is_overdue(record, now),
            hours_overdue: hours_overdue(record, now),
            priority: priority_score(record, now),
            record: record.clone(),
        }
    }
}

/// Today's ranked review plan, partitioned by urgency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewPlan {
    /// Final ordered list, capped at the requested limit.
    pub items: Vec<ReviewItem>,
    pub overdue_count: usize,
    pub urgent_count: usize,
    pub new_count: usize,
}

/// Build today's review plan.
///
/// Only pending/reviewing records participate. Records partition into
/// overdue, urgent (due within 24h), brand-new (never reviewed, first missed
/// more than a day ago) and normal buckets; each bucket is sorted by
/// descending priority, then concatenated overdue ++ urgent ++ up to 5 new ++
/// normal fill, capped at `limit`.
pub fn todays_plan(records: &[MistakeRecord], now: DateTime<Utc>, limit: usize) -> ReviewPlan {
    let mut overdue = Vec::new();
    let mut urgent = Vec::new();
    let mut fresh = Vec::new();
    let mut normal = Vec::new();

    for record in records.iter().filter(|r| r.status.is_active()) {
        let item = ReviewItem::build(record, now);
        if item.overdue {
            overdue.push(item);
        } else if is_urgent(record, now) {
            urgent.push(item);
        } else if record.review_count == 0
            && now - record.first_mistaken_at > Duration::hours(24)
        {
            fresh.push(item);
        } else {
            normal.push(item);
        }
    }

    for bucket in [&mut overdue, &mut urgent, &mut fresh, &mut normal] {
        bucket.sort_by(|a, b| b.priority.total_cmp(&a.priority));
    }

    let overdue_count = overdue.len();
    let urgent_count = urgent.len();
    let new_count = fresh.len().min(MAX_NEW_PER_DAY);

    let mut items = overdue;
    items.extend(urgent);
    items.extend(fresh.into_iter().take(MAX_NEW_PER_DAY));
    items.extend(normal);
    items.truncate(limit);

    ReviewPlan {
        items,
        overdue_count,
        urgent_count,
        new_count,
    }
}

/// All active items due within the next 24 hours (including overdue), highest
/// priority first.
pub fn urgent_items(records: &[MistakeRecord], now: DateTime<Utc>) -> Vec<ReviewItem> {
    let mut items: Vec<ReviewItem> = records
        .iter()
        .filter(|r| r.status.is_active() && is_urgent(r, now))
        .map(|r| ReviewItem::build(r, now))
        .collect();
    items.sort_by(|a, b| b.priority.total_cmp(&a.priority));
    items
}

/// Top `n` active items by (priority descending, next review time ascending).
pub fn recommended_items(
    records: &[MistakeRecord],
    now: DateTime<Utc>,
    n: usize,
) -> Vec<ReviewItem> {
    let mut items: Vec<ReviewItem> = records
        .iter()
        .filter(|r| r.status.is_active())
        .map(|r| ReviewItem::build(r, now))
        .collect();
    items.sort_by(|a, b| {
        b.priority
            .total_cmp(&a.priority)
            .then(a.next_review_at.cmp(&b.next_review_at))
    });
    items.truncate(n);
    items
}

/// One day of the review calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub items: Vec<ReviewItem>,
}

/// Bucket active items by due date over `days` days starting today.
///
/// Overdue items clamp to today; items due beyond the range are omitted.
pub fn review_calendar(
    records: &[MistakeRecord],
    now: DateTime<Utc>,
    days: usize,
) -> Vec<CalendarDay> {
    let today = now.date_naive();
    let mut buckets: BTreeMap<NaiveDate, Vec<ReviewItem>> = (0..days)
        .map(|offset| (today + Duration::days(offset as i64), Vec::new()))
        .collect();

    for record in records.iter().filter(|r| r.status.is_active()) {
        let item = ReviewItem::build(record, now);
        let due = if item.overdue {
            today
        } else {
            item.next_review_at.date_naive()
        };
        if let Some(bucket) = buckets.get_mut(&due) {
            bucket.push(item);
        }
    }

    buckets
        .into_iter()
        .map(|(date, mut items)| {
            items.sort_by(|a, b| b.priority.total_cmp(&a.priority));
            CalendarDay { date, items }
        })
        .collect()
}

/// Aggregate statistics over a learner's mistake records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewStatistics {
    pub total: usize,
    pub pending: usize,
    pub reviewing: usize,
    pub mastered: usize,
    pub ignored: usize,
    /// `mastered / total`, zero when there are no records.
    pub mastery_rate: f64,
    /// Records whose last review fell within the current UTC day.
    pub reviewed_today: usize,
    /// Active records past their ideal review time.
    pub overdue: usize,
    /// 1 if any review happened today, else 0. Deliberately simplistic: no
    /// consecutive-day history is tracked.
    pub streak: u32,
}

/// Compute aggregate review statistics.
pub fn statistics(records: &[MistakeRecord], now: DateTime<Utc>) -> ReviewStatistics {
    let count_status =
        |status: MistakeStatus| records.iter().filter(|r| r.status == status).count();

    let total = records.len();
    let mastered = count_status(MistakeStatus::Mastered);
    let today = now.date_naive();

    let reviewed_today = records
        .iter()
        .filter(|r| {
            r.last_reviewed_at
                .is_some_and(|at| at.date_naive() == today)
        })
        .count();

    ReviewStatistics {
        total,
        pending: count_status(MistakeStatus::Pending),
        reviewing: count_status(MistakeStatus::Reviewing),
        mastered,
        ignored: count_status(MistakeStatus::Ignored),
        mastery_rate: if total == 0 {
            0.0
        } else {
            mastered as f64 / total as f64
        },
        reviewed_today,
        overdue: records
            .iter()
            .filter(|r| r.status.is_active() && is_overdue(r, now))
            .count(),
        streak: u32::from(reviewed_today > 0),
    }
}
