use crate::models::{DayGroup, WeeklyWorkoutStats, Workout};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub const DEFAULT_RECENT_LIMIT: usize = 5;

pub const UNAVAILABLE_DAY_KEY: &str = "unavailable";

/// Most recent first.
///
/// Workouts whose `performed_at` cannot be parsed are placed ahead of every
/// dated workout. This ordering is relied on by existing data views and is
/// kept as is. The sort is stable, so exact ties keep their input order.
pub fn sorted_descending(workouts: &[Workout]) -> Vec<Workout> {
    let mut keyed: Vec<(Option<i64>, &Workout)> = workouts
        .iter()
        .map(|workout| (timestamp_millis(workout), workout))
        .collect();
    keyed.sort_by(|(first, _), (second, _)| by_performed_at_desc(*first, *second));
    keyed.into_iter().map(|(_, workout)| workout.clone()).collect()
}

fn by_performed_at_desc(first: Option<i64>, second: Option<i64>) -> Ordering {
    match (first, second) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(first), Some(second)) => second.cmp(&first),
    }
}

pub fn recent(workouts: &[Workout], limit: usize) -> Vec<Workout> {
    let mut sorted = sorted_descending(workouts);
    sorted.truncate(limit);
    sorted
}

/// Buckets by UTC calendar day, newest day first, undated workouts last.
/// Workouts keep their relative input order inside a bucket.
pub fn grouped_by_day(workouts: &[Workout]) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();

    for workout in workouts {
        let day = workout.performed_at_utc().map(|dt| dt.date_naive());
        if let Some(group) = groups.iter_mut().find(|group| group.day == day) {
            group.workouts.push(workout.clone());
            continue;
        }

        let (key, label) = match day {
            Some(day) => (date_key(day), day.format("%A, %b %-d").to_string()),
            None => (UNAVAILABLE_DAY_KEY.to_string(), "Date unavailable".to_string()),
        };
        groups.push(DayGroup {
            key,
            day,
            label,
            workouts: vec![workout.clone()],
        });
    }

    // None orders below every date, so descending puts it last.
    groups.sort_by(|first, second| second.day.cmp(&first.day));
    groups
}

pub fn weekly_stats(workouts: &[Workout]) -> Vec<WeeklyWorkoutStats> {
    let mut weeks: BTreeMap<DateTime<Utc>, WeeklyWorkoutStats> = BTreeMap::new();

    for workout in workouts {
        let Some(performed_at) = workout.performed_at_utc() else {
            continue;
        };
        let start = week_start(performed_at);
        let summary = weeks.entry(start).or_insert_with(|| empty_summary(start));
        accumulate(summary, workout);
    }

    weeks.into_values().rev().collect()
}

pub fn current_week_stats(workouts: &[Workout]) -> WeeklyWorkoutStats {
    current_week_stats_at(workouts, Utc::now())
}

pub fn current_week_stats_at(workouts: &[Workout], now: DateTime<Utc>) -> WeeklyWorkoutStats {
    let mut summary = empty_summary(week_start(now));
    let start = summary.week_start.timestamp_millis();
    let end = summary.week_end.timestamp_millis();

    for workout in workouts {
        match timestamp_millis(workout) {
            Some(ts) if ts >= start && ts <= end => accumulate(&mut summary, workout),
            _ => {}
        }
    }

    summary
}

/// Monday 00:00:00.000 UTC of the week containing `date`.
pub fn week_start(date: DateTime<Utc>) -> DateTime<Utc> {
    let midnight = date.date_naive();
    let iso_weekday = (midnight.weekday().num_days_from_sunday() + 6) % 7;
    (midnight - Duration::days(i64::from(iso_weekday)))
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// Sunday 23:59:59.999 UTC, six days after `start`.
pub fn week_end(start: DateTime<Utc>) -> DateTime<Utc> {
    start + Duration::days(7) - Duration::milliseconds(1)
}

fn empty_summary(start: DateTime<Utc>) -> WeeklyWorkoutStats {
    WeeklyWorkoutStats {
        week_start: start,
        week_end: week_end(start),
        week: week_label(start.date_naive()),
        total_workouts: 0,
        total_duration_minutes: 0.0,
        total_sets: 0,
        total_reps: 0,
    }
}

fn accumulate(summary: &mut WeeklyWorkoutStats, workout: &Workout) {
    summary.total_workouts = summary.total_workouts.saturating_add(1);
    summary.total_duration_minutes += workout.duration_minutes.unwrap_or_default();
    summary.total_sets = summary
        .total_sets
        .saturating_add(workout.total_sets.unwrap_or_default());
    summary.total_reps = summary
        .total_reps
        .saturating_add(workout.total_reps.unwrap_or_default());
}

fn timestamp_millis(workout: &Workout) -> Option<i64> {
    workout.performed_at_utc().map(|dt| dt.timestamp_millis())
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
