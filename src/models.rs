use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Moderate,
    High,
}

impl Intensity {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "moderate" => Some(Self::Moderate),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// One logged exercise session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    pub title: String,
    /// ISO-8601 timestamp. Kept as text because stored data may be corrupted.
    pub performed_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Intensity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_sets: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_reps: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// A workout that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkout {
    pub title: String,
    pub performed_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Intensity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_sets: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_reps: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl NewWorkout {
    pub fn with_id(self, id: String) -> Workout {
        Workout {
            id,
            title: self.title,
            performed_at: self.performed_at,
            duration_minutes: self.duration_minutes,
            intensity: self.intensity,
            total_sets: self.total_sets,
            total_reps: self.total_reps,
            weight: self.weight,
            notes: self.notes,
            tags: self.tags,
        }
    }
}

impl Workout {
    /// The parsed `performed_at`, or `None` when the stored text is not a date.
    pub fn performed_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.performed_at)
    }

    /// Tags trimmed, with blanks and repeats removed.
    pub fn display_tags(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for tag in self.tags.iter().flatten() {
            let tag = tag.trim();
            if !tag.is_empty() && !seen.contains(&tag) {
                seen.push(tag);
            }
        }
        seen
    }

    pub fn display_notes(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
    }

    /// Reads one stored record, tolerating fields of the wrong shape.
    ///
    /// Only `id` is required. Unreadable optional fields become absent and a
    /// non-text `performedAt` is kept as its JSON text, which later reads as
    /// an unknown date.
    pub fn from_stored_record(record: &Value) -> Option<Self> {
        let record = record.as_object()?;
        let id = record
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.trim().is_empty())?
            .to_string();
        let text = |key: &str| record.get(key).and_then(Value::as_str).map(str::to_string);
        let count = |key: &str| record.get(key).and_then(Value::as_u64);
        let amount = |key: &str| {
            record
                .get(key)
                .and_then(Value::as_f64)
                .filter(|value| value.is_finite() && *value >= 0.0)
        };

        Some(Self {
            id,
            title: text("title").unwrap_or_default(),
            performed_at: match record.get("performedAt") {
                Some(Value::String(value)) => value.clone(),
                None | Some(Value::Null) => String::new(),
                Some(other) => other.to_string(),
            },
            duration_minutes: amount("durationMinutes"),
            intensity: record
                .get("intensity")
                .and_then(Value::as_str)
                .and_then(Intensity::parse),
            total_sets: count("totalSets"),
            total_reps: count("totalReps"),
            weight: amount("weight"),
            notes: text("notes"),
            tags: record.get("tags").and_then(Value::as_array).map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            }),
        })
    }
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Millisecond-precision `Z` form, e.g. `2024-01-08T00:00:00.000Z`.
pub fn iso_string(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_iso<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&iso_string(*value))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyWorkoutStats {
    #[serde(serialize_with = "serialize_iso")]
    pub week_start: DateTime<Utc>,
    #[serde(serialize_with = "serialize_iso")]
    pub week_end: DateTime<Utc>,
    pub week: String,
    pub total_workouts: u64,
    pub total_duration_minutes: f64,
    pub total_sets: u64,
    pub total_reps: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayGroup {
    pub key: String,
    pub day: Option<NaiveDate>,
    pub label: String,
    pub workouts: Vec<Workout>,
}

/// A workout as shown in lists, with tags and notes cleaned for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutCard {
    #[serde(flatten)]
    pub workout: Workout,
    pub display_tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_notes: Option<String>,
}

impl From<Workout> for WorkoutCard {
    fn from(workout: Workout) -> Self {
        let display_tags = workout.display_tags().into_iter().map(str::to_string).collect();
        let display_notes = workout.display_notes().map(str::to_string);
        Self {
            workout,
            display_tags,
            display_notes,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DayGroupCard {
    pub key: String,
    pub day: Option<NaiveDate>,
    pub label: String,
    pub workouts: Vec<WorkoutCard>,
}

impl From<DayGroup> for DayGroupCard {
    fn from(group: DayGroup) -> Self {
        Self {
            key: group.key,
            day: group.day,
            label: group.label,
            workouts: group.workouts.into_iter().map(WorkoutCard::from).collect(),
        }
    }
}

/// Raw add-workout form fields, as typed by the user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutForm {
    #[serde(rename = "type", default)]
    pub workout_type: String,
    #[serde(default)]
    pub sets: String,
    #[serde(default)]
    pub reps: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub duration_minutes: String,
    #[serde(default)]
    pub intensity: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

pub type FieldErrors = BTreeMap<&'static str, String>;

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: String,
    pub workout_count: usize,
}
