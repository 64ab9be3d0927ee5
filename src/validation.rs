use crate::models::{iso_string, FieldErrors, Intensity, NewWorkout, WorkoutForm};
use chrono::{DateTime, Utc};

/// Turns raw form input into a workout ready to store.
///
/// Every invalid field is reported; nothing is returned for partial input.
pub fn validate(form: &WorkoutForm, now: DateTime<Utc>) -> Result<NewWorkout, FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = form.workout_type.trim();
    if title.is_empty() {
        errors.insert("type", "Please enter the workout type.".to_string());
    }

    let sets = positive_whole_number(&form.sets);
    if sets.is_none() {
        errors.insert("sets", "Sets must be a positive whole number.".to_string());
    }

    let reps = positive_whole_number(&form.reps);
    if reps.is_none() {
        errors.insert("reps", "Reps must be a positive whole number.".to_string());
    }

    let weight = match non_negative(&form.weight) {
        Ok(weight) => weight.map(|value| (value * 100.0).round() / 100.0),
        Err(()) => {
            errors.insert("weight", "Weight must be zero or greater.".to_string());
            None
        }
    };

    let duration_minutes = match non_negative(&form.duration_minutes) {
        Ok(duration) => duration,
        Err(()) => {
            errors.insert(
                "durationMinutes",
                "Duration must be zero or greater.".to_string(),
            );
            None
        }
    };

    let intensity = match form.intensity.trim() {
        "" => None,
        value => {
            let parsed = Intensity::parse(value);
            if parsed.is_none() {
                errors.insert(
                    "intensity",
                    "Intensity must be low, moderate, or high.".to_string(),
                );
            }
            parsed
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    let notes = form.notes.trim();
    let tags: Vec<String> = form
        .tags
        .iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect();

    Ok(NewWorkout {
        title: title.to_string(),
        performed_at: iso_string(now),
        duration_minutes,
        intensity,
        total_sets: sets,
        total_reps: reps,
        weight,
        notes: (!notes.is_empty()).then(|| notes.to_string()),
        tags: (!tags.is_empty()).then_some(tags),
    })
}

fn positive_whole_number(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|value| *value > 0)
}

/// `Ok(None)` for blank input, `Err` for anything that is not a finite number >= 0.
fn non_negative(raw: &str) -> Result<Option<f64>, ()> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(Some(value)),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_timestamp;

    fn now() -> DateTime<Utc> {
        parse_timestamp("2024-01-10T09:15:30.250Z").unwrap()
    }

    fn form(workout_type: &str, sets: &str, reps: &str) -> WorkoutForm {
        WorkoutForm {
            workout_type: workout_type.into(),
            sets: sets.into(),
            reps: reps.into(),
            ..WorkoutForm::default()
        }
    }

    #[test]
    fn valid_form_becomes_new_workout() {
        let mut input = form("  Bench Press ", "4", " 10 ");
        input.weight = "62.456".into();
        input.notes = "  paused reps  ".into();
        input.tags = vec![" gym ".into(), "".into()];
        input.intensity = "High".into();

        let workout = validate(&input, now()).unwrap();
        assert_eq!(workout.title, "Bench Press");
        assert_eq!(workout.performed_at, "2024-01-10T09:15:30.250Z");
        assert_eq!(workout.total_sets, Some(4));
        assert_eq!(workout.total_reps, Some(10));
        assert_eq!(workout.weight, Some(62.46));
        assert_eq!(workout.notes.as_deref(), Some("paused reps"));
        assert_eq!(workout.tags, Some(vec!["gym".to_string()]));
        assert_eq!(workout.intensity, Some(Intensity::High));
        assert_eq!(workout.duration_minutes, None);
    }

    #[test]
    fn blank_optional_fields_are_absent() {
        let mut input = form("Run", "1", "1");
        input.notes = "   ".into();
        input.weight = "  ".into();
        let workout = validate(&input, now()).unwrap();
        assert_eq!(workout.notes, None);
        assert_eq!(workout.weight, None);
        assert_eq!(workout.tags, None);
        assert_eq!(workout.intensity, None);
    }

    #[test]
    fn collects_every_field_error() {
        let mut input = form("   ", "0", "2.5");
        input.weight = "-1".into();
        input.duration_minutes = "abc".into();
        input.intensity = "extreme".into();

        let errors = validate(&input, now()).unwrap_err();
        assert_eq!(errors.len(), 6);
        assert_eq!(errors["type"], "Please enter the workout type.");
        assert_eq!(errors["sets"], "Sets must be a positive whole number.");
        assert_eq!(errors["reps"], "Reps must be a positive whole number.");
        assert_eq!(errors["weight"], "Weight must be zero or greater.");
        assert!(errors.contains_key("durationMinutes"));
        assert!(errors.contains_key("intensity"));
    }

    #[test]
    fn zero_weight_is_allowed() {
        let mut input = form("Pull-ups", "3", "8");
        input.weight = "0".into();
        assert_eq!(validate(&input, now()).unwrap().weight, Some(0.0));
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let mut input = form("Run", "1", "1");
        input.weight = "inf".into();
        assert!(validate(&input, now()).unwrap_err().contains_key("weight"));
    }
}
