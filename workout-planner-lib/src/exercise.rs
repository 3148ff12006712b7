// workout-planner-lib/src/exercise.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::Display;
use thiserror::Error;

/// Opaque identifier, assigned once when an exercise is added.
pub type ExerciseId = String;

// Form fields, used to point validation errors at the offending input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Field {
    Name,
    Sets,
    Reps,
    Duration,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Exercise name cannot be empty.")]
    EmptyName,
    #[error("{0} must be at least 1.")]
    NotPositive(Field),
    #[error("{field} must be a whole number (got '{input}').")]
    InvalidNumber { field: Field, input: String },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    /// Seconds. Omitted from the stored JSON when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl Exercise {
    /// Checks the record invariants (non-empty name, positive counts).
    /// # Errors
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_fields(&self.name, self.sets, self.reps, self.duration)
    }

    /// Copies the editable fields into a fresh draft.
    #[must_use]
    pub fn draft(&self) -> ExerciseDraft {
        ExerciseDraft {
            name: self.name.clone(),
            sets: self.sets,
            reps: self.reps,
            duration: self.duration,
        }
    }
}

// Matches the list row of the planner: "Squat: 3 sets x 10 reps (30 seconds)"
impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} sets x {} reps", self.name, self.sets, self.reps)?;
        if let Some(secs) = self.duration {
            write!(f, " ({secs} seconds)")?;
        }
        Ok(())
    }
}

/// Field values for an exercise that has no id yet (or whose edit is not committed).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExerciseDraft {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub duration: Option<u32>,
}

impl ExerciseDraft {
    pub fn new(name: impl Into<String>, sets: u32, reps: u32) -> Self {
        Self {
            name: name.into(),
            sets,
            reps,
            duration: None,
        }
    }

    #[must_use]
    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Builds a draft from raw form text. A blank duration means "no duration".
    /// # Errors
    /// Returns a `ValidationError` naming the first field that is empty,
    /// not a number, or not positive.
    pub fn parse(
        name: &str,
        sets: &str,
        reps: &str,
        duration: &str,
    ) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let duration = if duration.trim().is_empty() {
            None
        } else {
            Some(parse_count(Field::Duration, duration)?)
        };
        Ok(Self {
            name: name.to_string(),
            sets: parse_count(Field::Sets, sets)?,
            reps: parse_count(Field::Reps, reps)?,
            duration,
        })
    }

    /// # Errors
    /// Returns the first `ValidationError` found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_fields(&self.name, self.sets, self.reps, self.duration)
    }

    pub(crate) fn into_exercise(self, id: ExerciseId) -> Exercise {
        Exercise {
            id,
            name: self.name.trim().to_string(),
            sets: self.sets,
            reps: self.reps,
            duration: self.duration,
        }
    }
}

impl From<&Exercise> for ExerciseDraft {
    fn from(exercise: &Exercise) -> Self {
        exercise.draft()
    }
}

fn check_fields(
    name: &str,
    sets: u32,
    reps: u32,
    duration: Option<u32>,
) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if sets == 0 {
        return Err(ValidationError::NotPositive(Field::Sets));
    }
    if reps == 0 {
        return Err(ValidationError::NotPositive(Field::Reps));
    }
    if duration == Some(0) {
        return Err(ValidationError::NotPositive(Field::Duration));
    }
    Ok(())
}

fn parse_count(field: Field, input: &str) -> Result<u32, ValidationError> {
    let value: u32 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            input: input.trim().to_string(),
        })?;
    if value == 0 {
        return Err(ValidationError::NotPositive(field));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_duration_only_when_present() {
        let mut squat = ExerciseDraft::new("Squat", 3, 10).into_exercise("1".into());
        assert_eq!(squat.to_string(), "Squat: 3 sets x 10 reps");
        squat.duration = Some(45);
        assert_eq!(squat.to_string(), "Squat: 3 sets x 10 reps (45 seconds)");
    }

    #[test]
    fn parse_trims_and_treats_blank_duration_as_absent() {
        let draft = ExerciseDraft::parse("  Plank ", "2", " 1", "  ").unwrap();
        assert_eq!(draft, ExerciseDraft::new("Plank", 2, 1));
    }

    #[test]
    fn parse_reports_offending_field() {
        assert_eq!(
            ExerciseDraft::parse("", "3", "10", ""),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            ExerciseDraft::parse("Squat", "0", "10", ""),
            Err(ValidationError::NotPositive(Field::Sets))
        );
        assert_eq!(
            ExerciseDraft::parse("Squat", "3", "ten", ""),
            Err(ValidationError::InvalidNumber {
                field: Field::Reps,
                input: "ten".to_string()
            })
        );
        assert_eq!(
            ExerciseDraft::parse("Squat", "3", "10", "-5"),
            Err(ValidationError::InvalidNumber {
                field: Field::Duration,
                input: "-5".to_string()
            })
        );
    }

    #[test]
    fn validate_rejects_zero_duration() {
        let draft = ExerciseDraft::new("Run", 1, 1).with_duration(0);
        assert_eq!(
            draft.validate(),
            Err(ValidationError::NotPositive(Field::Duration))
        );
    }

    #[test]
    fn missing_or_null_duration_deserializes_as_none() {
        let a: Exercise =
            serde_json::from_str(r#"{"id":"1","name":"Squat","sets":3,"reps":10}"#).unwrap();
        let b: Exercise = serde_json::from_str(
            r#"{"id":"1","name":"Squat","sets":3,"reps":10,"duration":null}"#,
        )
        .unwrap();
        assert_eq!(a.duration, None);
        assert_eq!(a, b);
        assert!(!serde_json::to_string(&a).unwrap().contains("duration"));
    }
}
