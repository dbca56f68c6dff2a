//src/model.rs
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use validator::{Validate, ValidationErrors};

/// Catalog exercise. Referenced by id from plan entries, never copied.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Exercise {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 3, message = "Exercise name must have at least 3 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "Muscle groups cannot be empty"))]
    pub muscle_groups: String,
    pub description: String,
    /// Demonstration media; empty when none is attached.
    pub media_url: String,
}

/// A catalog reference plus the plan-specific parameters. Lives only inside
/// a block's ordered list and is addressed there by position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExerciseInPlan {
    pub exercise_id: String,
    pub sets: u32,
    pub reps: u32,
}

/// One named grouping of exercises within a workout, addressed by its
/// position in the workout's block list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Block {
    pub name: String,
    pub muscle_groups: String,
    pub notes: String,
    pub exercises: Vec<ExerciseInPlan>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All weekdays in order, for selection widgets.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];
}

/// Top-level training plan, stored under students/{id}/workouts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Workout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub goal: String,
    pub weekdays: Vec<Weekday>,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Student {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 3, message = "Student name must have at least 3 characters"))]
    pub name: String,
    /// Login key; unique across students (checked before every save).
    #[validate(email(message = "Invalid e-mail address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Student goal cannot be empty"))]
    pub goal: String,
    /// Empty when the student has no physical limitation.
    pub physical_limitation: String,
    pub notes: String,
}

/// Administrator record; credential material lives with the auth module.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Administrator {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[validate(length(min = 3, message = "Name must have at least 3 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid e-mail address"))]
    pub email: String,
}

/// Flattens validator output into the first human-readable message, for
/// surfacing at the screen boundary.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    for (field, kinds) in errors.field_errors() {
        if let Some(error) = kinds.first() {
            return error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("Invalid value for field '{field}'"));
        }
    }
    "Invalid input".to_string()
}
