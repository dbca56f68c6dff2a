//src/draft.rs
//! The in-memory authoring workflow: a workout aggregate built across the
//! workout editor, the block editor and the exercise-selection dialog.
//! Drafts are plain values passed between screens; nothing here touches
//! the store. Entries are addressed by position, so indices held across a
//! removal are stale.
use crate::model::{Block, ExerciseInPlan, Weekday, Workout};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("No exercise selected")]
    NoExerciseSelected,
    #[error("{0} cannot be empty")]
    MissingField(&'static str),
    #[error("{0} must have at least 3 characters")]
    NameTooShort(&'static str),
    #[error("No entry at position {0}")]
    PositionOutOfRange(usize),
}

/// State of the exercise-selection dialog. Opened blank for a new entry or
/// pre-filled from an existing position; the dialog itself never mutates
/// the parent list, it only yields a value for the block draft to splice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExercisePicker {
    pub selected_exercise_id: String,
    pub sets: u32,
    pub reps: u32,
    /// Absent for a new entry; the index being edited otherwise.
    pub editing_position: Option<usize>,
}

impl ExercisePicker {
    /// Opens the dialog for a new entry, all fields blank/zero.
    pub fn open() -> Self {
        Self::default()
    }

    /// Opens the dialog pre-filled from the entry at `position`.
    pub fn open_at(list: &[ExerciseInPlan], position: usize) -> Result<Self, DraftError> {
        let entry = list
            .get(position)
            .ok_or(DraftError::PositionOutOfRange(position))?;
        Ok(Self {
            selected_exercise_id: entry.exercise_id.clone(),
            sets: entry.sets,
            reps: entry.reps,
            editing_position: Some(position),
        })
    }

    /// Builds the plan entry from the current field values.
    pub fn confirm(&self) -> Result<ExerciseInPlan, DraftError> {
        if self.selected_exercise_id.is_empty() {
            return Err(DraftError::NoExerciseSelected);
        }
        Ok(ExerciseInPlan {
            exercise_id: self.selected_exercise_id.clone(),
            sets: self.sets,
            reps: self.reps,
        })
    }
}

/// One block being authored: its fields plus the ordered exercise list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockDraft {
    pub name: String,
    pub muscle_groups: String,
    pub notes: String,
    pub exercises: Vec<ExerciseInPlan>,
}

impl BlockDraft {
    /// Seeds the draft from an existing block (editing).
    pub fn from_block(block: &Block) -> Self {
        Self {
            name: block.name.clone(),
            muscle_groups: block.muscle_groups.clone(),
            notes: block.notes.clone(),
            exercises: block.exercises.clone(),
        }
    }

    /// Splices the dialog's result into the exercise list: append when the
    /// dialog was opened blank, overwrite in place when it was opened on an
    /// existing position.
    pub fn apply_picker(&mut self, picker: &ExercisePicker) -> Result<(), DraftError> {
        let entry = picker.confirm()?;
        match picker.editing_position {
            None => self.exercises.push(entry),
            Some(position) => {
                let slot = self
                    .exercises
                    .get_mut(position)
                    .ok_or(DraftError::PositionOutOfRange(position))?;
                *slot = entry;
            }
        }
        Ok(())
    }

    /// Deletes the entry at `position`; later entries shift down by one.
    pub fn remove_exercise(&mut self, position: usize) -> Result<(), DraftError> {
        if position >= self.exercises.len() {
            return Err(DraftError::PositionOutOfRange(position));
        }
        self.exercises.remove(position);
        Ok(())
    }

    /// Validates the required fields and yields the block.
    pub fn finish(&self) -> Result<Block, DraftError> {
        if self.name.trim().is_empty() {
            return Err(DraftError::MissingField("Block name"));
        }
        if self.muscle_groups.trim().is_empty() {
            return Err(DraftError::MissingField("Muscle groups"));
        }
        Ok(Block {
            name: self.name.trim().to_string(),
            muscle_groups: self.muscle_groups.trim().to_string(),
            notes: self.notes.trim().to_string(),
            exercises: self.exercises.clone(),
        })
    }
}

/// The whole in-progress workout threaded through the editor screens.
/// Carries the persisted id when editing; nothing is written until the
/// service saves the finished workout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutDraft {
    pub id: Option<String>,
    pub name: String,
    pub goal: String,
    pub weekdays: Vec<Weekday>,
    pub blocks: Vec<Block>,
}

impl WorkoutDraft {
    /// Seeds the draft from an existing workout (editing).
    pub fn from_workout(workout: &Workout) -> Self {
        Self {
            id: workout.id.clone(),
            name: workout.name.clone(),
            goal: workout.goal.clone(),
            weekdays: workout.weekdays.clone(),
            blocks: workout.blocks.clone(),
        }
    }

    /// Splices a finished block back into the block list: append when
    /// `position` is absent, overwrite by index when present.
    pub fn put_block(&mut self, position: Option<usize>, block: Block) -> Result<(), DraftError> {
        match position {
            None => self.blocks.push(block),
            Some(position) => {
                let slot = self
                    .blocks
                    .get_mut(position)
                    .ok_or(DraftError::PositionOutOfRange(position))?;
                *slot = block;
            }
        }
        Ok(())
    }

    /// Deletes the block at `position`; later blocks shift down by one.
    pub fn remove_block(&mut self, position: usize) -> Result<(), DraftError> {
        if position >= self.blocks.len() {
            return Err(DraftError::PositionOutOfRange(position));
        }
        self.blocks.remove(position);
        Ok(())
    }

    pub fn toggle_weekday(&mut self, day: Weekday) {
        if let Some(index) = self.weekdays.iter().position(|d| *d == day) {
            self.weekdays.remove(index);
        } else {
            self.weekdays.push(day);
        }
    }

    /// Validates that every required field is present and yields the
    /// workout ready to persist.
    pub fn finish(&self) -> Result<Workout, DraftError> {
        if self.name.trim().len() < 3 {
            return Err(DraftError::NameTooShort("Workout name"));
        }
        if self.goal.trim().is_empty() {
            return Err(DraftError::MissingField("Workout goal"));
        }
        if self.weekdays.is_empty() {
            return Err(DraftError::MissingField("Weekday selection"));
        }
        if self.blocks.is_empty() {
            return Err(DraftError::MissingField("Block list"));
        }
        Ok(Workout {
            id: self.id.clone(),
            name: self.name.trim().to_string(),
            goal: self.goal.trim().to_string(),
            weekdays: self.weekdays.clone(),
            blocks: self.blocks.clone(),
        })
    }
}
