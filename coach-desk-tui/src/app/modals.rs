// coach-desk-tui/src/app/modals.rs
use super::state::{
    ActiveModal, App, ExerciseField, PickerField, StudentField,
};
use super::AppInputError;
use anyhow::Result;
use coach_desk_lib::{Exercise, ExercisePicker, Student};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::widgets::ListState;
use std::path::Path;

// --- Parsing Helpers ---

fn parse_count(input: &str) -> Result<u32, AppInputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| AppInputError::InvalidNumber(trimmed.to_string()))
}

// Helper to increment/decrement a numeric string field
fn modify_count_input(input_str: &mut String, delta: i64) {
    let current = input_str.trim().parse::<i64>().unwrap_or(0);
    let next = (current + delta).max(0);
    *input_str = next.to_string();
}

// --- Modal Openers ---

impl App {
    pub fn open_student_form(&mut self, existing: Option<Student>) {
        let student = existing.unwrap_or_default();
        self.active_modal = ActiveModal::StudentForm {
            id: student.id,
            name_input: student.name,
            email_input: student.email,
            goal_input: student.goal,
            has_limitation: !student.physical_limitation.is_empty(),
            limitation_input: student.physical_limitation,
            notes_input: student.notes,
            focused_field: StudentField::Name,
            error_message: None,
        };
    }

    pub fn open_exercise_form(&mut self, existing: Option<Exercise>) {
        let exercise = existing.unwrap_or_default();
        self.active_modal = ActiveModal::ExerciseForm {
            id: exercise.id,
            name_input: exercise.name,
            muscles_input: exercise.muscle_groups,
            description_input: exercise.description,
            media_path_input: String::new(),
            current_media_url: exercise.media_url,
            focused_field: ExerciseField::Name,
            error_message: None,
        };
    }

    /// Opens the exercise-selection dialog bound to the block editor's
    /// list: blank for a new entry, pre-filled when `position` is given.
    pub fn open_exercise_picker(&mut self, position: Option<usize>) {
        let Some(editor) = self.block_editor.as_ref() else {
            return;
        };

        let mut catalog_state = ListState::default();
        let (sets_input, reps_input) = match position {
            Some(index) => match ExercisePicker::open_at(&editor.block.exercises, index) {
                Ok(prefill) => {
                    let selected = editor
                        .catalog
                        .iter()
                        .position(|e| e.id.as_deref() == Some(prefill.selected_exercise_id.as_str()));
                    catalog_state.select(selected);
                    (prefill.sets.to_string(), prefill.reps.to_string())
                }
                Err(e) => {
                    self.set_error(e.to_string());
                    return;
                }
            },
            None => ("0".to_string(), "0".to_string()),
        };

        self.active_modal = ActiveModal::ExercisePicker {
            editing_position: position,
            sets_input,
            reps_input,
            catalog_state,
            focused_field: PickerField::Exercise,
            error_message: None,
        };
    }
}

// --- Submission Logic ---

fn submit_student_form(app: &mut App, modal_state: &ActiveModal) -> Result<(), AppInputError> {
    if let ActiveModal::StudentForm {
        id,
        name_input,
        email_input,
        goal_input,
        has_limitation,
        limitation_input,
        notes_input,
        .. // ignore focused_field, error_message
    } = modal_state
    {
        // A flagged limitation must be described
        if *has_limitation && limitation_input.trim().is_empty() {
            return Err(AppInputError::InputEmpty("Physical limitation description"));
        }

        let student = Student {
            id: id.clone(),
            name: name_input.trim().to_string(),
            email: email_input.trim().to_string(),
            goal: goal_input.trim().to_string(),
            physical_limitation: if *has_limitation {
                limitation_input.trim().to_string()
            } else {
                String::new()
            },
            notes: notes_input.trim().to_string(),
        };

        match app.service.save_student(student) {
            Ok(_) => Ok(()),
            Err(e) => Err(AppInputError::ServiceError(e.to_string())),
        }
    } else {
        Err(AppInputError::ServiceError(
            "Internal error: Invalid modal state".to_string(),
        ))
    }
}

fn submit_exercise_form(app: &mut App, modal_state: &ActiveModal) -> Result<(), AppInputError> {
    if let ActiveModal::ExerciseForm {
        id,
        name_input,
        muscles_input,
        description_input,
        media_path_input,
        current_media_url,
        ..
    } = modal_state
    {
        // "-" clears stored media; a path uploads a new file; blank keeps
        // whatever is there
        let media_path = media_path_input.trim();
        let (media_url, upload) = match media_path {
            "" => (current_media_url.clone(), None),
            "-" => (String::new(), None),
            path => (current_media_url.clone(), Some(Path::new(path).to_path_buf())),
        };

        let exercise = Exercise {
            id: id.clone(),
            name: name_input.trim().to_string(),
            muscle_groups: muscles_input.trim().to_string(),
            description: description_input.trim().to_string(),
            media_url,
        };

        match app.service.save_exercise(exercise, upload.as_deref()) {
            Ok(_) => Ok(()),
            Err(e) => Err(AppInputError::ServiceError(e.to_string())),
        }
    } else {
        Err(AppInputError::ServiceError(
            "Internal error: Invalid modal state".to_string(),
        ))
    }
}

fn submit_exercise_picker(app: &mut App, modal_state: &ActiveModal) -> Result<(), AppInputError> {
    if let ActiveModal::ExercisePicker {
        editing_position,
        sets_input,
        reps_input,
        catalog_state,
        ..
    } = modal_state
    {
        let Some(editor) = app.block_editor.as_mut() else {
            return Err(AppInputError::ServiceError(
                "Internal error: No block editor open".to_string(),
            ));
        };

        let selected_exercise_id = catalog_state
            .selected()
            .and_then(|i| editor.catalog.get(i))
            .and_then(|e| e.id.clone())
            .unwrap_or_default();

        let picker = ExercisePicker {
            selected_exercise_id,
            sets: parse_count(sets_input)?,
            reps: parse_count(reps_input)?,
            editing_position: *editing_position,
        };

        // The dialog mutates nothing itself; the block draft splices
        editor
            .block
            .apply_picker(&picker)
            .map_err(|e| match e {
                coach_desk_lib::DraftError::NoExerciseSelected => AppInputError::SelectionRequired,
                other => AppInputError::ServiceError(other.to_string()),
            })
    } else {
        Err(AppInputError::ServiceError(
            "Internal error: Invalid modal state".to_string(),
        ))
    }
}

// --- Input Handling ---

impl App {
    pub(crate) fn handle_modal_input(&mut self, key: KeyEvent) -> Result<()> {
        match &self.active_modal {
            ActiveModal::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter) {
                    self.active_modal = ActiveModal::None;
                }
                Ok(())
            }
            ActiveModal::StudentForm { .. } => self.handle_student_form_input(key),
            ActiveModal::ExerciseForm { .. } => self.handle_exercise_form_input(key),
            ActiveModal::ExercisePicker { .. } => self.handle_exercise_picker_input(key),
            ActiveModal::ConfirmDeleteStudent { .. }
            | ActiveModal::ConfirmDeleteExercise { .. }
            | ActiveModal::ConfirmDeleteWorkout { .. } => self.handle_confirm_delete_input(key),
            ActiveModal::None => Ok(()),
        }
    }

    fn handle_student_form_input(&mut self, key: KeyEvent) -> Result<()> {
        let mut should_submit = false;

        if let ActiveModal::StudentForm {
            ref mut name_input,
            ref mut email_input,
            ref mut goal_input,
            ref mut has_limitation,
            ref mut limitation_input,
            ref mut notes_input,
            ref mut focused_field,
            ref mut error_message,
            ..
        } = self.active_modal
        {
            // Always clear error on any input
            *error_message = None;

            match *focused_field {
                StudentField::Name => match key.code {
                    KeyCode::Char(c) => name_input.push(c),
                    KeyCode::Backspace => {
                        name_input.pop();
                    }
                    KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                        *focused_field = StudentField::Email;
                    }
                    KeyCode::Up => *focused_field = StudentField::Cancel,
                    KeyCode::Esc => {
                        self.active_modal = ActiveModal::None;
                        return Ok(());
                    }
                    _ => {}
                },
                StudentField::Email => match key.code {
                    KeyCode::Char(c) => email_input.push(c),
                    KeyCode::Backspace => {
                        email_input.pop();
                    }
                    KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                        *focused_field = StudentField::Goal;
                    }
                    KeyCode::Up => *focused_field = StudentField::Name,
                    KeyCode::Esc => {
                        self.active_modal = ActiveModal::None;
                        return Ok(());
                    }
                    _ => {}
                },
                StudentField::Goal => match key.code {
                    KeyCode::Char(c) => goal_input.push(c),
                    KeyCode::Backspace => {
                        goal_input.pop();
                    }
                    KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                        *focused_field = StudentField::HasLimitation;
                    }
                    KeyCode::Up => *focused_field = StudentField::Email,
                    KeyCode::Esc => {
                        self.active_modal = ActiveModal::None;
                        return Ok(());
                    }
                    _ => {}
                },
                StudentField::HasLimitation => match key.code {
                    KeyCode::Char(' ') => *has_limitation = !*has_limitation,
                    KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                        // Skip the description when there is nothing to describe
                        *focused_field = if *has_limitation {
                            StudentField::Limitation
                        } else {
                            StudentField::Notes
                        };
                    }
                    KeyCode::Up => *focused_field = StudentField::Goal,
                    KeyCode::Esc => {
                        self.active_modal = ActiveModal::None;
                        return Ok(());
                    }
                    _ => {}
                },
                StudentField::Limitation => match key.code {
                    KeyCode::Char(c) => limitation_input.push(c),
                    KeyCode::Backspace => {
                        limitation_input.pop();
                    }
                    KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                        *focused_field = StudentField::Notes;
                    }
                    KeyCode::Up => *focused_field = StudentField::HasLimitation,
                    KeyCode::Esc => {
                        self.active_modal = ActiveModal::None;
                        return Ok(());
                    }
                    _ => {}
                },
                StudentField::Notes => match key.code {
                    KeyCode::Char(c) => notes_input.push(c),
                    KeyCode::Backspace => {
                        notes_input.pop();
                    }
                    KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                        *focused_field = StudentField::Confirm;
                    }
                    KeyCode::Up => {
                        *focused_field = if *has_limitation {
                            StudentField::Limitation
                        } else {
                            StudentField::HasLimitation
                        };
                    }
                    KeyCode::Esc => {
                        self.active_modal = ActiveModal::None;
                        return Ok(());
                    }
                    _ => {}
                },
                StudentField::Confirm => match key.code {
                    KeyCode::Enter => should_submit = true,
                    KeyCode::Left | KeyCode::Backspace => *focused_field = StudentField::Cancel,
                    KeyCode::Up => *focused_field = StudentField::Notes,
                    KeyCode::Tab | KeyCode::Down | KeyCode::Right => {
                        *focused_field = StudentField::Cancel;
                    }
                    KeyCode::Esc => {
                        self.active_modal = ActiveModal::None;
                        return Ok(());
                    }
                    _ => {}
                },
                StudentField::Cancel => match key.code {
                    KeyCode::Enter | KeyCode::Esc => {
                        self.active_modal = ActiveModal::None;
                        return Ok(());
                    }
                    KeyCode::Right => *focused_field = StudentField::Confirm,
                    KeyCode::Up => *focused_field = StudentField::Notes,
                    KeyCode::Tab | KeyCode::Down => *focused_field = StudentField::Name,
                    _ => {}
                },
            }
        }

        if should_submit {
            let modal_state_clone = self.active_modal.clone();
            let submission_result = submit_student_form(self, &modal_state_clone);
            if submission_result.is_ok() {
                self.active_modal = ActiveModal::None;
                self.refresh_students(false);
            } else if let ActiveModal::StudentForm {
                ref mut error_message,
                ..
            } = self.active_modal
            {
                *error_message = Some(submission_result.unwrap_err().to_string());
            }
        }

        Ok(())
    }

    fn handle_exercise_form_input(&mut self, key: KeyEvent) -> Result<()> {
        let mut should_submit = false;

        if let ActiveModal::ExerciseForm {
            ref mut name_input,
            ref mut muscles_input,
            ref mut description_input,
            ref mut media_path_input,
            ref mut focused_field,
            ref mut error_message,
            ..
        } = self.active_modal
        {
            *error_message = None;

            match *focused_field {
                ExerciseField::Name => match key.code {
                    KeyCode::Char(c) => name_input.push(c),
                    KeyCode::Backspace => {
                        name_input.pop();
                    }
                    KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                        *focused_field = ExerciseField::Muscles;
                    }
                    KeyCode::Up => *focused_field = ExerciseField::Cancel,
                    KeyCode::Esc => {
                        self.active_modal = ActiveModal::None;
                        return Ok(());
                    }
                    _ => {}
                },
                ExerciseField::Muscles => match key.code {
                    KeyCode::Char(c) => muscles_input.push(c),
                    KeyCode::Backspace => {
                        muscles_input.pop();
                    }
                    KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                        *focused_field = ExerciseField::Description;
                    }
                    KeyCode::Up => *focused_field = ExerciseField::Name,
                    KeyCode::Esc => {
                        self.active_modal = ActiveModal::None;
                        return Ok(());
                    }
                    _ => {}
                },
                ExerciseField::Description => match key.code {
                    KeyCode::Char(c) => description_input.push(c),
                    KeyCode::Backspace => {
                        description_input.pop();
                    }
                    KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                        *focused_field = ExerciseField::Media;
                    }
                    KeyCode::Up => *focused_field = ExerciseField::Muscles,
                    KeyCode::Esc => {
                        self.active_modal = ActiveModal::None;
                        return Ok(());
                    }
                    _ => {}
                },
                ExerciseField::Media => match key.code {
                    KeyCode::Char(c) => media_path_input.push(c),
                    KeyCode::Backspace => {
                        media_path_input.pop();
                    }
                    KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                        *focused_field = ExerciseField::Confirm;
                    }
                    KeyCode::Up => *focused_field = ExerciseField::Description,
                    KeyCode::Esc => {
                        self.active_modal = ActiveModal::None;
                        return Ok(());
                    }
                    _ => {}
                },
                ExerciseField::Confirm => match key.code {
                    KeyCode::Enter => should_submit = true,
                    KeyCode::Left | KeyCode::Backspace => *focused_field = ExerciseField::Cancel,
                    KeyCode::Up => *focused_field = ExerciseField::Media,
                    KeyCode::Tab | KeyCode::Down | KeyCode::Right => {
                        *focused_field = ExerciseField::Cancel;
                    }
                    KeyCode::Esc => {
                        self.active_modal = ActiveModal::None;
                        return Ok(());
                    }
                    _ => {}
                },
                ExerciseField::Cancel => match key.code {
                    KeyCode::Enter | KeyCode::Esc => {
                        self.active_modal = ActiveModal::None;
                        return Ok(());
                    }
                    KeyCode::Right => *focused_field = ExerciseField::Confirm,
                    KeyCode::Up => *focused_field = ExerciseField::Media,
                    KeyCode::Tab | KeyCode::Down => *focused_field = ExerciseField::Name,
                    _ => {}
                },
            }
        }

        if should_submit {
            let modal_state_clone = self.active_modal.clone();
            let submission_result = submit_exercise_form(self, &modal_state_clone);
            if submission_result.is_ok() {
                self.active_modal = ActiveModal::None;
                self.refresh_exercises();
            } else if let ActiveModal::ExerciseForm {
                ref mut error_message,
                ..
            } = self.active_modal
            {
                *error_message = Some(submission_result.unwrap_err().to_string());
            }
        }

        Ok(())
    }

    fn handle_exercise_picker_input(&mut self, key: KeyEvent) -> Result<()> {
        let mut should_submit = false;
        let catalog_len = self.block_editor.as_ref().map_or(0, |e| e.catalog.len());

        if let ActiveModal::ExercisePicker {
            ref mut sets_input,
            ref mut reps_input,
            ref mut catalog_state,
            ref mut focused_field,
            ref mut error_message,
            ..
        } = self.active_modal
        {
            *error_message = None;

            match *focused_field {
                PickerField::Exercise => match key.code {
                    KeyCode::Char('j') | KeyCode::Down => {
                        super::navigation_helpers::list_next(catalog_state, catalog_len);
                    }
                    KeyCode::Char('k') | KeyCode::Up => {
                        super::navigation_helpers::list_previous(catalog_state, catalog_len);
                    }
                    KeyCode::Enter | KeyCode::Tab => *focused_field = PickerField::Sets,
                    KeyCode::Esc => {
                        self.active_modal = ActiveModal::None;
                        return Ok(());
                    }
                    _ => {}
                },
                PickerField::Sets => match key.code {
                    KeyCode::Char(c) if c.is_ascii_digit() => sets_input.push(c),
                    KeyCode::Backspace => {
                        sets_input.pop();
                    }
                    KeyCode::Up => modify_count_input(sets_input, 1),
                    KeyCode::Down => modify_count_input(sets_input, -1),
                    KeyCode::Enter | KeyCode::Tab => *focused_field = PickerField::Reps,
                    KeyCode::Esc => {
                        self.active_modal = ActiveModal::None;
                        return Ok(());
                    }
                    _ => {}
                },
                PickerField::Reps => match key.code {
                    KeyCode::Char(c) if c.is_ascii_digit() => reps_input.push(c),
                    KeyCode::Backspace => {
                        reps_input.pop();
                    }
                    KeyCode::Up => modify_count_input(reps_input, 1),
                    KeyCode::Down => modify_count_input(reps_input, -1),
                    KeyCode::Enter | KeyCode::Tab => *focused_field = PickerField::Confirm,
                    KeyCode::Esc => {
                        self.active_modal = ActiveModal::None;
                        return Ok(());
                    }
                    _ => {}
                },
                PickerField::Confirm => match key.code {
                    KeyCode::Enter => should_submit = true,
                    KeyCode::Left | KeyCode::Backspace => *focused_field = PickerField::Cancel,
                    KeyCode::Up => *focused_field = PickerField::Reps,
                    KeyCode::Tab | KeyCode::Down | KeyCode::Right => {
                        *focused_field = PickerField::Cancel;
                    }
                    KeyCode::Esc => {
                        self.active_modal = ActiveModal::None;
                        return Ok(());
                    }
                    _ => {}
                },
                PickerField::Cancel => match key.code {
                    // Cancel discards field state without touching the list
                    KeyCode::Enter | KeyCode::Esc => {
                        self.active_modal = ActiveModal::None;
                        return Ok(());
                    }
                    KeyCode::Right => *focused_field = PickerField::Confirm,
                    KeyCode::Up => *focused_field = PickerField::Reps,
                    KeyCode::Tab | KeyCode::Down => *focused_field = PickerField::Exercise,
                    _ => {}
                },
            }
        }

        if should_submit {
            let modal_state_clone = self.active_modal.clone();
            let submission_result = submit_exercise_picker(self, &modal_state_clone);
            if submission_result.is_ok() {
                self.active_modal = ActiveModal::None;
                if let Some(editor) = self.block_editor.as_mut() {
                    super::navigation_helpers::ensure_table_selection(
                        &mut editor.exercise_table_state,
                        editor.block.exercises.len(),
                    );
                }
            } else if let ActiveModal::ExercisePicker {
                ref mut error_message,
                ..
            } = self.active_modal
            {
                *error_message = Some(submission_result.unwrap_err().to_string());
            }
        }

        Ok(())
    }

    fn handle_confirm_delete_input(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') => {
                let modal = std::mem::replace(&mut self.active_modal, ActiveModal::None);
                match modal {
                    ActiveModal::ConfirmDeleteStudent { id, .. } => {
                        match self.service.delete_student(&id) {
                            Ok(()) => self.refresh_students(false),
                            Err(e) => self.set_error(format!("Error deleting student: {}", e)),
                        }
                    }
                    ActiveModal::ConfirmDeleteExercise { id, .. } => {
                        match self.service.delete_exercise(&id) {
                            Ok(()) => self.refresh_exercises(),
                            Err(e) => self.set_error(format!("Error deleting exercise: {}", e)),
                        }
                    }
                    ActiveModal::ConfirmDeleteWorkout { id, .. } => {
                        let student_id = self
                            .workouts
                            .student
                            .as_ref()
                            .and_then(|s| s.id.clone());
                        match student_id {
                            Some(student_id) => {
                                match self.service.delete_workout(&student_id, &id) {
                                    Ok(()) => self.refresh_workouts(),
                                    Err(e) => {
                                        self.set_error(format!("Error deleting workout: {}", e));
                                    }
                                }
                            }
                            None => self.enter_students(),
                        }
                    }
                    _ => {}
                }
            }
            KeyCode::Esc | KeyCode::Char('n') => self.active_modal = ActiveModal::None,
            _ => {}
        }
        Ok(())
    }
}
