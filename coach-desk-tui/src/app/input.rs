//src/app/input.rs
use super::navigation_helpers::{ensure_table_selection, list_next, list_previous, table_next, table_previous};
use super::state::{
    ActiveModal, ActiveScreen, AdminSignInField, App, BlockField, RegisterAdminField, WorkoutField,
};
use super::viewer::ViewerFocus;
use anyhow::Result;
use coach_desk_lib::{Session, Weekday};
use crossterm::event::{KeyCode, KeyEvent};

impl App {
    // --- Input Handling ---
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        // Handle based on active modal first
        if self.active_modal != ActiveModal::None {
            return self.handle_modal_input(key);
        }

        match self.screen {
            ActiveScreen::StudentSignIn => self.handle_student_sign_in_input(key),
            ActiveScreen::AdminSignIn => self.handle_admin_sign_in_input(key),
            ActiveScreen::RegisterAdmin => self.handle_register_admin_input(key),
            ActiveScreen::Students => self.handle_students_input(key),
            ActiveScreen::Exercises => self.handle_exercises_input(key),
            ActiveScreen::Workouts => self.handle_workouts_input(key),
            ActiveScreen::WorkoutEditor => self.handle_workout_editor_input(key),
            ActiveScreen::BlockEditor => self.handle_block_editor_input(key),
            ActiveScreen::MyWorkouts => self.handle_viewer_input(key),
        }
        Ok(())
    }

    // --- Sign-in screens ---

    fn handle_student_sign_in_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) => self.student_sign_in.email_input.push(c),
            KeyCode::Backspace => {
                self.student_sign_in.email_input.pop();
            }
            KeyCode::Enter => {
                let email = self.student_sign_in.email_input.trim().to_string();
                match self.service.sign_in_student(&email) {
                    Ok(session) => {
                        let student_id = match &session {
                            Session::Student { id, .. } => id.clone(),
                            Session::Administrator { .. } => String::new(),
                        };
                        self.session = Some(session);
                        self.enter_viewer_by_student_id(&student_id);
                    }
                    Err(e) => self.set_error(e.to_string()),
                }
            }
            KeyCode::Tab => self.screen = ActiveScreen::AdminSignIn,
            KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_admin_sign_in_input(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.screen = ActiveScreen::StudentSignIn;
            return;
        }
        match self.admin_sign_in.focused_field {
            AdminSignInField::Email => match key.code {
                KeyCode::Char(c) => self.admin_sign_in.email_input.push(c),
                KeyCode::Backspace => {
                    self.admin_sign_in.email_input.pop();
                }
                KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                    self.admin_sign_in.focused_field = AdminSignInField::Password;
                }
                KeyCode::Up => self.admin_sign_in.focused_field = AdminSignInField::Register,
                _ => {}
            },
            AdminSignInField::Password => match key.code {
                KeyCode::Char(c) => self.admin_sign_in.password_input.push(c),
                KeyCode::Backspace => {
                    self.admin_sign_in.password_input.pop();
                }
                KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                    self.admin_sign_in.focused_field = AdminSignInField::Confirm;
                }
                KeyCode::Up => self.admin_sign_in.focused_field = AdminSignInField::Email,
                _ => {}
            },
            AdminSignInField::Confirm => match key.code {
                KeyCode::Enter => self.submit_admin_sign_in(),
                KeyCode::Tab | KeyCode::Down | KeyCode::Right => {
                    self.admin_sign_in.focused_field = AdminSignInField::Reset;
                }
                KeyCode::Up => self.admin_sign_in.focused_field = AdminSignInField::Password,
                _ => {}
            },
            AdminSignInField::Reset => match key.code {
                KeyCode::Enter => {
                    let email = self.admin_sign_in.email_input.trim().to_string();
                    match self.service.request_password_reset(&email) {
                        // The token stands in for the reset e-mail; hand it
                        // to the operator via the status line
                        Ok(token) => self.set_error(format!("Password reset token: {token}")),
                        Err(e) => self.set_error(e.to_string()),
                    }
                }
                KeyCode::Tab | KeyCode::Down | KeyCode::Right => {
                    self.admin_sign_in.focused_field = AdminSignInField::Register;
                }
                KeyCode::Up | KeyCode::Left => {
                    self.admin_sign_in.focused_field = AdminSignInField::Confirm;
                }
                _ => {}
            },
            AdminSignInField::Register => match key.code {
                KeyCode::Enter => {
                    self.register_admin = Default::default();
                    self.screen = ActiveScreen::RegisterAdmin;
                }
                KeyCode::Tab | KeyCode::Down => {
                    self.admin_sign_in.focused_field = AdminSignInField::Email;
                }
                KeyCode::Up | KeyCode::Left => {
                    self.admin_sign_in.focused_field = AdminSignInField::Reset;
                }
                _ => {}
            },
        }
    }

    fn submit_admin_sign_in(&mut self) {
        let email = self.admin_sign_in.email_input.trim().to_string();
        let password = self.admin_sign_in.password_input.clone();
        match self.service.sign_in_admin(&email, &password) {
            Ok(session) => {
                self.session = Some(session);
                self.admin_sign_in = Default::default();
                self.enter_students();
            }
            Err(e) => self.set_error(e.to_string()),
        }
    }

    fn handle_register_admin_input(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.screen = ActiveScreen::AdminSignIn;
            return;
        }
        let form = &mut self.register_admin;
        match form.focused_field {
            RegisterAdminField::Name => match key.code {
                KeyCode::Char(c) => form.name_input.push(c),
                KeyCode::Backspace => {
                    form.name_input.pop();
                }
                KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                    form.focused_field = RegisterAdminField::Email;
                }
                KeyCode::Up => form.focused_field = RegisterAdminField::Cancel,
                _ => {}
            },
            RegisterAdminField::Email => match key.code {
                KeyCode::Char(c) => form.email_input.push(c),
                KeyCode::Backspace => {
                    form.email_input.pop();
                }
                KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                    form.focused_field = RegisterAdminField::Password;
                }
                KeyCode::Up => form.focused_field = RegisterAdminField::Name,
                _ => {}
            },
            RegisterAdminField::Password => match key.code {
                KeyCode::Char(c) => form.password_input.push(c),
                KeyCode::Backspace => {
                    form.password_input.pop();
                }
                KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                    form.focused_field = RegisterAdminField::PasswordRepeat;
                }
                KeyCode::Up => form.focused_field = RegisterAdminField::Email,
                _ => {}
            },
            RegisterAdminField::PasswordRepeat => match key.code {
                KeyCode::Char(c) => form.password_repeat_input.push(c),
                KeyCode::Backspace => {
                    form.password_repeat_input.pop();
                }
                KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                    form.focused_field = RegisterAdminField::Confirm;
                }
                KeyCode::Up => form.focused_field = RegisterAdminField::Password,
                _ => {}
            },
            RegisterAdminField::Confirm => match key.code {
                KeyCode::Enter => self.submit_register_admin(),
                KeyCode::Tab | KeyCode::Down | KeyCode::Right => {
                    self.register_admin.focused_field = RegisterAdminField::Cancel;
                }
                KeyCode::Up => {
                    self.register_admin.focused_field = RegisterAdminField::PasswordRepeat;
                }
                _ => {}
            },
            RegisterAdminField::Cancel => match key.code {
                KeyCode::Enter => self.screen = ActiveScreen::AdminSignIn,
                KeyCode::Left => form.focused_field = RegisterAdminField::Confirm,
                KeyCode::Tab | KeyCode::Down => form.focused_field = RegisterAdminField::Name,
                KeyCode::Up => form.focused_field = RegisterAdminField::Confirm,
                _ => {}
            },
        }
    }

    fn submit_register_admin(&mut self) {
        let form = &self.register_admin;
        if form.password_input != form.password_repeat_input {
            self.set_error("Passwords do not match".to_string());
            return;
        }
        let name = form.name_input.trim().to_string();
        let email = form.email_input.trim().to_string();
        let password = form.password_input.clone();
        match self.service.register_admin(&name, &email, &password) {
            Ok(_) => match self.service.sign_in_admin(&email, &password) {
                Ok(session) => {
                    self.session = Some(session);
                    self.register_admin = Default::default();
                    self.enter_students();
                }
                Err(e) => self.set_error(e.to_string()),
            },
            Err(e) => self.set_error(e.to_string()),
        }
    }

    // --- Student list screen ---

    fn handle_students_input(&mut self, key: KeyEvent) {
        if self.students.search_focused {
            match key.code {
                KeyCode::Char(c) => self.students.search_input.push(c),
                KeyCode::Backspace => {
                    self.students.search_input.pop();
                }
                KeyCode::Enter => {
                    self.students.search_focused = false;
                    self.refresh_students(false);
                }
                KeyCode::Esc => self.students.search_focused = false,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.active_modal = ActiveModal::Help,
            KeyCode::Char('/') => self.students.search_focused = true,
            KeyCode::Char('k') | KeyCode::Up => {
                table_previous(&mut self.students.table_state, self.students.list.len());
            }
            KeyCode::Char('j') | KeyCode::Down => {
                table_next(&mut self.students.table_state, self.students.list.len());
            }
            KeyCode::Char('n') => self.open_student_form(None),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(student) = self.selected_student().cloned() {
                    self.open_student_form(Some(student));
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                let target = self
                    .selected_student()
                    .and_then(|s| s.id.clone().map(|id| (id, s.name.clone())));
                if let Some((id, name)) = target {
                    self.active_modal = ActiveModal::ConfirmDeleteStudent { id, name };
                }
            }
            KeyCode::Char('w') => {
                if let Some(student) = self.selected_student().cloned() {
                    self.enter_workouts(student);
                }
            }
            KeyCode::Char('m') => {
                if self.students.next_cursor.is_some() {
                    self.refresh_students(true);
                }
            }
            KeyCode::Char('x') => self.enter_exercises(),
            KeyCode::Char('v') => {
                // Preview a student's viewer, the way the original let an
                // admin open a student's plan by id
                if let Some(student) = self.selected_student().cloned() {
                    self.enter_viewer(student);
                }
            }
            KeyCode::Char('o') => self.sign_out(),
            _ => {}
        }
    }

    // --- Exercise catalog screen ---

    fn handle_exercises_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.active_modal = ActiveModal::Help,
            KeyCode::Char('k') | KeyCode::Up => {
                table_previous(&mut self.exercises.table_state, self.exercises.list.len());
            }
            KeyCode::Char('j') | KeyCode::Down => {
                table_next(&mut self.exercises.table_state, self.exercises.list.len());
            }
            KeyCode::Char('n') => self.open_exercise_form(None),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(exercise) = self.selected_exercise().cloned() {
                    self.open_exercise_form(Some(exercise));
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                let target = self
                    .selected_exercise()
                    .and_then(|e| e.id.clone().map(|id| (id, e.name.clone())));
                if let Some((id, name)) = target {
                    self.active_modal = ActiveModal::ConfirmDeleteExercise { id, name };
                }
            }
            KeyCode::Esc => self.enter_students(),
            _ => {}
        }
    }

    // --- Workout list screen ---

    fn handle_workouts_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.active_modal = ActiveModal::Help,
            KeyCode::Char('k') | KeyCode::Up => {
                table_previous(&mut self.workouts.table_state, self.workouts.list.len());
            }
            KeyCode::Char('j') | KeyCode::Down => {
                table_next(&mut self.workouts.table_state, self.workouts.list.len());
            }
            KeyCode::Char('n') => {
                if let Some(student) = self.workouts.student.clone() {
                    self.enter_workout_editor(student, None);
                }
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let (Some(student), Some(workout)) = (
                    self.workouts.student.clone(),
                    self.selected_workout().cloned(),
                ) {
                    self.enter_workout_editor(student, Some(&workout));
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                let target = self
                    .selected_workout()
                    .and_then(|w| w.id.clone().map(|id| (id, w.name.clone())));
                if let Some((id, name)) = target {
                    self.active_modal = ActiveModal::ConfirmDeleteWorkout { id, name };
                }
            }
            KeyCode::Esc => self.enter_students(),
            _ => {}
        }
    }

    // --- Workout editor screen ---

    fn handle_workout_editor_input(&mut self, key: KeyEvent) {
        let Some(mut editor) = self.workout_editor.take() else {
            self.enter_students();
            return;
        };

        if key.code == KeyCode::Esc {
            // Cancel discards all edits and returns to the workout list
            self.enter_workouts(editor.student);
            return;
        }

        match editor.focused_field {
            WorkoutField::Name => match key.code {
                KeyCode::Char(c) => editor.draft.name.push(c),
                KeyCode::Backspace => {
                    editor.draft.name.pop();
                }
                KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                    editor.focused_field = WorkoutField::Goal;
                }
                KeyCode::Up => editor.focused_field = WorkoutField::Cancel,
                _ => {}
            },
            WorkoutField::Goal => match key.code {
                KeyCode::Char(c) => editor.draft.goal.push(c),
                KeyCode::Backspace => {
                    editor.draft.goal.pop();
                }
                KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                    editor.focused_field = WorkoutField::Weekdays;
                }
                KeyCode::Up => editor.focused_field = WorkoutField::Name,
                _ => {}
            },
            WorkoutField::Weekdays => match key.code {
                KeyCode::Left => {
                    editor.weekday_cursor = editor.weekday_cursor.checked_sub(1).unwrap_or(6);
                }
                KeyCode::Right => {
                    editor.weekday_cursor = (editor.weekday_cursor + 1) % Weekday::ALL.len();
                }
                KeyCode::Char(' ') | KeyCode::Enter => {
                    editor
                        .draft
                        .toggle_weekday(Weekday::ALL[editor.weekday_cursor]);
                }
                KeyCode::Tab | KeyCode::Down => editor.focused_field = WorkoutField::Blocks,
                KeyCode::Up => editor.focused_field = WorkoutField::Goal,
                _ => {}
            },
            WorkoutField::Blocks => match key.code {
                KeyCode::Char('k') => {
                    table_previous(&mut editor.block_table_state, editor.draft.blocks.len());
                }
                KeyCode::Char('j') => {
                    table_next(&mut editor.block_table_state, editor.draft.blocks.len());
                }
                KeyCode::Char('a') => {
                    self.workout_editor = Some(editor);
                    self.enter_block_editor(None);
                    return;
                }
                KeyCode::Char('e') | KeyCode::Enter => {
                    let selected = editor.block_table_state.selected();
                    if selected.is_some() {
                        self.workout_editor = Some(editor);
                        self.enter_block_editor(selected);
                        return;
                    }
                }
                KeyCode::Char('d') | KeyCode::Delete => {
                    if let Some(position) = editor.block_table_state.selected() {
                        if let Err(e) = editor.draft.remove_block(position) {
                            self.set_error(e.to_string());
                        }
                        ensure_table_selection(
                            &mut editor.block_table_state,
                            editor.draft.blocks.len(),
                        );
                    }
                }
                KeyCode::Tab | KeyCode::Down => editor.focused_field = WorkoutField::Save,
                KeyCode::Up => editor.focused_field = WorkoutField::Weekdays,
                _ => {}
            },
            WorkoutField::Save => match key.code {
                KeyCode::Enter => {
                    self.submit_workout_save(editor);
                    return;
                }
                KeyCode::Tab | KeyCode::Down | KeyCode::Right => {
                    editor.focused_field = WorkoutField::Cancel;
                }
                KeyCode::Up => editor.focused_field = WorkoutField::Blocks,
                _ => {}
            },
            WorkoutField::Cancel => match key.code {
                KeyCode::Enter => {
                    self.enter_workouts(editor.student);
                    return;
                }
                KeyCode::Left => editor.focused_field = WorkoutField::Save,
                KeyCode::Tab | KeyCode::Down => editor.focused_field = WorkoutField::Name,
                KeyCode::Up => editor.focused_field = WorkoutField::Save,
                _ => {}
            },
        }

        self.workout_editor = Some(editor);
    }

    fn submit_workout_save(&mut self, editor: super::state::WorkoutEditorState) {
        let Some(student_id) = editor.student.id.clone() else {
            self.enter_students();
            return;
        };
        match self.service.save_workout(&student_id, &editor.draft) {
            Ok(_) => self.enter_workouts(editor.student),
            Err(e) => {
                // Keep the editor open with everything as it was
                self.set_error(e.to_string());
                self.workout_editor = Some(editor);
            }
        }
    }

    // --- Block editor screen ---

    fn handle_block_editor_input(&mut self, key: KeyEvent) {
        let Some(mut editor) = self.block_editor.take() else {
            self.enter_students();
            return;
        };

        if key.code == KeyCode::Esc {
            // Cancel hands the untouched workout draft back to the editor
            self.return_to_workout_editor(editor.student, editor.workout);
            return;
        }

        match editor.focused_field {
            BlockField::Name => match key.code {
                KeyCode::Char(c) => editor.block.name.push(c),
                KeyCode::Backspace => {
                    editor.block.name.pop();
                }
                KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                    editor.focused_field = BlockField::Muscles;
                }
                KeyCode::Up => editor.focused_field = BlockField::Cancel,
                _ => {}
            },
            BlockField::Muscles => match key.code {
                KeyCode::Char(c) => editor.block.muscle_groups.push(c),
                KeyCode::Backspace => {
                    editor.block.muscle_groups.pop();
                }
                KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                    editor.focused_field = BlockField::Notes;
                }
                KeyCode::Up => editor.focused_field = BlockField::Name,
                _ => {}
            },
            BlockField::Notes => match key.code {
                KeyCode::Char(c) => editor.block.notes.push(c),
                KeyCode::Backspace => {
                    editor.block.notes.pop();
                }
                KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                    editor.focused_field = BlockField::Exercises;
                }
                KeyCode::Up => editor.focused_field = BlockField::Muscles,
                _ => {}
            },
            BlockField::Exercises => match key.code {
                KeyCode::Char('k') | KeyCode::Up => {
                    table_previous(
                        &mut editor.exercise_table_state,
                        editor.block.exercises.len(),
                    );
                }
                KeyCode::Char('j') => {
                    table_next(
                        &mut editor.exercise_table_state,
                        editor.block.exercises.len(),
                    );
                }
                KeyCode::Char('a') => {
                    self.block_editor = Some(editor);
                    self.open_exercise_picker(None);
                    return;
                }
                KeyCode::Char('e') | KeyCode::Enter => {
                    let selected = editor.exercise_table_state.selected();
                    if selected.is_some() {
                        self.block_editor = Some(editor);
                        self.open_exercise_picker(selected);
                        return;
                    }
                }
                KeyCode::Char('d') | KeyCode::Delete => {
                    if let Some(position) = editor.exercise_table_state.selected() {
                        if let Err(e) = editor.block.remove_exercise(position) {
                            self.set_error(e.to_string());
                        }
                        ensure_table_selection(
                            &mut editor.exercise_table_state,
                            editor.block.exercises.len(),
                        );
                    }
                }
                KeyCode::Tab | KeyCode::Down => editor.focused_field = BlockField::Save,
                _ => {}
            },
            BlockField::Save => match key.code {
                KeyCode::Enter => {
                    // Fold the finished block back into the carried workout
                    match editor.block.finish() {
                        Ok(block) => {
                            match editor.workout.put_block(editor.editing_index, block) {
                                Ok(()) => self
                                    .return_to_workout_editor(editor.student, editor.workout),
                                Err(e) => {
                                    self.set_error(e.to_string());
                                    self.block_editor = Some(editor);
                                }
                            }
                        }
                        Err(e) => {
                            self.set_error(e.to_string());
                            self.block_editor = Some(editor);
                        }
                    }
                    return;
                }
                KeyCode::Tab | KeyCode::Down | KeyCode::Right => {
                    editor.focused_field = BlockField::Cancel;
                }
                KeyCode::Up => editor.focused_field = BlockField::Exercises,
                _ => {}
            },
            BlockField::Cancel => match key.code {
                KeyCode::Enter => {
                    self.return_to_workout_editor(editor.student, editor.workout);
                    return;
                }
                KeyCode::Left => editor.focused_field = BlockField::Save,
                KeyCode::Tab | KeyCode::Down => editor.focused_field = BlockField::Name,
                KeyCode::Up => editor.focused_field = BlockField::Save,
                _ => {}
            },
        }

        self.block_editor = Some(editor);
    }

    // --- Student viewer screen ---

    fn handle_viewer_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('?') => {
                self.active_modal = ActiveModal::Help;
                return;
            }
            KeyCode::Char('b') => {
                self.viewer.toggle_low_bandwidth();
                return;
            }
            KeyCode::Char('o') => {
                self.sign_out();
                return;
            }
            KeyCode::Esc => {
                // Admins previewing a student's plan go back to the list;
                // students stay on their own screen
                if matches!(self.session, Some(Session::Administrator { .. })) {
                    self.enter_students();
                }
                return;
            }
            KeyCode::Tab => {
                self.viewer.focus = match self.viewer.focus {
                    ViewerFocus::Workouts => ViewerFocus::Blocks,
                    ViewerFocus::Blocks => ViewerFocus::Exercises,
                    ViewerFocus::Exercises => ViewerFocus::Workouts,
                };
                return;
            }
            _ => {}
        }

        match self.viewer.focus {
            ViewerFocus::Workouts => match key.code {
                KeyCode::Char('j') | KeyCode::Down | KeyCode::Right => {
                    self.viewer.cycle_workout(true);
                }
                KeyCode::Char('k') | KeyCode::Up | KeyCode::Left => {
                    self.viewer.cycle_workout(false);
                }
                _ => {}
            },
            ViewerFocus::Blocks => match key.code {
                KeyCode::Char('j') | KeyCode::Down | KeyCode::Right => {
                    self.viewer.cycle_block(true);
                }
                KeyCode::Char('k') | KeyCode::Up | KeyCode::Left => {
                    self.viewer.cycle_block(false);
                }
                _ => {}
            },
            ViewerFocus::Exercises => match key.code {
                KeyCode::Char('j') | KeyCode::Down => {
                    list_next(
                        &mut self.viewer.exercise_list_state,
                        self.viewer.resolved.len(),
                    );
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    list_previous(
                        &mut self.viewer.exercise_list_state,
                        self.viewer.resolved.len(),
                    );
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    if let Some(index) = self.viewer.exercise_list_state.selected() {
                        self.viewer.reveal(index);
                    }
                }
                _ => {}
            },
        }
    }
}
