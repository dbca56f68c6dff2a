//src/app/data.rs
use super::navigation_helpers::ensure_table_selection;
use super::state::{
    ActiveModal, ActiveScreen, App, BlockEditorState, BlockField, WorkoutEditorState, WorkoutField,
};
use coach_desk_lib::{BlockDraft, Student, Workout, WorkoutDraft};
use ratatui::widgets::TableState;

// Data loading and screen-entry methods on App. Every fetch catches its
// error into the status bar and leaves the previously loaded data usable.
impl App {
    // --- Students screen ---

    pub fn enter_students(&mut self) {
        self.screen = ActiveScreen::Students;
        self.active_modal = ActiveModal::None;
        self.refresh_students(false);
    }

    /// Runs the prefix search. `more` continues after the stored cursor
    /// (the "show more results" link); otherwise the list restarts.
    pub fn refresh_students(&mut self, more: bool) {
        let prefix = self.students.search_input.trim().to_string();
        let limit = self.service.config.page_size;
        let cursor = if more {
            self.students.next_cursor.clone()
        } else {
            None
        };

        match self
            .service
            .search_students(&prefix, limit, cursor.as_ref())
        {
            Ok(page) => {
                if !more {
                    self.students.list.clear();
                    self.students.table_state.select(None);
                }
                self.students.list.extend(page.items);
                self.students.next_cursor = page.next;
                if self.students.table_state.selected().is_none()
                    && !self.students.list.is_empty()
                {
                    self.students.table_state.select(Some(0));
                }
                ensure_table_selection(&mut self.students.table_state, self.students.list.len());
            }
            Err(e) => self.set_error(format!("Error fetching students: {}", e)),
        }
    }

    // --- Exercise catalog screen ---

    pub fn enter_exercises(&mut self) {
        self.screen = ActiveScreen::Exercises;
        self.active_modal = ActiveModal::None;
        self.refresh_exercises();
    }

    pub fn refresh_exercises(&mut self) {
        match self.service.list_exercises() {
            Ok(list) => {
                self.exercises.list = list;
                if self.exercises.table_state.selected().is_none()
                    && !self.exercises.list.is_empty()
                {
                    self.exercises.table_state.select(Some(0));
                }
                ensure_table_selection(&mut self.exercises.table_state, self.exercises.list.len());
            }
            // Fail-soft: the previous catalog stays on screen
            Err(e) => self.set_error(format!("Error fetching exercises: {}", e)),
        }
    }

    // --- Workout list screen ---

    pub fn enter_workouts(&mut self, student: Student) {
        self.workouts.student = Some(student);
        self.screen = ActiveScreen::Workouts;
        self.active_modal = ActiveModal::None;
        self.refresh_workouts();
    }

    pub fn refresh_workouts(&mut self) {
        let Some(student_id) = self
            .workouts
            .student
            .as_ref()
            .and_then(|s| s.id.clone())
        else {
            // A workout list without a student in context goes back to the
            // student list
            self.enter_students();
            return;
        };
        match self.service.list_workouts(&student_id) {
            Ok(list) => {
                self.workouts.list = list;
                if self.workouts.table_state.selected().is_none()
                    && !self.workouts.list.is_empty()
                {
                    self.workouts.table_state.select(Some(0));
                }
                ensure_table_selection(&mut self.workouts.table_state, self.workouts.list.len());
            }
            Err(e) => self.set_error(format!("Error fetching workouts: {}", e)),
        }
    }

    // --- Workout editor ---

    pub fn enter_workout_editor(&mut self, student: Student, existing: Option<&Workout>) {
        let draft = existing.map(WorkoutDraft::from_workout).unwrap_or_default();
        self.workout_editor = Some(WorkoutEditorState {
            student,
            draft,
            focused_field: WorkoutField::Name,
            weekday_cursor: 0,
            block_table_state: TableState::default(),
        });
        self.screen = ActiveScreen::WorkoutEditor;
        self.active_modal = ActiveModal::None;
    }

    /// Re-enters the editor with the draft handed back by the block editor.
    pub fn return_to_workout_editor(&mut self, student: Student, draft: WorkoutDraft) {
        let block_count = draft.blocks.len();
        let mut block_table_state = TableState::default();
        if block_count > 0 {
            block_table_state.select(Some(block_count - 1));
        }
        self.workout_editor = Some(WorkoutEditorState {
            student,
            draft,
            focused_field: WorkoutField::Blocks,
            weekday_cursor: 0,
            block_table_state,
        });
        self.screen = ActiveScreen::WorkoutEditor;
        self.active_modal = ActiveModal::None;
    }

    // --- Block editor ---

    /// Drills into the block editor, carrying a snapshot of the in-progress
    /// workout so nothing typed on the workout screen is lost.
    pub fn enter_block_editor(&mut self, position: Option<usize>) {
        let Some(editor) = self.workout_editor.take() else {
            return;
        };
        let block = match position {
            Some(index) => {
                if index >= editor.draft.blocks.len() {
                    self.set_error("No block at that position".to_string());
                    self.workout_editor = Some(editor);
                    return;
                }
                BlockDraft::from_block(&editor.draft.blocks[index])
            }
            None => BlockDraft::default(),
        };

        // Fail-soft catalog load: an empty selector beats a dead editor
        let catalog = match self.service.list_exercises() {
            Ok(catalog) => catalog,
            Err(e) => {
                self.set_error(format!("Error fetching exercises: {}", e));
                Vec::new()
            }
        };

        self.block_editor = Some(BlockEditorState {
            student: editor.student,
            workout: editor.draft,
            editing_index: position,
            block,
            focused_field: BlockField::Name,
            exercise_table_state: TableState::default(),
            catalog,
        });
        self.screen = ActiveScreen::BlockEditor;
        self.active_modal = ActiveModal::None;
    }

    // --- Student viewer ---

    pub fn enter_viewer_by_student_id(&mut self, student_id: &str) {
        match self.service.get_student(student_id) {
            Ok(Some(student)) => self.enter_viewer(student),
            Ok(None) => self.set_error("Student not found".to_string()),
            Err(e) => self.set_error(format!("Error fetching student: {}", e)),
        }
    }

    pub fn enter_viewer(&mut self, student: Student) {
        let Some(student_id) = student.id.clone() else {
            self.set_error("Student not found".to_string());
            return;
        };
        let workouts = match self.service.list_workouts(&student_id) {
            Ok(workouts) => workouts,
            Err(e) => {
                self.set_error(format!("Error fetching workouts: {}", e));
                return;
            }
        };
        let catalog = match self.service.list_exercises() {
            Ok(catalog) => catalog,
            Err(e) => {
                // Entries will render as "not found" until a reload succeeds
                self.set_error(format!("Error fetching exercises: {}", e));
                Vec::new()
            }
        };
        self.viewer.reset(student, workouts, catalog);
        self.viewer
            .set_low_bandwidth(self.service.config.low_bandwidth_default);
        self.screen = ActiveScreen::MyWorkouts;
        self.active_modal = ActiveModal::None;
    }

    // --- Session ---

    pub fn sign_out(&mut self) {
        if let Err(e) = self.service.sign_out() {
            self.set_error(format!("Error signing out: {}", e));
            return;
        }
        self.session = None;
        self.screen = ActiveScreen::StudentSignIn;
        self.active_modal = ActiveModal::None;
    }
}
