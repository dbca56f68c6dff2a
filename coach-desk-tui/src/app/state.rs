//src/app/state.rs
// coach-desk-tui/src/app/state.rs
use super::viewer::ViewerState;
use coach_desk_lib::{
    AppService, BlockDraft, Exercise, PageCursor, Session, Student, Workout, WorkoutDraft,
};
use ratatui::widgets::{ListState, TableState};
use std::time::Instant;

// Represents the active screen (one per page of the original flow)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveScreen {
    StudentSignIn,
    AdminSignIn,
    RegisterAdmin,
    Students,
    Exercises,
    Workouts,
    WorkoutEditor,
    BlockEditor,
    MyWorkouts,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminSignInField {
    Email,
    Password,
    Confirm,
    Reset,
    Register,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterAdminField {
    Name,
    Email,
    Password,
    PasswordRepeat,
    Confirm,
    Cancel,
}

// Fields of the workout editor screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkoutField {
    Name,
    Goal,
    Weekdays,
    Blocks,
    Save,
    Cancel,
}

// Fields of the block editor screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockField {
    Name,
    Muscles,
    Notes,
    Exercises,
    Save,
    Cancel,
}

// Fields within the exercise-selection modal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerField {
    Exercise,
    Sets,
    Reps,
    Confirm,
    Cancel,
}

// Fields within the student form modal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StudentField {
    Name,
    Email,
    Goal,
    HasLimitation,
    Limitation,
    Notes,
    Confirm,
    Cancel,
}

// Fields within the exercise catalog form modal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExerciseField {
    Name,
    Muscles,
    Description,
    Media,
    Confirm,
    Cancel,
}

// Represents the state of active modals
#[derive(Clone, Debug, PartialEq)]
pub enum ActiveModal {
    None,
    Help,
    StudentForm {
        id: Option<String>,
        name_input: String,
        email_input: String,
        goal_input: String,
        has_limitation: bool,
        limitation_input: String,
        notes_input: String,
        focused_field: StudentField,
        error_message: Option<String>,
    },
    ExerciseForm {
        id: Option<String>,
        name_input: String,
        muscles_input: String,
        description_input: String,
        // Path of a file to upload; blank keeps (or clears) current media
        media_path_input: String,
        current_media_url: String,
        focused_field: ExerciseField,
        error_message: Option<String>,
    },
    ExercisePicker {
        // Absent = new entry, present = index being edited in the block
        editing_position: Option<usize>,
        sets_input: String,
        reps_input: String,
        catalog_state: ListState,
        focused_field: PickerField,
        error_message: Option<String>,
    },
    ConfirmDeleteStudent {
        id: String,
        name: String,
    },
    ConfirmDeleteExercise {
        id: String,
        name: String,
    },
    ConfirmDeleteWorkout {
        id: String,
        name: String,
    },
}

#[derive(Default)]
pub struct StudentSignInState {
    pub email_input: String,
}

pub struct AdminSignInState {
    pub email_input: String,
    pub password_input: String,
    pub focused_field: AdminSignInField,
}

impl Default for AdminSignInState {
    fn default() -> Self {
        Self {
            email_input: String::new(),
            password_input: String::new(),
            focused_field: AdminSignInField::Email,
        }
    }
}

pub struct RegisterAdminState {
    pub name_input: String,
    pub email_input: String,
    pub password_input: String,
    pub password_repeat_input: String,
    pub focused_field: RegisterAdminField,
}

impl Default for RegisterAdminState {
    fn default() -> Self {
        Self {
            name_input: String::new(),
            email_input: String::new(),
            password_input: String::new(),
            password_repeat_input: String::new(),
            focused_field: RegisterAdminField::Name,
        }
    }
}

#[derive(Default)]
pub struct StudentsState {
    pub search_input: String,
    pub search_focused: bool,
    pub list: Vec<Student>,
    pub table_state: TableState,
    pub next_cursor: Option<PageCursor>,
}

#[derive(Default)]
pub struct ExercisesState {
    pub list: Vec<Exercise>,
    pub table_state: TableState,
}

#[derive(Default)]
pub struct WorkoutsState {
    pub student: Option<Student>,
    pub list: Vec<Workout>,
    pub table_state: TableState,
}

// The workout editor owns the in-progress draft; drilling into a block
// carries a snapshot of it so nothing typed here is lost
pub struct WorkoutEditorState {
    pub student: Student,
    pub draft: WorkoutDraft,
    pub focused_field: WorkoutField,
    pub weekday_cursor: usize,
    pub block_table_state: TableState,
}

pub struct BlockEditorState {
    pub student: Student,
    // The carried aggregate; the finished block is spliced back into it
    pub workout: WorkoutDraft,
    pub editing_index: Option<usize>,
    pub block: BlockDraft,
    pub focused_field: BlockField,
    pub exercise_table_state: TableState,
    // Catalog for the selection modal; stale-but-usable on fetch failure
    pub catalog: Vec<Exercise>,
}

// Holds the application state
pub struct App {
    pub service: AppService,
    pub screen: ActiveScreen,
    pub should_quit: bool,
    pub active_modal: ActiveModal,
    pub session: Option<Session>,
    pub last_error: Option<String>, // For status bar errors
    pub error_clear_time: Option<Instant>,

    pub student_sign_in: StudentSignInState,
    pub admin_sign_in: AdminSignInState,
    pub register_admin: RegisterAdminState,
    pub students: StudentsState,
    pub exercises: ExercisesState,
    pub workouts: WorkoutsState,
    pub workout_editor: Option<WorkoutEditorState>,
    pub block_editor: Option<BlockEditorState>,
    pub viewer: ViewerState,
}

impl App {
    pub fn new(service: AppService) -> Self {
        let session = service.current_session().unwrap_or(None);
        let low_bandwidth = service.config.low_bandwidth_default;
        let mut app = App {
            screen: ActiveScreen::StudentSignIn,
            should_quit: false,
            active_modal: ActiveModal::None,
            session: session.clone(),
            last_error: None,
            error_clear_time: None,
            student_sign_in: StudentSignInState::default(),
            admin_sign_in: AdminSignInState::default(),
            register_admin: RegisterAdminState::default(),
            students: StudentsState::default(),
            exercises: ExercisesState::default(),
            workouts: WorkoutsState::default(),
            workout_editor: None,
            block_editor: None,
            viewer: ViewerState::new(low_bandwidth),
            service,
        };

        // An existing session routes straight to the matching home screen
        match session {
            Some(Session::Administrator { .. }) => app.enter_students(),
            Some(Session::Student { id, .. }) => app.enter_viewer_by_student_id(&id),
            None => {}
        }
        app
    }

    // Method to set status bar errors
    pub fn set_error(&mut self, msg: String) {
        self.last_error = Some(msg);
        self.error_clear_time = Some(Instant::now() + std::time::Duration::from_secs(5));
    }

    // Method to clear expired error messages (called from the main loop)
    pub fn clear_expired_error(&mut self) {
        if let Some(clear_time) = self.error_clear_time {
            if Instant::now() >= clear_time {
                self.last_error = None;
                self.error_clear_time = None;
            }
        }
    }

    /// The row currently selected on the student list, if any.
    pub fn selected_student(&self) -> Option<&Student> {
        self.students
            .table_state
            .selected()
            .and_then(|i| self.students.list.get(i))
    }

    pub fn selected_workout(&self) -> Option<&Workout> {
        self.workouts
            .table_state
            .selected()
            .and_then(|i| self.workouts.list.get(i))
    }

    pub fn selected_exercise(&self) -> Option<&Exercise> {
        self.exercises
            .table_state
            .selected()
            .and_then(|i| self.exercises.list.get(i))
    }
}
