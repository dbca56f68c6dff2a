// src/lib.rs
use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use validator::Validate;

// --- Declare modules ---
mod auth;
mod config;
mod draft;
mod media;
mod model;
pub mod store;

// --- Expose public types ---
pub use auth::{AuthError, Session};
pub use config::{
    get_config_path as get_config_path_util,
    load as load_config_util,
    parse_color,
    save as save_config_util,
    Config,
    Error as ConfigError, // Renamed from Error
    StandardColor,
    Theme,
};
pub use draft::{BlockDraft, DraftError, ExercisePicker, WorkoutDraft};
pub use media::{MediaError, MediaStore};
pub use model::{
    first_validation_message, Administrator, Block, Exercise, ExerciseInPlan, Student, Weekday,
    Workout,
};
pub use store::{
    get_data_dir as get_data_dir_util,
    get_db_path as get_db_path_util,
    Error as StoreError,
    Page,
    PageCursor,
};

const SESSION_FILE_NAME: &str = "session.json";

/// A plan entry paired with its catalog exercise, or with `None` when the
/// referenced exercise no longer exists in the catalog. Rendered as a
/// "not found" placeholder, never treated as fatal.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedExercise {
    pub entry: ExerciseInPlan,
    pub exercise: Option<Exercise>,
}

pub struct AppService {
    pub config: Config,
    pub conn: Connection,
    pub media: MediaStore,
    pub db_path: PathBuf,
    pub config_path: PathBuf,
    pub session_path: PathBuf,
}

impl AppService {
    /// Initializes the application service.
    /// # Errors
    /// Returns `anyhow::Error` if config/db path determination, loading, or
    /// initialization fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .context(format!("Failed to load config from {config_path:?}"))?;

        let data_dir = store::get_data_dir().context("Failed to determine data directory")?;
        let db_path = store::get_db_path().context("Failed to determine database path")?;
        let conn = store::open_db(&db_path)
            .with_context(|| format!("Failed to open database at {db_path:?}"))?;
        store::init_db(&conn).context("Failed to initialize database schema")?;

        let media = MediaStore::new(data_dir.join("media"))
            .context("Failed to initialize media storage")?;
        let session_path = data_dir.join(SESSION_FILE_NAME);

        Ok(Self {
            config,
            conn,
            media,
            db_path,
            config_path,
            session_path,
        })
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save(&self.config_path, &self.config)
    }

    /// Sets the student-list page size.
    /// # Errors
    /// - `ConfigError::InvalidPageSize` if `size` is 0.
    /// - `ConfigError` variants if saving fails.
    pub fn set_page_size(&mut self, size: u32) -> Result<(), ConfigError> {
        if size == 0 {
            return Err(ConfigError::InvalidPageSize);
        }
        self.config.page_size = size;
        self.save_config()
    }

    /// Sets whether the student viewer starts in data-saver mode.
    /// # Errors
    /// Returns `ConfigError` variants if saving fails.
    pub fn set_low_bandwidth_default(&mut self, enabled: bool) -> Result<(), ConfigError> {
        self.config.low_bandwidth_default = enabled;
        self.save_config()
    }

    // --- Exercise catalog ---

    /// Lists the full exercise catalog.
    /// # Errors
    /// Returns `anyhow::Error` wrapping store errors.
    pub fn list_exercises(&self) -> Result<Vec<Exercise>> {
        store::list(&self.conn, store::EXERCISES)
            .context("Failed to list exercises")
            .map_err(Into::into)
    }

    /// Retrieves one catalog exercise by id.
    /// # Errors
    /// Returns `anyhow::Error` wrapping store errors.
    pub fn get_exercise(&self, id: &str) -> Result<Option<Exercise>> {
        store::get(&self.conn, store::EXERCISES, id)
            .with_context(|| format!("Failed to fetch exercise '{id}'"))
            .map_err(Into::into)
    }

    /// Creates or updates a catalog exercise. A provided `media_upload`
    /// file is stored and its URL recorded; saving with an empty media URL
    /// and no upload removes any stored media.
    /// # Errors
    /// Returns `anyhow::Error` if validation fails or the store/media write
    /// fails.
    pub fn save_exercise(
        &self,
        mut exercise: Exercise,
        media_upload: Option<&Path>,
    ) -> Result<Exercise> {
        if let Err(errors) = exercise.validate() {
            bail!(first_validation_message(&errors));
        }

        let id = exercise
            .id
            .clone()
            .unwrap_or_else(store::new_document_id);
        exercise.id = Some(id.clone());

        if let Some(source) = media_upload {
            exercise.media_url = self
                .media
                .upload(&[store::EXERCISES, &id], source)
                .with_context(|| format!("Failed to store media for exercise '{id}'"))?;
        } else if exercise.media_url.is_empty() {
            self.media
                .delete(&[store::EXERCISES, &id])
                .with_context(|| format!("Failed to remove media for exercise '{id}'"))?;
        }

        store::set_merge(&self.conn, store::EXERCISES, &id, &exercise)
            .with_context(|| format!("Failed to save exercise '{}'", exercise.name))?;
        tracing::info!(exercise = %id, "saved exercise");
        Ok(exercise)
    }

    /// Deletes a catalog exercise and its stored media. Plan entries that
    /// still reference it resolve to "not found" from then on.
    /// # Errors
    /// Returns `anyhow::Error` wrapping store/media errors.
    pub fn delete_exercise(&self, id: &str) -> Result<()> {
        store::delete(&self.conn, store::EXERCISES, id)
            .with_context(|| format!("Failed to delete exercise '{id}'"))?;
        self.media
            .delete(&[store::EXERCISES, id])
            .with_context(|| format!("Failed to remove media for exercise '{id}'"))?;
        tracing::info!(exercise = %id, "deleted exercise");
        Ok(())
    }

    // --- Students ---

    /// Creates or updates a student. A new student with an e-mail that is
    /// already registered is rejected before any write; re-saving a student
    /// with its own e-mail passes.
    /// # Errors
    /// Returns `anyhow::Error` if validation or the uniqueness check fails.
    pub fn save_student(&self, mut student: Student) -> Result<Student> {
        if let Err(errors) = student.validate() {
            bail!(first_validation_message(&errors));
        }

        let same_email: Vec<Student> =
            store::find_by_field(&self.conn, store::STUDENTS, "email", &student.email)
                .context("Failed to check e-mail uniqueness")?;
        let taken = same_email.iter().any(|other| other.id != student.id);
        if taken {
            bail!(
                "A student with e-mail '{}' is already registered.",
                student.email
            );
        }

        let id = student.id.clone().unwrap_or_else(store::new_document_id);
        student.id = Some(id.clone());
        store::set_merge(&self.conn, store::STUDENTS, &id, &student)
            .with_context(|| format!("Failed to save student '{}'", student.name))?;
        tracing::info!(student = %id, "saved student");
        Ok(student)
    }

    /// Retrieves one student by id.
    /// # Errors
    /// Returns `anyhow::Error` wrapping store errors.
    pub fn get_student(&self, id: &str) -> Result<Option<Student>> {
        store::get(&self.conn, store::STUDENTS, id)
            .with_context(|| format!("Failed to fetch student '{id}'"))
            .map_err(Into::into)
    }

    /// Prefix search over student names with cursor pagination. An empty
    /// prefix pages through every student.
    /// # Errors
    /// Returns `anyhow::Error` wrapping store errors.
    pub fn search_students(
        &self,
        prefix: &str,
        limit: u32,
        after: Option<&PageCursor>,
    ) -> Result<Page<Student>> {
        store::query_prefix(&self.conn, store::STUDENTS, "name", prefix, limit, after)
            .context("Failed to search students")
            .map_err(Into::into)
    }

    /// Looks a student up by exact e-mail (the student login key).
    /// # Errors
    /// Returns `anyhow::Error` wrapping store errors.
    pub fn find_student_by_email(&self, email: &str) -> Result<Option<Student>> {
        let mut matches: Vec<Student> =
            store::find_by_field(&self.conn, store::STUDENTS, "email", email)
                .with_context(|| format!("Failed to look up student '{email}'"))?;
        Ok(if matches.is_empty() {
            None
        } else {
            Some(matches.remove(0))
        })
    }

    /// Deletes a student and every workout in its sub-collection. The
    /// deletes are independent; there is no all-or-nothing guarantee.
    /// # Errors
    /// Returns `anyhow::Error` wrapping store errors.
    pub fn delete_student(&self, id: &str) -> Result<()> {
        let workouts_collection = store::student_workouts(id);
        let workout_ids = store::list_ids(&self.conn, &workouts_collection)
            .with_context(|| format!("Failed to list workouts of student '{id}'"))?;
        for workout_id in &workout_ids {
            store::delete(&self.conn, &workouts_collection, workout_id)
                .with_context(|| format!("Failed to delete workout '{workout_id}'"))?;
        }
        store::delete(&self.conn, store::STUDENTS, id)
            .with_context(|| format!("Failed to delete student '{id}'"))?;
        tracing::info!(student = %id, workouts = workout_ids.len(), "deleted student");
        Ok(())
    }

    // --- Workouts ---

    /// Lists the workouts of one student.
    /// # Errors
    /// Returns `anyhow::Error` wrapping store errors.
    pub fn list_workouts(&self, student_id: &str) -> Result<Vec<Workout>> {
        store::list(&self.conn, &store::student_workouts(student_id))
            .with_context(|| format!("Failed to list workouts of student '{student_id}'"))
            .map_err(Into::into)
    }

    /// Retrieves one workout of a student.
    /// # Errors
    /// Returns `anyhow::Error` wrapping store errors.
    pub fn get_workout(&self, student_id: &str, workout_id: &str) -> Result<Option<Workout>> {
        store::get(&self.conn, &store::student_workouts(student_id), workout_id)
            .with_context(|| format!("Failed to fetch workout '{workout_id}'"))
            .map_err(Into::into)
    }

    /// The single persisting write of the authoring workflow: validates the
    /// draft, generates an id when it carries none, and upserts (merge)
    /// under the student's workout sub-collection.
    /// # Errors
    /// Returns `anyhow::Error` if draft validation or the store write fails.
    pub fn save_workout(&self, student_id: &str, draft: &WorkoutDraft) -> Result<Workout> {
        let mut workout = draft.finish()?;
        let id = workout.id.clone().unwrap_or_else(store::new_document_id);
        workout.id = Some(id.clone());
        store::set_merge(
            &self.conn,
            &store::student_workouts(student_id),
            &id,
            &workout,
        )
        .with_context(|| format!("Failed to save workout '{}'", workout.name))?;
        tracing::info!(student = %student_id, workout = %id, "saved workout");
        Ok(workout)
    }

    /// Deletes one workout of a student.
    /// # Errors
    /// Returns `anyhow::Error` wrapping store errors.
    pub fn delete_workout(&self, student_id: &str, workout_id: &str) -> Result<()> {
        store::delete(&self.conn, &store::student_workouts(student_id), workout_id)
            .with_context(|| format!("Failed to delete workout '{workout_id}'"))?;
        tracing::info!(student = %student_id, workout = %workout_id, "deleted workout");
        Ok(())
    }

    // --- Authentication & sessions ---

    /// Registers a new administrator.
    /// # Errors
    /// Returns `AuthError` variants on invalid input or a taken e-mail.
    pub fn register_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Administrator, AuthError> {
        auth::register_admin(&self.conn, name, email, password)
    }

    /// Signs an administrator in and persists the session.
    /// # Errors
    /// Returns `AuthError::InvalidCredentials` on a wrong e-mail/password.
    pub fn sign_in_admin(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        auth::sign_in_admin(&self.conn, &self.session_path, email, password)
    }

    /// Signs a student in by e-mail lookup and persists the session.
    /// # Errors
    /// Returns `AuthError::StudentNotFound` when no student has the e-mail.
    pub fn sign_in_student(&self, email: &str) -> Result<Session, AuthError> {
        auth::sign_in_student(&self.conn, &self.session_path, email)
    }

    /// Reads the persisted session, if any.
    /// # Errors
    /// Returns `AuthError` variants on an unreadable session file.
    pub fn current_session(&self) -> Result<Option<Session>, AuthError> {
        auth::load_session(&self.session_path)
    }

    /// Clears the persisted session.
    /// # Errors
    /// Returns `AuthError` variants if the file cannot be removed.
    pub fn sign_out(&self) -> Result<(), AuthError> {
        auth::clear_session(&self.session_path)
    }

    /// Issues a one-time password-reset token for an administrator.
    /// # Errors
    /// Returns `AuthError::AdminNotFound` for an unknown e-mail.
    pub fn request_password_reset(&self, email: &str) -> Result<String, AuthError> {
        auth::request_password_reset(&self.conn, email)
    }

    /// Consumes a reset token and sets a new password.
    /// # Errors
    /// Returns `AuthError::InvalidResetToken` for unknown or used tokens.
    pub fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        auth::reset_password(&self.conn, token, new_password)
    }

    /// Changes the signed-in administrator's e-mail everywhere it appears.
    /// # Errors
    /// Returns `AuthError` variants when not signed in as an administrator.
    pub fn change_admin_email(&self, new_email: &str) -> Result<Session, AuthError> {
        auth::change_admin_email(&self.conn, &self.session_path, new_email)
    }

    /// Deletes the signed-in administrator's account; refused while it is
    /// the only one.
    /// # Errors
    /// Returns `AuthError::LastAdministrator` for the last account.
    pub fn delete_admin_account(&self) -> Result<(), AuthError> {
        auth::delete_admin_account(&self.conn, &self.session_path)
    }

    /// Lists all administrators.
    /// # Errors
    /// Returns `anyhow::Error` wrapping store errors.
    pub fn list_admins(&self) -> Result<Vec<Administrator>> {
        store::list(&self.conn, store::ADMINISTRATORS)
            .context("Failed to list administrators")
            .map_err(Into::into)
    }
}

// --- Helper Functions ---

/// Pairs each entry of a block with its catalog exercise via an id-keyed
/// lookup. Dangling references come back with `exercise: None`.
pub fn resolve_block(block: &Block, catalog: &[Exercise]) -> Vec<ResolvedExercise> {
    let by_id: HashMap<&str, &Exercise> = catalog
        .iter()
        .filter_map(|exercise| exercise.id.as_deref().map(|id| (id, exercise)))
        .collect();

    block
        .exercises
        .iter()
        .map(|entry| ResolvedExercise {
            entry: entry.clone(),
            exercise: by_id.get(entry.exercise_id.as_str()).map(|e| (*e).clone()),
        })
        .collect()
}
