// coach-desk-cli/src/cli.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "coach",
    author,
    version,
    about = "Training-center management from the terminal",
    long_about = "Manage students, the exercise catalog, workouts and administrators of a training center."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage students
    Student {
        #[command(subcommand)]
        command: StudentCommands,
    },
    /// Manage the exercise catalog
    Exercise {
        #[command(subcommand)]
        command: ExerciseCommands,
    },
    /// Inspect workouts of a student
    Workout {
        #[command(subcommand)]
        command: WorkoutCommands,
    },
    /// Manage administrator accounts
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
    /// Adjust application configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum StudentCommands {
    /// List students, optionally filtered by a name prefix
    List {
        /// Name prefix to search for (prefix match, not substring)
        #[arg(long)]
        search: Option<String>,
        /// Maximum number of students to fetch
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Register a new student
    Add {
        name: String,
        /// Unique across all students; the student's login key
        email: String,
        goal: String,
        /// Description of a physical limitation, when the student has one
        #[arg(long)]
        limitation: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a student and every workout assigned to them
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum ExerciseCommands {
    /// List the full catalog
    List,
    /// Register a new catalog exercise
    Add {
        name: String,
        /// Muscle groups the exercise works
        muscles: String,
        #[arg(long)]
        description: Option<String>,
        /// Path of a demonstration GIF to store
        #[arg(long)]
        media: Option<PathBuf>,
    },
    /// Delete a catalog exercise (and its stored media)
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum WorkoutCommands {
    /// List the workouts of a student
    List { student_id: String },
    /// Show one workout with its blocks and exercises
    Show {
        student_id: String,
        workout_id: String,
    },
    /// Delete one workout of a student
    Delete {
        student_id: String,
        workout_id: String,
    },
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Register an administrator account
    Register {
        name: String,
        email: String,
        password: String,
    },
    /// List administrator accounts
    List,
    /// Sign in and persist the session
    Login { email: String, password: String },
    /// Clear the persisted session
    Logout,
    /// Change the signed-in administrator's e-mail
    ChangeEmail { email: String },
    /// Delete the signed-in administrator's account (refused for the last one)
    DeleteAccount,
    /// Issue a password-reset token for an administrator
    RequestReset { email: String },
    /// Consume a reset token and set a new password
    ResetPassword { token: String, password: String },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file contents and location
    Show,
    /// Set how many students are fetched per page
    PageSize { size: u32 },
    /// Set whether the student viewer starts in data-saver mode
    DataSaver {
        #[arg(value_parser = clap::builder::BoolishValueParser::new())]
        enabled: bool,
    },
}
