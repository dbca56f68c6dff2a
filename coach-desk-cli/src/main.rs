// coach-desk-cli/src/main.rs
use anyhow::{bail, Result};
use clap::Parser;
use coach_desk_lib::{resolve_block, AppService, Exercise, Student};
use comfy_table::{presets::UTF8_FULL, Cell, Table};

mod cli;
use cli::{
    AdminCommands, Cli, Commands, ConfigCommands, ExerciseCommands, StudentCommands,
    WorkoutCommands,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut service = AppService::initialize()?;

    match cli.command {
        Commands::Student { command } => handle_student(&service, command),
        Commands::Exercise { command } => handle_exercise(&service, command),
        Commands::Workout { command } => handle_workout(&service, command),
        Commands::Admin { command } => handle_admin(&service, command),
        Commands::Config { command } => handle_config(&mut service, command),
    }
}

fn handle_student(service: &AppService, command: StudentCommands) -> Result<()> {
    match command {
        StudentCommands::List { search, limit } => {
            let prefix = search.unwrap_or_default();
            let limit = limit.unwrap_or(service.config.page_size);

            // Page through every result up front; the TUI is the place for
            // interactive "show more"
            let mut students = Vec::new();
            let mut cursor = None;
            loop {
                let page = service.search_students(&prefix, limit, cursor.as_ref())?;
                students.extend(page.items);
                match page.next {
                    Some(next) => cursor = Some(next),
                    None => break,
                }
            }

            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["ID", "Name", "E-mail", "Goal", "Limitation"]);
            for student in &students {
                table.add_row(vec![
                    Cell::new(student.id.as_deref().unwrap_or("-")),
                    Cell::new(&student.name),
                    Cell::new(&student.email),
                    Cell::new(&student.goal),
                    Cell::new(if student.physical_limitation.is_empty() {
                        "-"
                    } else {
                        student.physical_limitation.as_str()
                    }),
                ]);
            }
            println!("{table}");
            println!("{} student(s)", students.len());
        }
        StudentCommands::Add {
            name,
            email,
            goal,
            limitation,
            notes,
        } => {
            let saved = service.save_student(Student {
                id: None,
                name,
                email,
                goal,
                physical_limitation: limitation.unwrap_or_default(),
                notes: notes.unwrap_or_default(),
            })?;
            println!(
                "Registered student '{}' (ID: {})",
                saved.name,
                saved.id.unwrap_or_default()
            );
        }
        StudentCommands::Delete { id } => {
            if service.get_student(&id)?.is_none() {
                bail!("No student with ID '{id}'");
            }
            service.delete_student(&id)?;
            println!("Deleted student {id} and their workouts");
        }
    }
    Ok(())
}

fn handle_exercise(service: &AppService, command: ExerciseCommands) -> Result<()> {
    match command {
        ExerciseCommands::List => {
            let exercises = service.list_exercises()?;
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["ID", "Name", "Muscle groups", "Media"]);
            for exercise in &exercises {
                table.add_row(vec![
                    Cell::new(exercise.id.as_deref().unwrap_or("-")),
                    Cell::new(&exercise.name),
                    Cell::new(&exercise.muscle_groups),
                    Cell::new(if exercise.media_url.is_empty() {
                        "-"
                    } else {
                        exercise.media_url.as_str()
                    }),
                ]);
            }
            println!("{table}");
            println!("{} exercise(s)", exercises.len());
        }
        ExerciseCommands::Add {
            name,
            muscles,
            description,
            media,
        } => {
            let saved = service.save_exercise(
                Exercise {
                    id: None,
                    name,
                    muscle_groups: muscles,
                    description: description.unwrap_or_default(),
                    media_url: String::new(),
                },
                media.as_deref(),
            )?;
            println!(
                "Registered exercise '{}' (ID: {})",
                saved.name,
                saved.id.unwrap_or_default()
            );
        }
        ExerciseCommands::Delete { id } => {
            if service.get_exercise(&id)?.is_none() {
                bail!("No exercise with ID '{id}'");
            }
            service.delete_exercise(&id)?;
            println!("Deleted exercise {id}");
        }
    }
    Ok(())
}

fn handle_workout(service: &AppService, command: WorkoutCommands) -> Result<()> {
    match command {
        WorkoutCommands::List { student_id } => {
            let workouts = service.list_workouts(&student_id)?;
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["ID", "Name", "Goal", "Weekdays", "Blocks"]);
            for workout in &workouts {
                let days: Vec<String> =
                    workout.weekdays.iter().map(|d| d.to_string()).collect();
                table.add_row(vec![
                    Cell::new(workout.id.as_deref().unwrap_or("-")),
                    Cell::new(&workout.name),
                    Cell::new(&workout.goal),
                    Cell::new(days.join(", ")),
                    Cell::new(workout.blocks.len()),
                ]);
            }
            println!("{table}");
        }
        WorkoutCommands::Show {
            student_id,
            workout_id,
        } => {
            let Some(workout) = service.get_workout(&student_id, &workout_id)? else {
                bail!("No workout with ID '{workout_id}' for student '{student_id}'");
            };
            let catalog = service.list_exercises()?;

            println!("{} - {}", workout.name, workout.goal);
            let days: Vec<String> = workout.weekdays.iter().map(|d| d.to_string()).collect();
            println!("Weekdays: {}", days.join(", "));

            for (index, block) in workout.blocks.iter().enumerate() {
                println!();
                println!(
                    "Block {} - {} ({})",
                    index + 1,
                    block.name,
                    block.muscle_groups
                );
                if !block.notes.is_empty() {
                    println!("  Notes: {}", block.notes);
                }
                let mut table = Table::new();
                table.load_preset(UTF8_FULL);
                table.set_header(vec!["Exercise", "Sets", "Reps"]);
                for resolved in resolve_block(block, &catalog) {
                    let name = resolved
                        .exercise
                        .map(|e| e.name)
                        .unwrap_or_else(|| "Not found".to_string());
                    table.add_row(vec![
                        Cell::new(name),
                        Cell::new(resolved.entry.sets),
                        Cell::new(resolved.entry.reps),
                    ]);
                }
                println!("{table}");
            }
        }
        WorkoutCommands::Delete {
            student_id,
            workout_id,
        } => {
            service.delete_workout(&student_id, &workout_id)?;
            println!("Deleted workout {workout_id}");
        }
    }
    Ok(())
}

fn handle_admin(service: &AppService, command: AdminCommands) -> Result<()> {
    match command {
        AdminCommands::Register {
            name,
            email,
            password,
        } => {
            let admin = service.register_admin(&name, &email, &password)?;
            println!(
                "Registered administrator '{}' (ID: {})",
                admin.name,
                admin.id.unwrap_or_default()
            );
        }
        AdminCommands::List => {
            let admins = service.list_admins()?;
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec!["ID", "Name", "E-mail"]);
            for admin in &admins {
                table.add_row(vec![
                    Cell::new(admin.id.as_deref().unwrap_or("-")),
                    Cell::new(&admin.name),
                    Cell::new(&admin.email),
                ]);
            }
            println!("{table}");
        }
        AdminCommands::Login { email, password } => {
            service.sign_in_admin(&email, &password)?;
            println!("Signed in as {email}");
        }
        AdminCommands::Logout => {
            service.sign_out()?;
            println!("Signed out");
        }
        AdminCommands::ChangeEmail { email } => {
            service.change_admin_email(&email)?;
            println!("E-mail changed to {email}; use it the next time you sign in");
        }
        AdminCommands::DeleteAccount => {
            service.delete_admin_account()?;
            println!("Account deleted");
        }
        AdminCommands::RequestReset { email } => {
            let token = service.request_password_reset(&email)?;
            println!("Reset token for {email}: {token}");
        }
        AdminCommands::ResetPassword { token, password } => {
            service.reset_password(&token, &password)?;
            println!("Password updated");
        }
    }
    Ok(())
}

fn handle_config(service: &mut AppService, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            println!("Config file: {}", service.get_config_path().display());
            println!("page_size = {}", service.config.page_size);
            println!(
                "low_bandwidth_default = {}",
                service.config.low_bandwidth_default
            );
            println!("theme.header_color = {}", service.config.theme.header_color);
        }
        ConfigCommands::PageSize { size } => {
            service.set_page_size(size)?;
            println!("Page size set to {size}");
        }
        ConfigCommands::DataSaver { enabled } => {
            service.set_low_bandwidth_default(enabled)?;
            println!(
                "Student viewer will start with data saver {}",
                if enabled { "on" } else { "off" }
            );
        }
    }
    Ok(())
}
