use anyhow::Result;
use coach_desk_lib::{
    resolve_block, store, AppService, Block, BlockDraft, Config, DraftError, Exercise,
    ExerciseInPlan, ExercisePicker, MediaStore, Session, Student, Weekday, WorkoutDraft,
};
use rusqlite::Connection;
use std::path::PathBuf;

// Helper function to create a test service with an in-memory document store
fn create_test_service() -> Result<AppService> {
    let conn = Connection::open_in_memory()?;
    store::init_db(&conn)?;

    // Scratch directory for media and the session file
    let test_root =
        std::env::temp_dir().join(format!("coach-desk-test-{}", store::new_document_id()));
    std::fs::create_dir_all(&test_root)?;
    let media = MediaStore::new(test_root.join("media"))?;

    Ok(AppService {
        config: Config::default(),
        conn,
        media,
        db_path: PathBuf::from(":memory:"),
        config_path: test_root.join("config.toml"),
        session_path: test_root.join("session.json"),
    })
}

fn sample_student(name: &str, email: &str) -> Student {
    Student {
        id: None,
        name: name.to_string(),
        email: email.to_string(),
        goal: "General conditioning".to_string(),
        physical_limitation: String::new(),
        notes: String::new(),
    }
}

fn sample_exercise(name: &str) -> Exercise {
    Exercise {
        id: None,
        name: name.to_string(),
        muscle_groups: "chest".to_string(),
        description: String::new(),
        media_url: String::new(),
    }
}

fn sample_draft() -> WorkoutDraft {
    WorkoutDraft {
        id: None,
        name: "Workout A".to_string(),
        goal: "Hypertrophy".to_string(),
        weekdays: vec![Weekday::Monday, Weekday::Thursday],
        blocks: vec![Block {
            name: "Block A".to_string(),
            muscle_groups: "chest, triceps".to_string(),
            notes: "Rest 90s".to_string(),
            exercises: vec![ExerciseInPlan {
                exercise_id: "ex-1".to_string(),
                sets: 3,
                reps: 12,
            }],
        }],
    }
}

#[test]
fn test_save_student_assigns_id_and_round_trips() -> Result<()> {
    let service = create_test_service()?;

    let saved = service.save_student(sample_student("Ana Souza", "ana@example.com"))?;
    let id = saved.id.clone().expect("id assigned on first save");

    let fetched = service.get_student(&id)?.expect("student persisted");
    assert_eq!(fetched, saved);
    Ok(())
}

#[test]
fn test_duplicate_email_rejected_without_write() -> Result<()> {
    let service = create_test_service()?;
    service.save_student(sample_student("Ana Souza", "ana@example.com"))?;

    let result = service.save_student(sample_student("Another Ana", "ana@example.com"));
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("already registered"));

    // The rejected save must not have written anything
    assert_eq!(store::count(&service.conn, store::STUDENTS)?, 1);
    Ok(())
}

#[test]
fn test_edit_student_keeps_own_email() -> Result<()> {
    let service = create_test_service()?;
    let saved = service.save_student(sample_student("Ana Souza", "ana@example.com"))?;

    // Re-saving the same student without changing the e-mail succeeds
    let mut edited = saved.clone();
    edited.goal = "Strength".to_string();
    let edited = service.save_student(edited)?;
    assert_eq!(edited.id, saved.id);
    assert_eq!(store::count(&service.conn, store::STUDENTS)?, 1);
    Ok(())
}

#[test]
fn test_edit_student_cannot_take_other_email() -> Result<()> {
    let service = create_test_service()?;
    service.save_student(sample_student("Ana Souza", "ana@example.com"))?;
    let bruno = service.save_student(sample_student("Bruno Lima", "bruno@example.com"))?;

    let mut edited = bruno;
    edited.email = "ana@example.com".to_string();
    assert!(service.save_student(edited).is_err());
    Ok(())
}

#[test]
fn test_student_validation() -> Result<()> {
    let service = create_test_service()?;

    let result = service.save_student(sample_student("Al", "al@example.com"));
    assert!(result.unwrap_err().to_string().contains("at least 3"));

    let result = service.save_student(sample_student("Alice Dias", "not-an-email"));
    assert!(result.unwrap_err().to_string().contains("e-mail"));
    Ok(())
}

#[test]
fn test_search_students_prefix_and_pagination() -> Result<()> {
    let service = create_test_service()?;
    service.save_student(sample_student("Ana Souza", "ana@example.com"))?;
    service.save_student(sample_student("Anabel Reis", "anabel@example.com"))?;
    service.save_student(sample_student("Bruno Lima", "bruno@example.com"))?;

    let page = service.search_students("Ana", 10, None)?;
    assert_eq!(page.items.len(), 2);
    assert!(page.next.is_none());

    // One at a time, resuming after the cursor
    let first = service.search_students("Ana", 1, None)?;
    assert_eq!(first.items.len(), 1);
    assert_eq!(first.items[0].name, "Ana Souza");
    let cursor = first.next.expect("full page yields a cursor");

    let second = service.search_students("Ana", 1, Some(&cursor))?;
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].name, "Anabel Reis");
    Ok(())
}

#[test]
fn test_search_is_prefix_not_substring() -> Result<()> {
    let service = create_test_service()?;
    service.save_student(sample_student("Ana Souza", "ana@example.com"))?;

    let page = service.search_students("na", 10, None)?;
    assert!(page.items.is_empty());
    Ok(())
}

#[test]
fn test_save_workout_generates_single_id_and_round_trips() -> Result<()> {
    let service = create_test_service()?;
    let student = service.save_student(sample_student("Ana Souza", "ana@example.com"))?;
    let student_id = student.id.unwrap();

    let saved = service.save_workout(&student_id, &sample_draft())?;
    let workout_id = saved.id.clone().expect("id assigned on first save");

    let listed = service.list_workouts(&student_id)?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id.as_deref(), Some(workout_id.as_str()));
    assert_eq!(listed[0].blocks, saved.blocks);
    assert_eq!(listed[0].weekdays, saved.weekdays);
    Ok(())
}

#[test]
fn test_save_workout_with_id_merges_in_place() -> Result<()> {
    let service = create_test_service()?;
    let student = service.save_student(sample_student("Ana Souza", "ana@example.com"))?;
    let student_id = student.id.unwrap();

    let saved = service.save_workout(&student_id, &sample_draft())?;
    let workout_id = saved.id.clone().unwrap();

    // Merge semantics: a field this application never writes survives a re-save
    let collection = store::student_workouts(&student_id);
    store::set_merge(
        &service.conn,
        &collection,
        &workout_id,
        &serde_json::json!({ "coach_comment": "keep elbows in" }),
    )?;

    let mut draft = WorkoutDraft::from_workout(&saved);
    draft.name = "Workout A (revised)".to_string();
    let resaved = service.save_workout(&student_id, &draft)?;
    assert_eq!(resaved.id, saved.id);

    assert_eq!(service.list_workouts(&student_id)?.len(), 1);
    let raw: serde_json::Value = store::get(&service.conn, &collection, &workout_id)?.unwrap();
    assert_eq!(raw["name"], "Workout A (revised)");
    assert_eq!(raw["coach_comment"], "keep elbows in");
    Ok(())
}

#[test]
fn test_positional_edit_replaces_only_target() -> Result<()> {
    let mut block = BlockDraft {
        name: "Block A".to_string(),
        muscle_groups: "back".to_string(),
        ..Default::default()
    };
    for i in 0..4u32 {
        block.exercises.push(ExerciseInPlan {
            exercise_id: format!("ex-{i}"),
            sets: 3,
            reps: 10 + i,
        });
    }
    let before = block.exercises.clone();

    let mut picker = ExercisePicker::open_at(&block.exercises, 2)?;
    assert_eq!(picker.selected_exercise_id, "ex-2");
    assert_eq!(picker.reps, 12);
    picker.reps = 20;
    block.apply_picker(&picker)?;

    assert_eq!(block.exercises.len(), 4);
    assert_eq!(block.exercises[2].reps, 20);
    for i in [0usize, 1, 3] {
        assert_eq!(block.exercises[i], before[i]);
    }
    Ok(())
}

#[test]
fn test_positional_delete_shifts_down() -> Result<()> {
    let mut block = BlockDraft::default();
    for i in 0..4 {
        block.exercises.push(ExerciseInPlan {
            exercise_id: format!("ex-{i}"),
            sets: 3,
            reps: 10,
        });
    }

    block.remove_exercise(1)?;
    assert_eq!(block.exercises.len(), 3);
    assert_eq!(block.exercises[0].exercise_id, "ex-0");
    assert_eq!(block.exercises[1].exercise_id, "ex-2");
    assert_eq!(block.exercises[2].exercise_id, "ex-3");

    assert_eq!(
        block.remove_exercise(3),
        Err(DraftError::PositionOutOfRange(3))
    );
    Ok(())
}

#[test]
fn test_picker_requires_selection() {
    let picker = ExercisePicker::open();
    assert_eq!(picker.confirm(), Err(DraftError::NoExerciseSelected));
}

#[test]
fn test_block_finish_requires_fields() {
    let mut draft = BlockDraft {
        muscle_groups: "legs".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        draft.finish(),
        Err(DraftError::MissingField("Block name"))
    ));
    draft.name = "Block B".to_string();
    draft.muscle_groups.clear();
    assert!(matches!(
        draft.finish(),
        Err(DraftError::MissingField("Muscle groups"))
    ));
}

#[test]
fn test_workout_finish_requires_all_fields() {
    // Unlike the loosest possible reading, every required field must be set
    let mut draft = sample_draft();
    draft.weekdays.clear();
    assert!(matches!(
        draft.finish(),
        Err(DraftError::MissingField("Weekday selection"))
    ));

    let mut draft = sample_draft();
    draft.name = "Ab".to_string();
    assert!(matches!(
        draft.finish(),
        Err(DraftError::NameTooShort("Workout name"))
    ));

    let mut draft = sample_draft();
    draft.blocks.clear();
    assert!(matches!(
        draft.finish(),
        Err(DraftError::MissingField("Block list"))
    ));

    assert!(sample_draft().finish().is_ok());
}

#[test]
fn test_resolve_block_tolerates_dangling_reference() -> Result<()> {
    let service = create_test_service()?;
    let bench = service.save_exercise(sample_exercise("Bench Press"), None)?;
    let bench_id = bench.id.clone().unwrap();

    let block = Block {
        name: "Block A".to_string(),
        muscle_groups: "chest".to_string(),
        notes: String::new(),
        exercises: vec![
            ExerciseInPlan {
                exercise_id: bench_id.clone(),
                sets: 3,
                reps: 10,
            },
            ExerciseInPlan {
                exercise_id: "deleted-long-ago".to_string(),
                sets: 4,
                reps: 8,
            },
        ],
    };

    let catalog = service.list_exercises()?;
    let resolved = resolve_block(&block, &catalog);
    assert_eq!(resolved.len(), 2);
    assert_eq!(
        resolved[0].exercise.as_ref().map(|e| e.name.as_str()),
        Some("Bench Press")
    );
    assert!(resolved[1].exercise.is_none());
    assert_eq!(resolved[1].entry.sets, 4);
    Ok(())
}

#[test]
fn test_delete_student_removes_workout_subcollection() -> Result<()> {
    let service = create_test_service()?;
    let student = service.save_student(sample_student("Ana Souza", "ana@example.com"))?;
    let student_id = student.id.unwrap();

    service.save_workout(&student_id, &sample_draft())?;
    let mut second = sample_draft();
    second.name = "Workout B".to_string();
    service.save_workout(&student_id, &second)?;
    assert_eq!(service.list_workouts(&student_id)?.len(), 2);

    service.delete_student(&student_id)?;
    assert!(service.get_student(&student_id)?.is_none());
    assert!(service.list_workouts(&student_id)?.is_empty());
    Ok(())
}

#[test]
fn test_set_merge_preserves_absent_fields() -> Result<()> {
    let service = create_test_service()?;
    store::set_merge(
        &service.conn,
        "scratch",
        "doc-1",
        &serde_json::json!({ "a": 1, "b": "keep" }),
    )?;
    store::set_merge(
        &service.conn,
        "scratch",
        "doc-1",
        &serde_json::json!({ "a": 2 }),
    )?;

    let raw: serde_json::Value = store::get(&service.conn, "scratch", "doc-1")?.unwrap();
    assert_eq!(raw["a"], 2);
    assert_eq!(raw["b"], "keep");
    Ok(())
}

#[test]
fn test_admin_register_and_sign_in() -> Result<()> {
    let service = create_test_service()?;
    service.register_admin("Carla Mota", "carla@example.com", "secret1")?;

    assert!(service.sign_in_admin("carla@example.com", "wrong-pass").is_err());

    let session = service.sign_in_admin("carla@example.com", "secret1")?;
    assert!(session.is_administrator());

    // The session survives as the persisted current session
    let current = service.current_session()?.expect("session persisted");
    assert_eq!(current, session);

    service.sign_out()?;
    assert!(service.current_session()?.is_none());
    Ok(())
}

#[test]
fn test_register_admin_rejects_taken_email() -> Result<()> {
    let service = create_test_service()?;
    service.register_admin("Carla Mota", "carla@example.com", "secret1")?;
    let result = service.register_admin("Carla Clone", "carla@example.com", "secret2");
    assert!(result.unwrap_err().to_string().contains("already registered"));
    Ok(())
}

#[test]
fn test_last_admin_delete_refused() -> Result<()> {
    let service = create_test_service()?;
    service.register_admin("Carla Mota", "carla@example.com", "secret1")?;
    service.sign_in_admin("carla@example.com", "secret1")?;

    let result = service.delete_admin_account();
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("only registered administrator"));

    service.register_admin("Diego Reis", "diego@example.com", "secret2")?;
    service.delete_admin_account()?;
    assert_eq!(service.list_admins()?.len(), 1);
    assert!(service.current_session()?.is_none());
    Ok(())
}

#[test]
fn test_password_reset_token_single_use() -> Result<()> {
    let service = create_test_service()?;
    service.register_admin("Carla Mota", "carla@example.com", "secret1")?;

    assert!(service.request_password_reset("nobody@example.com").is_err());

    let token = service.request_password_reset("carla@example.com")?;
    service.reset_password(&token, "fresh-secret")?;

    assert!(service.sign_in_admin("carla@example.com", "secret1").is_err());
    assert!(service
        .sign_in_admin("carla@example.com", "fresh-secret")
        .is_ok());

    // Consumed tokens are gone
    assert!(service.reset_password(&token, "another-one").is_err());
    Ok(())
}

#[test]
fn test_student_sign_in_by_email() -> Result<()> {
    let service = create_test_service()?;
    let student = service.save_student(sample_student("Ana Souza", "ana@example.com"))?;

    let result = service.sign_in_student("ghost@example.com");
    assert!(result.unwrap_err().to_string().contains("No student"));

    let session = service.sign_in_student("ana@example.com")?;
    match &session {
        Session::Student { id, .. } => assert_eq!(Some(id.clone()), student.id),
        Session::Administrator { .. } => panic!("expected a student session"),
    }
    Ok(())
}

#[test]
fn test_change_admin_email_updates_sign_in() -> Result<()> {
    let service = create_test_service()?;
    service.register_admin("Carla Mota", "carla@example.com", "secret1")?;
    service.sign_in_admin("carla@example.com", "secret1")?;

    service.change_admin_email("nova@example.com")?;
    assert!(service.sign_in_admin("carla@example.com", "secret1").is_err());
    assert!(service.sign_in_admin("nova@example.com", "secret1").is_ok());
    Ok(())
}

#[test]
fn test_exercise_media_upload_and_delete() -> Result<()> {
    let service = create_test_service()?;

    // Fake GIF to upload
    let source = std::env::temp_dir().join(format!("demo-{}.gif", store::new_document_id()));
    std::fs::write(&source, b"GIF89a")?;

    let saved = service.save_exercise(sample_exercise("Bench Press"), Some(&source))?;
    assert!(saved.media_url.starts_with("file://"));
    let id = saved.id.clone().unwrap();
    assert!(service.media.download_url(&[store::EXERCISES, &id]).is_some());

    // Saving with a cleared URL and no upload removes the stored object
    let mut cleared = saved.clone();
    cleared.media_url = String::new();
    service.save_exercise(cleared, None)?;
    assert!(service.media.download_url(&[store::EXERCISES, &id]).is_none());

    service.delete_exercise(&id)?;
    assert!(service.get_exercise(&id)?.is_none());

    std::fs::remove_file(source).ok();
    Ok(())
}

#[test]
fn test_exercise_validation() -> Result<()> {
    let service = create_test_service()?;

    let result = service.save_exercise(sample_exercise("Ab"), None);
    assert!(result.unwrap_err().to_string().contains("at least 3"));

    let mut no_muscles = sample_exercise("Bench Press");
    no_muscles.muscle_groups.clear();
    let result = service.save_exercise(no_muscles, None);
    assert!(result.unwrap_err().to_string().contains("Muscle groups"));
    Ok(())
}
