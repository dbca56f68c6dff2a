//src/store.rs
use rusqlite::{named_params, Connection, OptionalExtension, ToSql};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

// Collection names used across the application. Sub-collections are
// addressed by slash-joined path segments, e.g. students/{id}/workouts.
pub const EXERCISES: &str = "exercises";
pub const STUDENTS: &str = "students";
pub const ADMINISTRATORS: &str = "administrators";
pub const CREDENTIALS: &str = "credentials";
pub const PASSWORD_RESETS: &str = "password_resets";

/// Collection path for one student's workout documents.
pub fn student_workouts(student_id: &str) -> String {
    format!("{STUDENTS}/{student_id}/workouts")
}

// Custom Error type for store operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database connection failed")]
    Connection(#[from] rusqlite::Error),
    #[error("Failed to get application data directory")]
    DataDir,
    #[error("I/O error accessing database file")]
    Io(#[from] std::io::Error),
    #[error("Database query failed: {0}")]
    QueryFailed(rusqlite::Error),
    #[error("Database insert failed: {0}")]
    InsertFailed(rusqlite::Error),
    #[error("Database delete failed: {0}")]
    DeleteFailed(rusqlite::Error),
    #[error("Invalid document body: {0}")]
    BadDocument(#[from] serde_json::Error),
}

/// Cursor into an ordered prefix query; resumes strictly after the row it
/// names. Stale cursors are harmless, they just resume from the old spot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    pub field_value: String,
    pub id: String,
}

/// One page of a prefix query. `next` is present only when the page was
/// full, i.e. there may be more rows.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<PageCursor>,
}

const DB_FILE_NAME: &str = "coach-desk.sqlite";
const DATA_ENV_VAR: &str = "COACH_DESK_DATA_DIR";
const APP_DATA_DIR: &str = "coach-desk";

/// Determines the application data directory (database, media, session).
/// Exposed at crate root as get_data_dir_util
pub fn get_data_dir() -> Result<PathBuf, Error> {
    let dir = match std::env::var(DATA_ENV_VAR) {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => dirs::data_dir().ok_or(Error::DataDir)?.join(APP_DATA_DIR),
    };
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}

/// Gets the path to the SQLite database file within the data directory.
pub fn get_db_path() -> Result<PathBuf, Error> {
    Ok(get_data_dir()?.join(DB_FILE_NAME))
}

/// Opens a connection to the SQLite database.
pub fn open_db<P: AsRef<Path>>(path: P) -> Result<Connection, Error> {
    let conn = Connection::open(path).map_err(Error::Connection)?;
    Ok(conn)
}

/// Initializes the document table if it doesn't exist.
///
/// Documents are stored as JSON bodies keyed by (collection, id); the
/// rowid preserves insertion order for unordered listings.
pub fn init_db(conn: &Connection) -> Result<(), Error> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            body TEXT NOT NULL,
            PRIMARY KEY (collection, id)
        )",
        [],
    )
    .map_err(Error::Connection)?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection)",
        [],
    )
    .map_err(Error::Connection)?;

    Ok(())
}

/// Generates a fresh document identifier (also used for tokens).
pub fn new_document_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn get_raw(conn: &Connection, collection: &str, id: &str) -> Result<Option<Value>, Error> {
    let body: Option<String> = conn
        .query_row(
            "SELECT body FROM documents WHERE collection = :collection AND id = :id",
            named_params! { ":collection": collection, ":id": id },
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::QueryFailed)?;
    body.map(|b| serde_json::from_str(&b).map_err(Error::BadDocument))
        .transpose()
}

/// Fetches one document by id.
pub fn get<T: DeserializeOwned>(
    conn: &Connection,
    collection: &str,
    id: &str,
) -> Result<Option<T>, Error> {
    get_raw(conn, collection, id)?
        .map(|v| serde_json::from_value(v).map_err(Error::BadDocument))
        .transpose()
}

/// Lists every document in a collection, in insertion order.
pub fn list<T: DeserializeOwned>(conn: &Connection, collection: &str) -> Result<Vec<T>, Error> {
    let mut stmt = conn
        .prepare("SELECT body FROM documents WHERE collection = :collection ORDER BY rowid")
        .map_err(Error::QueryFailed)?;
    let rows = stmt
        .query_map(named_params! { ":collection": collection }, |row| {
            row.get::<_, String>(0)
        })
        .map_err(Error::QueryFailed)?;

    let mut items = Vec::new();
    for body in rows {
        let body = body.map_err(Error::QueryFailed)?;
        items.push(serde_json::from_str(&body)?);
    }
    Ok(items)
}

/// Lists the ids of every document in a collection, in insertion order.
pub fn list_ids(conn: &Connection, collection: &str) -> Result<Vec<String>, Error> {
    let mut stmt = conn
        .prepare("SELECT id FROM documents WHERE collection = :collection ORDER BY rowid")
        .map_err(Error::QueryFailed)?;
    let rows = stmt
        .query_map(named_params! { ":collection": collection }, |row| {
            row.get::<_, String>(0)
        })
        .map_err(Error::QueryFailed)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Error::QueryFailed)
}

/// Counts the documents in a collection.
pub fn count(conn: &Connection, collection: &str) -> Result<i64, Error> {
    conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE collection = :collection",
        named_params! { ":collection": collection },
        |row| row.get(0),
    )
    .map_err(Error::QueryFailed)
}

/// Upserts a document with merge semantics: top-level fields present in
/// `value` overwrite, fields absent from it survive on the stored document.
pub fn set_merge<T: Serialize>(
    conn: &Connection,
    collection: &str,
    id: &str,
    value: &T,
) -> Result<(), Error> {
    let new_value = serde_json::to_value(value)?;
    let merged = match get_raw(conn, collection, id)? {
        Some(mut existing) => {
            match (existing.as_object_mut(), new_value.as_object()) {
                (Some(base), Some(patch)) => {
                    for (key, val) in patch {
                        base.insert(key.clone(), val.clone());
                    }
                    existing
                }
                // Non-object bodies replace wholesale.
                _ => new_value,
            }
        }
        None => new_value,
    };

    conn.execute(
        "INSERT INTO documents (collection, id, body) VALUES (:collection, :id, :body)
         ON CONFLICT(collection, id) DO UPDATE SET body = excluded.body",
        named_params! {
            ":collection": collection,
            ":id": id,
            ":body": serde_json::to_string(&merged)?,
        },
    )
    .map_err(Error::InsertFailed)?;
    Ok(())
}

/// Deletes a document. Deleting an absent document is not an error;
/// returns the number of rows removed (0 or 1).
pub fn delete(conn: &Connection, collection: &str, id: &str) -> Result<usize, Error> {
    conn.execute(
        "DELETE FROM documents WHERE collection = :collection AND id = :id",
        named_params! { ":collection": collection, ":id": id },
    )
    .map_err(Error::DeleteFailed)
}

/// Finds documents whose top-level string field equals `value` exactly.
pub fn find_by_field<T: DeserializeOwned>(
    conn: &Connection,
    collection: &str,
    field: &str,
    value: &str,
) -> Result<Vec<T>, Error> {
    let field_path = format!("$.{field}");
    let mut stmt = conn
        .prepare(
            "SELECT body FROM documents
             WHERE collection = :collection AND json_extract(body, :field) = :value
             ORDER BY rowid",
        )
        .map_err(Error::QueryFailed)?;
    let rows = stmt
        .query_map(
            named_params! { ":collection": collection, ":field": field_path, ":value": value },
            |row| row.get::<_, String>(0),
        )
        .map_err(Error::QueryFailed)?;

    let mut items = Vec::new();
    for body in rows {
        let body = body.map_err(Error::QueryFailed)?;
        items.push(serde_json::from_str(&body)?);
    }
    Ok(items)
}

/// Prefix search over a top-level string field, ordered by (field, id),
/// resuming after an optional cursor.
///
/// Implemented as the range scan `field >= prefix AND field <= prefix + '~'`,
/// so this matches prefixes only, never substrings.
pub fn query_prefix<T: DeserializeOwned>(
    conn: &Connection,
    collection: &str,
    field: &str,
    prefix: &str,
    limit: u32,
    after: Option<&PageCursor>,
) -> Result<Page<T>, Error> {
    let field_path = format!("$.{field}");
    let upper = format!("{prefix}~");

    let mut sql = String::from(
        "SELECT id, body, json_extract(body, :field) FROM documents
         WHERE collection = :collection
           AND json_extract(body, :field) >= :prefix
           AND json_extract(body, :field) <= :upper",
    );
    if after.is_some() {
        sql.push_str(
            " AND (json_extract(body, :field) > :after_value
               OR (json_extract(body, :field) = :after_value AND id > :after_id))",
        );
    }
    sql.push_str(" ORDER BY json_extract(body, :field), id LIMIT :limit");

    let mut params: Vec<(&str, &dyn ToSql)> = vec![
        (":collection", &collection),
        (":field", &field_path),
        (":prefix", &prefix),
        (":upper", &upper),
        (":limit", &limit),
    ];
    if let Some(cursor) = after {
        params.push((":after_value", &cursor.field_value));
        params.push((":after_id", &cursor.id));
    }

    let mut stmt = conn.prepare(&sql).map_err(Error::QueryFailed)?;
    let rows = stmt
        .query_map(params.as_slice(), |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .map_err(Error::QueryFailed)?;

    let mut items = Vec::new();
    let mut last: Option<PageCursor> = None;
    for row in rows {
        let (id, body, field_value) = row.map_err(Error::QueryFailed)?;
        items.push(serde_json::from_str(&body)?);
        last = Some(PageCursor { field_value, id });
    }

    // A short page means the range is exhausted.
    let next = if items.len() as u32 == limit { last } else { None };
    Ok(Page { items, next })
}
