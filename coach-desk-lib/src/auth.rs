//src/auth.rs
//! Administrator credentials, student e-mail sign-in and the session file.
//! Administrators carry a salted password digest in the credentials
//! collection; students authenticate by e-mail existence only. The signed-in
//! identity persists as a small JSON file in the data directory so both
//! front-ends pick it up on launch.
use crate::model::{Administrator, Student};
use crate::store::{self, Error as StoreError};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use thiserror::Error;
use validator::{Validate, ValidateEmail};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid e-mail address: {0}")]
    InvalidEmail(String),
    #[error("{0}")]
    Invalid(String),
    #[error("Password must have at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,
    #[error("An administrator with e-mail '{0}' is already registered")]
    EmailTaken(String),
    #[error("Wrong e-mail or password")]
    InvalidCredentials,
    #[error("No administrator with e-mail '{0}' was found")]
    AdminNotFound(String),
    #[error("No student with e-mail '{0}' was found")]
    StudentNotFound(String),
    #[error("Not signed in")]
    NotSignedIn,
    #[error("The current session is not an administrator session")]
    NotAnAdministrator,
    #[error("Cannot delete the only registered administrator")]
    LastAdministrator,
    #[error("Unknown or already used reset token")]
    InvalidResetToken,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("I/O error accessing session file")]
    Io(#[from] std::io::Error),
    #[error("Corrupt session file: {0}")]
    BadSession(#[from] serde_json::Error),
}

/// The signed-in identity, persisted across launches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Session {
    Administrator {
        id: String,
        name: String,
        email: String,
    },
    Student {
        id: String,
        name: String,
        email: String,
    },
}

impl Session {
    pub fn is_administrator(&self) -> bool {
        matches!(self, Session::Administrator { .. })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CredentialRecord {
    id: String,
    email: String,
    salt: String,
    password_hash: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ResetRecord {
    token: String,
    admin_id: String,
}

fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

fn ensure_email(email: &str) -> Result<(), AuthError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(AuthError::InvalidEmail(email.to_string()))
    }
}

fn credential_by_email(
    conn: &Connection,
    email: &str,
) -> Result<Option<CredentialRecord>, AuthError> {
    let mut matches: Vec<CredentialRecord> =
        store::find_by_field(conn, store::CREDENTIALS, "email", email)?;
    Ok(if matches.is_empty() {
        None
    } else {
        Some(matches.remove(0))
    })
}

/// Creates the administrator document and its credential record.
pub fn register_admin(
    conn: &Connection,
    name: &str,
    email: &str,
    password: &str,
) -> Result<Administrator, AuthError> {
    let id = store::new_document_id();
    let admin = Administrator {
        id: Some(id.clone()),
        name: name.trim().to_string(),
        email: email.trim().to_string(),
    };
    admin
        .validate()
        .map_err(|e| AuthError::Invalid(crate::model::first_validation_message(&e)))?;
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::PasswordTooShort);
    }
    if credential_by_email(conn, &admin.email)?.is_some() {
        return Err(AuthError::EmailTaken(admin.email));
    }

    let salt = store::new_document_id();
    let credential = CredentialRecord {
        id: id.clone(),
        email: admin.email.clone(),
        salt: salt.clone(),
        password_hash: hash_password(password, &salt),
    };
    store::set_merge(conn, store::CREDENTIALS, &id, &credential)?;
    store::set_merge(conn, store::ADMINISTRATORS, &id, &admin)?;
    tracing::info!(admin = %id, "registered administrator");
    Ok(admin)
}

/// Verifies the password and persists an administrator session.
pub fn sign_in_admin(
    conn: &Connection,
    session_path: &Path,
    email: &str,
    password: &str,
) -> Result<Session, AuthError> {
    ensure_email(email)?;
    let credential = credential_by_email(conn, email)?.ok_or(AuthError::InvalidCredentials)?;
    if hash_password(password, &credential.salt) != credential.password_hash {
        return Err(AuthError::InvalidCredentials);
    }
    let admin: Administrator = store::get(conn, store::ADMINISTRATORS, &credential.id)?
        .ok_or_else(|| AuthError::AdminNotFound(email.to_string()))?;
    let session = Session::Administrator {
        id: credential.id,
        name: admin.name,
        email: admin.email,
    };
    save_session(session_path, &session)?;
    tracing::info!(email, "administrator signed in");
    Ok(session)
}

/// Looks the e-mail up among students and persists a student session.
pub fn sign_in_student(
    conn: &Connection,
    session_path: &Path,
    email: &str,
) -> Result<Session, AuthError> {
    ensure_email(email)?;
    let mut matches: Vec<Student> = store::find_by_field(conn, store::STUDENTS, "email", email)?;
    if matches.is_empty() {
        return Err(AuthError::StudentNotFound(email.to_string()));
    }
    let student = matches.remove(0);
    let session = Session::Student {
        id: student.id.unwrap_or_default(),
        name: student.name,
        email: student.email,
    };
    save_session(session_path, &session)?;
    tracing::info!(email, "student signed in");
    Ok(session)
}

/// Issues a one-time reset token for the administrator with this e-mail.
/// The caller surfaces the token to the operator (the local analogue of a
/// reset e-mail).
pub fn request_password_reset(conn: &Connection, email: &str) -> Result<String, AuthError> {
    ensure_email(email)?;
    let credential =
        credential_by_email(conn, email)?.ok_or_else(|| AuthError::AdminNotFound(email.to_string()))?;
    let token = store::new_document_id();
    let record = ResetRecord {
        token: token.clone(),
        admin_id: credential.id,
    };
    store::set_merge(conn, store::PASSWORD_RESETS, &token, &record)?;
    tracing::info!(email, "issued password reset token");
    Ok(token)
}

/// Consumes a reset token and replaces the administrator's password.
pub fn reset_password(
    conn: &Connection,
    token: &str,
    new_password: &str,
) -> Result<(), AuthError> {
    let record: ResetRecord = store::get(conn, store::PASSWORD_RESETS, token)?
        .ok_or(AuthError::InvalidResetToken)?;
    if new_password.len() < MIN_PASSWORD_LEN {
        return Err(AuthError::PasswordTooShort);
    }
    let salt = store::new_document_id();
    let patch = serde_json::json!({
        "salt": salt,
        "password_hash": hash_password(new_password, &salt),
    });
    store::set_merge(conn, store::CREDENTIALS, &record.admin_id, &patch)?;
    store::delete(conn, store::PASSWORD_RESETS, token)?;
    tracing::info!(admin = %record.admin_id, "password reset");
    Ok(())
}

/// Updates the signed-in administrator's e-mail on the credential record,
/// the administrator document and the session file.
pub fn change_admin_email(
    conn: &Connection,
    session_path: &Path,
    new_email: &str,
) -> Result<Session, AuthError> {
    ensure_email(new_email)?;
    let session = load_session(session_path)?.ok_or(AuthError::NotSignedIn)?;
    let (id, name) = match &session {
        Session::Administrator { id, name, .. } => (id.clone(), name.clone()),
        Session::Student { .. } => return Err(AuthError::NotAnAdministrator),
    };
    if let Some(existing) = credential_by_email(conn, new_email)? {
        if existing.id != id {
            return Err(AuthError::EmailTaken(new_email.to_string()));
        }
    }
    let patch = serde_json::json!({ "email": new_email });
    store::set_merge(conn, store::CREDENTIALS, &id, &patch)?;
    store::set_merge(conn, store::ADMINISTRATORS, &id, &patch)?;
    let updated = Session::Administrator {
        id,
        name,
        email: new_email.to_string(),
    };
    save_session(session_path, &updated)?;
    Ok(updated)
}

/// Deletes the signed-in administrator's account and clears the session.
/// Refused while it is the only administrator left.
pub fn delete_admin_account(conn: &Connection, session_path: &Path) -> Result<(), AuthError> {
    let session = load_session(session_path)?.ok_or(AuthError::NotSignedIn)?;
    let id = match &session {
        Session::Administrator { id, .. } => id.clone(),
        Session::Student { .. } => return Err(AuthError::NotAnAdministrator),
    };
    if store::count(conn, store::ADMINISTRATORS)? < 2 {
        return Err(AuthError::LastAdministrator);
    }
    store::delete(conn, store::ADMINISTRATORS, &id)?;
    store::delete(conn, store::CREDENTIALS, &id)?;
    clear_session(session_path)?;
    tracing::info!(admin = %id, "administrator account deleted");
    Ok(())
}

/// Reads the persisted session, if any.
pub fn load_session(session_path: &Path) -> Result<Option<Session>, AuthError> {
    if !session_path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(session_path)?;
    Ok(Some(serde_json::from_str(&contents)?))
}

fn save_session(session_path: &Path, session: &Session) -> Result<(), AuthError> {
    std::fs::write(session_path, serde_json::to_string_pretty(session)?)?;
    Ok(())
}

/// Removes the persisted session; signing out while signed out is fine.
pub fn clear_session(session_path: &Path) -> Result<(), AuthError> {
    if session_path.exists() {
        std::fs::remove_file(session_path)?;
    }
    Ok(())
}
