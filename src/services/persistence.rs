//! Persistence service — export and import of trajectory documents.
//!
//! DESIGN
//! ======
//! Export writes the session's document as pretty JSON to
//! `<dir>/trajectory_<epoch-ms>.json`. Import reads a UTF-8 file and hands it
//! to the session, which either applies it completely or not at all.
//!
//! ERROR HANDLING
//! ==============
//! I/O failures carry the offending path. Document errors (empty trajectory,
//! malformed JSON, invalid format) pass through unchanged so the CLI can show
//! them to the user as-is.

use std::fs;
use std::path::{Path, PathBuf};

use canvas::doc::DocError;
use canvas::engine::{Action, Session};
use canvas::persist;
use time::OffsetDateTime;
use tracing::info;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: std::io::Error },
    #[error(transparent)]
    Doc(#[from] DocError),
}

// =============================================================================
// EXPORT
// =============================================================================

/// Save the session as a JSON document in `dir`. Returns the written path.
pub fn export(session: &Session, dir: &Path, at: OffsetDateTime) -> Result<PathBuf, PersistenceError> {
    let doc = session.save(at)?;
    let json = persist::to_json_pretty(&doc)?;
    let path = dir.join(persist::export_file_name(at));

    fs::write(&path, json).map_err(|source| PersistenceError::Write { path: path.clone(), source })?;
    info!(points = doc.metadata.point_count, path = %path.display(), "trajectory exported");
    Ok(path)
}

/// Save the session as a plain-text coordinate listing at `path`.
pub fn export_text(session: &Session, path: &Path, at: OffsetDateTime) -> Result<(), PersistenceError> {
    let text = persist::to_text(&session.canvas(), session.trajectory(), at)?;
    fs::write(path, text).map_err(|source| PersistenceError::Write { path: path.to_path_buf(), source })?;
    info!(points = session.trajectory().len(), path = %path.display(), "coordinates exported as text");
    Ok(())
}

// =============================================================================
// IMPORT
// =============================================================================

/// Load a JSON document from `path` into `session`.
pub fn import(session: &mut Session, path: &Path) -> Result<Vec<Action>, PersistenceError> {
    let text = fs::read_to_string(path).map_err(|source| PersistenceError::Read { path: path.to_path_buf(), source })?;
    let actions = session.load_str(&text)?;
    info!(points = session.trajectory().len(), path = %path.display(), "trajectory imported");
    Ok(actions)
}

#[cfg(test)]
#[path = "persistence_test.rs"]
mod tests;
