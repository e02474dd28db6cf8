//! SQLite persistence for the learner state and the frame catalog

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::catalog::{Catalog, Frame};
use crate::error::Result;
use crate::state::{AppState, PersistedState};

pub const STATE_KEY: &str = "maroeng_state";

/// Open the database and make sure the schema exists
pub fn init_database(db_path: impl AsRef<Path>) -> Result<Connection> {
    let conn = Connection::open(db_path)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS frames (
            id INTEGER PRIMARY KEY,
            block TEXT NOT NULL,
            text_en TEXT NOT NULL,
            hint_ru TEXT NOT NULL,
            distractors TEXT
        )",
        [],
    )?;

    Ok(conn)
}

/// Persist the whole state as one JSON blob
pub fn save_state(conn: &Connection, state: &AppState) -> Result<()> {
    let json = serde_json::to_string(state)?;
    conn.execute(
        "INSERT INTO app_state (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
        params![STATE_KEY, json],
    )?;
    tracing::debug!(records = state.progress.len(), "State saved");
    Ok(())
}

pub fn load_state(conn: &Connection) -> Result<AppState> {
    load_state_with(conn, AppState::default())
}

/// Load the state, merging whatever was stored over `defaults`.
/// A blob that fails to parse is logged and replaced by `defaults`.
pub fn load_state_with(conn: &Connection, defaults: AppState) -> Result<AppState> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM app_state WHERE key = ?1",
            params![STATE_KEY],
            |row| row.get(0),
        )
        .optional()?;

    let Some(json) = stored else {
        return Ok(defaults);
    };

    match serde_json::from_str::<PersistedState>(&json) {
        Ok(persisted) => Ok(persisted.merge_over(defaults)),
        Err(e) => {
            tracing::warn!(error = %e, "Stored state is unreadable, using defaults");
            Ok(defaults)
        }
    }
}

/// Insert or replace catalog frames
pub fn save_frames(conn: &mut Connection, frames: &[Frame]) -> Result<usize> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO frames (id, block, text_en, hint_ru, distractors)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for frame in frames {
            let distractors = frame
                .distractors
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?;
            stmt.execute(params![frame.id, frame.block, frame.text_en, frame.hint_ru, distractors])?;
        }
    }
    tx.commit()?;
    tracing::info!(frames = frames.len(), "Frames stored");
    Ok(frames.len())
}

/// Rebuild the catalog from the frames table, ordered by id
pub fn load_catalog(conn: &Connection) -> Result<Catalog> {
    let mut stmt = conn.prepare(
        "SELECT id, block, text_en, hint_ru, distractors FROM frames ORDER BY id",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, Option<String>>(4)?,
        ))
    })?;

    let mut frames = Vec::new();
    for row in rows {
        let (id, block, text_en, hint_ru, distractors) = row?;
        let distractors = distractors
            .map(|json| serde_json::from_str::<Vec<String>>(&json))
            .transpose()?;
        frames.push(Frame { id, block, text_en, hint_ru, distractors });
    }

    // ordered by id, so Core frames precede Level 2 frames
    Catalog::new(frames, Vec::new())
}

/// Owns the connection and applies read-modify-write steps to the stored state
pub struct StateStore {
    conn: Connection,
    defaults: AppState,
}

impl StateStore {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self { conn: init_database(db_path)?, defaults: AppState::default() })
    }

    /// Use `defaults` for anything the stored state does not carry.
    pub fn with_defaults(mut self, defaults: AppState) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    pub fn load(&self) -> Result<AppState> {
        load_state_with(&self.conn, self.defaults.clone())
    }

    pub fn catalog(&self) -> Result<Catalog> {
        load_catalog(&self.conn)
    }

    /// Load, transform, save. Nothing is written when `f` fails.
    pub fn update<F>(&self, f: F) -> Result<AppState>
    where
        F: FnOnce(AppState) -> Result<AppState>,
    {
        let next = f(self.load()?)?;
        save_state(&self.conn, &next)?;
        Ok(next)
    }
}
