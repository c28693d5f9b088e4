use super::{CompanionQuery, CompanionStore, StoreError, StoreResult};
use crate::companion::{Companion, SessionHistoryEntry};
use chrono::{DateTime, SecondsFormat, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tracing::info;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS companions (
    id          TEXT PRIMARY KEY,
    subject     TEXT NOT NULL,
    topic       TEXT NOT NULL,
    name        TEXT NOT NULL,
    voice       TEXT NOT NULL,
    style       TEXT NOT NULL,
    author      TEXT NOT NULL,
    created_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_companions_author ON companions (author, created_at);

CREATE TABLE IF NOT EXISTS session_history (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    companion_id  TEXT NOT NULL REFERENCES companions (id),
    user_id       TEXT NOT NULL,
    created_at    TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_session_history_user ON session_history (user_id, created_at);
";

const COMPANION_COLUMNS: &str =
    "c.id, c.subject, c.topic, c.name, c.voice, c.style, c.author, c.created_at";

/// SQLite-backed store
///
/// Queries run on the blocking thread pool, one pooled connection per call.
#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and apply the schema.
    /// `:memory:` gives a private database on a single pooled connection.
    pub fn open(path: &str) -> StoreResult<Self> {
        info!("Opening SQLite store: {}", path);

        if path != ":memory:" {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }

        let manager = SqliteConnectionManager::file(path)
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

        let pool = if path == ":memory:" {
            // Every in-memory connection is its own database, so keep exactly one alive
            Pool::builder()
                .max_size(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .build(manager)?
        } else {
            Pool::builder().max_size(8).build(manager)?
        };

        pool.get()?.execute_batch(SCHEMA)?;

        Ok(Self { pool })
    }

    async fn with_conn<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            f(&conn)
        })
        .await?
    }
}

#[async_trait::async_trait]
impl CompanionStore for SqliteStore {
    async fn insert_companion(&self, companion: Companion) -> StoreResult<Companion> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO companions (id, subject, topic, name, voice, style, author, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    companion.id,
                    companion.subject.as_str(),
                    companion.topic,
                    companion.name,
                    companion.voice,
                    companion.style,
                    companion.author,
                    format_timestamp(&companion.created_at),
                ],
            )?;
            Ok(companion)
        })
        .await
    }

    async fn select_companions(&self, query: &CompanionQuery) -> StoreResult<Vec<Companion>> {
        let query = query.clone();
        self.with_conn(move |conn| {
            let sql = format!(
                "SELECT {COMPANION_COLUMNS} FROM companions c
                 WHERE (?1 IS NULL OR instr(lower(c.subject), lower(?1)) > 0)
                   AND (?2 IS NULL
                        OR instr(lower(c.topic), lower(?2)) > 0
                        OR instr(lower(c.name), lower(?2)) > 0)
                 ORDER BY c.rowid
                 LIMIT ?3 OFFSET ?4"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(
                    params![
                        query.subject,
                        query.topic,
                        to_sql_count(query.limit),
                        to_sql_count(query.offset),
                    ],
                    companion_from_row,
                )?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
    }

    async fn companion_by_id(&self, id: &str) -> StoreResult<Option<Companion>> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            let companion = conn
                .query_row(
                    &format!("SELECT {COMPANION_COLUMNS} FROM companions c WHERE c.id = ?1"),
                    params![id],
                    companion_from_row,
                )
                .optional()?;
            Ok(companion)
        })
        .await
    }

    async fn insert_session(&self, entry: SessionHistoryEntry) -> StoreResult<SessionHistoryEntry> {
        self.with_conn(move |conn| {
            let exists = conn
                .query_row(
                    "SELECT 1 FROM companions WHERE id = ?1",
                    params![entry.companion_id],
                    |_| Ok(()),
                )
                .optional()?
                .is_some();
            if !exists {
                return Err(StoreError::UnknownCompanion(entry.companion_id));
            }

            conn.execute(
                "INSERT INTO session_history (companion_id, user_id, created_at) VALUES (?1, ?2, ?3)",
                params![
                    entry.companion_id,
                    entry.user_id,
                    format_timestamp(&entry.created_at),
                ],
            )?;
            Ok(entry)
        })
        .await
    }

    async fn session_companions(
        &self,
        user_id: Option<&str>,
        limit: usize,
    ) -> StoreResult<Vec<Companion>> {
        let user_id = user_id.map(str::to_string);
        self.with_conn(move |conn| {
            let sql = format!(
                "SELECT {COMPANION_COLUMNS} FROM session_history s
                 JOIN companions c ON c.id = s.companion_id
                 WHERE (?1 IS NULL OR s.user_id = ?1)
                 ORDER BY s.created_at DESC, s.id DESC
                 LIMIT ?2"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params![user_id, to_sql_count(limit)], companion_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
    }

    async fn companions_by_author(&self, author: &str) -> StoreResult<Vec<Companion>> {
        let author = author.to_string();
        self.with_conn(move |conn| {
            let sql = format!(
                "SELECT {COMPANION_COLUMNS} FROM companions c
                 WHERE c.author = ?1
                 ORDER BY c.created_at DESC, c.rowid DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params![author], companion_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
    }

    async fn count_by_author(&self, author: &str) -> StoreResult<usize> {
        let author = author.to_string();
        self.with_conn(move |conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM companions WHERE author = ?1",
                params![author],
                |row| row.get(0),
            )?;
            usize::try_from(count).map_err(|_| StoreError::InvalidRow(format!("count {count}")))
        })
        .await
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}

fn companion_from_row(row: &Row<'_>) -> rusqlite::Result<Companion> {
    let subject: String = row.get(1)?;
    let created_at: String = row.get(7)?;

    Ok(Companion {
        id: row.get(0)?,
        subject: subject.parse().map_err(|e| conversion_error(1, e))?,
        topic: row.get(2)?,
        name: row.get(3)?,
        voice: row.get(4)?,
        style: row.get(5)?,
        author: row.get(6)?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| conversion_error(7, e))?
            .with_timezone(&Utc),
    })
}

fn conversion_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}

/// Fixed-width UTC so that text ordering matches time ordering
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn to_sql_count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
