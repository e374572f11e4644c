use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use tracing::info;

use crate::error::StorageError;
use crate::history::{HistoryEntry, MAX_HISTORY_ENTRIES};
use crate::runner::RunReport;

use super::ResultSink;

/// SQLite-backed log of past runs, each with its full JSON dump.
pub struct RunHistoryStore {
    conn: Connection,
}

impl RunHistoryStore {
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS runs (
               run_id TEXT PRIMARY KEY,
               started_at TEXT NOT NULL,
               finished_at TEXT NOT NULL,
               target TEXT NOT NULL,
               passed INTEGER NOT NULL,
               failed INTEGER NOT NULL,
               warnings INTEGER NOT NULL,
               pass_rate REAL NOT NULL,
               verdict TEXT NOT NULL,
               report_json TEXT NOT NULL
             );
             CREATE INDEX IF NOT EXISTS runs_started_at ON runs (started_at);",
        )?;
        Ok(Self { conn })
    }

    pub fn record(&self, report: &RunReport) -> Result<HistoryEntry, StorageError> {
        let entry = HistoryEntry::from_report(report);
        let report_json = serde_json::to_string(report)?;

        self.conn.execute(
            "INSERT INTO runs
               (run_id, started_at, finished_at, target, passed, failed, warnings, pass_rate, verdict, report_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(run_id) DO UPDATE SET
               finished_at = excluded.finished_at,
               passed = excluded.passed,
               failed = excluded.failed,
               warnings = excluded.warnings,
               pass_rate = excluded.pass_rate,
               verdict = excluded.verdict,
               report_json = excluded.report_json;",
            params![
                entry.run_id,
                entry.started_at,
                entry.finished_at,
                entry.target,
                entry.passed as i64,
                entry.failed as i64,
                entry.warnings as i64,
                entry.pass_rate,
                entry.verdict,
                report_json,
            ],
        )?;

        let pruned = self.prune(MAX_HISTORY_ENTRIES)?;
        info!(run_id = %entry.run_id, pruned, "recorded run in history");
        Ok(entry)
    }

    /// Most recent runs first.
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>, StorageError> {
        let mut statement = self.conn.prepare(
            "SELECT run_id, started_at, finished_at, target, passed, failed, warnings, pass_rate, verdict
             FROM runs
             ORDER BY started_at DESC
             LIMIT ?1;",
        )?;

        let rows = statement.query_map(params![limit as i64], |row| {
            Ok(HistoryEntry {
                run_id: row.get(0)?,
                started_at: row.get::<_, DateTime<Utc>>(1)?,
                finished_at: row.get::<_, DateTime<Utc>>(2)?,
                target: row.get(3)?,
                passed: row.get::<_, i64>(4)? as usize,
                failed: row.get::<_, i64>(5)? as usize,
                warnings: row.get::<_, i64>(6)? as usize,
                pass_rate: row.get(7)?,
                verdict: row.get(8)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Full JSON dump stored for a run.
    pub fn report_json(&self, run_id: &str) -> Result<Option<String>, StorageError> {
        let mut statement = self
            .conn
            .prepare("SELECT report_json FROM runs WHERE run_id = ?1 LIMIT 1;")?;
        let mut rows = statement.query(params![run_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    fn prune(&self, keep: usize) -> Result<usize, StorageError> {
        let removed = self.conn.execute(
            "DELETE FROM runs WHERE run_id NOT IN (
               SELECT run_id FROM runs ORDER BY started_at DESC LIMIT ?1
             );",
            params![keep as i64],
        )?;
        Ok(removed)
    }
}

impl ResultSink for RunHistoryStore {
    fn write(&mut self, report: &RunReport) -> Result<(), StorageError> {
        self.record(report).map(|_| ())
    }
}
