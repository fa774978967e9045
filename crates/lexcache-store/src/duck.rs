//! DuckDB storage for scraped law versions.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use duckdb::{Connection, params};
use lexcache_core::{DocumentVersion, VersionSummary};
use tracing::{debug, info};

use crate::StoreError;

const SCHEMA: &str = "
    CREATE SEQUENCE IF NOT EXISTS laws_id_seq START 1;
    CREATE TABLE IF NOT EXISTS laws (
        id BIGINT PRIMARY KEY DEFAULT nextval('laws_id_seq'),
        law_type VARCHAR NOT NULL,
        content VARCHAR NOT NULL,
        last_updated TIMESTAMP NOT NULL DEFAULT current_timestamp
    );
";

/// Append-only `laws` table: one row per successful scrape.
///
/// The current version of a law is the row with the greatest `last_updated`,
/// ties going to the higher `id`. Nothing is updated or deleted, so the table
/// carries the full scrape history.
///
/// The connection sits behind a mutex: the scheduler is the only writer and
/// API reads queue behind it.
pub struct DuckStore {
    conn: Mutex<Connection>,
}

impl DuckStore {
    /// Open an in-memory database with the schema applied.
    pub fn open() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Open or create the database file at `path`.
    ///
    /// Schema creation is idempotent, so this is safe on every start-up.
    pub fn open_persistent(path: &Path) -> Result<Self, StoreError> {
        let store = Self::init(Connection::open(path)?)?;
        info!(path = %path.display(), rows = store.count()?, "opened law store");
        Ok(store)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    // ── Writes ──

    /// Insert a new version stamped with the current time. Returns its id.
    pub fn save(&self, law_type: &str, content: &str) -> Result<i64, StoreError> {
        self.save_at(law_type, content, Utc::now())
    }

    /// Insert a new version with an explicit timestamp (stored at microsecond precision).
    pub fn save_at(
        &self,
        law_type: &str,
        content: &str,
        at: DateTime<Utc>,
    ) -> Result<i64, StoreError> {
        let at = at.trunc_subsecs(6).naive_utc();
        let id: i64 = self.conn()?.query_row(
            "INSERT INTO laws (law_type, content, last_updated) VALUES (?, ?, ?) RETURNING id",
            params![law_type, content, at],
            |row| row.get(0),
        )?;
        debug!(law_type, id, bytes = content.len(), "stored law version");
        Ok(id)
    }

    // ── Reads ──

    /// Content of the current version of `law_type`.
    pub fn latest(&self, law_type: &str) -> Result<String, StoreError> {
        let result = self.conn()?.query_row(
            "SELECT content FROM laws
             WHERE law_type = ?
             ORDER BY last_updated DESC, id DESC
             LIMIT 1",
            params![law_type],
            |row| row.get(0),
        );
        not_found_as(result, law_type)
    }

    /// The full current row for `law_type`.
    pub fn latest_version(&self, law_type: &str) -> Result<DocumentVersion, StoreError> {
        let result = self.conn()?.query_row(
            "SELECT id, law_type, content, last_updated FROM laws
             WHERE law_type = ?
             ORDER BY last_updated DESC, id DESC
             LIMIT 1",
            params![law_type],
            |row| {
                let last_updated: NaiveDateTime = row.get(3)?;
                Ok(DocumentVersion {
                    id: row.get(0)?,
                    law_type: row.get(1)?,
                    content: row.get(2)?,
                    last_updated: last_updated.and_utc(),
                })
            },
        );
        not_found_as(result, law_type)
    }

    /// Every stored version of `law_type`, newest first. Empty if none.
    pub fn history(&self, law_type: &str) -> Result<Vec<VersionSummary>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, last_updated, strlen(content)::BIGINT FROM laws
             WHERE law_type = ?
             ORDER BY last_updated DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![law_type], |row| {
            let last_updated: NaiveDateTime = row.get(1)?;
            let size: i64 = row.get(2)?;
            Ok(VersionSummary {
                id: row.get(0)?,
                last_updated: last_updated.and_utc(),
                size: size as usize,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Distinct keys with at least one stored version, sorted.
    pub fn law_types(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT DISTINCT law_type FROM laws ORDER BY law_type")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<Result<Vec<String>, _>>()?)
    }

    /// Total number of stored versions across all keys.
    pub fn count(&self) -> Result<usize, StoreError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT count(*)::BIGINT FROM laws", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn not_found_as<T>(result: Result<T, duckdb::Error>, law_type: &str) -> Result<T, StoreError> {
    match result {
        Ok(value) => Ok(value),
        Err(duckdb::Error::QueryReturnedNoRows) => Err(StoreError::NotFound(law_type.to_string())),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, hour, 0, 0).unwrap()
    }

    #[test]
    fn open_in_memory_is_empty() {
        let store = DuckStore::open().unwrap();
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.law_types().unwrap().is_empty());
    }

    #[test]
    fn latest_unknown_is_not_found() {
        let store = DuckStore::open().unwrap();
        let result = store.latest("codigo-civil");
        assert!(matches!(result, Err(StoreError::NotFound(ref key)) if key == "codigo-civil"));
        assert!(matches!(
            store.latest_version("codigo-civil"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn save_then_latest() {
        let store = DuckStore::open().unwrap();
        store.save("codigo-civil", "<p>v1</p>").unwrap();
        assert_eq!(store.latest("codigo-civil").unwrap(), "<p>v1</p>");
    }

    #[test]
    fn latest_returns_most_recent_save() {
        let store = DuckStore::open().unwrap();
        store.save("codigo-penal", "A").unwrap();
        store.save("codigo-penal", "B").unwrap();
        assert_eq!(store.latest("codigo-penal").unwrap(), "B");
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn ids_are_monotonic() {
        let store = DuckStore::open().unwrap();
        let a = store.save("eleitoral", "A").unwrap();
        let b = store.save("advocacia", "B").unwrap();
        let c = store.save("eleitoral", "C").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn latest_orders_by_timestamp_not_insert_order() {
        let store = DuckStore::open().unwrap();
        store.save_at("leis-trabalho", "newer", at(12)).unwrap();
        store.save_at("leis-trabalho", "older", at(6)).unwrap();
        assert_eq!(store.latest("leis-trabalho").unwrap(), "newer");
    }

    #[test]
    fn equal_timestamps_resolve_to_last_insert() {
        let store = DuckStore::open().unwrap();
        store.save_at("advocacia", "first", at(8)).unwrap();
        store.save_at("advocacia", "second", at(8)).unwrap();
        assert_eq!(store.latest("advocacia").unwrap(), "second");
    }

    #[test]
    fn keys_are_independent() {
        let store = DuckStore::open().unwrap();
        store.save("codigo-civil", "civil").unwrap();
        store.save("codigo-penal", "penal").unwrap();
        assert_eq!(store.latest("codigo-civil").unwrap(), "civil");
        assert_eq!(store.latest("codigo-penal").unwrap(), "penal");
        assert_eq!(
            store.law_types().unwrap(),
            vec!["codigo-civil".to_string(), "codigo-penal".to_string()]
        );
    }

    #[test]
    fn latest_version_carries_row() {
        let store = DuckStore::open().unwrap();
        let t = at(3) + Duration::microseconds(250);
        let id = store.save_at("codigo-tributario", "<p>ctn</p>", t).unwrap();

        let version = store.latest_version("codigo-tributario").unwrap();
        assert_eq!(version.id, id);
        assert_eq!(version.law_type, "codigo-tributario");
        assert_eq!(version.content, "<p>ctn</p>");
        assert_eq!(version.last_updated, t);
    }

    #[test]
    fn save_stamps_current_time() {
        let store = DuckStore::open().unwrap();
        let before = Utc::now() - Duration::seconds(1);
        store.save("advocacia", "x").unwrap();
        let after = Utc::now() + Duration::seconds(1);

        let stamped = store.latest_version("advocacia").unwrap().last_updated;
        assert!(stamped > before && stamped < after, "unexpected timestamp {stamped}");
    }

    #[test]
    fn history_newest_first() {
        let store = DuckStore::open().unwrap();
        let a = store.save_at("codigo-comercial", "a", at(1)).unwrap();
        let b = store.save_at("codigo-comercial", "bbb", at(2)).unwrap();
        store.save_at("outra", "zz", at(3)).unwrap();

        let history = store.history("codigo-comercial").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, b);
        assert_eq!(history[0].size, 3);
        assert_eq!(history[0].last_updated, at(2));
        assert_eq!(history[1].id, a);
        assert!(store.history("nada").unwrap().is_empty());
    }

    #[test]
    fn content_is_stored_verbatim() {
        let store = DuckStore::open().unwrap();
        let content = "<p>Art. 5º São invioláveis a intimidade &amp; a vida privada</p>\n'quoted'";
        store.save("constituicao-federal", content).unwrap();
        assert_eq!(store.latest("constituicao-federal").unwrap(), content);
        assert_eq!(
            store.history("constituicao-federal").unwrap()[0].size,
            content.len()
        );
    }

    // ── Persistent storage ──

    #[test]
    fn open_persistent_creates_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let db_path = tmp.path().join("laws.duckdb");
        assert!(!db_path.exists());

        let store = DuckStore::open_persistent(&db_path).unwrap();
        assert!(db_path.exists());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn persistent_history_survives_reopen() {
        let tmp = tempfile::TempDir::new().unwrap();
        let db_path = tmp.path().join("laws.duckdb");

        let store = DuckStore::open_persistent(&db_path).unwrap();
        let first = store.save("defesa-consumidor", "v1").unwrap();
        store.save("defesa-consumidor", "v2").unwrap();
        drop(store);

        // Schema creation runs again and must leave existing rows alone.
        let store = DuckStore::open_persistent(&db_path).unwrap();
        assert_eq!(store.count().unwrap(), 2);
        assert_eq!(store.latest("defesa-consumidor").unwrap(), "v2");

        // The id sequence continues rather than restarting.
        let third = store.save("defesa-consumidor", "v3").unwrap();
        assert!(third > first + 1);
        assert_eq!(store.latest("defesa-consumidor").unwrap(), "v3");
    }
}
