//! PRAGMA setup shared by every SQLite connection in the crate
//!
//! WAL, NORMAL sync, in-memory temp store, 256MB mmap, 64MB cache,
//! 5s busy timeout, autocheckpoint every 1000 pages.

use rusqlite::Connection;

pub fn apply_optimized_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA temp_store = MEMORY;
        PRAGMA mmap_size = 268435456;
        PRAGMA cache_size = -64000;
        PRAGMA busy_timeout = 5000;
        PRAGMA wal_autocheckpoint = 1000;
        ",
    )
}

/// True when the connection is in WAL journal mode
pub fn is_wal_mode(conn: &Connection) -> rusqlite::Result<bool> {
    let mode: String = conn.pragma_query_value(None, "journal_mode", |row| row.get(0))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_pragmas_applied() {
        let dir = tempdir().unwrap();
        let conn = Connection::open(dir.path().join("test.db")).unwrap();

        apply_optimized_pragmas(&conn).unwrap();

        assert!(is_wal_mode(&conn).unwrap());
        let checkpoint: i32 = conn
            .query_row("PRAGMA wal_autocheckpoint", [], |row| row.get(0))
            .unwrap();
        assert_eq!(checkpoint, 1000);
    }
}
