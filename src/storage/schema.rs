
use rusqlite::Connection;

/// Name of the table holding variation sources
pub const SOURCE_TABLE: &str = "source";

/// `data_types` is a comma separated SET, e.g. "variation,phenotype_feature"
const CREATE_SOURCE_TABLE: &str = "CREATE TABLE IF NOT EXISTS source (
    source_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    name           TEXT NOT NULL,
    version        INTEGER,
    description    TEXT NOT NULL DEFAULT '',
    url            TEXT,
    type           TEXT,
    somatic_status TEXT DEFAULT 'germline',
    data_types     TEXT
);
CREATE UNIQUE INDEX IF NOT EXISTS source_name_idx ON source (name);";

/// Creates all tables we know about if they are missing
/// # Arguments
/// * `conn` - an open connection
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_SOURCE_TABLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_twice() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        // re-running on an existing schema is a no-op
        create_schema(&conn).unwrap();

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [SOURCE_TABLE], |row| row.get(0)
        ).unwrap();
        assert_eq!(count, 1);
    }
}
