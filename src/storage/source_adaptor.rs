
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::str::FromStr;

use crate::data_types::source::{NewSource, SomaticStatus, Source, SourceType};
use crate::storage::StorageError;
use crate::storage::schema::SOURCE_TABLE;

const SOURCE_COLUMNS: &str = "source_id, name, version, description, url, type, somatic_status, data_types";

/// Separator used in the stored `data_types` SET
const DATA_TYPE_SEPARATOR: char = ',';

/// A `source` row exactly as stored, before any enumerated values are checked
struct SourceRow {
    source_id: i64,
    name: String,
    version: Option<i64>,
    description: Option<String>,
    url: Option<String>,
    source_type: Option<String>,
    somatic_status: Option<String>,
    data_types: Option<String>
}

impl SourceRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            source_id: row.get("source_id")?,
            name: row.get("name")?,
            version: row.get("version")?,
            description: row.get("description")?,
            url: row.get("url")?,
            source_type: row.get("type")?,
            somatic_status: row.get("somatic_status")?,
            data_types: row.get("data_types")?
        })
    }

    fn invalid(column: &'static str, value: impl ToString) -> StorageError {
        StorageError::InvalidValue { table: SOURCE_TABLE, column, value: value.to_string() }
    }
}

impl TryFrom<SourceRow> for Source {
    type Error = StorageError;

    fn try_from(row: SourceRow) -> Result<Self, Self::Error> {
        let db_id = u64::try_from(row.source_id)
            .map_err(|_| SourceRow::invalid("source_id", row.source_id))?;
        let version = row.version
            .map(|v| u32::try_from(v).map_err(|_| SourceRow::invalid("version", v)))
            .transpose()?;
        let source_type = row.source_type.as_deref()
            .map(|t| SourceType::from_str(t).map_err(|_| SourceRow::invalid("type", t)))
            .transpose()?;
        let somatic_status = match row.somatic_status.as_deref() {
            Some(s) => SomaticStatus::from_str(s).map_err(|_| SourceRow::invalid("somatic_status", s))?,
            None => SomaticStatus::default()
        };
        let data_types: Vec<String> = row.data_types.as_deref()
            .map(|dt| {
                dt.split(DATA_TYPE_SEPARATOR)
                    .filter(|t| !t.is_empty())
                    .map(|t| t.to_string())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Source::new(
            db_id, row.name, version, row.description.unwrap_or_default(), row.url,
            source_type, somatic_status, data_types
        ))
    }
}

/// Loads `Source` records from the `source` table
pub struct SourceAdaptor<'db> {
    conn: &'db Connection
}

impl<'db> SourceAdaptor<'db> {
    pub fn new(conn: &'db Connection) -> Self {
        Self { conn }
    }

    /// Fetches a single source by primary key
    /// # Arguments
    /// * `db_id` - the `source_id` of the row
    /// # Errors
    /// * `StorageError::NotFound` if no row has that id
    /// * `StorageError::InvalidValue` if an enumerated column holds an unknown value
    pub fn fetch_by_dbid(&self, db_id: u64) -> Result<Source, StorageError> {
        debug!("Fetching source with id {db_id}");
        let key = i64::try_from(db_id)
            .map_err(|_| StorageError::NotFound { table: SOURCE_TABLE, key: db_id.to_string() })?;
        let sql = format!("SELECT {SOURCE_COLUMNS} FROM source WHERE source_id = ?1");
        let row = self.conn.query_row(&sql, params![key], SourceRow::from_row)
            .optional()?
            .ok_or_else(|| StorageError::NotFound { table: SOURCE_TABLE, key: db_id.to_string() })?;
        row.try_into()
    }

    /// Fetches a single source by its unique name
    /// # Errors
    /// * `StorageError::NotFound` if no row has that name
    pub fn fetch_by_name(&self, name: &str) -> Result<Source, StorageError> {
        debug!("Fetching source with name {name:?}");
        let sql = format!("SELECT {SOURCE_COLUMNS} FROM source WHERE name = ?1");
        let row = self.conn.query_row(&sql, params![name], SourceRow::from_row)
            .optional()?
            .ok_or_else(|| StorageError::NotFound { table: SOURCE_TABLE, key: name.to_string() })?;
        row.try_into()
    }

    /// Fetches every source, ordered by primary key
    pub fn fetch_all(&self) -> Result<Vec<Source>, StorageError> {
        let sql = format!("SELECT {SOURCE_COLUMNS} FROM source ORDER BY source_id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], SourceRow::from_row)?
            .collect::<rusqlite::Result<Vec<SourceRow>>>()?;
        debug!("Loaded {} sources", rows.len());
        rows.into_iter()
            .map(Source::try_from)
            .collect()
    }

    /// Inserts a new source and returns the id it was assigned
    /// # Arguments
    /// * `source` - the fields to store
    pub fn store(&self, source: &NewSource) -> Result<u64, StorageError> {
        let data_types = if source.data_types.is_empty() {
            None
        } else {
            Some(source.data_types.join(&DATA_TYPE_SEPARATOR.to_string()))
        };
        self.conn.execute(
            "INSERT INTO source (name, version, description, url, type, somatic_status, data_types)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                source.name,
                source.version,
                source.description,
                source.url,
                source.source_type.map(|t| t.as_ref().to_string()),
                source.somatic_status.as_ref(),
                data_types
            ]
        )?;
        let row_id = self.conn.last_insert_rowid();
        debug!("Stored source {:?} with id {row_id}", source.name);
        u64::try_from(row_id)
            .map_err(|_| SourceRow::invalid("source_id", row_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::VariationDb;

    fn dbsnp() -> NewSource {
        NewSource {
            name: "dbSNP".to_string(),
            version: Some(138),
            description: "Variants (including SNPs and indels) imported from dbSNP".to_string(),
            url: Some("http://www.ncbi.nlm.nih.gov/projects/SNP/".to_string()),
            source_type: None,
            somatic_status: SomaticStatus::Mixed,
            data_types: vec!["variation".to_string(), "variation_synonym".to_string()]
        }
    }

    fn build_db() -> VariationDb {
        let db = VariationDb::open_in_memory().unwrap();
        db.create_schema().unwrap();
        db
    }

    #[test]
    fn test_store_and_fetch() {
        let db = build_db();
        let adaptor = db.source_adaptor();
        let expected = dbsnp();
        let db_id = adaptor.store(&expected).unwrap();

        let source = adaptor.fetch_by_dbid(db_id).unwrap();
        assert_eq!(source.db_id(), db_id);
        assert_eq!(source.name(), "dbSNP");
        assert_eq!(source.version(), Some(138));
        assert_eq!(source.description(), expected.description);
        assert_eq!(source.url(), expected.url.as_deref());
        assert_eq!(source.source_type(), None);
        assert_eq!(source.somatic_status(), SomaticStatus::Mixed);
        assert_eq!(source.data_types(), &["variation".to_string(), "variation_synonym".to_string()]);

        assert_eq!(adaptor.fetch_by_name("dbSNP").unwrap(), source);
    }

    #[test]
    fn test_not_found() {
        let db = build_db();
        let adaptor = db.source_adaptor();
        assert!(matches!(adaptor.fetch_by_dbid(42), Err(StorageError::NotFound { .. })));
        assert!(matches!(adaptor.fetch_by_name("COSMIC"), Err(StorageError::NotFound { .. })));
        assert!(adaptor.fetch_all().unwrap().is_empty());
    }

    #[test]
    fn test_raw_rows() {
        let db = build_db();
        let conn = db.connection();
        // nullable columns left empty
        conn.execute("INSERT INTO source (source_id, name, somatic_status) VALUES (7, 'HGMD-PUBLIC', NULL)", []).unwrap();
        conn.execute(
            "INSERT INTO source (source_id, name, type, somatic_status) VALUES (3, 'Affy GenomeWideSNP_6', 'chip', 'germline')", []
        ).unwrap();
        conn.execute("INSERT INTO source (source_id, name, type) VALUES (9, 'broken', 'microarray')", []).unwrap();

        let adaptor = db.source_adaptor();
        let hgmd = adaptor.fetch_by_dbid(7).unwrap();
        assert_eq!(hgmd.version(), None);
        assert_eq!(hgmd.description(), "");
        assert_eq!(hgmd.url(), None);
        assert_eq!(hgmd.somatic_status(), SomaticStatus::Germline);
        assert!(hgmd.data_types().is_empty());

        let chip = adaptor.fetch_by_dbid(3).unwrap();
        assert_eq!(chip.source_type(), Some(SourceType::Chip));

        match adaptor.fetch_by_dbid(9) {
            Err(StorageError::InvalidValue { column, value, .. }) => {
                assert_eq!(column, "type");
                assert_eq!(value, "microarray");
            },
            other => panic!("unexpected result: {other:?}")
        }
        // one bad row poisons the full listing
        assert!(adaptor.fetch_all().is_err());
    }

    #[test]
    fn test_fetch_all_on_disk() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let db_fn = tmp_dir.path().join("variation.sqlite");
        {
            let db = VariationDb::open(&db_fn).unwrap();
            db.create_schema().unwrap();
            let adaptor = db.source_adaptor();
            adaptor.store(&dbsnp()).unwrap();
            adaptor.store(&NewSource {
                name: "COSMIC".to_string(),
                version: Some(71),
                somatic_status: SomaticStatus::Somatic,
                data_types: vec!["variation".to_string()],
                ..Default::default()
            }).unwrap();
        }

        // re-open to make sure everything was persisted
        let db = VariationDb::open(&db_fn).unwrap();
        let sources = db.source_adaptor().fetch_all().unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["dbSNP", "COSMIC"]);
        assert!(sources[0].db_id() < sources[1].db_id());
        assert_eq!(sources[1].somatic_status(), SomaticStatus::Somatic);
    }
}
