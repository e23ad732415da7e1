//! Bulk (re)population of the schema from per-entity row files.
//!
//! The whole load is one transaction: foreign-key checks are suspended,
//! every entity's rows are inserted in dependency order, and the single
//! commit happens at the end. Any failure (unreadable file, malformed
//! record, arity mismatch, insert error) rolls the entire load back and
//! leaves no partially-loaded tables behind. Foreign-key enforcement is
//! restored on every exit path.

use std::fs::File;
use std::path::PathBuf;

use rusqlite::params_from_iter;
use tracing::{debug, info, instrument};

use crate::error::DbError;
use crate::schema::{self, EntityDef, ENTITIES};
use crate::store::Session;

/// Supplier of ordered rows for each entity.
///
/// Rows are raw field values in the entity's declared column order; the
/// loader checks each row's arity against the declared column count.
pub trait RowSource {
    fn rows(&mut self, entity: &EntityDef) -> Result<Vec<Vec<String>>, DbError>;
}

/// Reads `<dir>/<table>.csv` per entity: comma-delimited, no header row.
pub struct CsvDirSource {
    dir: PathBuf,
}

impl CsvDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl RowSource for CsvDirSource {
    fn rows(&mut self, entity: &EntityDef) -> Result<Vec<Vec<String>>, DbError> {
        let path = self.dir.join(format!("{}.csv", entity.table));
        let file = File::open(&path).map_err(|source| DbError::SourceFile {
            path: path.clone(),
            source,
        })?;

        // Arity is the loader's check, not the parser's: `flexible` lets a
        // short or long record through so it can be reported per-row.
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|source| DbError::SourceFormat {
                path: path.clone(),
                source,
            })?;
            rows.push(record.iter().map(str::to_owned).collect());
        }
        Ok(rows)
    }
}

/// Row counts of the headline tables, reported after a successful load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub users: u64,
    pub machines: u64,
    pub courses: u64,
}

/// Loads every entity from `source` into a freshly reset or empty schema.
#[instrument(skip_all)]
pub fn load_all<S: RowSource>(session: &mut Session, source: &mut S) -> Result<LoadReport, DbError> {
    session.set_foreign_keys(false)?;
    let loaded = run_load(session, source);
    let restored = session.set_foreign_keys(true);
    loaded?;
    restored?;

    let report = LoadReport {
        users: session.table_count(&schema::USERS)?,
        machines: session.table_count(&schema::MACHINES)?,
        courses: session.table_count(&schema::COURSES)?,
    };
    info!(
        users = report.users,
        machines = report.machines,
        courses = report.courses,
        "bulk load committed"
    );
    Ok(report)
}

fn run_load<S: RowSource>(session: &mut Session, source: &mut S) -> Result<(), DbError> {
    let tx = session.conn.transaction()?;

    for entity in &ENTITIES {
        let rows = source.rows(entity)?;
        let mut stmt = tx.prepare(&entity.insert_sql())?;
        for (index, row) in rows.iter().enumerate() {
            if row.len() != entity.column_count() {
                return Err(DbError::RowArity {
                    table: entity.table,
                    line: index + 1,
                    expected: entity.column_count(),
                    got: row.len(),
                });
            }
            stmt.execute(params_from_iter(row.iter()))?;
        }
        debug!(table = entity.table, rows = rows.len(), "entity loaded");
    }

    tx.commit()?;
    Ok(())
}
