use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use super::domain::{Table, WorkforceTables};
use super::generator;
use super::store::{StoreError, TableStore};

/// Directory of comma-delimited tables, one file per [`Table`].
///
/// Absent files are synthesized on load and written back immediately. Flushes go through a
/// temporary file and a rename so readers never observe a half-written table.
#[derive(Debug, Clone)]
pub struct CsvTableStore {
    dir: PathBuf,
}

impl CsvTableStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, table: Table) -> PathBuf {
        self.dir.join(table.file_name())
    }

    fn read_table<T: DeserializeOwned>(&self, table: Table) -> Result<Option<Vec<T>>, StoreError> {
        let file = match File::open(self.path(table)) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { table, source }),
        };

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(file);
        let rows = reader
            .deserialize::<T>()
            .collect::<Result<Vec<T>, csv::Error>>()
            .map_err(|source| StoreError::Csv { table, source })?;

        Ok(Some(rows))
    }

    fn write_table<T: Serialize>(&self, table: Table, rows: &[T]) -> Result<(), StoreError> {
        let target = self.path(table);
        let staging = target.with_extension("csv.tmp");

        let mut writer =
            csv::Writer::from_path(&staging).map_err(|source| StoreError::Csv { table, source })?;
        for row in rows {
            writer
                .serialize(row)
                .map_err(|source| StoreError::Csv { table, source })?;
        }
        writer
            .flush()
            .map_err(|source| StoreError::Io { table, source })?;
        drop(writer);

        fs::rename(&staging, &target).map_err(|source| StoreError::Io { table, source })?;
        debug!(table = table.file_name(), rows = rows.len(), "table flushed");
        Ok(())
    }

    fn write(&self, tables: &WorkforceTables, table: Table) -> Result<(), StoreError> {
        match table {
            Table::Employees => self.write_table(table, &tables.employees),
            Table::EmergencyContacts => self.write_table(table, &tables.emergency_contacts),
            Table::Candidates => self.write_table(table, &tables.candidates),
            Table::Onboarding => self.write_table(table, &tables.onboarding),
            Table::Attrition => self.write_table(table, &tables.attrition),
            Table::Engagement => self.write_table(table, &tables.engagement),
        }
    }
}

impl TableStore for CsvTableStore {
    fn load(&self, rng: &mut StdRng) -> Result<WorkforceTables, StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::DataDir {
            path: self.dir.clone(),
            source,
        })?;

        let mut generated = Vec::new();

        let employees = match self.read_table(Table::Employees)? {
            Some(rows) => rows,
            None => {
                generated.push(Table::Employees);
                generator::generate_employees(rng, generator::EMPLOYEE_COUNT)
            }
        };
        let emergency_contacts = match self.read_table(Table::EmergencyContacts)? {
            Some(rows) => rows,
            None => {
                generated.push(Table::EmergencyContacts);
                generator::generate_emergency_contacts(rng, &employees)
            }
        };
        let candidates = match self.read_table(Table::Candidates)? {
            Some(rows) => rows,
            None => {
                generated.push(Table::Candidates);
                generator::generate_candidates(rng, generator::CANDIDATE_COUNT)
            }
        };
        let onboarding = match self.read_table(Table::Onboarding)? {
            Some(rows) => rows,
            None => {
                generated.push(Table::Onboarding);
                generator::generate_onboarding(rng, &candidates)
            }
        };

        let mut tables = WorkforceTables {
            employees,
            emergency_contacts,
            candidates,
            onboarding,
            attrition: Vec::new(),
            engagement: Vec::new(),
        };

        tables.attrition = match self.read_table(Table::Attrition)? {
            Some(rows) => rows,
            None => {
                generated.push(Table::Attrition);
                generator::generate_attrition(rng, &tables.departments())
            }
        };
        tables.engagement = match self.read_table(Table::Engagement)? {
            Some(rows) => rows,
            None => {
                generated.push(Table::Engagement);
                generator::generate_engagement(rng, &tables.employees)
            }
        };

        for table in &generated {
            self.write(&tables, *table)?;
        }
        if !generated.is_empty() {
            info!(
                dir = %self.dir.display(),
                tables = ?generated,
                "synthesized missing workforce tables"
            );
        }

        Ok(tables)
    }

    fn flush(&self, tables: &WorkforceTables, touched: &[Table]) -> Result<(), StoreError> {
        for table in touched {
            self.write(tables, *table)?;
        }
        Ok(())
    }
}
