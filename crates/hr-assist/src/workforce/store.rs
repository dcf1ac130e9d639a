use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use tracing::debug;

use super::domain::{Table, WorkforceTables};

/// Whole-table persistence. Implementations fill absent tables with synthetic rows.
pub trait TableStore: Send + Sync {
    fn load(&self, rng: &mut StdRng) -> Result<WorkforceTables, StoreError>;
    fn flush(&self, tables: &WorkforceTables, touched: &[Table]) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unable to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to access {table} table: {source}")]
    Io {
        table: Table,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid {table} table data: {source}")]
    Csv {
        table: Table,
        #[source]
        source: csv::Error,
    },
    #[error("workforce tables are unavailable after a failed update")]
    Poisoned,
    #[error("table worker stopped before finishing: {0}")]
    Worker(String),
}

/// Session over the workforce tables: loaded once, flushed on every mutation.
///
/// Mutations run under an exclusive guard against a working copy; the in-memory tables are
/// only replaced once the store accepted the flush.
pub struct Workforce<S> {
    store: Arc<S>,
    tables: Mutex<WorkforceTables>,
    rng: Mutex<StdRng>,
}

impl<S> Workforce<S>
where
    S: TableStore + 'static,
{
    pub fn open(store: Arc<S>, mut rng: StdRng) -> Result<Self, StoreError> {
        let tables = store.load(&mut rng)?;
        debug!(
            employees = tables.employees.len(),
            contacts = tables.emergency_contacts.len(),
            "workforce tables loaded"
        );
        Ok(Self {
            store,
            tables: Mutex::new(tables),
            rng: Mutex::new(rng),
        })
    }

    pub fn read<T>(&self, f: impl FnOnce(&WorkforceTables) -> T) -> Result<T, StoreError> {
        let guard = self.tables.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&guard))
    }

    pub fn snapshot(&self) -> Result<WorkforceTables, StoreError> {
        self.read(Clone::clone)
    }

    pub fn mutate<T>(
        &self,
        touched: &[Table],
        f: impl FnOnce(&mut WorkforceTables, &mut StdRng) -> T,
    ) -> Result<T, StoreError> {
        let mut guard = self.tables.lock().map_err(|_| StoreError::Poisoned)?;
        let mut rng = self.rng.lock().map_err(|_| StoreError::Poisoned)?;

        let mut working = guard.clone();
        let output = f(&mut working, &mut rng);
        self.store.flush(&working, touched)?;
        *guard = working;

        Ok(output)
    }
}

/// Run `f` on tokio's blocking pool. Mutations hold the table lock while the store writes
/// files, so async handlers go through here instead of calling them inline.
pub async fn run_blocking<S, T, F>(workforce: &Arc<Workforce<S>>, f: F) -> Result<T, StoreError>
where
    S: TableStore + 'static,
    T: Send + 'static,
    F: FnOnce(&Workforce<S>) -> Result<T, StoreError> + Send + 'static,
{
    let workforce = Arc::clone(workforce);
    tokio::task::spawn_blocking(move || f(&workforce))
        .await
        .map_err(|err| StoreError::Worker(err.to_string()))?
}

/// Store that keeps the flushed tables in memory; used by tests and the offline demo.
#[derive(Debug, Default)]
pub struct MemoryTableStore {
    initial: Option<WorkforceTables>,
    flushed: Mutex<Vec<(Table, WorkforceTables)>>,
}

impl MemoryTableStore {
    pub fn new(tables: WorkforceTables) -> Self {
        Self {
            initial: Some(tables),
            flushed: Mutex::new(Vec::new()),
        }
    }

    /// Tables touched by every flush so far, in order.
    pub fn flushed_tables(&self) -> Vec<Table> {
        self.flushed
            .lock()
            .map(|guard| guard.iter().map(|(table, _)| *table).collect())
            .unwrap_or_default()
    }

    pub fn last_flush(&self) -> Option<WorkforceTables> {
        self.flushed
            .lock()
            .ok()
            .and_then(|guard| guard.last().map(|(_, tables)| tables.clone()))
    }
}

impl TableStore for MemoryTableStore {
    fn load(&self, rng: &mut StdRng) -> Result<WorkforceTables, StoreError> {
        match &self.initial {
            Some(tables) => Ok(tables.clone()),
            None => Ok(super::synthesize_tables(rng)),
        }
    }

    fn flush(&self, tables: &WorkforceTables, touched: &[Table]) -> Result<(), StoreError> {
        let mut guard = self.flushed.lock().map_err(|_| StoreError::Poisoned)?;
        for table in touched {
            guard.push((*table, tables.clone()));
        }
        Ok(())
    }
}
