//! Flat JSON table persistence.
//!
//! RULE: Only store.rs touches the data directory.
//! Generators and validators receive loaded rows and return new rows;
//! they never open files themselves.

use crate::{
    activity_generator::ComplianceActivity,
    adoption_generator::FrameworkAdoption,
    customer_generator::{Customer, RawCustomer},
    error::{GenError, GenResult},
    framework_catalog::Framework,
    subscription_generator::SubscriptionEvent,
    types::RunId,
};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Every file the pipeline reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    RawCustomers,
    Customers,
    Frameworks,
    Adoptions,
    SubscriptionEvents,
    Activities,
    RunLog,
}

impl Table {
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::RawCustomers       => "MOCK_DATA_ORIGINAL.json",
            Self::Customers          => "DIM_CUSTOMERS.json",
            Self::Frameworks         => "DIM_COMPLIANCE_FRAMEWORKS.json",
            Self::Adoptions          => "FACT_FRAMEWORK_ADOPTIONS.json",
            Self::SubscriptionEvents => "FACT_SUBSCRIPTION_EVENTS.json",
            Self::Activities         => "FACT_COMPLIANCE_ACTIVITIES.json",
            Self::RunLog             => "GENERATION_RUNS.json",
        }
    }
}

/// One row per generation step, appended to GENERATION_RUNS.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_id:          RunId,
    pub step:            String,
    pub seed:            u64,
    pub version:         String,
    pub generated_at:    DateTime<Utc>,
    pub records_written: usize,
}

#[derive(Debug, Clone)]
pub struct DataStore {
    dir: PathBuf,
}

impl DataStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, table: Table) -> PathBuf {
        self.dir.join(table.file_name())
    }

    pub fn exists(&self, table: Table) -> bool {
        self.path(table).is_file()
    }

    /// Read a required table. A missing file is `MissingInputFile`,
    /// bad JSON or a bad field value is `MalformedTable`.
    pub fn read_table<T: DeserializeOwned>(&self, table: Table) -> GenResult<Vec<T>> {
        let path = self.path(table);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(GenError::MissingInputFile { path });
            }
            Err(e) => return Err(e.into()),
        };
        let rows = serde_json::from_str(&content)
            .map_err(|source| GenError::MalformedTable { path: path.clone(), source })?;
        Ok(rows)
    }

    /// Read a table that may legitimately be absent.
    pub fn read_optional<T: DeserializeOwned>(&self, table: Table) -> GenResult<Option<Vec<T>>> {
        match self.read_table(table) {
            Ok(rows) => Ok(Some(rows)),
            Err(GenError::MissingInputFile { path }) => {
                log::warn!("store: {} not found, skipping", path.display());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Write a table as a pretty-printed JSON array.
    /// The file is written beside the target and renamed into place so a
    /// failed write never leaves a half-written table behind.
    pub fn write_table<T: Serialize>(&self, table: Table, rows: &[T]) -> GenResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path(table);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(rows)?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        log::debug!("store: wrote {} rows to {}", rows.len(), path.display());
        Ok(())
    }

    // ── Typed accessors ────────────────────────────────────────

    pub fn load_raw_customers(&self) -> GenResult<Vec<RawCustomer>> {
        self.read_table(Table::RawCustomers)
    }

    pub fn load_customers(&self) -> GenResult<Vec<Customer>> {
        self.read_table(Table::Customers)
    }

    pub fn save_customers(&self, rows: &[Customer]) -> GenResult<()> {
        self.write_table(Table::Customers, rows)
    }

    pub fn load_frameworks(&self) -> GenResult<Vec<Framework>> {
        self.read_table(Table::Frameworks)
    }

    pub fn save_frameworks(&self, rows: &[Framework]) -> GenResult<()> {
        self.write_table(Table::Frameworks, rows)
    }

    pub fn load_adoptions(&self) -> GenResult<Vec<FrameworkAdoption>> {
        self.read_table(Table::Adoptions)
    }

    pub fn save_adoptions(&self, rows: &[FrameworkAdoption]) -> GenResult<()> {
        self.write_table(Table::Adoptions, rows)
    }

    pub fn load_subscription_events(&self) -> GenResult<Vec<SubscriptionEvent>> {
        self.read_table(Table::SubscriptionEvents)
    }

    pub fn save_subscription_events(&self, rows: &[SubscriptionEvent]) -> GenResult<()> {
        self.write_table(Table::SubscriptionEvents, rows)
    }

    pub fn load_activities(&self) -> GenResult<Vec<ComplianceActivity>> {
        self.read_table(Table::Activities)
    }

    pub fn save_activities(&self, rows: &[ComplianceActivity]) -> GenResult<()> {
        self.write_table(Table::Activities, rows)
    }

    // ── Run log ────────────────────────────────────────────────

    pub fn run_log(&self) -> GenResult<Vec<RunRecord>> {
        if !self.exists(Table::RunLog) {
            return Ok(Vec::new());
        }
        self.read_table(Table::RunLog)
    }

    pub fn append_run(&self, record: RunRecord) -> GenResult<()> {
        let mut runs = self.run_log()?;
        runs.push(record);
        self.write_table(Table::RunLog, &runs)
    }
}
