//! Data quality checks over the generated tables.
//!
//! Every validator is a pure function from loaded rows to a typed report.
//! Problems are collected as human-readable issues; they are warnings and
//! never stop a run. Only a missing customer table or a table that fails to
//! parse is an error.

pub mod activities;
pub mod adoptions;
pub mod customers;
pub mod foreign_keys;
pub mod frameworks;
pub mod mrr;
pub mod stats;
pub mod subscriptions;

pub use activities::{validate_activities, ActivityReport};
pub use adoptions::{validate_adoptions, AdoptionReport};
pub use customers::{validate_customers, CustomerReport};
pub use foreign_keys::{validate_foreign_keys, ForeignKeyReport, Tables};
pub use frameworks::{validate_frameworks, FrameworkReport};
pub use mrr::{validate_mrr_consistency, MrrReport};
pub use subscriptions::{validate_subscription_events, SubscriptionReport};

use crate::{
    activity_generator::ComplianceActivity,
    adoption_generator::FrameworkAdoption,
    config::GenConfig,
    error::GenResult,
    framework_catalog::Framework,
    store::{DataStore, Table},
    subscription_generator::SubscriptionEvent,
};
use std::fmt;

/// Anything with a list of issues.
pub trait Report: fmt::Display {
    fn issues(&self) -> &[String];
}

macro_rules! impl_report {
    ($($t:ty),*) => {
        $(impl Report for $t {
            fn issues(&self) -> &[String] {
                &self.issues
            }
        })*
    };
}

impl_report!(
    CustomerReport,
    FrameworkReport,
    SubscriptionReport,
    AdoptionReport,
    ActivityReport,
    ForeignKeyReport,
    MrrReport
);

/// Result of checking a table that may be absent.
#[derive(Debug, Clone)]
pub enum TableCheck<R> {
    Checked(R),
    NoData { table: &'static str },
}

impl<R: Report> TableCheck<R> {
    fn from_rows<T>(table: Table, rows: &Option<Vec<T>>, check: impl FnOnce(&[T]) -> R) -> Self {
        match rows {
            Some(rows) if !rows.is_empty() => Self::Checked(check(rows)),
            _ => Self::NoData { table: table.file_name() },
        }
    }

    pub fn report(&self) -> Option<&R> {
        match self {
            Self::Checked(r) => Some(r),
            Self::NoData { .. } => None,
        }
    }

    pub fn issues(&self) -> &[String] {
        self.report().map(|r| r.issues()).unwrap_or_default()
    }
}

impl<R: Report> fmt::Display for TableCheck<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checked(r) => write!(f, "{r}"),
            Self::NoData { table } => writeln!(f, "=== {table} ===\n  no data loaded"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QualityReport {
    pub customers: CustomerReport,
    pub frameworks: TableCheck<FrameworkReport>,
    pub subscriptions: TableCheck<SubscriptionReport>,
    pub adoptions: TableCheck<AdoptionReport>,
    pub activities: TableCheck<ActivityReport>,
    pub foreign_keys: ForeignKeyReport,
    pub mrr: TableCheck<MrrReport>,
}

impl QualityReport {
    pub fn all_issues(&self) -> Vec<&str> {
        [
            self.customers.issues(),
            self.frameworks.issues(),
            self.subscriptions.issues(),
            self.adoptions.issues(),
            self.activities.issues(),
            self.foreign_keys.issues(),
            self.mrr.issues(),
        ]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect()
    }

    pub fn total_issues(&self) -> usize {
        self.all_issues().len()
    }
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.customers)?;
        writeln!(f, "{}", self.frameworks)?;
        writeln!(f, "{}", self.subscriptions)?;
        writeln!(f, "{}", self.adoptions)?;
        writeln!(f, "{}", self.activities)?;
        writeln!(f, "{}", self.foreign_keys)?;
        writeln!(f, "{}", self.mrr)?;
        match self.total_issues() {
            0 => write!(f, "All quality checks passed."),
            n => write!(f, "{n} issue(s) found."),
        }
    }
}

pub(crate) fn write_issues(f: &mut fmt::Formatter<'_>, issues: &[String]) -> fmt::Result {
    if issues.is_empty() {
        return writeln!(f, "  no issues");
    }
    writeln!(f, "  issues ({}):", issues.len())?;
    for issue in issues {
        writeln!(f, "    - {issue}")?;
    }
    Ok(())
}

/// Load every table from `store` and run all checks. The customer table is
/// required; any other missing table yields a "no data loaded" entry.
pub fn run_quality_checks(store: &DataStore, config: &GenConfig) -> GenResult<QualityReport> {
    let customers = store.load_customers()?;
    let frameworks: Option<Vec<Framework>> = store.read_optional(Table::Frameworks)?;
    let events: Option<Vec<SubscriptionEvent>> = store.read_optional(Table::SubscriptionEvents)?;
    let adoptions: Option<Vec<FrameworkAdoption>> = store.read_optional(Table::Adoptions)?;
    let activities: Option<Vec<ComplianceActivity>> = store.read_optional(Table::Activities)?;

    let frameworks_or_empty = frameworks.as_deref().unwrap_or_default();
    let events_or_empty = events.as_deref().unwrap_or_default();
    let adoptions_or_empty = adoptions.as_deref().unwrap_or_default();
    let activities_or_empty = activities.as_deref().unwrap_or_default();

    let report = QualityReport {
        customers: validate_customers(&customers),
        frameworks: TableCheck::from_rows(Table::Frameworks, &frameworks, validate_frameworks),
        subscriptions: TableCheck::from_rows(Table::SubscriptionEvents, &events, |rows| {
            validate_subscription_events(rows, &customers)
        }),
        adoptions: TableCheck::from_rows(Table::Adoptions, &adoptions, |rows| {
            validate_adoptions(rows, &customers, frameworks_or_empty)
        }),
        activities: TableCheck::from_rows(Table::Activities, &activities, |rows| {
            validate_activities(rows, adoptions_or_empty, config.monitoring_window_days)
        }),
        foreign_keys: validate_foreign_keys(Tables {
            customers: &customers,
            frameworks: frameworks_or_empty,
            events: events_or_empty,
            adoptions: adoptions_or_empty,
            activities: activities_or_empty,
        }),
        mrr: TableCheck::from_rows(Table::SubscriptionEvents, &events, validate_mrr_consistency),
    };

    log::info!("quality: {} issue(s) across all tables", report.total_issues());
    Ok(report)
}
