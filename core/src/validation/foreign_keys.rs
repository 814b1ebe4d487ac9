use super::write_issues;
use crate::{
    activity_generator::ComplianceActivity,
    adoption_generator::FrameworkAdoption,
    customer_generator::Customer,
    framework_catalog::Framework,
    subscription_generator::SubscriptionEvent,
};
use std::{collections::BTreeSet, fmt};

/// Framework ids the catalog assigns.
pub const EXPECTED_FRAMEWORK_IDS: std::ops::RangeInclusive<u64> = 1..=8;

/// Tables passed in for a referential integrity check. Absent optional
/// tables are passed as empty slices.
#[derive(Debug, Clone, Copy)]
pub struct Tables<'a> {
    pub customers: &'a [Customer],
    pub frameworks: &'a [Framework],
    pub events: &'a [SubscriptionEvent],
    pub adoptions: &'a [FrameworkAdoption],
    pub activities: &'a [ComplianceActivity],
}

/// Each count is the number of distinct unresolved ids.
#[derive(Debug, Clone, Default)]
pub struct ForeignKeyReport {
    pub event_customers: usize,
    pub adoption_customers: usize,
    pub activity_customers: usize,
    pub adoption_frameworks: usize,
    pub activity_frameworks: usize,
    pub activity_adoptions: usize,
    pub framework_ids: BTreeSet<u64>,
    pub issues: Vec<String>,
}

fn orphans(referenced: impl Iterator<Item = u64>, known: &BTreeSet<u64>) -> usize {
    referenced
        .collect::<BTreeSet<_>>()
        .difference(known)
        .count()
}

pub fn validate_foreign_keys(tables: Tables<'_>) -> ForeignKeyReport {
    let customer_ids: BTreeSet<u64> = tables.customers.iter().map(|c| c.customer_id).collect();
    let framework_ids: BTreeSet<u64> = tables.frameworks.iter().map(|f| f.framework_id).collect();
    let adoption_ids: BTreeSet<u64> = tables.adoptions.iter().map(|a| a.adoption_id).collect();

    let report = ForeignKeyReport {
        event_customers: orphans(tables.events.iter().map(|e| e.customer_id), &customer_ids),
        adoption_customers: orphans(tables.adoptions.iter().map(|a| a.customer_id), &customer_ids),
        activity_customers: orphans(tables.activities.iter().map(|a| a.customer_id), &customer_ids),
        adoption_frameworks: orphans(
            tables.adoptions.iter().map(|a| a.framework_id),
            &framework_ids,
        ),
        activity_frameworks: orphans(
            tables.activities.iter().map(|a| a.framework_id),
            &framework_ids,
        ),
        activity_adoptions: orphans(tables.activities.iter().map(|a| a.adoption_id), &adoption_ids),
        framework_ids,
        issues: Vec::new(),
    };

    let mut issues = Vec::new();
    let checks = [
        (report.event_customers, "subscription events reference non-existent customers"),
        (report.adoption_customers, "framework adoptions reference non-existent customers"),
        (report.activity_customers, "activities reference non-existent customers"),
        (report.adoption_frameworks, "adoptions reference non-existent frameworks"),
        (report.activity_frameworks, "activities reference non-existent frameworks"),
        (report.activity_adoptions, "activities reference non-existent adoptions"),
    ];
    for (count, what) in checks {
        if count > 0 {
            issues.push(format!("{count} {what}"));
        }
    }
    if !report.framework_ids.iter().copied().eq(EXPECTED_FRAMEWORK_IDS) {
        issues.push(format!("Framework ids are not exactly 1-8: {:?}", report.framework_ids));
    }

    ForeignKeyReport { issues, ..report }
}

impl ForeignKeyReport {
    pub fn total_orphans(&self) -> usize {
        self.event_customers
            + self.adoption_customers
            + self.activity_customers
            + self.adoption_frameworks
            + self.activity_frameworks
            + self.activity_adoptions
    }
}

impl fmt::Display for ForeignKeyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== FOREIGN KEYS ===")?;
        writeln!(f, "  unresolved references: {}", self.total_orphans())?;
        writeln!(f, "  framework ids: {:?}", self.framework_ids)?;
        write_issues(f, &self.issues)
    }
}
