use super::write_issues;
use crate::framework_catalog::{Framework, FrameworkKind};
use std::{collections::BTreeSet, fmt};

pub const EXPECTED_FRAMEWORK_COUNT: usize = 8;

#[derive(Debug, Clone)]
pub struct FrameworkReport {
    pub total_records: usize,
    pub names: BTreeSet<FrameworkKind>,
    pub missing: Vec<FrameworkKind>,
    pub duplicate_names: usize,
    pub duplicate_ids: usize,
    pub issues: Vec<String>,
}

/// Names outside the eight known frameworks never reach this point: the
/// table fails to load with `MalformedTable` instead.
pub fn validate_frameworks(frameworks: &[Framework]) -> FrameworkReport {
    let names: BTreeSet<FrameworkKind> = frameworks.iter().map(|f| f.framework_name).collect();
    let ids: BTreeSet<u64> = frameworks.iter().map(|f| f.framework_id).collect();
    let missing: Vec<FrameworkKind> = FrameworkKind::ALL
        .into_iter()
        .filter(|k| !names.contains(k))
        .collect();
    let duplicate_names = frameworks.len() - names.len();
    let duplicate_ids = frameworks.len() - ids.len();

    let mut issues = Vec::new();
    if frameworks.len() != EXPECTED_FRAMEWORK_COUNT {
        issues.push(format!(
            "Expected {EXPECTED_FRAMEWORK_COUNT} frameworks, got {}",
            frameworks.len()
        ));
    }
    if !missing.is_empty() {
        let list: Vec<&str> = missing.iter().map(|k| k.as_str()).collect();
        issues.push(format!("Missing frameworks: {}", list.join(", ")));
    }
    if duplicate_names > 0 {
        issues.push(format!("{duplicate_names} duplicate framework names"));
    }
    if duplicate_ids > 0 {
        issues.push(format!("{duplicate_ids} duplicate framework ids"));
    }

    FrameworkReport {
        total_records: frameworks.len(),
        names,
        missing,
        duplicate_names,
        duplicate_ids,
        issues,
    }
}

impl fmt::Display for FrameworkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== DIM_COMPLIANCE_FRAMEWORKS ===")?;
        writeln!(f, "  records: {} (expected {EXPECTED_FRAMEWORK_COUNT})", self.total_records)?;
        let names: Vec<&str> = self.names.iter().map(|k| k.as_str()).collect();
        writeln!(f, "  frameworks: {}", names.join(", "))?;
        write_issues(f, &self.issues)
    }
}
