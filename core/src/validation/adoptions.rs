use super::{stats::{count_by, percent}, write_issues};
use crate::{
    adoption_generator::{expected_rate_band, AdoptionStatus, FrameworkAdoption},
    customer_generator::Customer,
    framework_catalog::Framework,
    types::{CustomerId, FrameworkId},
};
use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fmt,
};

#[derive(Debug, Clone)]
pub struct FrameworkRate {
    pub framework_id: FrameworkId,
    /// Catalog name, or `framework <id>` when the catalog lacks the id.
    pub label: String,
    pub adoptions: usize,
    /// Percent of all customers.
    pub rate: f64,
    pub expected: Option<(f64, f64)>,
}

impl FrameworkRate {
    pub fn within_expected(&self) -> bool {
        self.expected
            .map_or(true, |(lo, hi)| (lo..=hi).contains(&self.rate))
    }
}

#[derive(Debug, Clone)]
pub struct AdoptionReport {
    pub total_records: usize,
    pub total_customers: usize,
    pub customers_with_adoptions: usize,
    pub customers_without_adoptions: usize,
    pub framework_rates: Vec<FrameworkRate>,
    pub statuses: BTreeMap<AdoptionStatus, usize>,
    /// Adoptions whose completion is not after their start.
    pub temporal_issues: usize,
    pub issues: Vec<String>,
}

pub fn validate_adoptions(
    adoptions: &[FrameworkAdoption],
    customers: &[Customer],
    frameworks: &[Framework],
) -> AdoptionReport {
    let adopters: BTreeSet<CustomerId> = adoptions.iter().map(|a| a.customer_id).collect();
    let customers_without_adoptions = customers
        .iter()
        .filter(|c| !adopters.contains(&c.customer_id))
        .count();
    let temporal_issues = adoptions
        .iter()
        .filter(|a| a.completion_date <= a.start_date)
        .count();

    let catalog: HashMap<FrameworkId, &Framework> =
        frameworks.iter().map(|f| (f.framework_id, f)).collect();
    let framework_rates: Vec<FrameworkRate> = count_by(adoptions, |a| a.framework_id)
        .into_iter()
        .map(|(framework_id, count)| {
            let kind = catalog.get(&framework_id).map(|f| f.framework_name);
            FrameworkRate {
                framework_id,
                label: kind.map_or_else(|| format!("framework {framework_id}"), |k| k.to_string()),
                adoptions: count,
                rate: percent(count, customers.len()),
                expected: kind.and_then(expected_rate_band),
            }
        })
        .collect();

    let mut issues = Vec::new();
    if customers_without_adoptions > 0 {
        issues.push(format!("{customers_without_adoptions} customers have no framework adoptions"));
    }
    for rate in framework_rates.iter().filter(|r| !r.within_expected()) {
        if let Some((lo, hi)) = rate.expected {
            issues.push(format!(
                "{} adoption rate {:.1}% outside expected range {lo}-{hi}%",
                rate.label, rate.rate
            ));
        }
    }
    if temporal_issues > 0 {
        issues.push(format!("{temporal_issues} adoptions have invalid date sequences"));
    }

    AdoptionReport {
        total_records: adoptions.len(),
        total_customers: customers.len(),
        customers_with_adoptions: adopters.len(),
        customers_without_adoptions,
        framework_rates,
        statuses: count_by(adoptions, |a| a.status),
        temporal_issues,
        issues,
    }
}

impl fmt::Display for AdoptionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== FACT_FRAMEWORK_ADOPTIONS ===")?;
        writeln!(f, "  records: {}", self.total_records)?;
        writeln!(
            f,
            "  customers with adoptions: {}/{}",
            self.customers_with_adoptions, self.total_customers
        )?;
        writeln!(f, "  adoption rates:")?;
        for rate in &self.framework_rates {
            let band = rate
                .expected
                .map(|(lo, hi)| format!(" (expected {lo}-{hi}%)"))
                .unwrap_or_default();
            let mark = if rate.within_expected() { "ok" } else { "!!" };
            writeln!(
                f,
                "    {:<14} {:>5} ({:.1}%){band} {mark}",
                rate.label, rate.adoptions, rate.rate
            )?;
        }
        writeln!(f, "  statuses:")?;
        for (status, count) in &self.statuses {
            writeln!(
                f,
                "    {:<10} {count:>5} ({:.1}%)",
                status.as_str(),
                percent(*count, self.total_records)
            )?;
        }
        write_issues(f, &self.issues)
    }
}
