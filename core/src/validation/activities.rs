use super::{
    stats::{count_by, mean, percent},
    write_issues,
};
use crate::{
    activity_generator::{ActivityType, ComplianceActivity, ControlCategory, RiskLevel},
    adoption_generator::FrameworkAdoption,
    dates,
    types::{AdoptionId, CustomerId},
};
use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fmt,
};

pub const MAX_AUTOMATION_RATE: f64 = 0.8;
pub const SUCCESS_RATE_BAND: (f64, f64) = (0.7, 0.95);
pub const MAX_CONTROL_CHECK_MINUTES: f64 = 150.0;
pub const MIN_AUDIT_MINUTES: f64 = 200.0;

#[derive(Debug, Clone)]
pub struct ActivityReport {
    pub total_records: usize,
    pub unique_customers: usize,
    pub unique_adoptions: usize,
    pub activity_types: BTreeMap<ActivityType, usize>,
    pub control_categories: BTreeMap<ControlCategory, usize>,
    pub risk_levels: BTreeMap<RiskLevel, usize>,
    pub activities_per_customer: BTreeMap<CustomerId, usize>,
    pub activities_per_adoption: BTreeMap<AdoptionId, usize>,
    pub automation_rate: f64,
    pub success_rate: f64,
    pub evidence_rate: f64,
    /// Distinct adoption ids with no matching adoption row.
    pub orphaned_adoptions: usize,
    pub dates_outside_window: usize,
    pub avg_duration_by_type: BTreeMap<ActivityType, f64>,
    pub issues: Vec<String>,
}

impl ActivityReport {
    pub fn avg_per_customer(&self) -> f64 {
        average_count(&self.activities_per_customer)
    }

    pub fn avg_per_adoption(&self) -> f64 {
        average_count(&self.activities_per_adoption)
    }
}

fn average_count<K>(counts: &BTreeMap<K, usize>) -> f64 {
    let values: Vec<f64> = counts.values().map(|&n| n as f64).collect();
    mean(&values)
}

fn share(activities: &[ComplianceActivity], flag: impl Fn(&ComplianceActivity) -> bool) -> f64 {
    if activities.is_empty() {
        return 0.0;
    }
    activities.iter().filter(|a| flag(a)).count() as f64 / activities.len() as f64
}

/// `monitoring_window_days` is how far past completion an activity may
/// still fall.
pub fn validate_activities(
    activities: &[ComplianceActivity],
    adoptions: &[FrameworkAdoption],
    monitoring_window_days: i64,
) -> ActivityReport {
    let adoption_by_id: HashMap<AdoptionId, &FrameworkAdoption> =
        adoptions.iter().map(|a| (a.adoption_id, a)).collect();

    let referenced: BTreeSet<AdoptionId> = activities.iter().map(|a| a.adoption_id).collect();
    let orphaned_adoptions = referenced
        .iter()
        .filter(|id| !adoption_by_id.contains_key(id))
        .count();

    let dates_outside_window = activities
        .iter()
        .filter(|activity| {
            adoption_by_id.get(&activity.adoption_id).is_some_and(|adoption| {
                let window_end = dates::add_days(adoption.completion_date, monitoring_window_days);
                activity.activity_date < adoption.start_date || activity.activity_date > window_end
            })
        })
        .count();

    let mut durations: BTreeMap<ActivityType, Vec<f64>> = BTreeMap::new();
    for activity in activities {
        durations
            .entry(activity.activity_type)
            .or_default()
            .push(activity.duration_minutes as f64);
    }
    let avg_duration_by_type: BTreeMap<ActivityType, f64> =
        durations.iter().map(|(kind, values)| (*kind, mean(values))).collect();

    let automation_rate = share(activities, |a| a.automated_flag);
    let success_rate = share(activities, |a| a.success_flag);
    let evidence_rate = share(activities, |a| a.evidence_collected);

    let mut issues = Vec::new();
    if automation_rate > MAX_AUTOMATION_RATE {
        issues.push(format!(
            "Automation rate unusually high: {:.1}%",
            automation_rate * 100.0
        ));
    }
    if success_rate < SUCCESS_RATE_BAND.0 || success_rate > SUCCESS_RATE_BAND.1 {
        issues.push(format!(
            "Success rate outside expected range: {:.1}%",
            success_rate * 100.0
        ));
    }
    if orphaned_adoptions > 0 {
        issues.push(format!(
            "{orphaned_adoptions} adoption ids referenced by activities do not exist"
        ));
    }
    if dates_outside_window > 0 {
        issues.push(format!(
            "{dates_outside_window} activities have dates outside adoption timeline"
        ));
    }
    let duration_issues = avg_duration_by_type
        .iter()
        .filter(|(kind, avg)| match kind {
            ActivityType::ControlCheck => **avg > MAX_CONTROL_CHECK_MINUTES,
            ActivityType::Audit => **avg < MIN_AUDIT_MINUTES,
            _ => false,
        })
        .count();
    if duration_issues > 0 {
        issues.push(format!(
            "{duration_issues} activity types have unrealistic average durations"
        ));
    }

    let activities_per_customer = count_by(activities, |a| a.customer_id);

    ActivityReport {
        total_records: activities.len(),
        unique_customers: activities_per_customer.len(),
        unique_adoptions: referenced.len(),
        activity_types: count_by(activities, |a| a.activity_type),
        control_categories: count_by(activities, |a| a.control_category),
        risk_levels: count_by(activities, |a| a.risk_level),
        activities_per_customer,
        activities_per_adoption: count_by(activities, |a| a.adoption_id),
        automation_rate,
        success_rate,
        evidence_rate,
        orphaned_adoptions,
        dates_outside_window,
        avg_duration_by_type,
        issues,
    }
}

impl fmt::Display for ActivityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== FACT_COMPLIANCE_ACTIVITIES ===")?;
        writeln!(f, "  records: {}", self.total_records)?;
        writeln!(
            f,
            "  customers: {}  adoptions: {}",
            self.unique_customers, self.unique_adoptions
        )?;
        writeln!(f, "  activity types:")?;
        for (kind, count) in &self.activity_types {
            let avg = self.avg_duration_by_type.get(kind).copied().unwrap_or_default();
            writeln!(
                f,
                "    {:<14} {count:>7} ({:.1}%)  avg {avg:.0} min",
                kind.as_str(),
                percent(*count, self.total_records)
            )?;
        }
        writeln!(f, "  control categories:")?;
        for (category, count) in &self.control_categories {
            writeln!(
                f,
                "    {:<18} {count:>7} ({:.1}%)",
                category.as_str(),
                percent(*count, self.total_records)
            )?;
        }
        writeln!(f, "  risk levels:")?;
        for (level, count) in &self.risk_levels {
            writeln!(
                f,
                "    {:<18} {count:>7} ({:.1}%)",
                level.as_str(),
                percent(*count, self.total_records)
            )?;
        }
        writeln!(
            f,
            "  per customer: {:.1}  per adoption: {:.1}",
            self.avg_per_customer(),
            self.avg_per_adoption()
        )?;
        writeln!(f, "  automated: {:.1}%", self.automation_rate * 100.0)?;
        writeln!(f, "  successful: {:.1}%", self.success_rate * 100.0)?;
        writeln!(f, "  evidence collected: {:.1}%", self.evidence_rate * 100.0)?;
        write_issues(f, &self.issues)
    }
}
