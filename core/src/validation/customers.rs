use super::{stats::{count_by, percent}, write_issues};
use crate::{customer_generator::Customer, types::Segment};
use chrono::NaiveDate;
use std::{collections::BTreeMap, fmt};

/// Signup dates should cover roughly the whole five-year window.
pub const MIN_SIGNUP_SPAN_YEARS: f64 = 4.0;

#[derive(Debug, Clone)]
pub struct CustomerReport {
    pub total_records: usize,
    pub segments: BTreeMap<Segment, usize>,
    pub industries: BTreeMap<String, usize>,
    pub employee_violations: usize,
    pub revenue_violations: usize,
    pub first_signup: Option<NaiveDate>,
    pub last_signup: Option<NaiveDate>,
    pub signup_span_years: f64,
    pub issues: Vec<String>,
}

pub fn validate_customers(customers: &[Customer]) -> CustomerReport {
    let employee_violations = customers.iter().filter(|c| !c.employees_in_bounds()).count();
    let revenue_violations = customers.iter().filter(|c| !c.revenue_in_bounds()).count();
    let first_signup = customers.iter().map(|c| c.signup_date).min();
    let last_signup = customers.iter().map(|c| c.signup_date).max();
    let signup_span_years = match (first_signup, last_signup) {
        (Some(first), Some(last)) => (last - first).num_days() as f64 / 365.0,
        _ => 0.0,
    };

    let mut issues = Vec::new();
    if employee_violations > 0 {
        issues.push(format!(
            "{employee_violations} customers have invalid employee counts for their segment"
        ));
    }
    if revenue_violations > 0 {
        issues.push(format!(
            "{revenue_violations} customers have invalid revenue for their segment"
        ));
    }
    if signup_span_years < MIN_SIGNUP_SPAN_YEARS {
        issues.push(format!(
            "Signup range is too narrow: {signup_span_years:.1} years (expected ~5 years)"
        ));
    }

    CustomerReport {
        total_records: customers.len(),
        segments: count_by(customers, |c| c.segment),
        industries: count_by(customers, |c| c.industry.clone()),
        employee_violations,
        revenue_violations,
        first_signup,
        last_signup,
        signup_span_years,
        issues,
    }
}

impl fmt::Display for CustomerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== DIM_CUSTOMERS ===")?;
        writeln!(f, "  records: {}", self.total_records)?;
        writeln!(f, "  segments:")?;
        for (segment, count) in &self.segments {
            writeln!(
                f,
                "    {segment:<12} {count:>5} ({:.1}%)",
                percent(*count, self.total_records)
            )?;
        }
        writeln!(f, "  industries:")?;
        for (industry, count) in &self.industries {
            writeln!(f, "    {industry:<24} {count:>5}")?;
        }
        if let (Some(first), Some(last)) = (self.first_signup, self.last_signup) {
            writeln!(
                f,
                "  signups: {} to {} ({:.1} years)",
                crate::dates::format_date(first),
                crate::dates::format_date(last),
                self.signup_span_years
            )?;
        }
        write_issues(f, &self.issues)
    }
}
