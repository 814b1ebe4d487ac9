//! DIM_CUSTOMERS: repairs the raw customer base list.
//!
//! The raw list carries segment, industry and maturity; everything that
//! depends on the segment (headcount, revenue) and the signup date is
//! (re)drawn here so every downstream generator sees consistent values.

use crate::{
    config::GenConfig,
    dates,
    error::{GenError, GenResult},
    rng::StepRng,
    types::{CustomerId, Maturity, Segment},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields the repair pass owns. Stale copies on the raw record are dropped
/// so they cannot collide with the repaired values on output.
const REPAIRED_FIELDS: [&str; 4] =
    ["customer_id", "employee_count", "annual_revenue", "signup_date"];

/// A record from the raw base list, before repair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCustomer {
    pub segment: String,
    #[serde(default = "default_industry")]
    pub industry: String,
    #[serde(default = "default_maturity")]
    pub compliance_maturity: String,
    /// Everything else on the raw record (company name, country, ...).
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

fn default_industry() -> String {
    "other".into()
}

fn default_maturity() -> String {
    Maturity::Intermediate.as_str().into()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: CustomerId,
    pub segment: Segment,
    pub industry: String,
    pub compliance_maturity: Maturity,
    pub employee_count: u64,
    pub annual_revenue: u64,
    #[serde(with = "crate::dates::mdy")]
    pub signup_date: NaiveDate,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Customer {
    pub fn employees_in_bounds(&self) -> bool {
        let (lo, hi) = self.segment.employee_bounds();
        (lo..=hi).contains(&self.employee_count)
    }

    pub fn revenue_in_bounds(&self) -> bool {
        let (lo, hi) = self.segment.revenue_bounds();
        (lo..=hi).contains(&self.annual_revenue)
    }
}

/// Repair every raw record, assigning ids from 1 in input order.
pub fn repair_customers(
    raw: Vec<RawCustomer>,
    config: &GenConfig,
    rng: &mut StepRng,
) -> GenResult<Vec<Customer>> {
    let window_days = dates::days_between(config.signup_window_start, config.signup_window_end);
    let mut customers = Vec::with_capacity(raw.len());

    for (index, record) in raw.into_iter().enumerate() {
        let segment = Segment::parse(&record.segment).ok_or_else(|| GenError::UnknownSegment {
            index,
            value: record.segment.clone(),
        })?;
        let compliance_maturity = Maturity::parse(&record.compliance_maturity).ok_or_else(|| {
            GenError::UnknownMaturity {
                index,
                value: record.compliance_maturity.clone(),
            }
        })?;

        let offset = rng.int_between(0, window_days);
        let signup_date = dates::add_days(config.signup_window_start, offset);
        let employee_count = draw_in_bounds(segment.employee_bounds(), rng);
        let annual_revenue = draw_in_bounds(segment.revenue_bounds(), rng);

        let mut attributes = record.attributes;
        for field in REPAIRED_FIELDS {
            attributes.remove(field);
        }

        customers.push(Customer {
            customer_id: index as CustomerId + 1,
            segment,
            industry: record.industry,
            compliance_maturity,
            employee_count,
            annual_revenue,
            signup_date,
            attributes,
        });
    }

    log::info!("customer: repaired {} customers", customers.len());
    Ok(customers)
}

fn draw_in_bounds((lo, hi): (u64, u64), rng: &mut StepRng) -> u64 {
    rng.int_between(lo as i64, hi as i64) as u64
}
