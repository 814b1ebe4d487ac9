//! Fixtures shared by the integration tests.
#![allow(dead_code)]

use chrono::NaiveDate;
use phantom_core::{
    config::GenConfig,
    customer_generator::{repair_customers, Customer, RawCustomer},
    rng::{GeneratorSlot, RngBank},
    store::DataStore,
    types::{Maturity, Segment},
};
use serde_json::{json, Map, Value};
use std::path::PathBuf;

pub const INDUSTRIES: [&str; 6] = [
    "saas",
    "fintech",
    "healthtech",
    "ecommerce",
    "government_contractors",
    "other",
];

pub fn date(m: u32, d: u32, y: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// `n` raw records cycling through every segment, industry and maturity.
pub fn raw_customers(n: usize) -> Vec<RawCustomer> {
    (0..n)
        .map(|i| {
            let mut attributes = Map::new();
            attributes.insert("company_name".into(), json!(format!("Company {i}")));
            attributes.insert("country".into(), json!("United States"));
            RawCustomer {
                segment: Segment::ALL[i % 3].as_str().into(),
                industry: INDUSTRIES[i % INDUSTRIES.len()].into(),
                compliance_maturity: Maturity::ALL[(i / 3) % 3].as_str().into(),
                attributes,
            }
        })
        .collect()
}

pub fn customers(seed: u64, n: usize) -> Vec<Customer> {
    let mut rng = RngBank::new(seed).for_step(GeneratorSlot::Customer);
    repair_customers(raw_customers(n), &GenConfig::default_test(), &mut rng)
        .expect("fixture customers repair")
}

pub fn customer(
    customer_id: u64,
    segment: Segment,
    industry: &str,
    maturity: Maturity,
    signup_date: NaiveDate,
) -> Customer {
    let (employee_count, _) = segment.employee_bounds();
    let (annual_revenue, _) = segment.revenue_bounds();
    Customer {
        customer_id,
        segment,
        industry: industry.into(),
        compliance_maturity: maturity,
        employee_count,
        annual_revenue,
        signup_date,
        attributes: Map::<String, Value>::new(),
    }
}

/// A fresh, empty data directory under the system temp dir.
pub fn temp_store() -> DataStore {
    let dir: PathBuf = std::env::temp_dir().join(format!("phantom-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp data dir");
    DataStore::new(dir)
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
