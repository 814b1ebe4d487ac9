//! Customer attribute repair tests.

mod common;

use common::{date, raw_customers};
use phantom_core::{
    config::GenConfig,
    customer_generator::{repair_customers, RawCustomer},
    error::GenError,
    rng::StepRng,
    types::Segment,
};
use serde_json::json;

#[test]
fn employee_and_revenue_stay_inside_segment_bounds() {
    let customers = common::customers(42, 300);
    assert_eq!(customers.len(), 300);

    for c in &customers {
        let (emp_lo, emp_hi) = c.segment.employee_bounds();
        let (rev_lo, rev_hi) = c.segment.revenue_bounds();
        assert!(
            (emp_lo..=emp_hi).contains(&c.employee_count),
            "customer {} ({}) has {} employees",
            c.customer_id, c.segment, c.employee_count
        );
        assert!(
            (rev_lo..=rev_hi).contains(&c.annual_revenue),
            "customer {} ({}) has revenue {}",
            c.customer_id, c.segment, c.annual_revenue
        );
    }
}

#[test]
fn enterprise_bounds_are_the_documented_ones() {
    assert_eq!(Segment::Enterprise.employee_bounds(), (501, 10_000));
    assert_eq!(Segment::Enterprise.revenue_bounds(), (100_000_000, 1_000_000_000));
    assert_eq!(Segment::Startup.employee_bounds(), (1, 50));
    assert_eq!(Segment::MidMarket.revenue_bounds(), (5_000_000, 100_000_000));
}

#[test]
fn ids_are_sequential_from_one() {
    let customers = common::customers(7, 120);
    for (i, c) in customers.iter().enumerate() {
        assert_eq!(c.customer_id, i as u64 + 1);
    }
}

#[test]
fn signup_dates_fall_in_configured_window() {
    let config = GenConfig::default_test();
    let customers = common::customers(11, 300);
    for c in &customers {
        assert!(
            c.signup_date >= config.signup_window_start
                && c.signup_date <= config.signup_window_end,
            "signup {} outside window",
            c.signup_date
        );
    }
    assert_eq!(config.signup_window_start, date(1, 1, 2020));
    assert_eq!(config.signup_window_end, date(12, 31, 2024));
}

#[test]
fn segment_industry_and_extra_fields_are_carried_over() {
    let raw = raw_customers(9);
    let customers = common::customers(3, 9);
    for (r, c) in raw.iter().zip(&customers) {
        assert_eq!(c.segment.as_str(), r.segment);
        assert_eq!(c.industry, r.industry);
        assert_eq!(c.compliance_maturity.as_str(), r.compliance_maturity);
        assert_eq!(c.attributes.get("company_name"), r.attributes.get("company_name"));
    }
}

#[test]
fn stale_repaired_fields_are_replaced() {
    let raw: Vec<RawCustomer> = serde_json::from_value(json!([{
        "segment": "startup",
        "industry": "saas",
        "compliance_maturity": "beginner",
        "employee_count": 999_999,
        "signup_date": "01/01/1999",
        "company_name": "Acme"
    }]))
    .unwrap();

    let mut rng = StepRng::new(1, 0);
    let customers = repair_customers(raw, &GenConfig::default_test(), &mut rng).unwrap();
    let c = &customers[0];
    assert!(c.employee_count <= 50);
    assert!(c.signup_date >= date(1, 1, 2020));
    assert!(!c.attributes.contains_key("employee_count"));
    assert_eq!(c.attributes.get("company_name"), Some(&json!("Acme")));
}

#[test]
fn missing_industry_and_maturity_take_defaults() {
    let raw: Vec<RawCustomer> =
        serde_json::from_value(json!([{ "segment": "mid_market" }])).unwrap();
    let mut rng = StepRng::new(1, 0);
    let customers = repair_customers(raw, &GenConfig::default_test(), &mut rng).unwrap();
    assert_eq!(customers[0].industry, "other");
    assert_eq!(customers[0].compliance_maturity.as_str(), "intermediate");
}

#[test]
fn unknown_segment_fails_with_record_index() {
    let mut raw = raw_customers(5);
    raw[3].segment = "smb".into();

    let mut rng = StepRng::new(1, 0);
    let err = repair_customers(raw, &GenConfig::default_test(), &mut rng).unwrap_err();
    match err {
        GenError::UnknownSegment { index, value } => {
            assert_eq!(index, 3);
            assert_eq!(value, "smb");
        }
        other => panic!("expected UnknownSegment, got {other:?}"),
    }
}

#[test]
fn unknown_maturity_fails_with_record_index() {
    let mut raw = raw_customers(5);
    raw[1].compliance_maturity = "expert".into();

    let mut rng = StepRng::new(1, 0);
    let err = repair_customers(raw, &GenConfig::default_test(), &mut rng).unwrap_err();
    assert!(
        matches!(err, GenError::UnknownMaturity { index: 1, .. }),
        "expected UnknownMaturity at 1, got {err:?}"
    );
}
