//! Framework adoption simulator tests.

mod common;

use common::{customer, date, INDUSTRIES};
use phantom_core::{
    adoption_generator::{
        adoption_probability, audit_score, base_adoption_probability, completion_days,
        generate_adoptions, AdoptionStatus, MAX_ADOPTION_PROBABILITY,
    },
    config::GenConfig,
    error::GenError,
    framework_catalog::{catalog, find_kind, FrameworkKind},
    rng::StepRng,
    types::{Maturity, Segment},
};
use std::collections::BTreeSet;

#[test]
fn hipaa_base_probability_depends_on_industry() {
    assert_eq!(base_adoption_probability("healthtech", FrameworkKind::Hipaa), 0.95);
    assert_eq!(base_adoption_probability("saas", FrameworkKind::Hipaa), 0.05);
    assert_eq!(base_adoption_probability("other", FrameworkKind::FedRamp), 0.02);
    assert_eq!(
        base_adoption_probability("government_contractors", FrameworkKind::FedRamp),
        0.80
    );
}

#[test]
fn adjusted_probability_never_exceeds_cap() {
    for industry in INDUSTRIES {
        for segment in Segment::ALL {
            for maturity in Maturity::ALL {
                let c = customer(1, segment, industry, maturity, date(1, 1, 2022));
                for kind in FrameworkKind::ALL {
                    let p = adoption_probability(&c, kind);
                    assert!(
                        (0.0..=MAX_ADOPTION_PROBABILITY).contains(&p),
                        "{industry}/{segment}/{maturity}/{kind}: p={p}"
                    );
                }
            }
        }
    }
}

#[test]
fn startup_beginner_keeps_full_soc2_type_i_rate() {
    let c = customer(1, Segment::Startup, "saas", Maturity::Beginner, date(1, 1, 2022));
    assert_eq!(adoption_probability(&c, FrameworkKind::Soc2TypeI), 0.95);
    // ISO27001 for saas: 0.55 × 0.8 (startup) × 0.7 (beginner)
    let iso = adoption_probability(&c, FrameworkKind::Iso27001);
    assert!((iso - 0.308).abs() < 1e-9, "iso={iso}");
}

#[test]
fn advanced_maturity_completion_days_for_90_day_framework() {
    let frameworks = catalog();
    let soc2 = find_kind(&frameworks, FrameworkKind::Soc2TypeI).unwrap();
    assert_eq!(soc2.avg_completion_days, 90);

    let mut rng = StepRng::new(5, 1);
    for _ in 0..2_000 {
        let days = completion_days(soc2, Maturity::Advanced, &mut rng);
        assert!((42..=102).contains(&days), "completion days {days}");
    }
}

#[test]
fn completion_days_are_floored_at_thirty() {
    let mut quick = catalog()[0].clone();
    quick.avg_completion_days = 10;

    let mut rng = StepRng::new(6, 1);
    let min = (0..500)
        .map(|_| completion_days(&quick, Maturity::Advanced, &mut rng))
        .min()
        .unwrap();
    assert_eq!(min, 30);
}

#[test]
fn audit_scores_stay_between_50_and_98() {
    let frameworks = catalog();
    let mut rng = StepRng::new(8, 1);
    for maturity in Maturity::ALL {
        let c = customer(1, Segment::MidMarket, "saas", maturity, date(1, 1, 2022));
        for f in &frameworks {
            for _ in 0..200 {
                let score = audit_score(&c, f, &mut rng);
                assert!((50..=98).contains(&score), "{maturity}/{}: {score}", f.framework_name);
            }
        }
    }
}

#[test]
fn generated_adoptions_are_consistent() {
    let config = GenConfig::default_test();
    let customers = common::customers(42, 300);
    let frameworks = catalog();
    let mut rng = StepRng::new(42, 1);
    let adoptions = generate_adoptions(&customers, &frameworks, &config, &mut rng).unwrap();

    let adopters: BTreeSet<u64> = adoptions.iter().map(|a| a.customer_id).collect();
    assert_eq!(adopters.len(), customers.len(), "every customer adopts at least one framework");

    for (i, a) in adoptions.iter().enumerate() {
        assert_eq!(a.adoption_id, i as u64 + 1);
        assert!(
            a.completion_date > a.start_date,
            "adoption {} completes {} before start {}",
            a.adoption_id, a.completion_date, a.start_date
        );
        let is_active = a.status == AdoptionStatus::Active;
        assert_eq!(is_active, a.completion_date > config.today, "adoption {}", a.adoption_id);
        assert!(a.automation_level <= 100);
        assert!(a.hours_saved >= 50);
        assert!((50..=98).contains(&a.audit_score));
    }
}

#[test]
fn start_date_is_within_a_year_of_signup() {
    let config = GenConfig::default_test();
    let customers = common::customers(9, 100);
    let mut rng = StepRng::new(9, 1);
    let adoptions = generate_adoptions(&customers, &catalog(), &config, &mut rng).unwrap();

    for a in &adoptions {
        let signup = customers[(a.customer_id - 1) as usize].signup_date;
        let delay = (a.start_date - signup).num_days();
        assert!(
            (0..=365).contains(&delay),
            "adoption {} starts {delay} days after signup",
            a.adoption_id
        );
    }
}

#[test]
fn soc2_type_i_is_the_most_adopted_framework() {
    let customers = common::customers(21, 300);
    let mut rng = StepRng::new(21, 1);
    let adoptions =
        generate_adoptions(&customers, &catalog(), &GenConfig::default_test(), &mut rng).unwrap();

    let count = |id: u64| adoptions.iter().filter(|a| a.framework_id == id).count();
    let soc2_type_i = count(1);
    for id in 2..=8 {
        assert!(soc2_type_i >= count(id), "framework {id} outnumbers SOC2_Type_I");
    }
}

#[test]
fn fallback_needs_soc2_type_i_in_catalog() {
    let fedramp_only: Vec<_> = catalog()
        .into_iter()
        .filter(|f| f.framework_name == FrameworkKind::FedRamp)
        .collect();
    let customers = common::customers(4, 50);
    let mut rng = StepRng::new(4, 1);

    let err = generate_adoptions(&customers, &fedramp_only, &GenConfig::default_test(), &mut rng)
        .unwrap_err();
    assert!(
        matches!(&err, GenError::MissingFramework { name } if name == "SOC2_Type_I"),
        "got {err:?}"
    );
}
