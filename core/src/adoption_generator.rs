//! FACT_FRAMEWORK_ADOPTIONS: which frameworks each customer takes on.
//!
//! Adoption decisions are independent coin flips per framework, weighted by
//! industry, segment and maturity. Each adoption then gets a start and
//! completion date and four derived metrics. Rows are never mutated after
//! creation.

use crate::{
    config::GenConfig,
    customer_generator::Customer,
    dates,
    error::{GenError, GenResult},
    framework_catalog::{find_kind, Framework, FrameworkKind},
    rng::StepRng,
    types::{AdoptionId, CustomerId, FrameworkId, Maturity, Segment},
    weights::Weighted,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MAX_ADOPTION_PROBABILITY: f64 = 0.95;
/// SOC2 Type II without Type I in the same pass.
pub const SOC2_TYPE_II_WITHOUT_TYPE_I: f64 = 0.3;
/// When a customer adopts nothing, SOC2_Type_I is forced and NIST_CSF
/// follows with this probability.
pub const FALLBACK_NIST_PROBABILITY: f64 = 0.7;
pub const MIN_COMPLETION_DAYS: i64 = 30;
pub const COMPLETION_JITTER_DAYS: i64 = 30;
pub const AUDIT_SCORE_FLOOR: i64 = 50;
pub const AUDIT_SCORE_CEILING: i64 = 98;
pub const MIN_HOURS_SAVED: u64 = 50;

pub const FINISHED_STATUS_WEIGHTS: Weighted<AdoptionStatus> = Weighted::new(&[
    (AdoptionStatus::Completed, 0.67),
    (AdoptionStatus::Certified, 0.33),
]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdoptionStatus {
    Active,
    Completed,
    Certified,
}

impl AdoptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active    => "active",
            Self::Completed => "completed",
            Self::Certified => "certified",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameworkAdoption {
    pub adoption_id: AdoptionId,
    pub customer_id: CustomerId,
    pub framework_id: FrameworkId,
    #[serde(with = "crate::dates::mdy")]
    pub start_date: NaiveDate,
    #[serde(with = "crate::dates::mdy")]
    pub completion_date: NaiveDate,
    pub status: AdoptionStatus,
    pub audit_score: u32,
    pub hours_saved: u64,
    pub implementation_cost: u64,
    pub automation_level: u32,
}

// ── Adoption probability ─────────────────────────────────────────────────────

/// USA-wide base rate for a framework.
pub fn framework_base_rate(kind: FrameworkKind) -> f64 {
    match kind {
        FrameworkKind::Soc2TypeI  => 0.95,
        FrameworkKind::Soc2TypeII => 0.70,
        FrameworkKind::Iso27001   => 0.40,
        FrameworkKind::Hipaa      => 0.05,
        FrameworkKind::Gdpr       => 0.35,
        FrameworkKind::PciDss     => 0.15,
        FrameworkKind::FedRamp    => 0.02,
        FrameworkKind::NistCsf    => 0.75,
    }
}

/// Share of customers (percent) expected to hold each framework, for the
/// frameworks whose rate is steered by the probabilities above.
pub fn expected_rate_band(kind: FrameworkKind) -> Option<(f64, f64)> {
    match kind {
        FrameworkKind::Soc2TypeI  => Some((90.0, 98.0)),
        FrameworkKind::Soc2TypeII => Some((60.0, 80.0)),
        FrameworkKind::NistCsf    => Some((65.0, 85.0)),
        FrameworkKind::Iso27001   => Some((30.0, 50.0)),
        FrameworkKind::Gdpr       => Some((25.0, 45.0)),
        _ => None,
    }
}

/// Industry-specific rate that replaces the base rate outright.
pub fn industry_override(industry: &str, kind: FrameworkKind) -> Option<f64> {
    use FrameworkKind::*;
    let rate = match (industry, kind) {
        ("healthtech", Hipaa)      => 0.95,
        ("healthtech", Soc2TypeI)  => 0.98,
        ("healthtech", Soc2TypeII) => 0.85,
        ("healthtech", Gdpr)       => 0.45,

        ("fintech", PciDss)     => 0.90,
        ("fintech", Soc2TypeI)  => 0.98,
        ("fintech", Soc2TypeII) => 0.85,
        ("fintech", FedRamp)    => 0.15,

        ("ecommerce", PciDss)    => 0.90,
        ("ecommerce", Gdpr)      => 0.50,
        ("ecommerce", Soc2TypeI) => 0.95,

        ("government_contractors", FedRamp)   => 0.80,
        ("government_contractors", NistCsf)   => 0.95,
        ("government_contractors", Soc2TypeI) => 0.90,

        ("saas", Soc2TypeI)  => 0.98,
        ("saas", Soc2TypeII) => 0.80,
        ("saas", Iso27001)   => 0.55,
        ("saas", Gdpr)       => 0.45,

        _ => return None,
    };
    Some(rate)
}

/// Probability before segment and maturity adjustments.
pub fn base_adoption_probability(industry: &str, kind: FrameworkKind) -> f64 {
    industry_override(industry, kind).unwrap_or_else(|| framework_base_rate(kind))
}

/// Full adoption probability for one customer/framework pair, excluding
/// the SOC2 prerequisite (which depends on earlier draws in the pass).
pub fn adoption_probability(customer: &Customer, kind: FrameworkKind) -> f64 {
    let mut p = base_adoption_probability(&customer.industry, kind);

    match customer.segment {
        Segment::Enterprise => p = (p * 1.2).min(MAX_ADOPTION_PROBABILITY),
        Segment::Startup => {
            if !matches!(kind, FrameworkKind::Soc2TypeI | FrameworkKind::NistCsf) {
                p *= 0.8;
            }
        }
        Segment::MidMarket => {}
    }

    match customer.compliance_maturity {
        Maturity::Advanced => p = (p * 1.15).min(MAX_ADOPTION_PROBABILITY),
        Maturity::Beginner => {
            if kind != FrameworkKind::Soc2TypeI {
                p *= 0.7;
            }
        }
        Maturity::Intermediate => {}
    }

    p.min(MAX_ADOPTION_PROBABILITY)
}

/// Decide which frameworks a customer adopts, in catalog order.
pub fn choose_frameworks<'a>(
    customer: &Customer,
    frameworks: &'a [Framework],
    rng: &mut StepRng,
) -> GenResult<Vec<&'a Framework>> {
    let mut adopted = Vec::new();
    let mut has_soc2_type_i = false;

    for framework in frameworks {
        let kind = framework.framework_name;
        let mut p = adoption_probability(customer, kind);
        if kind == FrameworkKind::Soc2TypeII && !has_soc2_type_i {
            p *= SOC2_TYPE_II_WITHOUT_TYPE_I;
        }

        if rng.chance(p) {
            adopted.push(framework);
            if kind == FrameworkKind::Soc2TypeI {
                has_soc2_type_i = true;
            }
        }
    }

    if adopted.is_empty() {
        adopted.push(required_kind(frameworks, FrameworkKind::Soc2TypeI)?);
        let nist = required_kind(frameworks, FrameworkKind::NistCsf)?;
        if rng.chance(FALLBACK_NIST_PROBABILITY) {
            adopted.push(nist);
        }
    }

    Ok(adopted)
}

fn required_kind(frameworks: &[Framework], kind: FrameworkKind) -> GenResult<&Framework> {
    find_kind(frameworks, kind).ok_or_else(|| GenError::MissingFramework {
        name: kind.as_str().into(),
    })
}

// ── Timeline ─────────────────────────────────────────────────────────────────

fn maturity_pace(maturity: Maturity) -> f64 {
    match maturity {
        Maturity::Advanced     => 0.8,
        Maturity::Intermediate => 1.0,
        Maturity::Beginner     => 1.3,
    }
}

/// Days from start to completion: the framework average scaled by pace,
/// jittered by ±30 days, never under 30.
pub fn completion_days(framework: &Framework, maturity: Maturity, rng: &mut StepRng) -> i64 {
    let scaled = (framework.avg_completion_days as f64 * maturity_pace(maturity)) as i64;
    let jitter = rng.int_between(-COMPLETION_JITTER_DAYS, COMPLETION_JITTER_DAYS);
    (scaled + jitter).max(MIN_COMPLETION_DAYS)
}

pub fn adoption_dates(
    customer: &Customer,
    framework: &Framework,
    config: &GenConfig,
    rng: &mut StepRng,
) -> (NaiveDate, NaiveDate) {
    let start = dates::add_days(
        customer.signup_date,
        rng.int_between(0, config.adoption_start_max_delay_days),
    );
    let days = completion_days(framework, customer.compliance_maturity, rng);
    let completion = dates::add_days(start, days);
    (start, completion)
}

/// `active` while the completion date is still ahead of `today`.
pub fn determine_status(
    completion: NaiveDate,
    today: NaiveDate,
    rng: &mut StepRng,
) -> AdoptionStatus {
    if completion > today {
        AdoptionStatus::Active
    } else {
        FINISHED_STATUS_WEIGHTS.sample(rng)
    }
}

// ── Derived metrics ──────────────────────────────────────────────────────────

/// Audit score in [50, 98]. Harder frameworks shift the maturity range down.
pub fn audit_score(customer: &Customer, framework: &Framework, rng: &mut StepRng) -> u32 {
    let (base_lo, base_hi) = match customer.compliance_maturity {
        Maturity::Advanced     => (85, 98),
        Maturity::Intermediate => (75, 90),
        Maturity::Beginner     => (65, 85),
    };
    let penalty = (framework.complexity_score as i64 - 5) * 2;

    let lo = (base_lo - penalty).max(AUDIT_SCORE_FLOOR);
    let hi = (base_hi - penalty).max(lo + 10).min(AUDIT_SCORE_CEILING);
    rng.int_between(lo, hi) as u32
}

pub fn hours_saved(customer: &Customer, framework: &Framework, rng: &mut StepRng) -> u64 {
    let segment_mult = match customer.segment {
        Segment::Startup    => 0.7,
        Segment::MidMarket  => 1.0,
        Segment::Enterprise => 1.5,
    };
    let maturity_mult = match customer.compliance_maturity {
        Maturity::Beginner     => 0.8,
        Maturity::Intermediate => 1.0,
        Maturity::Advanced     => 1.3,
    };

    let base_hours = framework.complexity_score as f64 * 200.0;
    let hours = base_hours
        * segment_mult
        * maturity_mult
        * (framework.automation_percentage as f64 / 100.0)
        * rng.float_between(0.8, 1.2);
    (hours as u64).max(MIN_HOURS_SAVED)
}

pub fn implementation_cost(customer: &Customer, framework: &Framework, rng: &mut StepRng) -> u64 {
    let (lo, hi) = match customer.segment {
        Segment::Startup    => (0.5, 0.8),
        Segment::MidMarket  => (0.8, 1.2),
        Segment::Enterprise => (1.0, 2.0),
    };
    (framework.certification_cost_usd as f64 * rng.float_between(lo, hi)) as u64
}

/// Automation achieved, 0–100.
pub fn automation_level(customer: &Customer, framework: &Framework, rng: &mut StepRng) -> u32 {
    let (lo, hi) = match customer.compliance_maturity {
        Maturity::Advanced     => (10.0, 20.0),
        Maturity::Intermediate => (-5.0, 5.0),
        Maturity::Beginner     => (-15.0, -10.0),
    };
    let level = framework.automation_percentage as f64 + rng.float_between(lo, hi);
    level.clamp(0.0, 100.0) as u32
}

// ── Generation ───────────────────────────────────────────────────────────────

pub fn generate_adoptions(
    customers: &[Customer],
    frameworks: &[Framework],
    config: &GenConfig,
    rng: &mut StepRng,
) -> GenResult<Vec<FrameworkAdoption>> {
    let mut adoptions = Vec::new();
    let mut next_id: AdoptionId = 1;

    for (i, customer) in customers.iter().enumerate() {
        for framework in choose_frameworks(customer, frameworks, rng)? {
            let (start_date, completion_date) = adoption_dates(customer, framework, config, rng);
            let status = determine_status(completion_date, config.today, rng);

            adoptions.push(FrameworkAdoption {
                adoption_id: next_id,
                customer_id: customer.customer_id,
                framework_id: framework.framework_id,
                start_date,
                completion_date,
                status,
                audit_score: audit_score(customer, framework, rng),
                hours_saved: hours_saved(customer, framework, rng),
                implementation_cost: implementation_cost(customer, framework, rng),
                automation_level: automation_level(customer, framework, rng),
            });
            next_id += 1;
        }

        if (i + 1) % 50 == 0 {
            log::debug!("adoption: processed {}/{} customers", i + 1, customers.len());
        }
    }

    log::info!(
        "adoption: {} adoptions across {} customers",
        adoptions.len(),
        customers.len()
    );
    Ok(adoptions)
}
