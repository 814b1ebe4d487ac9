//! FACT_COMPLIANCE_ACTIVITIES: the day-to-day compliance work behind each
//! adoption.
//!
//! Activities cluster around the start and the completion of an adoption
//! and keep arriving through a monitoring window after completion.

use crate::{
    adoption_generator::FrameworkAdoption,
    config::GenConfig,
    customer_generator::Customer,
    dates,
    error::{GenError, GenResult},
    framework_catalog::Framework,
    rng::StepRng,
    types::{ActivityId, AdoptionId, CustomerId, FrameworkId, Maturity, Segment},
    weights::Weighted,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const MAX_SUCCESS_RATE: f64 = 0.98;
pub const FAILED_EVIDENCE_FACTOR: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    ControlCheck,
    Questionnaire,
    Remediation,
    Training,
    Audit,
}

impl ActivityType {
    pub const ALL: [ActivityType; 5] = [
        Self::ControlCheck,
        Self::Questionnaire,
        Self::Remediation,
        Self::Training,
        Self::Audit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ControlCheck  => "control_check",
            Self::Questionnaire => "questionnaire",
            Self::Remediation   => "remediation",
            Self::Training      => "training",
            Self::Audit         => "audit",
        }
    }

    /// Audits and training always need a person.
    pub fn can_automate(&self) -> bool {
        !matches!(self, Self::Audit | Self::Training)
    }

    /// Duration range in minutes, inclusive.
    pub fn duration_range(&self, automated: bool) -> (i64, i64) {
        match (self, automated) {
            (Self::ControlCheck, true)   => (5, 30),
            (Self::ControlCheck, false)  => (30, 120),
            (Self::Questionnaire, true)  => (10, 45),
            (Self::Questionnaire, false) => (60, 240),
            (Self::Remediation, true)    => (30, 90),
            (Self::Remediation, false)   => (120, 480),
            (Self::Audit, _)             => (240, 480),
            (Self::Training, _)          => (60, 180),
        }
    }

    pub fn evidence_rate(&self) -> f64 {
        match self {
            Self::ControlCheck  => 0.90,
            Self::Questionnaire => 0.85,
            Self::Audit         => 0.95,
            Self::Remediation   => 0.70,
            Self::Training      => 0.60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlCategory {
    AccessControl,
    DataProtection,
    NetworkSecurity,
    Monitoring,
    IncidentResponse,
}

impl ControlCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessControl    => "access_control",
            Self::DataProtection   => "data_protection",
            Self::NetworkSecurity  => "network_security",
            Self::Monitoring       => "monitoring",
            Self::IncidentResponse => "incident_response",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low      => "low",
            Self::Medium   => "medium",
            Self::High     => "high",
            Self::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Middle,
    Completion,
    Post,
}

pub const ACTIVITY_TYPE_WEIGHTS: Weighted<ActivityType> = Weighted::new(&[
    (ActivityType::ControlCheck, 0.50),
    (ActivityType::Questionnaire, 0.20),
    (ActivityType::Remediation, 0.15),
    (ActivityType::Training, 0.10),
    (ActivityType::Audit, 0.05),
]);

pub const CONTROL_CATEGORY_WEIGHTS: Weighted<ControlCategory> = Weighted::new(&[
    (ControlCategory::AccessControl, 0.25),
    (ControlCategory::DataProtection, 0.25),
    (ControlCategory::NetworkSecurity, 0.20),
    (ControlCategory::Monitoring, 0.20),
    (ControlCategory::IncidentResponse, 0.10),
]);

pub const RISK_LEVEL_WEIGHTS: Weighted<RiskLevel> = Weighted::new(&[
    (RiskLevel::Low, 0.40),
    (RiskLevel::Medium, 0.30),
    (RiskLevel::High, 0.20),
    (RiskLevel::Critical, 0.10),
]);

pub const PHASE_WEIGHTS: Weighted<Phase> = Weighted::new(&[
    (Phase::Start, 0.4),
    (Phase::Middle, 0.2),
    (Phase::Completion, 0.3),
    (Phase::Post, 0.1),
]);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceActivity {
    pub activity_id: ActivityId,
    pub customer_id: CustomerId,
    pub framework_id: FrameworkId,
    pub adoption_id: AdoptionId,
    #[serde(with = "crate::dates::mdy")]
    pub activity_date: NaiveDate,
    pub activity_type: ActivityType,
    pub control_category: ControlCategory,
    pub automated_flag: bool,
    pub duration_minutes: u32,
    pub success_flag: bool,
    pub risk_level: RiskLevel,
    pub evidence_collected: bool,
}

// ── Volume and timing ────────────────────────────────────────────────────────

pub fn activity_count(
    framework: &Framework,
    customer: &Customer,
    config: &GenConfig,
    rng: &mut StepRng,
) -> u64 {
    let segment_mult = match customer.segment {
        Segment::Startup    => 0.7,
        Segment::MidMarket  => 1.0,
        Segment::Enterprise => 1.4,
    };
    let base = framework.complexity_score as i64 * rng.int_between(10, 20);
    let scaled = (base as f64 * segment_mult) as i64;
    let varied = (scaled as f64 * rng.float_between(0.8, 1.2)) as u64;
    varied.max(config.min_activities_per_adoption)
}

/// Day offset from the adoption start for one activity in `phase`.
///
/// `total_days` spans start to completion plus the monitoring window;
/// `completion_offset` is completion minus start. Each range keeps at
/// least one day of width so short timelines never produce an empty draw.
pub fn phase_offset(
    phase: Phase,
    total_days: i64,
    completion_offset: i64,
    rng: &mut StepRng,
) -> i64 {
    let early = (total_days as f64 * 0.2) as i64;
    let late = (total_days as f64 * 0.6) as i64;
    let offset = match phase {
        Phase::Start      => rng.int_between(0, early.max(1)),
        Phase::Middle     => rng.int_between(early, late.max(early + 1)),
        Phase::Completion => rng.int_between(late, completion_offset.max(late + 1)),
        Phase::Post       => {
            rng.int_between(completion_offset, total_days.max(completion_offset + 1))
        }
    };
    offset.min(total_days)
}

/// Sorted activity dates for one adoption.
pub fn activity_dates(
    adoption: &FrameworkAdoption,
    count: u64,
    config: &GenConfig,
    rng: &mut StepRng,
) -> GenResult<Vec<NaiveDate>> {
    if adoption.completion_date < adoption.start_date {
        return Err(GenError::InvalidTimeline { adoption_id: adoption.adoption_id });
    }

    let window_end = dates::add_days(adoption.completion_date, config.monitoring_window_days);
    let total_days = dates::days_between(adoption.start_date, window_end);
    let completion_offset = dates::days_between(adoption.start_date, adoption.completion_date);

    let mut out: Vec<NaiveDate> = (0..count)
        .map(|_| {
            let phase = PHASE_WEIGHTS.sample(rng);
            let offset = phase_offset(phase, total_days, completion_offset, rng);
            dates::add_days(adoption.start_date, offset)
        })
        .collect();
    out.sort();
    Ok(out)
}

// ── Per-activity attributes ──────────────────────────────────────────────────

pub fn automation_rate(framework: &Framework, maturity: Maturity) -> f64 {
    let adjust = match maturity {
        Maturity::Advanced     => 0.15,
        Maturity::Intermediate => 0.0,
        Maturity::Beginner     => -0.10,
    };
    (framework.automation_percentage as f64 / 100.0 + adjust).clamp(0.0, 1.0)
}

pub fn success_rate(maturity: Maturity, automated: bool, rng: &mut StepRng) -> f64 {
    let (lo, hi) = match maturity {
        Maturity::Advanced     => (0.90, 0.95),
        Maturity::Intermediate => (0.85, 0.90),
        Maturity::Beginner     => (0.75, 0.85),
    };
    let mut rate = rng.float_between(lo, hi);
    if automated {
        rate += rng.float_between(0.05, 0.10);
    }
    rate.min(MAX_SUCCESS_RATE)
}

fn draw_activity(
    activity_id: ActivityId,
    adoption: &FrameworkAdoption,
    activity_date: NaiveDate,
    automation: f64,
    maturity: Maturity,
    rng: &mut StepRng,
) -> ComplianceActivity {
    let activity_type = ACTIVITY_TYPE_WEIGHTS.sample(rng);
    let automated_flag = activity_type.can_automate() && rng.chance(automation);
    let (lo, hi) = activity_type.duration_range(automated_flag);
    let duration_minutes = rng.int_between(lo, hi) as u32;
    let success_flag = {
        let rate = success_rate(maturity, automated_flag, rng);
        rng.chance(rate)
    };
    let evidence_collected = {
        let mut rate = activity_type.evidence_rate();
        if !success_flag {
            rate *= FAILED_EVIDENCE_FACTOR;
        }
        rng.chance(rate)
    };

    ComplianceActivity {
        activity_id,
        customer_id: adoption.customer_id,
        framework_id: adoption.framework_id,
        adoption_id: adoption.adoption_id,
        activity_date,
        activity_type,
        control_category: CONTROL_CATEGORY_WEIGHTS.sample(rng),
        automated_flag,
        duration_minutes,
        success_flag,
        risk_level: RISK_LEVEL_WEIGHTS.sample(rng),
        evidence_collected,
    }
}

/// All activities for one adoption. Ids continue from `next_activity_id`.
pub fn activities_for_adoption(
    adoption: &FrameworkAdoption,
    framework: &Framework,
    customer: &Customer,
    config: &GenConfig,
    next_activity_id: &mut ActivityId,
    rng: &mut StepRng,
) -> GenResult<Vec<ComplianceActivity>> {
    let count = activity_count(framework, customer, config, rng);
    let activity_dates = activity_dates(adoption, count, config, rng)?;
    let automation = automation_rate(framework, customer.compliance_maturity);

    let activities = activity_dates
        .into_iter()
        .map(|date| {
            let activity = draw_activity(
                *next_activity_id,
                adoption,
                date,
                automation,
                customer.compliance_maturity,
                rng,
            );
            *next_activity_id += 1;
            activity
        })
        .collect();
    Ok(activities)
}

pub fn generate_activities(
    adoptions: &[FrameworkAdoption],
    frameworks: &[Framework],
    customers: &[Customer],
    config: &GenConfig,
    rng: &mut StepRng,
) -> GenResult<Vec<ComplianceActivity>> {
    let framework_by_id: HashMap<FrameworkId, &Framework> =
        frameworks.iter().map(|f| (f.framework_id, f)).collect();
    let customer_by_id: HashMap<CustomerId, &Customer> =
        customers.iter().map(|c| (c.customer_id, c)).collect();

    let mut activities = Vec::new();
    let mut next_activity_id: ActivityId = 1;

    for (i, adoption) in adoptions.iter().enumerate() {
        let framework = framework_by_id.get(&adoption.framework_id).ok_or(
            GenError::UnknownForeignKey {
                table: "FACT_FRAMEWORK_ADOPTIONS",
                field: "framework_id",
                id: adoption.framework_id,
            },
        )?;
        let customer = customer_by_id.get(&adoption.customer_id).ok_or(
            GenError::UnknownForeignKey {
                table: "FACT_FRAMEWORK_ADOPTIONS",
                field: "customer_id",
                id: adoption.customer_id,
            },
        )?;

        activities.extend(activities_for_adoption(
            adoption,
            framework,
            customer,
            config,
            &mut next_activity_id,
            rng,
        )?);

        if (i + 1) % 100 == 0 {
            log::debug!("activity: processed {}/{} adoptions", i + 1, adoptions.len());
        }
    }

    log::info!(
        "activity: {} activities across {} adoptions",
        activities.len(),
        adoptions.len()
    );
    Ok(activities)
}
