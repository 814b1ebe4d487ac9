//! Billed amounts should line up across billing periods once annualized.
//!
//! Amounts on new, renewal and expansion events are converted to an annual
//! figure, grouped by tier and billing period, and compared. Downgrades and
//! churn are left out: their amounts are reductions, not list prices.

use super::{stats::SummaryStats, write_issues};
use crate::{
    subscription_generator::SubscriptionEvent,
    subscription_pricing::{BillingPeriod, ProductTier},
    types::{CustomerId, EventId},
};
use std::{collections::BTreeMap, fmt};

/// Largest acceptable ratio between the highest and lowest billing-period
/// mean within a tier.
pub const MAX_BILLING_MEAN_RATIO: f64 = 1.2;
pub const OUTLIER_Z_SCORE: f64 = 3.0;

#[derive(Debug, Clone)]
pub struct TierConsistency {
    pub overall: SummaryStats,
    pub by_billing_period: BTreeMap<BillingPeriod, SummaryStats>,
    /// max/min of the billing-period means; 1.0 with a single period,
    /// 0.0 when the smallest mean is zero.
    pub billing_mean_ratio: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MrrOutlier {
    pub event_id: EventId,
    pub customer_id: CustomerId,
    pub tier: ProductTier,
    pub billing_period: BillingPeriod,
    pub original_amount: u64,
    pub annualized_amount: f64,
    pub z_score: f64,
    pub tier_mean: f64,
}

#[derive(Debug, Clone, Default)]
pub struct MrrReport {
    pub tiers: BTreeMap<ProductTier, TierConsistency>,
    pub outliers: Vec<MrrOutlier>,
    pub issues: Vec<String>,
}

pub fn validate_mrr_consistency(events: &[SubscriptionEvent]) -> MrrReport {
    let mut grouped: BTreeMap<ProductTier, BTreeMap<BillingPeriod, Vec<&SubscriptionEvent>>> =
        BTreeMap::new();
    for event in events.iter().filter(|e| e.event_type.is_revenue()) {
        grouped
            .entry(event.product_tier)
            .or_default()
            .entry(event.billing_period)
            .or_default()
            .push(event);
    }

    let annualized = |e: &SubscriptionEvent| e.billing_period.annualize(e.mrr_amount as f64);
    let mut report = MrrReport::default();

    for (tier, periods) in &grouped {
        let mut by_billing_period = BTreeMap::new();
        let mut all_amounts = Vec::new();
        for (period, rows) in periods {
            let amounts: Vec<f64> = rows.iter().map(|e| annualized(*e)).collect();
            if let Some(stats) = SummaryStats::from_values(&amounts) {
                by_billing_period.insert(*period, stats);
            }
            all_amounts.extend(amounts);
        }
        let Some(overall) = SummaryStats::from_values(&all_amounts) else {
            continue;
        };

        let means: Vec<f64> = by_billing_period.values().map(|s| s.mean).collect();
        let billing_mean_ratio = if means.len() > 1 {
            let lo = means.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = means.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if lo > 0.0 { hi / lo } else { 0.0 }
        } else {
            1.0
        };
        if billing_mean_ratio > MAX_BILLING_MEAN_RATIO {
            report.issues.push(format!(
                "High variance in {tier} tier across billing periods: \
                 {billing_mean_ratio:.2}x difference"
            ));
        }

        if overall.count > 1 && overall.std_dev > 0.0 {
            for (period, rows) in periods {
                for event in rows {
                    let amount = annualized(*event);
                    let z_score = (amount - overall.mean).abs() / overall.std_dev;
                    if z_score > OUTLIER_Z_SCORE {
                        report.outliers.push(MrrOutlier {
                            event_id: event.event_id,
                            customer_id: event.customer_id,
                            tier: *tier,
                            billing_period: *period,
                            original_amount: event.mrr_amount,
                            annualized_amount: amount,
                            z_score,
                            tier_mean: overall.mean,
                        });
                    }
                }
            }
        }

        report.tiers.insert(
            *tier,
            TierConsistency {
                overall,
                by_billing_period,
                billing_mean_ratio,
            },
        );
    }

    if !report.outliers.is_empty() {
        report.issues.push(format!(
            "Found {} outlier amounts (>{OUTLIER_Z_SCORE} std dev from tier mean)",
            report.outliers.len()
        ));
    }
    report
}

impl fmt::Display for MrrReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== MRR BILLING CONSISTENCY ===")?;
        for (tier, data) in &self.tiers {
            let mark = if data.billing_mean_ratio <= MAX_BILLING_MEAN_RATIO { "ok" } else { "!!" };
            writeln!(
                f,
                "  {tier:<16} n={:<5} mean ${:>10.0}  ratio {:.2}x {mark}",
                data.overall.count, data.overall.mean, data.billing_mean_ratio
            )?;
            for (period, stats) in &data.by_billing_period {
                writeln!(
                    f,
                    "    {period:<10} n={:<5} mean ${:>10.0} median ${:>10.0} sd ${:>9.0}",
                    stats.count, stats.mean, stats.median, stats.std_dev
                )?;
            }
        }
        writeln!(f, "  outliers: {}", self.outliers.len())?;
        write_issues(f, &self.issues)
    }
}
