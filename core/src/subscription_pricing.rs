//! Price lists and weight tables for subscription events.
//!
//! Everything a contract boundary needs to decide *what* the next event
//! looks like lives here; *when* it happens is the lifecycle's job.

use crate::{
    rng::StepRng,
    types::{Maturity, Segment},
    weights::Weighted,
};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_DISCOUNT_PERCENTAGE: f64 = 5.0;
pub const NEW_CUSTOMER_PROMO_PROBABILITY: f64 = 0.15;
pub const ENTERPRISE_VOLUME_DISCOUNT_PROBABILITY: f64 = 0.3;
pub const DOWNGRADE_FACTOR: (f64, f64) = (0.6, 0.8);
pub const RENEWAL_UPLIFT: (f64, f64) = (1.0, 1.1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    New,
    Renewal,
    Expansion,
    Downgrade,
    Churn,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New       => "new",
            Self::Renewal   => "renewal",
            Self::Expansion => "expansion",
            Self::Downgrade => "downgrade",
            Self::Churn     => "churn",
        }
    }

    /// Events whose amount counts toward booked revenue.
    pub fn is_revenue(&self) -> bool {
        matches!(self, Self::New | Self::Renewal | Self::Expansion)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductTier {
    Starter,
    Professional,
    Enterprise,
    EnterprisePlus,
}

impl ProductTier {
    pub const ALL: [ProductTier; 4] = [
        Self::Starter,
        Self::Professional,
        Self::Enterprise,
        Self::EnterprisePlus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Starter        => "starter",
            Self::Professional   => "professional",
            Self::Enterprise     => "enterprise",
            Self::EnterprisePlus => "enterprise_plus",
        }
    }

    pub fn rank(&self) -> usize {
        *self as usize
    }

    /// One tier up, saturating at enterprise_plus.
    pub fn step_up(&self) -> ProductTier {
        Self::ALL[(self.rank() + 1).min(Self::ALL.len() - 1)]
    }

    /// Monthly list price range, inclusive.
    pub fn monthly_base(&self) -> (i64, i64) {
        match self {
            Self::Starter        => (200, 800),
            Self::Professional   => (800, 3_000),
            Self::Enterprise     => (3_000, 15_000),
            Self::EnterprisePlus => (15_000, 50_000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    Monthly,
    Quarterly,
    Annual,
    Upfront,
}

impl BillingPeriod {
    pub const ALL: [BillingPeriod; 4] =
        [Self::Monthly, Self::Quarterly, Self::Annual, Self::Upfront];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly   => "monthly",
            Self::Quarterly => "quarterly",
            Self::Annual    => "annual",
            Self::Upfront   => "upfront",
        }
    }

    /// Months of service one billed amount covers. Upfront is a two-year
    /// prepayment.
    pub fn months_billed(&self) -> u64 {
        match self {
            Self::Monthly   => 1,
            Self::Quarterly => 3,
            Self::Annual    => 12,
            Self::Upfront   => 24,
        }
    }

    /// Convert one billed amount to an annual figure.
    pub fn annualize(&self, amount: f64) -> f64 {
        match self {
            Self::Monthly   => amount * 12.0,
            Self::Quarterly => amount * 4.0,
            Self::Annual    => amount,
            Self::Upfront   => amount / 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesChannel {
    SelfServe,
    InsideSales,
    FieldSales,
    Partner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    Ach,
    WireTransfer,
    Invoice,
}

macro_rules! display_as_str {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        })*
    };
}

impl SalesChannel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfServe   => "self_serve",
            Self::InsideSales => "inside_sales",
            Self::FieldSales  => "field_sales",
            Self::Partner     => "partner",
        }
    }
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard   => "credit_card",
            Self::Ach          => "ach",
            Self::WireTransfer => "wire_transfer",
            Self::Invoice      => "invoice",
        }
    }
}

display_as_str!(EventType, ProductTier, BillingPeriod, SalesChannel, PaymentMethod);

// ── Weight tables ────────────────────────────────────────────────────────────

pub fn billing_weights(segment: Segment) -> Weighted<BillingPeriod> {
    use BillingPeriod::*;
    match segment {
        Segment::Startup    => Weighted::new(&[(Monthly, 0.6), (Quarterly, 0.3), (Annual, 0.1)]),
        Segment::MidMarket  => Weighted::new(&[(Monthly, 0.2), (Quarterly, 0.5), (Annual, 0.3)]),
        Segment::Enterprise => Weighted::new(&[(Quarterly, 0.2), (Annual, 0.6), (Upfront, 0.2)]),
    }
}

/// Tier on the first contract.
pub fn new_tier_weights(segment: Segment) -> Weighted<ProductTier> {
    use ProductTier::*;
    match segment {
        Segment::Startup    => Weighted::new(&[(Starter, 1.0)]),
        Segment::MidMarket  => Weighted::new(&[(Professional, 0.8), (Enterprise, 0.2)]),
        Segment::Enterprise => Weighted::new(&[(Enterprise, 0.8), (EnterprisePlus, 0.2)]),
    }
}

/// Tier redrawn on expansion.
pub fn expansion_tier_weights(segment: Segment) -> Weighted<ProductTier> {
    use ProductTier::*;
    match segment {
        Segment::Startup    => Weighted::new(&[(Starter, 0.7), (Professional, 0.3)]),
        Segment::MidMarket  => Weighted::new(&[(Professional, 0.6), (Enterprise, 0.4)]),
        Segment::Enterprise => Weighted::new(&[(Enterprise, 0.7), (EnterprisePlus, 0.3)]),
    }
}

pub fn contract_length_weights(segment: Segment) -> Weighted<u32> {
    match segment {
        Segment::Startup    => Weighted::new(&[(12, 0.8), (24, 0.2)]),
        Segment::MidMarket  => Weighted::new(&[(12, 0.6), (24, 0.4)]),
        Segment::Enterprise => Weighted::new(&[(12, 0.3), (24, 0.5), (36, 0.2)]),
    }
}

pub fn sales_channel_weights(segment: Segment) -> Weighted<SalesChannel> {
    use SalesChannel::*;
    match segment {
        Segment::Startup    => Weighted::new(&[(SelfServe, 0.8), (InsideSales, 0.2)]),
        Segment::MidMarket => {
            Weighted::new(&[(SelfServe, 0.3), (InsideSales, 0.6), (FieldSales, 0.1)])
        }
        Segment::Enterprise => {
            Weighted::new(&[(InsideSales, 0.3), (FieldSales, 0.65), (Partner, 0.05)])
        }
    }
}

pub fn payment_method_weights(segment: Segment) -> Weighted<PaymentMethod> {
    use PaymentMethod::*;
    match segment {
        Segment::Startup    => Weighted::new(&[(CreditCard, 0.9), (Ach, 0.1)]),
        Segment::MidMarket  => Weighted::new(&[(CreditCard, 0.6), (Ach, 0.3), (Invoice, 0.1)]),
        Segment::Enterprise => Weighted::new(&[
            (CreditCard, 0.2),
            (Ach, 0.3),
            (WireTransfer, 0.2),
            (Invoice, 0.3),
        ]),
    }
}

pub const RENEWAL_EVENT_WEIGHTS: Weighted<EventType> = Weighted::new(&[
    (EventType::Renewal, 0.7),
    (EventType::Expansion, 0.25),
    (EventType::Downgrade, 0.05),
]);

/// Advanced mid_market and enterprise customers expand more often.
pub const GROWTH_EVENT_WEIGHTS: Weighted<EventType> = Weighted::new(&[
    (EventType::Renewal, 0.6),
    (EventType::Expansion, 0.35),
    (EventType::Downgrade, 0.05),
]);

pub fn renewal_event_weights(segment: Segment, maturity: Maturity) -> Weighted<EventType> {
    match (segment, maturity) {
        (Segment::MidMarket | Segment::Enterprise, Maturity::Advanced) => GROWTH_EVENT_WEIGHTS,
        _ => RENEWAL_EVENT_WEIGHTS,
    }
}

// ── Pricing ──────────────────────────────────────────────────────────────────

/// Billed amount for a fresh contract on `tier`.
pub fn price_for_tier(tier: ProductTier, billing: BillingPeriod, rng: &mut StepRng) -> u64 {
    let (lo, hi) = tier.monthly_base();
    rng.int_between(lo, hi) as u64 * billing.months_billed()
}

pub fn renewal_price(current: u64, rng: &mut StepRng) -> u64 {
    (current as f64 * rng.float_between(RENEWAL_UPLIFT.0, RENEWAL_UPLIFT.1)) as u64
}

pub fn downgrade_price(current: u64, rng: &mut StepRng) -> u64 {
    (current as f64 * rng.float_between(DOWNGRADE_FACTOR.0, DOWNGRADE_FACTOR.1)) as u64
}

/// Discount percentage, 0.0–5.0.
pub fn calculate_discount(
    billing: BillingPeriod,
    contract_length_months: u32,
    segment: Segment,
    event_type: EventType,
    rng: &mut StepRng,
) -> f64 {
    let mut discount = 0.0;

    match billing {
        BillingPeriod::Annual | BillingPeriod::Upfront => discount += rng.float_between(2.0, 5.0),
        BillingPeriod::Quarterly => discount += rng.float_between(1.0, 2.0),
        BillingPeriod::Monthly => {}
    }

    if contract_length_months >= 24 {
        discount += rng.float_between(1.0, 3.0);
    }

    if event_type == EventType::New && rng.chance(NEW_CUSTOMER_PROMO_PROBABILITY) {
        discount += rng.float_between(1.0, 2.0);
    }

    if segment == Segment::Enterprise && rng.chance(ENTERPRISE_VOLUME_DISCOUNT_PROBABILITY) {
        discount += rng.float_between(1.0, 2.0);
    }

    f64::min(discount, MAX_DISCOUNT_PERCENTAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_up_saturates() {
        assert_eq!(ProductTier::Starter.step_up(), ProductTier::Professional);
        assert_eq!(ProductTier::EnterprisePlus.step_up(), ProductTier::EnterprisePlus);
    }

    #[test]
    fn annualize_matches_billing_cadence() {
        assert_eq!(BillingPeriod::Monthly.annualize(100.0), 1_200.0);
        assert_eq!(BillingPeriod::Quarterly.annualize(300.0), 1_200.0);
        assert_eq!(BillingPeriod::Annual.annualize(1_200.0), 1_200.0);
        assert_eq!(BillingPeriod::Upfront.annualize(2_400.0), 1_200.0);
    }

    #[test]
    fn discount_is_capped() {
        let mut rng = StepRng::new(9, 0);
        for _ in 0..500 {
            let d = calculate_discount(
                BillingPeriod::Upfront,
                36,
                Segment::Enterprise,
                EventType::New,
                &mut rng,
            );
            assert!((0.0..=MAX_DISCOUNT_PERCENTAGE).contains(&d), "discount {d}");
        }
    }

    #[test]
    fn monthly_short_contract_has_no_discount_outside_promos() {
        let mut rng = StepRng::new(3, 0);
        for _ in 0..200 {
            let d = calculate_discount(
                BillingPeriod::Monthly,
                12,
                Segment::Startup,
                EventType::Renewal,
                &mut rng,
            );
            assert_eq!(d, 0.0);
        }
    }
}
