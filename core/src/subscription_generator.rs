//! FACT_SUBSCRIPTION_EVENTS: per-customer billing lifecycles.
//!
//! Each customer walks an explicit state machine:
//!
//!   New ──▶ Active ──▶ Active ──▶ … ──▶ Churned
//!
//! One event is emitted per transition. The walk stops without a
//! transition once the next contract boundary falls after `today`.

use crate::{
    config::GenConfig,
    customer_generator::Customer,
    dates,
    error::GenResult,
    rng::StepRng,
    subscription_pricing::{
        billing_weights, calculate_discount, contract_length_weights, downgrade_price,
        expansion_tier_weights, new_tier_weights, payment_method_weights, price_for_tier,
        renewal_event_weights, renewal_price, sales_channel_weights, BillingPeriod, EventType,
        PaymentMethod, ProductTier, SalesChannel,
    },
    types::{CustomerId, EventId},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Days per contract month when scheduling the next boundary.
pub const DAYS_PER_CONTRACT_MONTH: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionEvent {
    pub event_id: EventId,
    pub customer_id: CustomerId,
    #[serde(with = "crate::dates::mdy")]
    pub event_date: NaiveDate,
    pub event_type: EventType,
    pub product_tier: ProductTier,
    pub mrr_amount: u64,
    pub billing_period: BillingPeriod,
    pub contract_length_months: u32,
    pub discount_percentage: f64,
    pub sales_channel: SalesChannel,
    pub payment_method: PaymentMethod,
}

// ── State machine ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// No contract signed yet.
    New,
    Active,
    /// Terminal.
    Churned,
}

impl LifecycleState {
    pub fn can_transition_to(&self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (New, Active) | (Active, Active) | (Active, Churned)
        )
    }

    pub fn is_terminal(&self) -> bool {
        *self == LifecycleState::Churned
    }
}

/// Terms of the contract currently in force.
#[derive(Debug, Clone, Copy)]
struct Contract {
    date: NaiveDate,
    tier: ProductTier,
    mrr: u64,
    billing: BillingPeriod,
    length_months: u32,
}

impl Contract {
    fn next_boundary(&self) -> NaiveDate {
        dates::add_days(self.date, self.length_months as i64 * DAYS_PER_CONTRACT_MONTH)
    }
}

/// One customer's walk through the lifecycle.
pub struct Lifecycle<'a> {
    customer: &'a Customer,
    config: &'a GenConfig,
    state: LifecycleState,
    will_churn: bool,
    sales_channel: SalesChannel,
    payment_method: PaymentMethod,
    contract: Option<Contract>,
}

impl<'a> Lifecycle<'a> {
    /// Draws the churn flag and the customer's fixed channel and payment
    /// method.
    pub fn start(customer: &'a Customer, config: &'a GenConfig, rng: &mut StepRng) -> Self {
        let will_churn = rng.chance(config.churn_flag_probability);
        let sales_channel = sales_channel_weights(customer.segment).sample(rng);
        let payment_method = payment_method_weights(customer.segment).sample(rng);
        Self {
            customer,
            config,
            state: LifecycleState::New,
            will_churn,
            sales_channel,
            payment_method,
            contract: None,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn will_churn(&self) -> bool {
        self.will_churn
    }

    /// Advance one transition. Returns `None` once the lifecycle is
    /// terminal or the next boundary is after `today`.
    pub fn step(&mut self, event_id: EventId, rng: &mut StepRng) -> Option<SubscriptionEvent> {
        let (next_state, event) = match (self.state, self.contract) {
            (LifecycleState::New, _) => (LifecycleState::Active, self.open(event_id, rng)),
            (LifecycleState::Active, Some(contract)) => {
                let boundary = contract.next_boundary();
                if boundary > self.config.today {
                    return None;
                }
                if self.churns_at(boundary, rng) {
                    (LifecycleState::Churned, self.churn(event_id, contract, boundary))
                } else {
                    (LifecycleState::Active, self.renew(event_id, contract, boundary, rng))
                }
            }
            (LifecycleState::Active, None) | (LifecycleState::Churned, _) => return None,
        };

        debug_assert!(self.state.can_transition_to(next_state));
        self.state = next_state;
        Some(event)
    }

    fn open(&mut self, event_id: EventId, rng: &mut StepRng) -> SubscriptionEvent {
        let segment = self.customer.segment;
        let date = dates::add_days(
            self.customer.signup_date,
            rng.int_between(0, self.config.new_event_max_delay_days),
        );
        let billing = billing_weights(segment).sample(rng);
        let tier = new_tier_weights(segment).sample(rng);
        let length_months = contract_length_weights(segment).sample(rng);
        let mrr = price_for_tier(tier, billing, rng);
        let discount = calculate_discount(billing, length_months, segment, EventType::New, rng);

        let contract = Contract { date, tier, mrr, billing, length_months };
        self.contract = Some(contract);
        self.event(event_id, EventType::New, &contract, discount)
    }

    fn churns_at(&self, boundary: NaiveDate, rng: &mut StepRng) -> bool {
        let tenure = dates::days_between(self.customer.signup_date, boundary);
        self.will_churn
            && tenure > self.config.churn_min_tenure_days
            && rng.chance(self.config.churn_roll_probability)
    }

    fn churn(
        &mut self,
        event_id: EventId,
        current: Contract,
        boundary: NaiveDate,
    ) -> SubscriptionEvent {
        let closed = Contract {
            date: boundary,
            mrr: 0,
            length_months: 0,
            ..current
        };
        self.contract = Some(closed);
        self.event(event_id, EventType::Churn, &closed, 0.0)
    }

    fn renew(
        &mut self,
        event_id: EventId,
        current: Contract,
        boundary: NaiveDate,
        rng: &mut StepRng,
    ) -> SubscriptionEvent {
        let segment = self.customer.segment;
        let weights = renewal_event_weights(segment, self.customer.compliance_maturity);
        let event_type = weights.sample(rng);
        let length_months = contract_length_weights(segment).sample(rng);

        let (tier, mrr) = match event_type {
            EventType::Expansion => {
                let drawn = expansion_tier_weights(segment).sample(rng);
                let tier = if drawn.rank() <= current.tier.rank() {
                    current.tier.step_up()
                } else {
                    drawn
                };
                (tier, price_for_tier(tier, current.billing, rng))
            }
            EventType::Downgrade => (current.tier, downgrade_price(current.mrr, rng)),
            _ => (current.tier, renewal_price(current.mrr, rng)),
        };
        let discount = calculate_discount(current.billing, length_months, segment, event_type, rng);

        let next = Contract {
            date: boundary,
            tier,
            mrr,
            billing: current.billing,
            length_months,
        };
        self.contract = Some(next);
        self.event(event_id, event_type, &next, discount)
    }

    fn event(
        &self,
        event_id: EventId,
        event_type: EventType,
        contract: &Contract,
        discount_percentage: f64,
    ) -> SubscriptionEvent {
        SubscriptionEvent {
            event_id,
            customer_id: self.customer.customer_id,
            event_date: contract.date,
            event_type,
            product_tier: contract.tier,
            mrr_amount: contract.mrr,
            billing_period: contract.billing,
            contract_length_months: contract.length_months,
            discount_percentage,
            sales_channel: self.sales_channel,
            payment_method: self.payment_method,
        }
    }
}

// ── Generation ───────────────────────────────────────────────────────────────

/// Run one customer's lifecycle to completion. Event ids continue from
/// `next_event_id`, which is advanced past the last id used.
pub fn customer_lifecycle(
    customer: &Customer,
    config: &GenConfig,
    next_event_id: &mut EventId,
    rng: &mut StepRng,
) -> Vec<SubscriptionEvent> {
    let mut lifecycle = Lifecycle::start(customer, config, rng);
    let mut events = Vec::new();
    while let Some(event) = lifecycle.step(*next_event_id, rng) {
        events.push(event);
        *next_event_id += 1;
    }
    events
}

pub fn generate_subscription_events(
    customers: &[Customer],
    config: &GenConfig,
    rng: &mut StepRng,
) -> GenResult<Vec<SubscriptionEvent>> {
    let mut events = Vec::new();
    let mut next_event_id: EventId = 1;

    for (i, customer) in customers.iter().enumerate() {
        events.extend(customer_lifecycle(customer, config, &mut next_event_id, rng));
        if (i + 1) % 50 == 0 {
            log::debug!("subscription: processed {}/{} customers", i + 1, customers.len());
        }
    }

    let churned = events.iter().filter(|e| e.event_type == EventType::Churn).count();
    log::info!(
        "subscription: {} events for {} customers ({churned} churned)",
        events.len(),
        customers.len()
    );
    Ok(events)
}
