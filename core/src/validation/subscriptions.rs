use super::{stats::{count_by, percent}, write_issues};
use crate::{
    customer_generator::Customer,
    subscription_generator::SubscriptionEvent,
    subscription_pricing::{BillingPeriod, EventType, ProductTier},
    types::CustomerId,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
};

pub const MIN_CONTRACT_MONTHS: u32 = 12;

#[derive(Debug, Clone)]
pub struct SubscriptionReport {
    pub total_records: usize,
    pub total_customers: usize,
    pub customers_with_events: usize,
    pub customers_without_events: usize,
    pub first_event_not_new: usize,
    pub events_after_churn: usize,
    pub non_increasing_dates: usize,
    pub short_contracts: usize,
    pub event_types: BTreeMap<EventType, usize>,
    pub billing_periods: BTreeMap<BillingPeriod, usize>,
    pub product_tiers: BTreeMap<ProductTier, usize>,
    /// Non-churn events only.
    pub contract_lengths: BTreeMap<u32, usize>,
    /// Sum of amounts on new, renewal and expansion events.
    pub total_mrr: u64,
    pub issues: Vec<String>,
}

impl SubscriptionReport {
    pub fn avg_events_per_customer(&self) -> f64 {
        if self.total_customers == 0 {
            0.0
        } else {
            self.total_records as f64 / self.total_customers as f64
        }
    }
}

pub fn validate_subscription_events(
    events: &[SubscriptionEvent],
    customers: &[Customer],
) -> SubscriptionReport {
    let mut by_customer: BTreeMap<CustomerId, Vec<&SubscriptionEvent>> = BTreeMap::new();
    for event in events {
        by_customer.entry(event.customer_id).or_default().push(event);
    }

    let customer_ids: BTreeSet<CustomerId> = customers.iter().map(|c| c.customer_id).collect();
    let customers_without_events = customer_ids
        .iter()
        .filter(|id| !by_customer.contains_key(id))
        .count();

    let mut first_event_not_new = 0;
    let mut events_after_churn = 0;
    let mut non_increasing_dates = 0;
    for history in by_customer.values_mut() {
        // Stable sort keeps file order for same-day events, which the
        // strictly-increasing check then reports.
        history.sort_by_key(|e| e.event_date);

        if history.first().map(|e| e.event_type) != Some(EventType::New) {
            first_event_not_new += 1;
        }
        if let Some(churn_at) = history.iter().position(|e| e.event_type == EventType::Churn) {
            if churn_at + 1 < history.len() {
                events_after_churn += 1;
            }
        }
        if history.windows(2).any(|w| w[1].event_date <= w[0].event_date) {
            non_increasing_dates += 1;
        }
    }

    let non_churn: Vec<&SubscriptionEvent> =
        events.iter().filter(|e| e.event_type != EventType::Churn).collect();
    let short_contracts = non_churn
        .iter()
        .filter(|e| e.contract_length_months < MIN_CONTRACT_MONTHS)
        .count();
    let total_mrr = events
        .iter()
        .filter(|e| e.event_type.is_revenue())
        .map(|e| e.mrr_amount)
        .sum();

    let mut issues = Vec::new();
    if customers_without_events > 0 {
        issues.push(format!("{customers_without_events} customers have no subscription events"));
    }
    if first_event_not_new > 0 {
        issues.push(format!(
            "{first_event_not_new} customers don't have 'new' as their first event"
        ));
    }
    if events_after_churn > 0 {
        issues.push(format!("{events_after_churn} customers have events after churn"));
    }
    if non_increasing_dates > 0 {
        issues.push(format!("{non_increasing_dates} customers have events out of date order"));
    }
    if short_contracts > 0 {
        issues.push(format!(
            "{short_contracts} events have unrealistic contract lengths \
             (<{MIN_CONTRACT_MONTHS} months)"
        ));
    }

    SubscriptionReport {
        total_records: events.len(),
        total_customers: customers.len(),
        customers_with_events: by_customer.len(),
        customers_without_events,
        first_event_not_new,
        events_after_churn,
        non_increasing_dates,
        short_contracts,
        event_types: count_by(events, |e| e.event_type),
        billing_periods: count_by(events, |e| e.billing_period),
        product_tiers: count_by(events, |e| e.product_tier),
        contract_lengths: count_by(&non_churn, |e| e.contract_length_months),
        total_mrr,
        issues,
    }
}

impl fmt::Display for SubscriptionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total_records;
        writeln!(f, "=== FACT_SUBSCRIPTION_EVENTS ===")?;
        writeln!(f, "  records: {total}")?;
        writeln!(
            f,
            "  customers with events: {}/{} ({:.1} events each)",
            self.customers_with_events,
            self.total_customers,
            self.avg_events_per_customer()
        )?;
        writeln!(f, "  event types:")?;
        for (kind, count) in &self.event_types {
            writeln!(f, "    {kind:<16} {count:>6} ({:.1}%)", percent(*count, total))?;
        }
        writeln!(f, "  billing periods:")?;
        for (period, count) in &self.billing_periods {
            writeln!(f, "    {period:<16} {count:>6} ({:.1}%)", percent(*count, total))?;
        }
        writeln!(f, "  contract lengths:")?;
        for (months, count) in &self.contract_lengths {
            writeln!(
                f,
                "    {months:>3} months       {count:>6} ({:.1}%)",
                percent(*count, total)
            )?;
        }
        writeln!(f, "  product tiers:")?;
        for (tier, count) in &self.product_tiers {
            writeln!(f, "    {tier:<16} {count:>6} ({:.1}%)", percent(*count, total))?;
        }
        writeln!(f, "  booked amount: ${}", self.total_mrr)?;
        write_issues(f, &self.issues)
    }
}
