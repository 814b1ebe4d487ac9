//! Subscription lifecycle tests.

mod common;

use common::{customer, date};
use phantom_core::{
    config::GenConfig,
    customer_generator::Customer,
    rng::StepRng,
    subscription_generator::{
        customer_lifecycle, generate_subscription_events, Lifecycle, LifecycleState,
        SubscriptionEvent,
    },
    subscription_pricing::{EventType, ProductTier},
    types::{Maturity, Segment},
};
use std::collections::BTreeMap;

fn events_by_customer(events: &[SubscriptionEvent]) -> BTreeMap<u64, Vec<&SubscriptionEvent>> {
    let mut grouped: BTreeMap<u64, Vec<&SubscriptionEvent>> = BTreeMap::new();
    for e in events {
        grouped.entry(e.customer_id).or_default().push(e);
    }
    grouped
}

fn generated(seed: u64) -> (Vec<Customer>, Vec<SubscriptionEvent>) {
    let customers = common::customers(seed, 300);
    let mut rng = StepRng::new(seed, 2);
    let events =
        generate_subscription_events(&customers, &GenConfig::default_test(), &mut rng).unwrap();
    (customers, events)
}

#[test]
fn transition_table_matches_lifecycle() {
    use LifecycleState::*;
    assert!(New.can_transition_to(Active));
    assert!(Active.can_transition_to(Active));
    assert!(Active.can_transition_to(Churned));

    assert!(!New.can_transition_to(Churned));
    assert!(!New.can_transition_to(New));
    assert!(!Active.can_transition_to(New));
    assert!(!Churned.can_transition_to(Active));
    assert!(!Churned.can_transition_to(Churned));
    assert!(Churned.is_terminal());
}

#[test]
fn every_customer_starts_with_exactly_one_new_event() {
    let (customers, events) = generated(42);
    let grouped = events_by_customer(&events);
    assert_eq!(grouped.len(), customers.len());

    for (id, history) in &grouped {
        assert_eq!(history[0].event_type, EventType::New, "customer {id}");
        let news = history.iter().filter(|e| e.event_type == EventType::New).count();
        assert_eq!(news, 1, "customer {id} has {news} new events");
    }
}

#[test]
fn churn_is_terminal_and_unique() {
    let (_, events) = generated(43);
    let churned = events.iter().filter(|e| e.event_type == EventType::Churn).count();
    assert!(churned > 0, "no customer churned out of 300");
    for (id, history) in events_by_customer(&events) {
        let churns: Vec<usize> = history
            .iter()
            .enumerate()
            .filter(|(_, e)| e.event_type == EventType::Churn)
            .map(|(i, _)| i)
            .collect();
        assert!(churns.len() <= 1, "customer {id} churned {} times", churns.len());
        if let Some(&at) = churns.first() {
            assert_eq!(at, history.len() - 1, "customer {id} has events after churn");
            let churn = history[at];
            assert_eq!(churn.mrr_amount, 0);
            assert_eq!(churn.contract_length_months, 0);
            assert_eq!(churn.discount_percentage, 0.0);
        }
    }
}

#[test]
fn dates_strictly_increase_and_contracts_are_at_least_a_year() {
    let (_, events) = generated(44);
    for (id, history) in events_by_customer(&events) {
        for pair in history.windows(2) {
            assert!(
                pair[1].event_date > pair[0].event_date,
                "customer {id}: {} not after {}",
                pair[1].event_date, pair[0].event_date
            );
        }
    }
    for e in events.iter().filter(|e| e.event_type != EventType::Churn) {
        assert!(
            e.contract_length_months >= 12,
            "event {} has a {}-month contract",
            e.event_id, e.contract_length_months
        );
    }
}

#[test]
fn no_event_is_scheduled_past_today() {
    let config = GenConfig::default_test();
    let (_, events) = generated(45);
    for e in events.iter().filter(|e| e.event_type != EventType::New) {
        assert!(e.event_date <= config.today, "event {} on {}", e.event_id, e.event_date);
    }
}

#[test]
fn churn_only_after_first_year() {
    let (customers, events) = generated(46);
    for e in events.iter().filter(|e| e.event_type == EventType::Churn) {
        let signup = customers[(e.customer_id - 1) as usize].signup_date;
        let tenure = (e.event_date - signup).num_days();
        assert!(tenure > 365, "customer {} churned after {tenure} days", e.customer_id);
    }
}

#[test]
fn event_ids_are_sequential_across_customers() {
    let (_, events) = generated(47);
    for (i, e) in events.iter().enumerate() {
        assert_eq!(e.event_id, i as u64 + 1);
    }
}

#[test]
fn channel_and_payment_method_are_fixed_per_customer() {
    let (_, events) = generated(48);
    for (id, history) in events_by_customer(&events) {
        let first = history[0];
        for e in &history {
            assert_eq!(e.sales_channel, first.sales_channel, "customer {id}");
            assert_eq!(e.payment_method, first.payment_method, "customer {id}");
            assert_eq!(e.billing_period, first.billing_period, "customer {id}");
        }
    }
}

#[test]
fn expansion_always_moves_up_a_tier_unless_at_the_top() {
    let (_, events) = generated(49);
    for (id, history) in events_by_customer(&events) {
        for pair in history.windows(2) {
            if pair[1].event_type != EventType::Expansion {
                continue;
            }
            let (before, after) = (pair[0].product_tier, pair[1].product_tier);
            assert!(
                after.rank() > before.rank() || before == ProductTier::EnterprisePlus,
                "customer {id}: expansion {before} -> {after}"
            );
        }
    }
}

#[test]
fn startup_beginner_signing_up_mid_january_2021() {
    let signup = date(1, 15, 2021);
    let c = customer(1, Segment::Startup, "saas", Maturity::Beginner, signup);
    let config = GenConfig::default_test();

    for seed in 0..200 {
        let mut rng = StepRng::new(seed, 2);
        let mut next_id = 1;
        let events = customer_lifecycle(&c, &config, &mut next_id, &mut rng);

        let new = &events[0];
        assert_eq!(new.event_type, EventType::New);
        assert!(
            new.event_date >= signup && new.event_date <= date(2, 14, 2021),
            "seed {seed}: new event on {}",
            new.event_date
        );
        assert!(
            matches!(new.product_tier, ProductTier::Starter | ProductTier::Professional),
            "seed {seed}: tier {}",
            new.product_tier
        );
        assert!(
            [12, 24].contains(&new.contract_length_months),
            "seed {seed}: contract {}",
            new.contract_length_months
        );
        assert_eq!(next_id, events.len() as u64 + 1);
    }
}

#[test]
fn lifecycle_halts_before_the_next_boundary() {
    let mut config = GenConfig::default_test();
    config.today = date(3, 1, 2021);
    let c = customer(1, Segment::Enterprise, "fintech", Maturity::Advanced, date(1, 15, 2021));

    let mut rng = StepRng::new(1, 2);
    let mut lifecycle = Lifecycle::start(&c, &config, &mut rng);
    assert_eq!(lifecycle.state(), LifecycleState::New);

    let first = lifecycle.step(1, &mut rng).expect("new event");
    assert_eq!(first.event_type, EventType::New);
    assert_eq!(lifecycle.state(), LifecycleState::Active);

    // The first boundary is at least 360 days out, well past `today`.
    assert!(lifecycle.step(2, &mut rng).is_none());
    assert_eq!(lifecycle.state(), LifecycleState::Active);
}

/// Share of expansions among renewal-time events for one customer profile,
/// pooled over many seeds.
fn expansion_share(segment: Segment, maturity: Maturity) -> f64 {
    let c = customer(1, segment, "saas", maturity, date(1, 10, 2020));
    let config = GenConfig::default_test();
    let (mut expansions, mut boundaries) = (0usize, 0usize);
    for seed in 0..500 {
        let mut rng = StepRng::new(seed, 2);
        let mut next_id = 1;
        for e in customer_lifecycle(&c, &config, &mut next_id, &mut rng) {
            match e.event_type {
                EventType::Expansion => {
                    expansions += 1;
                    boundaries += 1;
                }
                EventType::Renewal | EventType::Downgrade => boundaries += 1,
                EventType::New | EventType::Churn => {}
            }
        }
    }
    assert!(boundaries > 0, "{segment}/{maturity} never reached a boundary");
    expansions as f64 / boundaries as f64
}

#[test]
fn advanced_larger_customers_expand_more_often() {
    for segment in [Segment::MidMarket, Segment::Enterprise] {
        let advanced = expansion_share(segment, Maturity::Advanced);
        let intermediate = expansion_share(segment, Maturity::Intermediate);
        assert!(
            (0.28..=0.42).contains(&advanced),
            "{segment} advanced expansion share {advanced:.3}"
        );
        assert!(
            (0.18..=0.32).contains(&intermediate),
            "{segment} intermediate expansion share {intermediate:.3}"
        );
        assert!(
            advanced > intermediate,
            "{segment}: advanced {advanced:.3} vs intermediate {intermediate:.3}"
        );
    }
}

#[test]
fn startup_advanced_keeps_the_standard_mix() {
    let share = expansion_share(Segment::Startup, Maturity::Advanced);
    assert!((0.18..=0.32).contains(&share), "startup advanced expansion share {share:.3}");
}
