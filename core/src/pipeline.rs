//! The dataset build, one step per table.
//!
//! STEP ORDER (fixed, each step reads only what earlier steps wrote):
//!   1. Frameworks      (static catalog)
//!   2. Customers       (repairs MOCK_DATA_ORIGINAL.json)
//!   3. Adoptions       (customers + frameworks)
//!   4. Subscriptions   (customers)
//!   5. Activities      (adoptions + frameworks + customers)
//!
//! RULES:
//!   - Every step loads its inputs from the store before writing anything,
//!     so a missing or malformed input leaves no partial output.
//!   - Every step draws from its own RngBank slot; rerunning one step
//!     with the same seed reproduces its table exactly.
//!   - Every completed step appends a RunRecord to the run log.

use crate::{
    activity_generator::{generate_activities, ComplianceActivity},
    adoption_generator::{generate_adoptions, FrameworkAdoption},
    config::GenConfig,
    customer_generator::{repair_customers, Customer},
    error::GenResult,
    framework_catalog::{catalog, Framework},
    rng::{GeneratorSlot, RngBank},
    store::{DataStore, RunRecord},
    subscription_generator::{generate_subscription_events, SubscriptionEvent},
    types::RunId,
    validation::{run_quality_checks, QualityReport},
};
use chrono::Utc;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStep {
    Frameworks,
    Customers,
    Adoptions,
    Subscriptions,
    Activities,
}

impl GenerationStep {
    pub const ALL: [GenerationStep; 5] = [
        Self::Frameworks,
        Self::Customers,
        Self::Adoptions,
        Self::Subscriptions,
        Self::Activities,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Frameworks    => "frameworks",
            Self::Customers     => "customers",
            Self::Adoptions     => "adoptions",
            Self::Subscriptions => "subscriptions",
            Self::Activities    => "activities",
        }
    }
}

/// Row counts written by a full build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetSummary {
    pub frameworks: usize,
    pub customers: usize,
    pub adoptions: usize,
    pub subscription_events: usize,
    pub activities: usize,
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== DATASET ===")?;
        writeln!(f, "  frameworks:          {}", self.frameworks)?;
        writeln!(f, "  customers:           {}", self.customers)?;
        writeln!(f, "  adoptions:           {}", self.adoptions)?;
        writeln!(f, "  subscription events: {}", self.subscription_events)?;
        write!(f, "  activities:          {}", self.activities)
    }
}

pub struct DatasetBuilder {
    pub run_id:   RunId,
    pub rng_bank: RngBank,
    config:       GenConfig,
    store:        DataStore,
}

impl DatasetBuilder {
    pub fn new(seed: u64, config: GenConfig, store: DataStore) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            rng_bank: RngBank::new(seed),
            config,
            store,
        }
    }

    pub fn seed(&self) -> u64 {
        self.rng_bank.master_seed()
    }

    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn build_frameworks(&self) -> GenResult<Vec<Framework>> {
        let frameworks = catalog();
        self.store.save_frameworks(&frameworks)?;
        self.record(GenerationStep::Frameworks, frameworks.len())?;
        Ok(frameworks)
    }

    pub fn build_customers(&self) -> GenResult<Vec<Customer>> {
        let raw = self.store.load_raw_customers()?;
        let mut rng = self.rng_bank.for_step(GeneratorSlot::Customer);
        let customers = repair_customers(raw, &self.config, &mut rng)?;
        self.store.save_customers(&customers)?;
        self.record(GenerationStep::Customers, customers.len())?;
        Ok(customers)
    }

    pub fn build_adoptions(&self) -> GenResult<Vec<FrameworkAdoption>> {
        let customers = self.store.load_customers()?;
        let frameworks = self.store.load_frameworks()?;
        let mut rng = self.rng_bank.for_step(GeneratorSlot::Adoption);
        let adoptions = generate_adoptions(&customers, &frameworks, &self.config, &mut rng)?;
        self.store.save_adoptions(&adoptions)?;
        self.record(GenerationStep::Adoptions, adoptions.len())?;
        Ok(adoptions)
    }

    pub fn build_subscriptions(&self) -> GenResult<Vec<SubscriptionEvent>> {
        let customers = self.store.load_customers()?;
        let mut rng = self.rng_bank.for_step(GeneratorSlot::Subscription);
        let events = generate_subscription_events(&customers, &self.config, &mut rng)?;
        self.store.save_subscription_events(&events)?;
        self.record(GenerationStep::Subscriptions, events.len())?;
        Ok(events)
    }

    pub fn build_activities(&self) -> GenResult<Vec<ComplianceActivity>> {
        let adoptions = self.store.load_adoptions()?;
        let frameworks = self.store.load_frameworks()?;
        let customers = self.store.load_customers()?;
        let mut rng = self.rng_bank.for_step(GeneratorSlot::Activity);
        let activities =
            generate_activities(&adoptions, &frameworks, &customers, &self.config, &mut rng)?;
        self.store.save_activities(&activities)?;
        self.record(GenerationStep::Activities, activities.len())?;
        Ok(activities)
    }

    /// Run every step in order.
    pub fn build_all(&self) -> GenResult<DatasetSummary> {
        log::info!(
            "build: run={} seed={} dir={}",
            self.run_id,
            self.seed(),
            self.store.dir().display()
        );
        let summary = DatasetSummary {
            frameworks: self.build_frameworks()?.len(),
            customers: self.build_customers()?.len(),
            adoptions: self.build_adoptions()?.len(),
            subscription_events: self.build_subscriptions()?.len(),
            activities: self.build_activities()?.len(),
        };
        log::info!("build: complete run={}", self.run_id);
        Ok(summary)
    }

    pub fn quality_checks(&self) -> GenResult<QualityReport> {
        run_quality_checks(&self.store, &self.config)
    }

    fn record(&self, step: GenerationStep, records_written: usize) -> GenResult<()> {
        log::info!("{}: wrote {records_written} records (seed={})", step.name(), self.seed());
        self.store.append_run(RunRecord {
            run_id: self.run_id.clone(),
            step: step.name().to_string(),
            seed: self.seed(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at: Utc::now(),
            records_written,
        })
    }
}
