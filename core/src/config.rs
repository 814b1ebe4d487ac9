//! Run-level tunables.
//!
//! Weight tables live as named constants next to the generator that draws
//! from them; this struct carries the knobs that change between dataset
//! builds (date window, generation date, churn rates).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE: &str = "generation_config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenConfig {
    /// First possible signup date.
    #[serde(with = "crate::dates::mdy")]
    pub signup_window_start: NaiveDate,
    /// Last possible signup date.
    #[serde(with = "crate::dates::mdy")]
    pub signup_window_end: NaiveDate,
    /// The generation date. Adoptions finishing after it stay `active`;
    /// subscription lifecycles stop before it.
    #[serde(with = "crate::dates::mdy", default = "local_today")]
    pub today: NaiveDate,
    /// Share of customers pre-flagged to churn at some renewal.
    pub churn_flag_probability: f64,
    /// Chance a flagged customer churns at an eligible renewal.
    pub churn_roll_probability: f64,
    /// Customers must be older than this before they can churn.
    pub churn_min_tenure_days: i64,
    pub new_event_max_delay_days: i64,
    pub adoption_start_max_delay_days: i64,
    /// Activities keep arriving this long after completion.
    pub monitoring_window_days: i64,
    pub min_activities_per_adoption: u64,
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            signup_window_start: ymd(2020, 1, 1),
            signup_window_end: ymd(2024, 12, 31),
            today: local_today(),
            churn_flag_probability: 0.15,
            churn_roll_probability: 0.20,
            churn_min_tenure_days: 365,
            new_event_max_delay_days: 30,
            adoption_start_max_delay_days: 365,
            monitoring_window_days: 90,
            min_activities_per_adoption: 5,
        }
    }
}

impl GenConfig {
    /// Load from a JSON file. Fields missing from the file are an error,
    /// except `today`, which defaults to the local date.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: GenConfig = serde_json::from_str(&content)?;
        anyhow::ensure!(
            config.signup_window_start <= config.signup_window_end,
            "signup window is inverted in {}",
            path.display()
        );
        anyhow::ensure!(
            config.new_event_max_delay_days >= 0
                && config.adoption_start_max_delay_days >= 0
                && config.monitoring_window_days >= 0,
            "day counts must not be negative in {}",
            path.display()
        );
        Ok(config)
    }

    /// Use `<data_dir>/generation_config.json` when present, else defaults.
    pub fn load_or_default(data_dir: &Path) -> anyhow::Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        if path.exists() {
            log::info!("config: loading {}", path.display());
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Defaults with a pinned generation date, for tests.
    pub fn default_test() -> Self {
        Self {
            today: ymd(2025, 6, 30),
            ..Self::default()
        }
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}
