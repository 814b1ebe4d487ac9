//! Shared command-line plumbing for the generator binaries.
//!
//! Every binary accepts the same optional flags:
//!   --seed 12345            master seed (default: wall clock, printed)
//!   --data-dir ./data       where tables are read and written
//!   --today 06/30/2025      override the generation date

use anyhow::{Context, Result};
use chrono::NaiveDate;
use phantom_core::{config::GenConfig, dates, pipeline::DatasetBuilder, store::DataStore};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Clone, PartialEq)]
pub struct RunArgs {
    pub seed: u64,
    pub data_dir: PathBuf,
    pub today: Option<NaiveDate>,
}

impl RunArgs {
    pub fn from_env() -> Result<Self> {
        let args: Vec<String> = env::args().collect();
        Self::parse(&args)
    }

    pub fn parse(args: &[String]) -> Result<Self> {
        let seed = parse_seed(args);
        let data_dir = flag_value(args, "--data-dir").unwrap_or(DEFAULT_DATA_DIR).into();
        let today = flag_value(args, "--today")
            .map(|v| dates::parse_date(v).with_context(|| format!("invalid --today '{v}'")))
            .transpose()?;
        Ok(Self { seed, data_dir, today })
    }

    /// Load `generation_config.json` from the data directory (or defaults)
    /// and apply the `--today` override.
    pub fn config(&self) -> Result<GenConfig> {
        let mut config = GenConfig::load_or_default(&self.data_dir)?;
        if let Some(today) = self.today {
            config.today = today;
        }
        Ok(config)
    }

    pub fn builder(&self) -> Result<DatasetBuilder> {
        let config = self.config()?;
        log::info!("seed={} data_dir={}", self.seed, self.data_dir.display());
        Ok(DatasetBuilder::new(self.seed, config, DataStore::new(&self.data_dir)))
    }

    pub fn print_header(&self, program: &str, config: &GenConfig) {
        println!("Phantom Sec: {program}");
        println!("  seed:      {}", self.seed);
        println!("  data_dir:  {}", self.data_dir.display());
        println!("  today:     {}", dates::format_date(config.today));
        println!();
    }
}

/// `--seed` when given, else the clock. An unparsable value also falls back
/// to the clock, with a warning since the run will not be reproducible.
pub fn parse_seed(args: &[String]) -> u64 {
    match flag_value(args, "--seed") {
        None => chrono_tick(),
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            let seed = chrono_tick();
            log::warn!("ignoring --seed '{raw}' ({e}); using clock seed {seed}");
            seed
        }),
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Seconds since the epoch; the default seed when none is given.
pub fn chrono_tick() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
