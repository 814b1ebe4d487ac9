//! quality-checks: validates every table in the data directory.
//!
//! Exits non-zero only when DIM_CUSTOMERS.json is missing or a table is
//! malformed; quality issues are reported, not fatal.

use anyhow::Result;
use phantom_core::{store::DataStore, validation::run_quality_checks};
use phantom_tools::RunArgs;

fn main() -> Result<()> {
    env_logger::init();

    let args = RunArgs::from_env()?;
    let config = args.config()?;
    args.print_header("quality-checks", &config);

    let report = run_quality_checks(&DataStore::new(&args.data_dir), &config)?;
    println!("{report}");
    Ok(())
}
