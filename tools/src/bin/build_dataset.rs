//! build-dataset: runs every generation step in order, then the quality
//! checks.
//!
//! Usage:
//!   build-dataset --seed 12345 --data-dir ./data --today 06/30/2025

use anyhow::Result;
use phantom_tools::RunArgs;

fn main() -> Result<()> {
    env_logger::init();

    let args = RunArgs::from_env()?;
    let builder = args.builder()?;
    args.print_header("build-dataset", builder.config());

    let summary = builder.build_all()?;
    println!("{summary}");
    println!("  run_id:              {}", builder.run_id);
    println!();

    let report = builder.quality_checks()?;
    println!("{report}");
    Ok(())
}
