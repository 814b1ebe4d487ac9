//! generate-activities: fills in compliance work for every adoption.

use anyhow::Result;
use phantom_core::validation::validate_activities;
use phantom_tools::RunArgs;

fn main() -> Result<()> {
    env_logger::init();

    let args = RunArgs::from_env()?;
    let builder = args.builder()?;
    args.print_header("generate-activities", builder.config());

    let activities = builder.build_activities()?;
    let adoptions = builder.store().load_adoptions()?;
    print!(
        "{}",
        validate_activities(&activities, &adoptions, builder.config().monitoring_window_days)
    );
    Ok(())
}
