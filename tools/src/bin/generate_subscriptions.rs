//! generate-subscriptions: walks every customer's billing lifecycle.

use anyhow::Result;
use phantom_core::validation::validate_subscription_events;
use phantom_tools::RunArgs;

fn main() -> Result<()> {
    env_logger::init();

    let args = RunArgs::from_env()?;
    let builder = args.builder()?;
    args.print_header("generate-subscriptions", builder.config());

    let events = builder.build_subscriptions()?;
    let customers = builder.store().load_customers()?;
    print!("{}", validate_subscription_events(&events, &customers));
    Ok(())
}
