//! generate-adoptions: simulates which customers adopt which frameworks.

use anyhow::Result;
use phantom_core::validation::validate_adoptions;
use phantom_tools::RunArgs;

fn main() -> Result<()> {
    env_logger::init();

    let args = RunArgs::from_env()?;
    let builder = args.builder()?;
    args.print_header("generate-adoptions", builder.config());

    let adoptions = builder.build_adoptions()?;
    let customers = builder.store().load_customers()?;
    let frameworks = builder.store().load_frameworks()?;
    print!("{}", validate_adoptions(&adoptions, &customers, &frameworks));
    Ok(())
}
