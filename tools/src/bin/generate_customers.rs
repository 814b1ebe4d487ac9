//! generate-customers: repairs MOCK_DATA_ORIGINAL.json into DIM_CUSTOMERS.json.

use anyhow::Result;
use phantom_core::validation::validate_customers;
use phantom_tools::RunArgs;

fn main() -> Result<()> {
    env_logger::init();

    let args = RunArgs::from_env()?;
    let builder = args.builder()?;
    args.print_header("generate-customers", builder.config());

    let customers = builder.build_customers()?;
    print!("{}", validate_customers(&customers));
    Ok(())
}
