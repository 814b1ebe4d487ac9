//! generate-frameworks: writes the static framework catalog.

use anyhow::Result;
use phantom_core::framework_catalog::summarize;
use phantom_tools::RunArgs;

fn main() -> Result<()> {
    env_logger::init();

    let args = RunArgs::from_env()?;
    let builder = args.builder()?;
    args.print_header("generate-frameworks", builder.config());

    let frameworks = builder.build_frameworks()?;
    println!("{}", summarize(&frameworks));
    Ok(())
}
