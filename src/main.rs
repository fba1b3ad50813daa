mod cli;
mod settings;
mod workflow;

use anyhow::Result;
use cli::parse_cli;
use tokio::task::LocalSet;
use workflow::BrowseWorkflow;

fn main() -> Result<()> {
    let cli = parse_cli();
    let resolved = settings::load(&cli)?;

    if cli.print_config {
        resolved.print_summary();
        return Ok(());
    }

    sharetree::logging::initialize(resolved.log_level);
    let workflow = BrowseWorkflow::from_config(resolved)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    LocalSet::new().block_on(&runtime, workflow.run())
}
