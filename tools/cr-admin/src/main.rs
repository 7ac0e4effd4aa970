//! CR-Admin entry point.

use anyhow::Result;
use clap::Parser;
use cr_admin::{commands, Args};
use desk_runtime::Desk;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = commands::load_config(&args)?;

    // Ignore a second init, e.g. when embedded in a test harness.
    let _ = desk_telemetry::init_logging(&config.telemetry.clone().with_service_name("cr-admin"));

    let desk = Desk::new(config)?;
    let background = desk.spawn_background_tasks();

    let mut stdout = std::io::stdout().lock();
    let result = commands::run(args, &desk, &mut stdout).await;

    for task in background {
        task.abort();
    }
    result
}
