pub mod cli;
pub mod config;
pub mod launch;
pub mod model;
pub mod process;
pub mod runtime;
pub mod stages;
pub mod workflow;

pub fn run_cli() -> Result<(), String> {
    cli::run_cli()
}
