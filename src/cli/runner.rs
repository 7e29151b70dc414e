use clap::Parser;
use tracing::info;

use crate::runtime::AppContext;

use super::types::{Cli, Commands, RobotInfo};

pub fn run_cli() -> Result<(), String> {
    let cli = Cli::parse();
    let mut app = AppContext::load(cli.settings.as_deref()).map_err(|error| error.to_string())?;
    if let Some(root) = cli.package_root {
        app.settings_mut().launch.package_root = Some(root);
    }

    match cli.command {
        Commands::Evaluate {
            run,
            scorer_script,
            report,
        } => {
            if let Some(script) = scorer_script {
                app.settings_mut().scorer.script = script;
            }
            let run = run.into_run().map_err(|error| error.to_string())?;
            let run_report = app
                .pipeline_service()
                .run(app.settings(), &run)
                .map_err(|error| error.to_string())?;
            if let Some(report_path) = report {
                app.pipeline_service()
                    .save_report(&report_path, &run_report)
                    .map_err(|error| error.to_string())?;
                info!(report = %report_path.display(), "run report saved");
            }
            println!("{}", run_report.audit_log());
        }
        Commands::Resolve { robot_name } => {
            let tracking_frame = app
                .launch_service()
                .tracking_frame(app.settings(), &robot_name)
                .map_err(|error| error.to_string())?;
            let transform_source = app
                .launch_service()
                .transform_source(app.settings(), &robot_name)
                .map_err(|error| error.to_string())?;
            let info = RobotInfo {
                robot: robot_name,
                tracking_frame,
                transform_source,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&info).map_err(|error| error.to_string())?
            );
        }
        Commands::Paths { run } => {
            let run = run.into_run().map_err(|error| error.to_string())?;
            let paths = app
                .pipeline_service()
                .plan(&run)
                .map_err(|error| error.to_string())?;
            println!(
                "{}",
                serde_json::to_string_pretty(&paths).map_err(|error| error.to_string())?
            );
        }
    }

    Ok(())
}
