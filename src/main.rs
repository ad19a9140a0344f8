use clap::Parser;
use navlaunch::bringup::bringup_descriptor;
use navlaunch::cli::{output, Cli};
use navlaunch::descriptor::LaunchDescriptor;
use navlaunch::launch::{Launcher, LauncherConfig};
use navlaunch::logging;
use navlaunch::resolve::AmentIndex;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    match run(cli).await {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<i32> {
    let descriptor = match &cli.file {
        Some(path) => LaunchDescriptor::from_file(path)?,
        None => {
            let index = AmentIndex::from_env();
            bringup_descriptor(&index, cli.map.clone())?
        }
    };

    let launcher = Launcher::new(LauncherConfig {
        grace_period_secs: cli.grace_period,
        log_dir: cli.log_dir.clone(),
    });

    let report = launcher.launch(descriptor).await?;
    output::print_report(&report);

    Ok(report.exit_code())
}
