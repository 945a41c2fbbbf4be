use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use powerplan::cli::{Cli, Command};
use powerplan::config::PlanConfig;
use powerplan::controller::{ApplyStatus, PlanController};
use powerplan::powercfg::{ActivePlan, SystemPowerCfg};
use powerplan::profile::{PowerProfile, TimeoutTable};
use powerplan::worker::{Event, Worker};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "POWERPLAN_LOG";

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = powerplan::config::load(cli.config.as_ref());

    match cli.command {
        Command::Status => cmd_status(&config, cli.json)?,
        Command::Apply { profile } => cmd_apply(&config, profile, cli.json)?,
        Command::List => cmd_list(&config, cli.json)?,
        Command::Completions { shell } => powerplan::cli::print_completions(shell),
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("powerplan={}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn build_controller(config: &PlanConfig) -> Result<PlanController<SystemPowerCfg>> {
    let powercfg = SystemPowerCfg::from_command(&config.powercfg.command)?;
    Ok(PlanController::new(powercfg).with_timeouts(config.timeouts.clone()))
}

fn cmd_status(config: &PlanConfig, json: bool) -> Result<()> {
    let mut controller = build_controller(config)?;
    let plan = controller.query();

    if json {
        powerplan::output::print_active_plan_json(&plan);
    } else {
        powerplan::output::print_active_plan(&plan);
    }

    if let ActivePlan::Error(reason) = plan {
        anyhow::bail!("could not read the active power plan: {}", reason);
    }
    Ok(())
}

fn cmd_apply(config: &PlanConfig, profile: PowerProfile, json: bool) -> Result<()> {
    let (worker, events) = Worker::spawn(build_controller(config)?)?;
    worker.apply(profile)?;
    // Queued behind the apply, so it observes the result.
    worker.query()?;

    let spinner = if json {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar
    };

    let mut outcome: Option<ApplyStatus> = None;
    let mut plan: Option<ActivePlan> = None;

    for event in events.iter() {
        match event {
            Event::Apply(status @ ApplyStatus::Applying(_)) => {
                spinner.set_message(status.to_string());
                spinner.enable_steady_tick(Duration::from_millis(100));
            }
            Event::Apply(status) => {
                spinner.finish_and_clear();
                // A failed activation is reported once, through the returned error.
                if !json && !matches!(status, ApplyStatus::Failed { .. }) {
                    powerplan::output::print_apply_status(&status);
                }
                outcome = Some(status);
            }
            Event::ActivePlan(current) => {
                plan = Some(current);
                break;
            }
        }
    }
    worker.shutdown();

    let Some(outcome) = outcome else {
        anyhow::bail!("power plan worker stopped before reporting a result");
    };

    if json {
        powerplan::output::print_apply_json(&outcome, plan.as_ref());
    } else if let Some(plan) = &plan {
        powerplan::output::print_active_plan(plan);
    }

    if let Some(reason) = outcome.exit_error(config.apply.strict) {
        anyhow::bail!("{}", reason);
    }
    if let ApplyStatus::Applied(report) = &outcome
        && !report.is_complete()
        && !json
    {
        println!(
            "  {}",
            "Plan is active, but some timeouts kept their previous values.".yellow()
        );
    }

    Ok(())
}

fn cmd_list(config: &PlanConfig, json: bool) -> Result<()> {
    let rows: Vec<(PowerProfile, TimeoutTable)> = PowerProfile::ALL
        .into_iter()
        .map(|p| (p, config.timeouts.table(p)))
        .collect();

    let mut controller = build_controller(config)?;
    let active = controller.query().profile();

    if json {
        powerplan::output::print_profiles_json(&rows, active);
    } else {
        powerplan::output::print_profiles(&rows, active);
    }
    Ok(())
}
