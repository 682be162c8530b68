//! Run command - play a route and show live vehicle metrics.

use std::sync::Arc;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Notify;
use tracing::{info, warn};

use locomotion::metrics::{
    format_distance, format_elapsed, format_position, format_progress, format_speed,
};
use locomotion::playback::PlaybackState;
use locomotion::session::{ControlsView, SessionSnapshot};
use locomotion::simulation::{LoadMode, Simulation};

use super::common::{resolve_profile, ProfileArg};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the run command.
pub struct RunArgs {
    pub multi_point: bool,
    pub profile: Option<ProfileArg>,
    pub offline: bool,
    pub ticks: Option<usize>,
}

/// Run the run command.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("run");
    let config = runner.config();

    let plan = config
        .route_plan()
        .with_profile(resolve_profile(args.profile, config));
    let mode = if args.multi_point {
        LoadMode::MultiPoint
    } else {
        LoadMode::Direct
    };

    let loader = runner.route_loader()?;
    let clock = config.playback_clock();
    let runtime = runner.runtime()?;

    // Set up signal handler for graceful shutdown
    let shutdown = Arc::new(Notify::new());
    let shutdown_signal = Arc::clone(&shutdown);
    ctrlc::set_handler(move || shutdown_signal.notify_one())
        .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    runtime.block_on(async move {
        let sim = Simulation::new(loader, clock);

        if args.offline {
            let route = sim.loader().fallback_simple_route(plan.start);
            sim.set_route(route);
        } else {
            println!("Loading {} route ({})...", mode_name(mode), plan.profile);
            if let Err(e) = sim.load_plan(&plan, mode).await {
                warn!(error = %e, "Route load failed");
            }
        }

        let snapshot = sim.snapshot();
        if let Some(error) = &snapshot.error {
            eprintln!("{} {}", style("Error:").red().bold(), error);
        }
        if snapshot.route_len == 0 {
            return Err(CliError::Config("No route to play".to_string()));
        }

        print_banner(&snapshot, args.ticks);

        let mut updates = sim.subscribe();
        sim.set_playing(true);

        let bar = ProgressBar::new(snapshot.route_len.saturating_sub(1) as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>4}/{len:4} {msg}")
                .map_err(|e| CliError::Runtime(e.to_string()))?,
        );

        let mut interrupted = false;
        loop {
            let done = {
                let current = updates.borrow_and_update();
                bar.set_position(current.current_index as u64);
                bar.set_message(format!(
                    "{} | {} | {}",
                    format_speed(current.metadata.current_speed),
                    format_elapsed(current.metadata.elapsed_time),
                    format_progress(current.metadata.progress)
                ));
                current.state == PlaybackState::AtEnd
                    || args.ticks.is_some_and(|n| current.current_index >= n)
            };
            if done {
                break;
            }

            tokio::select! {
                _ = shutdown.notified() => {
                    interrupted = true;
                    break;
                }
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        bar.finish_and_clear();
        sim.set_playing(false);
        let controls = sim.controls_view();
        let state = sim.snapshot().state;
        sim.shutdown();

        if interrupted {
            println!("Interrupted.");
        }
        info!(index = sim.snapshot().current_index, "Playback finished");
        print_summary(&controls, state);
        Ok(())
    })
}

fn mode_name(mode: LoadMode) -> &'static str {
    match mode {
        LoadMode::Direct => "direct",
        LoadMode::MultiPoint => "multi-point",
    }
}

fn print_banner(snapshot: &SessionSnapshot, ticks: Option<usize>) {
    println!("LocoMotion v{}", locomotion::VERSION);
    println!("==================");
    println!();
    println!("Points:   {}", snapshot.route_len);
    println!("Distance: {}", format_distance(snapshot.metadata.total_distance));
    if let Some(ticks) = ticks {
        println!("Ticks:    {}", ticks);
    }
    println!();
    println!("Press Ctrl+C to stop");
    println!();
}

fn print_summary(controls: &ControlsView, state: PlaybackState) {
    let metadata = &controls.metadata;
    println!("{}", style("Vehicle Status").bold());
    println!("──────────────");
    println!("  Status:    {}", style(state.display_status()).cyan());
    println!(
        "  Position:  {}",
        format_position(controls.current_point.as_ref())
    );
    println!("  Speed:     {}", format_speed(metadata.current_speed));
    println!("  Elapsed:   {}", format_elapsed(metadata.elapsed_time));
    println!(
        "  Distance:  {} / {}",
        format_distance(metadata.distance_traveled),
        format_distance(metadata.total_distance)
    );
    println!("  Progress:  {}", format_progress(metadata.progress));
}
