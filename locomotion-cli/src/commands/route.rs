//! Route command - acquire a route and print it.

use console::style;
use serde_json::json;

use locomotion::metrics::{compute_metrics, format_distance, format_elapsed, VehicleMetadata};
use locomotion::route::{Route, TravelProfile};

use super::common::{resolve_profile, ProfileArg};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the route command.
pub struct RouteArgs {
    pub multi_point: bool,
    pub profile: Option<ProfileArg>,
    pub all_profiles: bool,
    pub json: bool,
}

/// Run the route command.
pub fn run(args: RouteArgs) -> Result<(), CliError> {
    let runner = CliRunner::new()?;
    runner.log_startup("route");
    let config = runner.config();

    let plan = config
        .route_plan()
        .with_profile(resolve_profile(args.profile, config));
    let loader = runner.route_loader()?;
    let runtime = runner.runtime()?;

    let routes: Vec<(TravelProfile, Route)> = runtime.block_on(async {
        if args.all_profiles {
            Ok::<_, CliError>(
                loader
                    .load_direct_routes(plan.start, plan.end, &TravelProfile::ALL)
                    .await,
            )
        } else if args.multi_point {
            let route = loader
                .load_multi_point_route(&plan.waypoints, plan.profile)
                .await?;
            Ok(vec![(plan.profile, route)])
        } else {
            let route = loader
                .load_direct_route(plan.start, plan.end, plan.profile)
                .await;
            Ok(vec![(plan.profile, route)])
        }
    })?;

    if args.json {
        print_json(&routes)
    } else {
        for (profile, route) in &routes {
            print_route(*profile, route, !args.all_profiles);
        }
        Ok(())
    }
}

fn summary(route: &Route) -> VehicleMetadata {
    compute_metrics(route, route.len() as i64 - 1)
}

fn print_json(routes: &[(TravelProfile, Route)]) -> Result<(), CliError> {
    let output: Vec<_> = routes
        .iter()
        .map(|(profile, route)| {
            json!({
                "profile": profile.name(),
                "points": route.points(),
                "summary": summary(route),
            })
        })
        .collect();

    let text = serde_json::to_string_pretty(&output)
        .map_err(|e| CliError::Runtime(format!("Failed to encode route: {}", e)))?;
    println!("{}", text);
    Ok(())
}

fn print_route(profile: TravelProfile, route: &Route, with_points: bool) {
    let metadata = summary(route);
    println!(
        "{} {} points, {}, {}",
        style(format!("[{}]", profile)).cyan().bold(),
        route.len(),
        format_distance(metadata.total_distance),
        format_elapsed(metadata.elapsed_time)
    );

    if !with_points {
        return;
    }

    println!();
    println!("  {:>4}  {:>11}  {:>11}  {}", "#", "Latitude", "Longitude", "Time");
    for (i, point) in route.iter().enumerate() {
        println!(
            "  {:>4}  {:>11.6}  {:>11.6}  {}",
            i,
            point.latitude,
            point.longitude,
            point.timestamp.format("%H:%M:%S")
        );
    }
}
