use pick_route::common::RouteRequest;
use pick_route::config::{Cli, Config};
use pick_route::map::Map;
use pick_route::scenario::{generate_request, load_request_from_file, write_request_to_file};
use pick_route::solver::{plan_route, plan_route_on_map};

use anyhow::{anyhow, Context};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)
            .with_context(|| format!("error reading config file: {config_file}"))?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        info!("No config file specified, using default config");
        Config::default()
    }
    .override_from_command_line(&cli)?;

    let floor_plan = match &config.map_path {
        Some(path) => Some(
            Map::from_file(path).with_context(|| format!("error loading map: {path}"))?,
        ),
        None => None,
    };

    let request: RouteRequest = match &config.request_path {
        Some(path) => load_request_from_file(path)?,
        None => {
            let map = match &floor_plan {
                Some(map) => map.clone(),
                None => Map::warehouse(config.engine.room_width, config.engine.room_height)?,
            };
            let mut rng = StdRng::seed_from_u64(config.seed);
            let request =
                generate_request(&map, config.num_items, &mut rng).map_err(|e| anyhow!(e))?;
            if let Some(path) = &config.save_request_path {
                write_request_to_file(path, &request)
                    .with_context(|| format!("error saving generated request: {path}"))?;
                info!("Generated request saved to {path}");
            }
            request
        }
    };

    let result = match floor_plan {
        Some(map) => plan_route_on_map(&request, map, &config.engine)?,
        None => plan_route(&request, &config.engine)?,
    };
    result.stats.print();

    let response = result.response();
    let json = if config.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };

    match &config.output_path {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("error writing result: {path}"))?;
            info!("Route written to {path}");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }

    Ok(())
}
