use anyhow::anyhow;
use clap::Parser;
use serde::Deserialize;

use crate::map::MIN_ROOM_SIDE;

#[derive(Parser, Debug, Default)]
#[command(
    name = "pick-route",
    about = "Warehouse picking route optimizer.",
    version = "0.1"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Path to the JSON route request (generated when omitted)")]
    pub request_path: Option<String>,

    #[arg(long, help = "Path to write the JSON result to (stdout when omitted)")]
    pub output_path: Option<String>,

    #[arg(long, help = "Path to save the generated request to")]
    pub save_request_path: Option<String>,

    #[arg(long, help = "Path to an octile floor plan replacing the generated layout")]
    pub map_path: Option<String>,

    #[arg(long, help = "Number of picklist lines to generate")]
    pub num_items: Option<usize>,

    #[arg(long, help = "Seed for the picklist generator")]
    pub seed: Option<u64>,

    #[arg(long, help = "Room width when the request does not give one")]
    pub room_width: Option<usize>,

    #[arg(long, help = "Room height when the request does not give one")]
    pub room_height: Option<usize>,

    #[arg(long, help = "Time units per grid step")]
    pub unit_time_per_step: Option<f64>,

    #[arg(long, help = "Time units spent at each pick stop")]
    pub fixed_time_per_stop: Option<f64>,

    #[arg(long, help = "Abort when the route takes longer than this")]
    pub time_limit_ms: Option<u64>,

    #[arg(
        long,
        help = "Build the distance matrix on the current thread",
        default_value_t = false
    )]
    pub sequential: bool,

    #[arg(long, help = "Pretty-print the JSON result", default_value_t = false)]
    pub pretty: bool,
}

/// Settings the route engine itself reads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub room_width: usize,
    pub room_height: usize,
    pub unit_time_per_step: f64,
    pub fixed_time_per_stop: f64,
    pub parallel: bool,
    pub time_limit_ms: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            room_width: 7,
            room_height: 7,
            unit_time_per_step: 0.5,
            fixed_time_per_stop: 10.0,
            parallel: true,
            time_limit_ms: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.room_width < MIN_ROOM_SIDE || self.room_height < MIN_ROOM_SIDE {
            return Err(anyhow!(
                "Default room must be at least {MIN_ROOM_SIDE}x{MIN_ROOM_SIDE}, got {}x{}",
                self.room_width,
                self.room_height
            ));
        }

        for (name, value) in [
            ("unit_time_per_step", self.unit_time_per_step),
            ("fixed_time_per_stop", self.fixed_time_per_stop),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(anyhow!(
                    "{name} must be a non-negative number, got {value}"
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub request_path: Option<String>,
    pub output_path: Option<String>,
    pub save_request_path: Option<String>,
    pub map_path: Option<String>,
    pub num_items: usize,
    pub seed: u64,
    pub pretty: bool,
    pub engine: EngineConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_path: None,
            output_path: None,
            save_request_path: None,
            map_path: None,
            num_items: 5,
            seed: 0,
            pretty: false,
            engine: EngineConfig::default(),
        }
    }
}

impl Config {
    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(path) = &cli.request_path {
            self.request_path = Some(path.clone());
        }
        if let Some(path) = &cli.output_path {
            self.output_path = Some(path.clone());
        }
        if let Some(path) = &cli.save_request_path {
            self.save_request_path = Some(path.clone());
        }
        if let Some(path) = &cli.map_path {
            self.map_path = Some(path.clone());
        }
        if let Some(num_items) = cli.num_items {
            self.num_items = num_items;
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if let Some(width) = cli.room_width {
            self.engine.room_width = width;
        }
        if let Some(height) = cli.room_height {
            self.engine.room_height = height;
        }
        if let Some(value) = cli.unit_time_per_step {
            self.engine.unit_time_per_step = value;
        }
        if let Some(value) = cli.fixed_time_per_stop {
            self.engine.fixed_time_per_stop = value;
        }
        if let Some(limit) = cli.time_limit_ms {
            self.engine.time_limit_ms = Some(limit);
        }
        if cli.sequential {
            self.engine.parallel = false;
        }
        if cli.pretty {
            self.pretty = true;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.request_path.is_none() && self.num_items == 0 {
            return Err(anyhow!(
                "Number of generated items must be positive when no request file is given"
            ));
        }
        self.engine.validate()
    }
}
