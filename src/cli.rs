//! Command-line options for the terminal binary.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::core::GameConfig;

pub const DEFAULT_STORE_PATH: &str = "bingo-save.json";

pub const USAGE: &str = "\
usage: garden-bingo [--seed <u32>] [--store <path>] [--config <path>] [--log <path>]

  --seed <u32>      deterministic draws (default: random)
  --store <path>    save file for tickets and the live session (default: bingo-save.json)
  --config <path>   JSON file overriding the game tunables
  --log <path>      write logs to this file (RUST_LOG controls the level)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub seed: Option<u32>,
    pub store_path: PathBuf,
    pub config_path: Option<PathBuf>,
    pub log_path: Option<PathBuf>,
    pub help: bool,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            seed: None,
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            config_path: None,
            log_path: None,
            help: false,
        }
    }
}

pub fn parse_args(args: &[String]) -> Result<CliOptions> {
    let mut opts = CliOptions::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                let v = value_of(args, &mut i, "--seed")?;
                opts.seed = Some(
                    v.parse::<u32>()
                        .map_err(|_| anyhow!("invalid --seed value: {}", v))?,
                );
            }
            "--store" => {
                opts.store_path = PathBuf::from(value_of(args, &mut i, "--store")?);
            }
            "--config" => {
                opts.config_path = Some(PathBuf::from(value_of(args, &mut i, "--config")?));
            }
            "--log" => {
                opts.log_path = Some(PathBuf::from(value_of(args, &mut i, "--log")?));
            }
            "-h" | "--help" => opts.help = true,
            other => return Err(anyhow!("unknown argument: {}", other)),
        }
        i += 1;
    }
    Ok(opts)
}

fn value_of<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing value for {}", flag))
}

/// Load the game config named on the command line, or the defaults.
pub fn load_game_config(opts: &CliOptions) -> Result<GameConfig> {
    match &opts.config_path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(GameConfig::default()),
    }
}

/// Route logs to `path`. Without a path logging stays off: stderr would
/// scribble over the alternate screen.
pub fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}
