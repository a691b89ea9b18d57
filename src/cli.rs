//! Command line parsing and config loading for the `hexmatch` binary.

use std::env;
use std::fs;

use anyhow::{anyhow, Context, Result};

use crate::core::EngineConfig;

/// Moves played by `autoplay` when `--moves` is not given.
pub const DEFAULT_AUTOPLAY_MOVES: u32 = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub seed: Option<u32>,
    pub config_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive terminal game.
    Play(RunOptions),
    /// Headless hint-driven play, one JSON line per move.
    Autoplay { options: RunOptions, moves: u32 },
}

/// Parse arguments (without the program name).
///
/// `hexmatch [--seed S] [--config P]` or
/// `hexmatch autoplay [--moves N] [--seed S] [--config P]`.
pub fn parse_args(args: &[String]) -> Result<Command> {
    let (autoplay, rest) = match args.first().map(String::as_str) {
        Some("autoplay") => (true, &args[1..]),
        _ => (false, args),
    };

    let mut options = RunOptions::default();
    let mut moves = DEFAULT_AUTOPLAY_MOVES;
    let mut iter = rest.iter();
    while let Some(arg) = iter.next() {
        let mut value = || {
            iter.next()
                .ok_or_else(|| anyhow!("missing value for {arg}"))
        };
        match arg.as_str() {
            "--seed" => {
                let v = value()?;
                options.seed = Some(
                    v.parse()
                        .map_err(|_| anyhow!("invalid --seed value: {v}"))?,
                );
            }
            "--config" => options.config_path = Some(value()?.clone()),
            "--moves" if autoplay => {
                let v = value()?;
                moves = v
                    .parse()
                    .map_err(|_| anyhow!("invalid --moves value: {v}"))?;
            }
            other => return Err(anyhow!("unknown argument: {other}")),
        }
    }

    Ok(if autoplay {
        Command::Autoplay { options, moves }
    } else {
        Command::Play(options)
    })
}

/// Build the engine config: JSON file if given, defaults otherwise, then the
/// `--seed` override. The result is validated.
pub fn load_config(options: &RunOptions) -> Result<EngineConfig> {
    let mut config = match &options.config_path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {path}"))?;
            serde_json::from_str::<EngineConfig>(&text)
                .with_context(|| format!("parsing config {path}"))?
        }
        None => EngineConfig::default(),
    };
    if let Some(seed) = options.seed {
        config = config.with_seed(seed);
    }
    config.validate()?;
    Ok(config)
}

/// `HEXMATCH_LOG_PATH`, trimmed; unset or blank means no log file.
pub fn log_path_from_env() -> Option<String> {
    env::var("HEXMATCH_LOG_PATH")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
