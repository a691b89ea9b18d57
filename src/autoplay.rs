//! Headless play: repeatedly take the engine's hint and report each cascade.

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::core::{CascadeLog, Engine, EngineConfig, Score};
use crate::types::Coord;

/// One line of autoplay output. Step 0 is the initial deal.
#[derive(Debug, Clone, Serialize)]
pub struct AutoplayRecord {
    pub step: u32,
    pub swap: Option<(Coord, Coord)>,
    pub log: CascadeLog,
    pub score: Score,
}

/// Play up to `moves` hinted swaps, handing every record to `emit`.
/// Stops early if the engine has no playable swap left. Returns the final score.
pub fn autoplay(
    config: EngineConfig,
    moves: u32,
    mut emit: impl FnMut(&AutoplayRecord) -> Result<()>,
) -> Result<Score> {
    let mut engine = Engine::new(config)?;
    let log = engine.start();
    emit(&AutoplayRecord {
        step: 0,
        swap: None,
        log,
        score: engine.score(),
    })?;

    for step in 1..=moves {
        let Some((a, b)) = engine.find_hint() else {
            warn!(step, "no playable swap, stopping");
            break;
        };
        let log = engine.apply_swap(a, b)?;
        emit(&AutoplayRecord {
            step,
            swap: Some((a, b)),
            log,
            score: engine.score(),
        })?;
    }

    let score = engine.score();
    info!(tiles = score.tiles, hearts = score.hearts, moves = score.moves, "autoplay finished");
    Ok(score)
}
