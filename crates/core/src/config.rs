//! Engine configuration.
//!
//! The board is rebuilt every session from this config: there is no persisted
//! state beyond the column heights and the seed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::topology::HexTopology;
use crate::types::{
    TileKind, DEFAULT_BOMB_CLUSTER_MIN, DEFAULT_COLUMN_HEIGHTS, DEFAULT_MAX_RESHUFFLE_ATTEMPTS,
    DEFAULT_OBSTACLE_HITS, DEFAULT_OBSTACLE_LIMIT, DEFAULT_OBSTACLE_SPAWN_PERCENT,
    MAX_THREE_KIND_CAPACITY,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("column count must be odd and between 3 and 15, got {0}")]
    ColumnCount(usize),
    #[error("column {col} has invalid height {height}")]
    ColumnHeight { col: usize, height: u8 },
    #[error("column {col} breaks the hexagon profile (heights must step by one toward the center)")]
    NotHexagonal { col: usize },
    #[error("kind_count must be between 3 and {max}, got {got}")]
    KindCount { got: u8, max: usize },
    #[error("a board of {capacity} tiles needs at least 4 kinds (3 kinds allow at most {max})")]
    TooFewKinds { capacity: usize, max: usize },
    #[error("obstacle_spawn_percent must be at most 100, got {0}")]
    ObstacleSpawnPercent(u8),
    #[error("board shape does not match column_heights")]
    BoardShape,
    #[error("{name} must be at least {min}, got {got}")]
    TooSmall {
        name: &'static str,
        min: u8,
        got: u8,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub column_heights: Vec<u8>,
    pub kind_count: u8,
    pub seed: u32,
    pub obstacle_spawn_percent: u8,
    pub obstacle_limit: u8,
    pub obstacle_hits: u8,
    pub bomb_cluster_min: u8,
    pub max_reshuffle_attempts: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            column_heights: DEFAULT_COLUMN_HEIGHTS.to_vec(),
            kind_count: TileKind::COUNT as u8,
            seed: 1,
            obstacle_spawn_percent: DEFAULT_OBSTACLE_SPAWN_PERCENT,
            obstacle_limit: DEFAULT_OBSTACLE_LIMIT,
            obstacle_hits: DEFAULT_OBSTACLE_HITS,
            bomb_cluster_min: DEFAULT_BOMB_CLUSTER_MIN,
            max_reshuffle_attempts: DEFAULT_MAX_RESHUFFLE_ATTEMPTS,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Same config with obstacle spawning turned off.
    pub fn without_obstacles(mut self) -> Self {
        self.obstacle_spawn_percent = 0;
        self
    }

    /// Check every field and build the board topology.
    pub fn validate(&self) -> Result<HexTopology, ConfigError> {
        if self.kind_count < 3 || self.kind_count as usize > TileKind::COUNT {
            return Err(ConfigError::KindCount {
                got: self.kind_count,
                max: TileKind::COUNT,
            });
        }
        if self.obstacle_spawn_percent > 100 {
            return Err(ConfigError::ObstacleSpawnPercent(self.obstacle_spawn_percent));
        }
        for (name, min, got) in [
            ("obstacle_hits", 1, self.obstacle_hits),
            ("bomb_cluster_min", 2, self.bomb_cluster_min),
            ("max_reshuffle_attempts", 1, self.max_reshuffle_attempts),
        ] {
            if got < min {
                return Err(ConfigError::TooSmall { name, min, got });
            }
        }
        let topology = HexTopology::new(&self.column_heights)?;
        if self.kind_count == 3 && topology.capacity() > MAX_THREE_KIND_CAPACITY {
            return Err(ConfigError::TooFewKinds {
                capacity: topology.capacity(),
                max: MAX_THREE_KIND_CAPACITY,
            });
        }
        Ok(topology)
    }
}
