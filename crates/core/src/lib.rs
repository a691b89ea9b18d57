//! Core engine module - pure, deterministic, and testable
//!
//! This crate holds every rule of the hex match game: board topology, match
//! detection, bomb promotion and chain explosions, obstacle hits, gravity and
//! refill, and the solvability search behind hints and reshuffles. It has no
//! dependency on terminal I/O, so the same engine runs in the interactive
//! front end, in headless autoplay, and in tests.
//!
//! - **Deterministic**: the same config and seed always deal the same board
//! - **Synchronous**: each operation runs to a fixed point and returns an
//!   ordered event log instead of suspending mid-cascade
//! - **Single owner**: the [`Engine`] owns the [`Board`]; nothing is global
//!
//! # Module Structure
//!
//! - [`topology`]: neighbor tables and bounds for the hexagon of columns
//! - [`board`]: coordinate → tile storage
//! - [`matcher`]: straight-run and diamond match detection
//! - [`cascade`]: clusters, bomb promotion, chain and double-bomb blasts
//! - [`obstacle`]: the hit contract between removals and obstacle tiles
//! - [`gravity`]: compaction, sideways relaxation and spawning
//! - [`oracle`]: playable-swap search, hint previews and reshuffles
//! - [`engine`]: the façade tying one resolve cycle together
//! - [`config`], [`rng`], [`scoring`], [`snapshot`]: supporting pieces
//!
//! # Resolve Cycle
//!
//! A swap (or reshuffle) mutates the board, then the engine loops
//! detect → cluster → promote → explode → hit obstacles → remove → refill
//! until no match remains, and finally checks that at least one swap is
//! playable, reshuffling a bounded number of times if not.
//!
//! # Example
//!
//! ```
//! use hexmatch_core::{Engine, EngineConfig};
//!
//! let mut engine = Engine::new(EngineConfig::default().with_seed(12345)).unwrap();
//! engine.start();
//! assert!(engine.board().is_full());
//!
//! if let Some((a, b)) = engine.find_hint() {
//!     let log = engine.apply_swap(a, b).unwrap();
//!     assert!(log.passes >= 1);
//!     assert_eq!(engine.score().moves, 1);
//! }
//! ```

pub mod board;
pub mod cascade;
pub mod config;
pub mod engine;
pub mod gravity;
pub mod matcher;
pub mod obstacle;
pub mod oracle;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod topology;

#[cfg(test)]
mod testing;

pub use hexmatch_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use cascade::{double_bomb_plan, plan_removal, RemovalPlan};
pub use config::{ConfigError, EngineConfig};
pub use engine::{CascadeLog, Engine, Hint, RejectReason};
pub use gravity::SpawnPolicy;
pub use matcher::{find_matches, CoordSet};
pub use obstacle::{notify_nearby, HitReport, Obstacle};
pub use oracle::try_find_swap;
pub use rng::SimpleRng;
pub use scoring::Score;
pub use snapshot::BoardSnapshot;
pub use topology::HexTopology;
