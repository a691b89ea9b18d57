//! RNG module - deterministic tile draws
//!
//! A simple LCG keeps every board reproducible from its seed, which is all the
//! engine needs for spawning, obstacle rolls and reshuffles.

use crate::types::TileKind;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        // Seed 0 is treated as seed 1.
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Random value in `[0, max)`. `max` must be non-zero.
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        (self.next_u32() >> 8) % max.max(1)
    }

    /// True with probability `percent / 100`.
    pub fn chance_percent(&mut self, percent: u8) -> bool {
        match percent {
            0 => false,
            p if p >= 100 => true,
            p => self.next_range(100) < p as u32,
        }
    }

    /// Uniform draw from the first `kind_count` kinds.
    pub fn draw_kind(&mut self, kind_count: u8) -> TileKind {
        let count = (kind_count as usize).clamp(1, TileKind::COUNT);
        TileKind::ALL[self.next_range(count as u32) as usize]
    }

    /// Draw a kind outside `forbidden`. Falls back to an unrestricted draw when
    /// every kind in play is forbidden.
    pub fn draw_kind_avoiding(&mut self, kind_count: u8, forbidden: &[TileKind]) -> TileKind {
        let count = (kind_count as usize).clamp(1, TileKind::COUNT);
        let mut allowed = [TileKind::Blue; TileKind::COUNT];
        let mut len = 0;
        for &kind in &TileKind::ALL[..count] {
            if !forbidden.contains(&kind) {
                allowed[len] = kind;
                len += 1;
            }
        }
        if len == 0 {
            return self.draw_kind(kind_count);
        }
        allowed[self.next_range(len as u32) as usize]
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
