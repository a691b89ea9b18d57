//! Cluster grouping, bomb promotion and chain explosions
//!
//! A pass turns the raw match set into a [`RemovalPlan`]:
//!
//! 1. matched cells are split into connected same-kind clusters;
//! 2. every cluster of at least `bomb_cluster_min` cells keeps its median
//!    member (in traversal order) and promotes it to a bomb;
//! 3. every bomb in the removal set detonates, adding its 1-ring, until the
//!    set stops growing.
//!
//! Freshly promoted cells are never consumed by blasts of the same pass.
//! Obstacles never enter a removal set; they take hits through
//! [`crate::obstacle::notify_nearby`] instead.

use std::collections::VecDeque;

use crate::board::Board;
use crate::matcher::CoordSet;
use crate::types::{Coord, RemovalReason, BOMB_RADIUS, CHAIN_BOMB_RADIUS, DOUBLE_BOMB_RADIUS};

/// Everything one resolution pass will do to the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalPlan {
    /// Matched cells to clear (promoted cells excluded).
    pub matched: CoordSet,
    /// Cells that become bombs instead of being cleared.
    pub promoted: Vec<Coord>,
    /// Cells cleared by blasts that were not matched themselves.
    pub exploded: CoordSet,
    /// Bombs that went off, in detonation order.
    pub detonated: Vec<Coord>,
}

impl RemovalPlan {
    /// Union of matched and exploded cells.
    pub fn removal_set(&self) -> CoordSet {
        self.matched.union(&self.exploded).copied().collect()
    }

    pub fn reason(&self, coord: Coord) -> RemovalReason {
        if self.matched.contains(&coord) {
            RemovalReason::Matched
        } else {
            RemovalReason::Exploded
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty() && self.exploded.is_empty() && self.promoted.is_empty()
    }
}

/// Split `matches` into maximal connected same-kind clusters.
///
/// Seeds are taken in ascending coordinate order and each cluster lists its
/// cells in breadth-first order, neighbors visited in direction order.
pub fn group_clusters(board: &Board, matches: &CoordSet) -> Vec<Vec<Coord>> {
    let topology = board.topology();
    let mut seen = CoordSet::new();
    let mut clusters = Vec::new();
    let mut queue = VecDeque::new();

    for &seed in matches {
        if !seen.insert(seed) {
            continue;
        }
        let kind = board.match_kind(seed);
        let mut cluster = Vec::new();
        queue.push_back(seed);
        while let Some(coord) = queue.pop_front() {
            cluster.push(coord);
            for next in topology.neighbors(coord) {
                if matches.contains(&next) && board.match_kind(next) == kind && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        clusters.push(cluster);
    }
    clusters
}

/// Cell of `cluster` that becomes a bomb: the median traversal element, or
/// the nearest non-bomb to it when the median already is one.
pub fn promotion_site(board: &Board, cluster: &[Coord]) -> Option<Coord> {
    let mid = cluster.len() / 2;
    let is_free = |idx: usize| {
        cluster
            .get(idx)
            .copied()
            .filter(|&c| board.get(c).is_some_and(|tile| !tile.is_bomb() && !tile.is_obstacle()))
    };
    (0..cluster.len()).find_map(|dist| {
        is_free(mid + dist).or_else(|| mid.checked_sub(dist).and_then(is_free))
    })
}

/// Group, promote and explode one pass worth of matches.
pub fn plan_removal(board: &Board, matches: &CoordSet, bomb_cluster_min: usize) -> RemovalPlan {
    let mut plan = RemovalPlan::default();
    for cluster in group_clusters(board, matches) {
        let site = if cluster.len() >= bomb_cluster_min {
            promotion_site(board, &cluster)
        } else {
            None
        };
        plan.matched
            .extend(cluster.iter().copied().filter(|&c| Some(c) != site));
        plan.promoted.extend(site);
    }

    let protected: CoordSet = plan.promoted.iter().copied().collect();
    let mut removal = plan.matched.clone();
    while explosion_step(board, &mut removal, &mut plan.detonated, &protected) {}
    plan.exploded = removal.difference(&plan.matched).copied().collect();
    plan
}

/// One round of the explosion fixed point: detonate every bomb in `removal`
/// not yet in `detonated`. Returns true if the set grew.
pub fn explosion_step(
    board: &Board,
    removal: &mut CoordSet,
    detonated: &mut Vec<Coord>,
    protected: &CoordSet,
) -> bool {
    let pending: Vec<Coord> = removal
        .iter()
        .copied()
        .filter(|&c| board.get(c).is_some_and(|t| t.is_bomb()) && !detonated.contains(&c))
        .collect();

    let mut grew = false;
    for bomb in pending {
        detonated.push(bomb);
        for coord in blast_area(board, bomb, BOMB_RADIUS) {
            if !protected.contains(&coord) && is_clearable(board, coord) && removal.insert(coord) {
                grew = true;
            }
        }
    }
    grew
}

/// In-bounds cells within `radius` hex steps of `center`, center included.
pub fn blast_area(board: &Board, center: Coord, radius: u8) -> CoordSet {
    let topology = board.topology();
    let mut area = CoordSet::new();
    if !topology.in_bounds(center) {
        return area;
    }
    area.insert(center);
    let mut frontier = vec![center];
    for _ in 0..radius {
        let mut next_frontier = Vec::new();
        for coord in frontier {
            for next in topology.neighbors(coord) {
                if area.insert(next) {
                    next_frontier.push(next);
                }
            }
        }
        frontier = next_frontier;
    }
    area
}

/// Blast for two bombs swapped into each other: each trigger clears its
/// 2-ring, and any other bomb caught inside goes off with a 1-ring. No bomb
/// detonates twice.
pub fn double_bomb_plan(board: &Board, a: Coord, b: Coord) -> RemovalPlan {
    let mut plan = RemovalPlan::default();
    let mut visited: CoordSet = [a, b].into_iter().collect();
    let mut queue: VecDeque<(Coord, u8)> =
        [(a, DOUBLE_BOMB_RADIUS), (b, DOUBLE_BOMB_RADIUS)].into_iter().collect();

    while let Some((bomb, radius)) = queue.pop_front() {
        plan.detonated.push(bomb);
        for coord in blast_area(board, bomb, radius) {
            if !is_clearable(board, coord) {
                continue;
            }
            plan.exploded.insert(coord);
            if board.get(coord).is_some_and(|t| t.is_bomb()) && visited.insert(coord) {
                queue.push_back((coord, CHAIN_BOMB_RADIUS));
            }
        }
    }
    plan
}

#[inline]
fn is_clearable(board: &Board, coord: Coord) -> bool {
    board.get(coord).is_some_and(|tile| !tile.is_obstacle())
}
