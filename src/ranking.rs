//! Ring ranking for hexagon-shaped maps.
//!
//! The center hex has rank 0 and index 0. Ring `r > 0` holds `6r` hexes
//! whose indices are the contiguous range starting at `1 + 3r(r-1)`, so
//! reading the indices in order spirals outwards ring by ring.
//!
//! Inside a ring, hexes are numbered clockwise on screen along its six
//! straight sides. Side `s` covers local indices `s*r .. (s+1)*r`; its
//! first hex is the ring corner returned by [`anchor_angles`].

use crate::config::{Orientation, StartDirection};
use crate::geometry::DIRECTIONS;

/// Rank and spiral index of a hex on a hexagon map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RankIndex {
    pub rank: i32,
    pub index: i32,
}

impl RankIndex {
    /// Shift the numbering origin of this hex's ring by `rotation` sides.
    ///
    /// Each ring rotates by `rotation * rank` positions, so every ring
    /// starts counting from the same corner of the map.
    pub fn rotated(self, rotation: i32) -> Self {
        if self.rank == 0 {
            return self;
        }

        let start = ring_start(self.rank);
        let local = self.index - start;
        let rotated = (local - rotation * self.rank).rem_euclid(ring_len(self.rank));

        Self {
            rank: self.rank,
            index: start + rotated,
        }
    }
}

/// First index of ring `rank`.
pub const fn ring_start(rank: i32) -> i32 {
    if rank == 0 {
        0
    } else {
        1 + 3 * rank * (rank - 1)
    }
}

/// Number of hexes in ring `rank`.
pub const fn ring_len(rank: i32) -> i32 {
    if rank == 0 { 1 } else { 6 * rank }
}

/// Number of hexes in rings `0..=rank`.
///
/// Formula: 1 + 3n(n+1)
pub const fn total_through(rank: i32) -> i32 {
    1 + 3 * rank * (rank + 1)
}

/// A hexagon-shaped map `width` hexes across. `width` must be odd.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hexagon {
    pub width: i32,
    pub orientation: Orientation,
}

impl Hexagon {
    pub fn new(width: i32, orientation: Orientation) -> Self {
        Self { width, orientation }
    }

    /// Column and row of the center hex.
    pub fn center(&self) -> i32 {
        (self.width - 1) / 2
    }

    pub fn max_rank(&self) -> i32 {
        (self.width - 1) / 2
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.rank_index(x, y).rank <= self.max_rank()
    }

    /// Rank and index of any hex (x, y), inside the map or not.
    pub fn rank_index(&self, x: i32, y: i32) -> RankIndex {
        let (px, py) = self.orientation.to_canonical((x, y));

        let c = self.center();
        let odd = c % 2 == 1;

        let mut dx = px - c;
        let adx = dx.abs();
        let dy = py - c;

        if self.orientation == Orientation::Pointy {
            dx = -dx;
        }

        // Rows of this column that sit on the left/right sides of ring `adx`.
        let min_y = -((adx + if odd { 0 } else { 1 }) / 2);
        let max_y = (adx + if odd { 1 } else { 0 }) / 2;

        let (rank, local) = if dy >= min_y && dy <= max_y {
            let rank = adx;
            if dx < 0 {
                (rank, 4 * rank + (rank - dy + min_y))
            } else {
                (rank, rank + (rank - max_y + dy))
            }
        } else if dy < min_y {
            let rank = adx + min_y - dy;
            if dx < 0 {
                (rank, 5 * rank + (rank + dx))
            } else {
                (rank, dx)
            }
        } else {
            let rank = adx + dy - max_y;
            if dx < 0 {
                (rank, 3 * rank - dx)
            } else {
                (rank, 2 * rank + (rank - dx))
            }
        };

        if rank == 0 {
            RankIndex { rank, index: 0 }
        } else {
            RankIndex {
                rank,
                index: ring_start(rank) + local,
            }
        }
    }
}

/// Screen angle of each ring side's first hex, in degrees clockwise from
/// north, indexed by side.
pub fn anchor_angles(orientation: Orientation) -> [f64; DIRECTIONS] {
    match orientation {
        Orientation::Flat => [0.0, 60.0, 120.0, 180.0, 240.0, 300.0],
        Orientation::Pointy => [270.0, 330.0, 30.0, 90.0, 150.0, 210.0],
    }
}

/// Ring side whose corner is nearest to `direction`. Ties go to the lower
/// side number.
pub fn snap_start(direction: StartDirection, orientation: Orientation) -> i32 {
    let target = direction.angle();
    let mut best = 0;
    let mut best_distance = f64::MAX;

    for (side, angle) in anchor_angles(orientation).iter().enumerate() {
        let d = (target - angle).rem_euclid(360.0);
        let distance = d.min(360.0 - d);
        if distance < best_distance {
            best = side as i32;
            best_distance = distance;
        }
    }

    best
}
