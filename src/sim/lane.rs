//! Lane geometry and catcher positions
//!
//! Four straight lanes run from an upper spawn point down toward the catcher,
//! two per side of the playfield. Egg positions are resolved by lerping along
//! the lane segment.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::LANE_COUNT;
use crate::lerp_point;

/// A straight lane segment from spawn point to catch point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub start: Vec2,
    pub end: Vec2,
}

impl Lane {
    pub const fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Resolve a progress value to a point on the lane. Progress is clamped
    /// to [0,1] so an egg is never rendered past the catch point.
    #[inline]
    pub fn point_at(&self, progress: f32) -> Vec2 {
        lerp_point(self.start, self.end, progress.clamp(0.0, 1.0))
    }
}

/// The fixed lane layout, indexed by `CatcherPos::lane()`
pub const LANES: [Lane; LANE_COUNT] = [
    Lane::new(Vec2::new(120.0, 90.0), Vec2::new(270.0, 260.0)), // left top
    Lane::new(Vec2::new(160.0, 200.0), Vec2::new(270.0, 320.0)), // left bottom
    Lane::new(Vec2::new(600.0, 90.0), Vec2::new(450.0, 260.0)), // right top
    Lane::new(Vec2::new(560.0, 200.0), Vec2::new(450.0, 320.0)), // right bottom
];

/// Discrete direction request from the input adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Which lane the catcher currently guards. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CatcherPos {
    LeftTop = 0,
    #[default]
    LeftBottom = 1,
    RightTop = 2,
    RightBottom = 3,
}

impl CatcherPos {
    /// Lane index guarded by this position
    #[inline]
    pub fn lane(self) -> usize {
        self as usize
    }

    /// Clamped lookup for the rendering boundary; lane indices inside the
    /// simulator are always in range.
    pub fn from_lane(lane: usize) -> Self {
        match lane {
            0 => CatcherPos::LeftTop,
            1 => CatcherPos::LeftBottom,
            2 => CatcherPos::RightTop,
            _ => CatcherPos::RightBottom,
        }
    }

    /// True if this position is on the left half of the field
    #[inline]
    pub fn is_left(self) -> bool {
        matches!(self, CatcherPos::LeftTop | CatcherPos::LeftBottom)
    }

    /// True if this position is a top lane
    #[inline]
    pub fn is_top(self) -> bool {
        matches!(self, CatcherPos::LeftTop | CatcherPos::RightTop)
    }

    /// Static direction lookup. Vertical input toggles top/bottom within the
    /// current horizontal half; horizontal input toggles halves within the
    /// current row. Each position pairs with exactly one neighbor per axis.
    pub fn step(self, dir: Direction) -> Self {
        use CatcherPos::*;
        match (self, dir) {
            (LeftBottom, Direction::Up) => LeftTop,
            (RightBottom, Direction::Up) => RightTop,
            (LeftTop, Direction::Down) => LeftBottom,
            (RightTop, Direction::Down) => RightBottom,
            (RightTop, Direction::Left) => LeftTop,
            (RightBottom, Direction::Left) => LeftBottom,
            (LeftTop, Direction::Right) => RightTop,
            (LeftBottom, Direction::Right) => RightBottom,
            (pos, _) => pos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CatcherPos::*;
    use Direction::*;

    #[test]
    fn test_point_at_endpoints_and_midpoint() {
        let lane = LANES[1];
        assert_eq!(lane.point_at(0.0), lane.start);
        assert_eq!(lane.point_at(1.0), lane.end);
        let mid = lane.point_at(0.5);
        assert!((mid.x - (lane.start.x + lane.end.x) / 2.0).abs() < 1e-4);
        assert!((mid.y - (lane.start.y + lane.end.y) / 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_point_at_clamps_overshoot() {
        let lane = LANES[0];
        assert_eq!(lane.point_at(1.5), lane.end);
        assert_eq!(lane.point_at(-0.5), lane.start);
    }

    #[test]
    fn test_step_pairs_one_neighbor_per_axis() {
        // Vertical axis pairs positions within a half
        assert_eq!(LeftBottom.step(Up), LeftTop);
        assert_eq!(LeftTop.step(Down), LeftBottom);
        assert_eq!(RightBottom.step(Up), RightTop);
        assert_eq!(RightTop.step(Down), RightBottom);
        // Horizontal axis pairs positions within a row
        assert_eq!(LeftTop.step(Right), RightTop);
        assert_eq!(RightTop.step(Left), LeftTop);
        assert_eq!(LeftBottom.step(Right), RightBottom);
        assert_eq!(RightBottom.step(Left), LeftBottom);
    }

    #[test]
    fn test_step_at_field_edge_is_noop() {
        assert_eq!(LeftTop.step(Up), LeftTop);
        assert_eq!(LeftTop.step(Left), LeftTop);
        assert_eq!(RightBottom.step(Down), RightBottom);
        assert_eq!(RightBottom.step(Right), RightBottom);
    }

    #[test]
    fn test_step_is_involutive_per_axis() {
        for pos in [LeftTop, LeftBottom, RightTop, RightBottom] {
            for (there, back) in [(Up, Down), (Down, Up), (Left, Right), (Right, Left)] {
                let moved = pos.step(there);
                if moved != pos {
                    assert_eq!(moved.step(back), pos);
                }
            }
        }
    }

    #[test]
    fn test_from_lane_round_trips() {
        for pos in [LeftTop, LeftBottom, RightTop, RightBottom] {
            assert_eq!(CatcherPos::from_lane(pos.lane()), pos);
        }
        // Out-of-range input clamps instead of panicking
        assert_eq!(CatcherPos::from_lane(99), RightBottom);
    }
}
