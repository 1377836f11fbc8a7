//! Stroke paths for hex borders.
//!
//! Interior edges are drawn once, by the hex that owns directions 0..3 of
//! the edge pair. Map-boundary edges are drawn by their only hex as half
//! edges chained through shared corners, so a run of boundary edges
//! becomes one polyline and dashes and caps flow around convex corners.

use crate::geometry::{DIRECTIONS, Point, canonical_corner};
use crate::grid::HexGrid;
use crate::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    MoveTo(Point),
    LineTo(Point),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    ops: Vec<PathOp>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, point: Point) {
        self.ops.push(PathOp::MoveTo(point));
    }

    pub fn line_to(&mut self, point: Point) {
        self.ops.push(PathOp::LineTo(point));
    }

    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn extend(&mut self, other: Path) {
        self.ops.extend(other.ops);
    }

    /// Apply `f` to every point.
    pub fn map(self, f: impl Fn(Point) -> Point) -> Self {
        let ops = self
            .ops
            .into_iter()
            .map(|op| match op {
                PathOp::MoveTo(p) => PathOp::MoveTo(f(p)),
                PathOp::LineTo(p) => PathOp::LineTo(f(p)),
            })
            .collect();
        Self { ops }
    }

    /// Number of subpaths, i.e. of `MoveTo` ops.
    #[cfg(test)]
    pub fn subpaths(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, PathOp::MoveTo(_)))
            .count()
    }

    /// Total length of all drawn segments.
    #[cfg(test)]
    pub fn length(&self) -> f64 {
        let mut length = 0.0;
        let mut cursor: Option<Point> = None;
        for op in &self.ops {
            match *op {
                PathOp::MoveTo(p) => cursor = Some(p),
                PathOp::LineTo(p) => {
                    if let Some(c) = cursor {
                        length += c.distance(p);
                    }
                    cursor = Some(p);
                }
            }
        }
        length
    }

    pub fn trace(&self, surface: &mut dyn Surface) {
        for op in &self.ops {
            match *op {
                PathOp::MoveTo(p) => surface.move_to(p),
                PathOp::LineTo(p) => surface.line_to(p),
            }
        }
    }
}

fn edge_midpoint(radius: f64, k: usize) -> Point {
    canonical_corner(radius, k).midpoint(canonical_corner(radius, k + 1))
}

/// Interior edges toward directions 0, 1 and 2 whose neighbor exists, in
/// the canonical frame around the origin. Directions 3..6 belong to the
/// neighbor on the other side.
pub fn shared_edges(present: [bool; DIRECTIONS], radius: f64) -> Path {
    let mut path = Path::new();
    for direction in 0..DIRECTIONS / 2 {
        if present[direction] {
            path.move_to(canonical_corner(radius, direction));
            path.line_to(canonical_corner(radius, direction + 1));
        }
    }
    path
}

/// Boundary edges (no neighbor) in the canonical frame around the origin.
///
/// Walks the six corners; around corner `i + 1` the half of edge `i`
/// and the half of edge `i + 1` touching it are drawn when missing.
/// `prev` records whether the pen is still down at the last point, in
/// which case the next half edge continues the same subpath.
pub fn merged_border(missing: [bool; DIRECTIONS], radius: f64) -> Path {
    let mut path = Path::new();
    let mut prev = false;

    for i in 0..DIRECTIONS {
        let before = edge_midpoint(radius, i);
        let corner = canonical_corner(radius, i + 1);
        let after = edge_midpoint(radius, i + 1);

        let n1 = missing[i];
        let n2 = missing[(i + 1) % DIRECTIONS];

        match (n1, n2) {
            (true, true) => {
                if !prev {
                    path.move_to(before);
                }
                path.line_to(corner);
                path.line_to(after);
                prev = true;
            }
            (true, false) => {
                if !prev {
                    path.move_to(before);
                }
                path.line_to(corner);
                prev = false;
            }
            (false, true) => {
                if !prev {
                    path.move_to(corner);
                }
                path.line_to(after);
                prev = true;
            }
            (false, false) => prev = false,
        }
    }

    path
}

/// Closed outline of a hex of `radius` around the origin, in page
/// orientation. Starts halfway along the top edge so no cap lands on a
/// corner.
pub fn outline(grid: &HexGrid<'_>, radius: f64) -> Path {
    let v = grid.layout().vertices(radius);
    let start = v[4].midpoint(v[5]);

    let mut path = Path::new();
    path.move_to(start);
    for i in [4, 3, 2, 1, 0, 5] {
        path.line_to(v[i]);
    }
    path.line_to(start);
    path
}

/// Everything stroked for hex (x, y), in page millimeters.
pub fn cell_path(grid: &HexGrid<'_>, x: i32, y: i32) -> Path {
    let config = grid.config();
    let center = grid.center(x, y);

    let local = if config.hex_margin != 0.0 {
        outline(grid, grid.radius() - config.hex_margin / 2.0)
    } else {
        let present = grid.neighbor_exists(x, y);
        let orientation = config.hex_orientation;

        let mut path = shared_edges(present, grid.radius());
        path.extend(merged_border(present.map(|p| !p), grid.radius()));
        path.map(|p| orientation.point_from_canonical(p))
    };

    local.map(|p| p.offset(center.x, center.y))
}
