//! Hex geometry in millimeters.
//!
//! Every calculation happens in a canonical flat-top frame. Pointy hexes
//! are the same grid transposed, so [`Orientation::to_canonical`] and
//! [`Orientation::from_canonical`] are applied once on the way in and
//! once on the way out.

use crate::config::{Handedness, Orientation};

/// cos(60°)
pub const HEX_X: f64 = 0.5;
/// sin(60°)
pub const HEX_Y: f64 = 0.866_025_403_784_438_6;

/// Number of neighbor directions around a hex.
pub const DIRECTIONS: usize = 6;

/// Fraction of a column step reserved before the first column.
const MARGIN_X: f64 = 0.75;
/// Fraction of a row step reserved above the first row.
const MARGIN_Y: f64 = 0.57;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn transpose(self) -> Self {
        Self::new(self.y, self.x)
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Orientation {
    /// Map a pair from this orientation's frame into the flat-top frame.
    pub fn to_canonical<T>(self, (a, b): (T, T)) -> (T, T) {
        match self {
            Orientation::Flat => (a, b),
            Orientation::Pointy => (b, a),
        }
    }

    /// Inverse of [`Orientation::to_canonical`].
    pub fn from_canonical<T>(self, pair: (T, T)) -> (T, T) {
        // A transpose is its own inverse.
        self.to_canonical(pair)
    }

    pub fn point_from_canonical(self, point: Point) -> Point {
        match self {
            Orientation::Flat => point,
            Orientation::Pointy => point.transpose(),
        }
    }
}

/// Circumradius of a hex whose flat-to-flat width is `size`.
pub fn radius(size: f64) -> f64 {
    0.5 * size / HEX_Y
}

/// The six corners of a hex around the origin, 60° apart starting on the
/// horizontal axis, turned 90° for pointy hexes.
pub fn hex_vertices(radius: f64, orientation: Orientation) -> [Point; 6] {
    std::array::from_fn(|i| {
        let angle = (i as f64 * 60.0).to_radians();
        let (x, y) = (radius * angle.cos(), radius * angle.sin());
        match orientation {
            Orientation::Flat => Point::new(x, y),
            Orientation::Pointy => Point::new(-y, x),
        }
    })
}

/// Corner `k` of a flat-top hex in the canonical frame, walking
/// counter-clockwise on screen from the east corner. Edge `k` runs from
/// corner `k` to corner `k + 1` and faces neighbor direction `k`.
pub fn canonical_corner(radius: f64, k: usize) -> Point {
    let hx = HEX_X * radius;
    let hy = HEX_Y * radius;
    match k % DIRECTIONS {
        0 => Point::new(radius, 0.0),
        1 => Point::new(hx, -hy),
        2 => Point::new(-hx, -hy),
        3 => Point::new(-radius, 0.0),
        4 => Point::new(-hx, hy),
        _ => Point::new(hx, hy),
    }
}

/// Placement of an offset-coordinate grid on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexLayout {
    pub orientation: Orientation,
    pub handedness: Handedness,
    pub radius: f64,
    pub line_width: f64,
}

impl HexLayout {
    pub fn new(
        orientation: Orientation,
        handedness: Handedness,
        size: f64,
        line_width: f64,
    ) -> Self {
        Self {
            orientation,
            handedness,
            radius: radius(size),
            line_width,
        }
    }

    /// Distance between neighboring columns in the canonical frame.
    pub fn column_step(&self) -> f64 {
        HEX_X * self.radius * 3.0
    }

    /// Distance between neighboring rows in the canonical frame.
    pub fn row_step(&self) -> f64 {
        HEX_Y * self.radius * 2.0
    }

    /// Center of hex (x, y), offset so the top-left hex and its stroke
    /// stay on the page.
    pub fn center(&self, x: i32, y: i32) -> Point {
        let (mut px, py) = self.orientation.to_canonical((x, y));

        let cx = f64::from(px) * self.column_step();
        if self.handedness == Handedness::Odd {
            px += 1;
        }
        let cy = (f64::from(py) + 0.5 * f64::from(px.rem_euclid(2))) * self.row_step();

        let cx = cx + MARGIN_X * self.column_step() + self.line_width / 2.0;
        let cy = cy + MARGIN_Y * self.row_step() + self.line_width / 2.0;

        self.orientation.point_from_canonical(Point::new(cx, cy))
    }

    /// Offset coordinates of the neighbor in `direction` (0..6).
    ///
    /// Directions run counter-clockwise on screen from the upper-right
    /// edge of a flat-top hex; pointy hexes use the transposed layout.
    pub fn neighbor(&self, x: i32, y: i32, direction: usize) -> (i32, i32) {
        let (px, py) = self.orientation.to_canonical((x, y));

        let mut raised = px.rem_euclid(2) == 0;
        if self.handedness == Handedness::Odd {
            raised = !raised;
        }

        let result = match direction % DIRECTIONS {
            0 => (px + 1, if raised { py - 1 } else { py }),
            1 => (px, py - 1),
            2 => (px - 1, if raised { py - 1 } else { py }),
            3 => (px - 1, if raised { py } else { py + 1 }),
            4 => (px, py + 1),
            _ => (px + 1, if raised { py } else { py + 1 }),
        };

        self.orientation.from_canonical(result)
    }

    pub fn neighbors(&self, x: i32, y: i32) -> [(i32, i32); DIRECTIONS] {
        std::array::from_fn(|direction| self.neighbor(x, y, direction))
    }

    pub fn vertices(&self, radius: f64) -> [Point; 6] {
        hex_vertices(radius, self.orientation)
    }
}
