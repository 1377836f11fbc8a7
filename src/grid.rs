use crate::config::{Config, Handedness, MapShape, Origin};
use crate::geometry::{DIRECTIONS, HexLayout, Point};
use crate::label::compute_label;
use crate::ranking::{Hexagon, RankIndex, snap_start, total_through};

/// A configured map: which hexes exist, where they sit and what they are
/// called. Nothing is cached; every query is computed from the config.
#[derive(Debug, Clone)]
pub struct HexGrid<'a> {
    config: &'a Config,
    layout: HexLayout,
    width: i32,
    height: i32,
}

impl<'a> HexGrid<'a> {
    pub fn new(config: &'a Config) -> Self {
        let width = effective_width(config);
        let height = match config.map_shape {
            MapShape::Hexagon => width,
            MapShape::Square => config.map_height,
        };
        let handedness = match config.map_shape {
            MapShape::Hexagon => Handedness::Even,
            MapShape::Square => config.map_handedness,
        };

        Self {
            config,
            layout: HexLayout::new(
                config.hex_orientation,
                handedness,
                config.hex_size,
                config.line_width,
            ),
            width,
            height,
        }
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    pub fn layout(&self) -> &HexLayout {
        &self.layout
    }

    pub fn radius(&self) -> f64 {
        self.layout.radius
    }

    pub fn map_width(&self) -> i32 {
        self.width
    }

    pub fn map_height(&self) -> i32 {
        self.height
    }

    pub fn center(&self, x: i32, y: i32) -> Point {
        self.layout.center(x, y)
    }

    fn hexagon(&self) -> Hexagon {
        Hexagon::new(self.width, self.config.hex_orientation)
    }

    pub fn exists(&self, x: i32, y: i32) -> bool {
        match self.config.map_shape {
            MapShape::Hexagon => self.hexagon().contains(x, y),
            MapShape::Square => x >= 0 && x < self.width && y >= 0 && y < self.height,
        }
    }

    /// Whether the neighbor of (x, y) in each direction exists.
    pub fn neighbor_exists(&self, x: i32, y: i32) -> [bool; DIRECTIONS] {
        self.layout
            .neighbors(x, y)
            .map(|(nx, ny)| self.exists(nx, ny))
    }

    /// Rank and ring-rotated index of (x, y) on a hexagon map.
    pub fn rank_index(&self, x: i32, y: i32) -> RankIndex {
        let rotation = snap_start(self.config.coords.index_start, self.config.hex_orientation);
        self.hexagon().rank_index(x, y).rotated(rotation)
    }

    /// Existing hexes in drawing order: columns outer, rows inner.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.width)
            .flat_map(move |x| (0..self.height).map(move |y| (x, y)))
            .filter(|&(x, y)| self.exists(x, y))
    }

    pub fn count(&self) -> usize {
        match self.config.map_shape {
            MapShape::Hexagon if self.width > 0 => {
                total_through(self.hexagon().max_rank()) as usize
            }
            MapShape::Hexagon => 0,
            MapShape::Square => (self.width.max(0) * self.height.max(0)) as usize,
        }
    }

    /// Row number shown in labels: mirrored when square maps count rows
    /// from the bottom edge.
    pub fn display_y(&self, y: i32) -> i32 {
        match (self.config.map_shape, self.config.coords.origin) {
            (MapShape::Square, Origin::Bottom) => self.height - 1 - y,
            _ => y,
        }
    }

    pub fn label(&self, x: i32, y: i32) -> String {
        compute_label(self.config, x, y, self.display_y(y), self.width)
    }
}

fn effective_width(config: &Config) -> i32 {
    match config.map_shape {
        MapShape::Hexagon if config.map_width % 2 == 0 => config.map_width - 1,
        _ => config.map_width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CoordStyle, Encoding, Orientation, StartDirection};

    fn square(width: i32, height: i32) -> Config {
        Config {
            map_width: width,
            map_height: height,
            ..Config::default()
        }
    }

    fn hexagon(width: i32) -> Config {
        Config {
            map_shape: MapShape::Hexagon,
            map_width: width,
            map_height: 1,
            map_handedness: Handedness::Odd,
            ..Config::default()
        }
    }

    #[test]
    fn square_map_existence_is_a_bounds_check() {
        let config = square(4, 3);
        let grid = HexGrid::new(&config);
        for x in -2..6 {
            for y in -2..5 {
                let inside = (0..4).contains(&x) && (0..3).contains(&y);
                assert_eq!(grid.exists(x, y), inside, "({x}, {y})");
            }
        }
        assert_eq!(grid.count(), 12);
    }

    #[test]
    fn small_square_map_has_row_major_index_labels() {
        let mut config = square(3, 2);
        config.coords.style = CoordStyle::Index;
        config.coords.x_padding = String::new();
        let grid = HexGrid::new(&config);

        assert_eq!(grid.count(), 6);
        let mut labels: Vec<(i32, String)> = grid
            .cells()
            .map(|(x, y)| (y * 3 + x, grid.label(x, y)))
            .collect();
        labels.sort();
        let expected: Vec<(i32, String)> = (0..6).map(|i| (i, i.to_string())).collect();
        assert_eq!(labels, expected);
        assert_eq!(grid.label(2, 0), "2");
        assert_eq!(grid.label(0, 1), "3");
    }

    #[test]
    fn hexagon_maps_force_odd_square_dimensions() {
        let config = hexagon(6);
        let grid = HexGrid::new(&config);
        assert_eq!((grid.map_width(), grid.map_height()), (5, 5));
        assert_eq!(grid.layout().handedness, Handedness::Even);
        assert_eq!(grid.count(), 19);
    }

    #[test]
    fn hexagon_of_width_three_labels_its_ring() {
        let mut config = hexagon(3);
        config.coords.style = CoordStyle::Index;
        config.coords.x_padding = String::new();
        let grid = HexGrid::new(&config);

        let mut by_rank = [Vec::new(), Vec::new()];
        for (x, y) in grid.cells() {
            let ri = grid.rank_index(x, y);
            by_rank[ri.rank as usize].push(ri.index);
        }
        by_rank[1].sort();
        assert_eq!(by_rank[0], vec![0]);
        assert_eq!(by_rank[1], vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(grid.label(1, 1), "0");
    }

    #[test]
    fn start_direction_rotates_index_labels() {
        let mut config = hexagon(3);
        config.coords.style = CoordStyle::Index;
        config.coords.x_padding = String::new();
        config.coords.index_start = StartDirection::S;
        let grid = HexGrid::new(&config);

        // South hex now opens the ring, north hex sits opposite it.
        assert_eq!(grid.label(1, 2), "1");
        assert_eq!(grid.label(1, 0), "4");
    }

    #[test]
    fn free_label_function_agrees_with_the_grid() {
        for orientation in [Orientation::Flat, Orientation::Pointy] {
            for start in [StartDirection::N, StartDirection::E, StartDirection::SW] {
                let mut config = hexagon(7);
                config.hex_orientation = orientation;
                config.coords.style = CoordStyle::Index;
                config.coords.index_start = start;
                let grid = HexGrid::new(&config);

                for (x, y) in grid.cells() {
                    assert_eq!(
                        compute_label(&config, x, y, grid.display_y(y), grid.map_width()),
                        grid.label(x, y),
                        "{orientation:?} {start:?} ({x}, {y})"
                    );
                }
            }
        }
    }

    #[test]
    fn bottom_origin_mirrors_rows_on_square_maps_only() {
        let mut config = square(3, 4);
        config.coords.origin = Origin::Bottom;
        config.coords.x_padding = String::new();
        config.coords.y_padding = String::new();
        let grid = HexGrid::new(&config);
        assert_eq!(grid.display_y(0), 3);
        assert_eq!(grid.label(1, 0), "1.3");

        let mut config = hexagon(5);
        config.coords.origin = Origin::Bottom;
        let grid = HexGrid::new(&config);
        assert_eq!(grid.display_y(0), 0);
    }

    #[test]
    fn xy_labels_use_both_channels() {
        let mut config = square(30, 30);
        config.coords.prefix = "H".into();
        config.coords.x_type = Encoding::LetterUpperCase;
        config.coords.x_padding = String::new();
        config.coords.delimiter = "-".into();
        config.coords.y_start = 1;
        let grid = HexGrid::new(&config);
        assert_eq!(grid.label(0, 0), "HA-01");
        assert_eq!(grid.label(27, 8), "HAB-09");
    }

    #[test]
    fn neighbor_existence_matches_the_map_edge() {
        let config = Config {
            hex_orientation: Orientation::Pointy,
            ..square(3, 3)
        };
        let grid = HexGrid::new(&config);
        let center = grid.neighbor_exists(1, 1);
        assert!(center.iter().all(|&e| e));
        let corner = grid.neighbor_exists(0, 0);
        assert!(corner.iter().filter(|&&e| e).count() < 6);
    }
}
