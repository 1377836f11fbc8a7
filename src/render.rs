use tiny_skia::Transform;

use crate::border::cell_path;
use crate::config::{Config, LabelPosition, LineDash, Orientation, PageOrientation};
use crate::geometry::{HEX_X, HEX_Y};
use crate::grid::HexGrid;
use crate::surface::{LineCap, StrokeStyle, Surface, TextAlign, TextBaseline, TextStyle};

/// A4 in portrait orientation.
pub const A4_MM: PageSize = PageSize {
    width: 210.0,
    height: 297.0,
};

const GENERIC_FAMILIES: &[&str] = &["serif", "sans-serif", "monospace"];

/// Page dimensions in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    pub fn a4(orientation: PageOrientation) -> Self {
        match orientation {
            PageOrientation::Portrait => A4_MM,
            PageOrientation::Landscape => PageSize {
                width: A4_MM.height,
                height: A4_MM.width,
            },
        }
    }
}

/// Width and height of the drawn grid in millimeters, strokes included.
pub fn grid_size_mm(grid: &HexGrid<'_>) -> (f64, f64) {
    let radius = grid.radius();
    let line_width = grid.config().line_width;

    let wide = |u: i32| radius * (f64::from(u) + 0.5) * HEX_X * 3.0 + line_width;
    let tall = |u: i32| radius * (f64::from(u) + 0.65) * HEX_Y * 2.0 + line_width;

    match grid.config().hex_orientation {
        Orientation::Flat => (wide(grid.map_width()), tall(grid.map_height())),
        Orientation::Pointy => (tall(grid.map_width()), wide(grid.map_height())),
    }
}

pub fn line_dash(config: &Config) -> Vec<f64> {
    let width = config.line_width;
    match config.line_dash {
        LineDash::Solid => Vec::new(),
        LineDash::Dashed => vec![(width * 4.0).max(2.0), (width * 3.0).max(1.5)],
        LineDash::Dotted => vec![(width * 1.2).max(0.4), (width * 3.0).max(1.2)],
    }
}

pub fn stroke_style(config: &Config) -> StrokeStyle {
    StrokeStyle {
        width: config.line_width,
        dash: line_dash(config),
        cap: match config.line_dash {
            LineDash::Dotted => LineCap::Round,
            _ => LineCap::Butt,
        },
        color: config.line_color.clone(),
        alpha: config.line_alpha,
    }
}

/// CSS family for the label font; named families are quoted.
pub fn font_family(font: &str) -> String {
    if GENERIC_FAMILIES.contains(&font) {
        font.to_string()
    } else {
        format!("\"{}\"", font)
    }
}

/// Label style and its vertical offset from the hex center.
pub fn text_style(grid: &HexGrid<'_>) -> (TextStyle, f64) {
    let config = grid.config();
    let coords = &config.coords;

    // Just inside the top edge, clear of the stroke and any margin.
    let base = -grid.radius() * HEX_Y
        + config.hex_margin / 2.0
        + config.line_width / 2.0
        + coords.offset;

    let (baseline, y) = match coords.position {
        LabelPosition::Top => (TextBaseline::Top, base),
        LabelPosition::Middle => (TextBaseline::Middle, 0.0),
        LabelPosition::Bottom => (TextBaseline::Alphabetic, -base),
    };

    let style = TextStyle {
        font: font_family(&coords.font),
        size: coords.size,
        bold: coords.bold,
        italic: coords.italic,
        align: TextAlign::Center,
        baseline,
        color: coords.color.clone(),
        alpha: coords.alpha,
    };
    (style, y)
}

/// Draw the configured sheet onto `surface`.
///
/// The grid is centered on a page of `page` millimeters, and the page is
/// scaled to the surface width. `background` fills the whole surface
/// first; `None` leaves it transparent.
pub fn render(
    config: &Config,
    surface: &mut dyn Surface,
    background: Option<&str>,
    page: PageSize,
) {
    let grid = HexGrid::new(config);
    let (grid_width, grid_height) = grid_size_mm(&grid);

    let offset_x = (page.width - grid_width) / 2.0;
    let offset_y = (page.height - grid_height) / 2.0;

    let (width, height) = surface.size();
    let px_per_mm = f64::from(width) / page.width;

    surface.set_transform(Transform::identity());
    surface.clear();

    if let Some(color) = background {
        surface.fill_rect(0.0, 0.0, f64::from(width), f64::from(height), color);
    }

    let scale = px_per_mm as f32;
    surface.set_transform(
        Transform::from_scale(scale, scale).pre_translate(offset_x as f32, offset_y as f32),
    );

    if config.line_show && config.line_width > 0.0 {
        draw_lines(&grid, surface);
    }

    if config.coords.show {
        draw_coordinates(&grid, surface);
    }

    tracing::debug!(
        width,
        height,
        px_per_mm,
        grid_width,
        grid_height,
        "rendered hex sheet"
    );
}

fn draw_lines(grid: &HexGrid<'_>, surface: &mut dyn Surface) {
    let style = stroke_style(grid.config());

    for (x, y) in grid.cells() {
        let path = cell_path(grid, x, y);
        if path.is_empty() {
            continue;
        }
        surface.begin_path();
        path.trace(surface);
        surface.stroke(&style);
    }
}

fn draw_coordinates(grid: &HexGrid<'_>, surface: &mut dyn Surface) {
    let (style, text_y) = text_style(grid);

    for (x, y) in grid.cells() {
        let center = grid.center(x, y);
        surface.fill_text(&grid.label(x, y), center.offset(0.0, text_y), &style);
    }
}
