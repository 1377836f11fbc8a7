//! Page export: SVG documents, 300 DPI PNG rasters and PDF pages.
//!
//! Every export renders a derived copy of the config; the caller's
//! config is never touched.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use resvg::usvg;
use tiny_skia::{Pixmap, Transform};

use crate::config::{Config, PageOrientation};
use crate::error::{Error, Result};
use crate::render::{PageSize, render};
use crate::svg::SvgSurface;

pub const EXPORT_DPI: f64 = 300.0;
pub const MM_PER_INCH: f64 = 25.4;

/// Width over height of an A4 sheet in landscape.
pub const A4_ASPECT: f64 = std::f64::consts::SQRT_2;

/// Pixels per inch of SVG user units, as usvg converts `mm` lengths.
const CSS_DPI: f32 = 96.0;

const WHITE: &str = "#ffffff";
const BLACK: &str = "#000000";
const DEFAULT_FILENAME: &str = "hexmap.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExportMode {
    /// Black lines and labels at full opacity on white
    Bw,
    /// Configured colors on a transparent page
    Alpha,
    /// Configured colors on white
    #[default]
    Color,
}

impl ExportMode {
    /// The config to draw in this mode, and the page background.
    pub fn apply(self, config: &Config) -> (Config, Option<&'static str>) {
        let mut derived = config.clone();
        match self {
            ExportMode::Bw => {
                derived.line_color = BLACK.to_string();
                derived.line_alpha = 1.0;
                derived.coords.color = BLACK.to_string();
                derived.coords.alpha = 1.0;
                (derived, Some(WHITE))
            }
            ExportMode::Alpha => (derived, None),
            ExportMode::Color => (derived, Some(WHITE)),
        }
    }
}

/// File format, picked from the output path's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Pdf,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(Error::UnsupportedFormat(ext)),
        }
    }

    /// Pixel size the page is drawn at: the preview pane fit when one is
    /// given, 300 DPI otherwise. PDF pages always hold the 300 DPI raster.
    pub fn render_size(self, config: &Config, preview: Option<(f64, f64)>) -> Result<(u32, u32)> {
        let full = export_size(config.page_size(), EXPORT_DPI);
        match (self, preview) {
            (OutputFormat::Pdf, _) | (_, None) => Ok(full),
            (_, Some((width, height))) => {
                preview_size(width, height, config.page_orientation).ok_or_else(|| {
                    Error::Config(format!("Empty preview pane: {}x{}", width, height))
                })
            }
        }
    }

    /// File contents for `config` drawn at `size` pixels.
    pub fn encode(self, config: &Config, mode: ExportMode, size: (u32, u32)) -> Result<Vec<u8>> {
        match self {
            OutputFormat::Svg => Ok(render_svg(config, mode, size.0, size.1).into_bytes()),
            OutputFormat::Png => svg_to_png(&render_svg(config, mode, size.0, size.1)),
            OutputFormat::Pdf => export_pdf(config),
        }
    }
}

/// Pixel size of `page` rasterized at `dpi`.
pub fn export_size(page: PageSize, dpi: f64) -> (u32, u32) {
    let scale = dpi / MM_PER_INCH;
    (
        (page.width * scale).round() as u32,
        (page.height * scale).round() as u32,
    )
}

/// Largest page that fits in 95% of a `width` x `height` container,
/// floored to whole pixels. `None` while the container has no area.
pub fn preview_size(width: f64, height: f64, orientation: PageOrientation) -> Option<(u32, u32)> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }

    let aspect = match orientation {
        PageOrientation::Portrait => 1.0 / A4_ASPECT,
        PageOrientation::Landscape => A4_ASPECT,
    };
    let available_width = width * 0.95;
    let available_height = height * 0.95;

    let mut page_width = available_width;
    let mut page_height = page_width / aspect;
    if page_height > available_height {
        page_height = available_height;
        page_width = page_height * aspect;
    }

    Some((page_width.floor() as u32, page_height.floor() as u32))
}

/// Render the page as an SVG document of `width` x `height` pixels.
pub fn render_svg(config: &Config, mode: ExportMode, width: u32, height: u32) -> String {
    let (derived, background) = mode.apply(config);
    let mut surface = SvgSurface::new(width, height);
    render(&derived, &mut surface, background, derived.page_size());
    surface.finish()
}

/// SVG document sized for a 300 DPI export.
pub fn export_svg(config: &Config, mode: ExportMode) -> String {
    let (width, height) = export_size(config.page_size(), EXPORT_DPI);
    render_svg(config, mode, width, height)
}

pub fn export_png(config: &Config, mode: ExportMode) -> Result<Vec<u8>> {
    svg_to_png(&export_svg(config, mode))
}

/// Print-ready PDF: an A4 page holding the 300 DPI color raster.
pub fn export_pdf(config: &Config) -> Result<Vec<u8>> {
    let png = export_png(config, ExportMode::Color)?;
    png_to_pdf(&png, config.page_size())
}

pub fn svg_to_png(svg: &str) -> Result<Vec<u8>> {
    let mut opts = usvg::Options::default();
    {
        let fontdb = opts.fontdb_mut();
        fontdb.load_system_fonts();

        let local_fonts = Path::new("fonts");
        if local_fonts.is_dir() {
            fontdb.load_fonts_dir(local_fonts);
        }

        configure_generic_families(fontdb);
    }

    let tree = usvg::Tree::from_str(svg, &opts)
        .map_err(|e| Error::Export(format!("Failed to parse SVG: {}", e)))?;

    let width = tree.size().width().ceil() as u32;
    let height = tree.size().height().ceil() as u32;
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| Error::Export(format!("Failed to create {width}x{height} pixmap")))?;

    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| Error::Export(format!("Failed to encode PNG: {}", e)))
}

/// Place `png` edge to edge on a page of `page` millimeters.
pub fn png_to_pdf(png: &[u8], page: PageSize) -> Result<Vec<u8>> {
    let svg = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" "#,
            r#"width="{w}mm" height="{h}mm" viewBox="0 0 {w} {h}">"#,
            r#"<rect width="{w}" height="{h}" fill="{bg}" />"#,
            r#"<image width="{w}" height="{h}" preserveAspectRatio="xMidYMid meet" "#,
            r#"xlink:href="data:image/png;base64,{data}" />"#,
            "</svg>"
        ),
        w = page.width,
        h = page.height,
        bg = WHITE,
        data = STANDARD.encode(png),
    );

    let opts = svg2pdf::usvg::Options::default();
    let tree = svg2pdf::usvg::Tree::from_str(&svg, &opts)
        .map_err(|e| Error::Export(format!("Failed to parse SVG: {}", e)))?;

    let page_options = svg2pdf::PageOptions {
        dpi: CSS_DPI,
        ..Default::default()
    };
    svg2pdf::to_pdf(&tree, svg2pdf::ConversionOptions::default(), page_options)
        .map_err(|e| Error::Export(format!("Failed to convert SVG to PDF: {}", e)))
}

/// Point the generic CSS families at installed faces so labels set in
/// `sans-serif` and friends do not vanish on sparse systems.
fn configure_generic_families(fontdb: &mut usvg::fontdb::Database) {
    let families: Vec<String> = fontdb
        .faces()
        .flat_map(|face| face.families.iter().map(|(family, _)| family.clone()))
        .collect();
    let Some(first) = families.first() else {
        return;
    };

    let find = |pred: &dyn Fn(&str) -> bool| {
        families
            .iter()
            .find(|family| pred(&family.to_ascii_lowercase()))
            .unwrap_or(first)
            .clone()
    };

    let sans = find(&|f| f.contains("sans"));
    let serif = find(&|f| f.contains("serif") && !f.contains("sans"));
    let mono = find(&|f| f.contains("mono") || f.contains("code"));

    fontdb.set_sans_serif_family(sans);
    fontdb.set_serif_family(serif);
    fontdb.set_monospace_family(mono);
}

/// Output path for `extension`: `raw` with its extension replaced, or
/// the default name when `raw` is blank.
pub fn build_filename(raw: &str, extension: &str) -> PathBuf {
    let raw = raw.trim();
    let raw = if raw.is_empty() { DEFAULT_FILENAME } else { raw };
    Path::new(raw).with_extension(extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::HexGrid;

    #[test]
    fn a4_export_sizes_at_300_dpi() {
        let landscape = PageSize::a4(PageOrientation::Landscape);
        assert_eq!(export_size(landscape, EXPORT_DPI), (3508, 2480));

        let portrait = PageSize::a4(PageOrientation::Portrait);
        assert_eq!(export_size(portrait, EXPORT_DPI), (2480, 3508));
    }

    #[test]
    fn bw_mode_forces_black_and_white() {
        let mut config = Config::default();
        config.line_color = "#ff0000".into();
        config.line_alpha = 0.3;
        config.coords.color = "#00ff00".into();
        config.coords.alpha = 0.2;

        let (derived, background) = ExportMode::Bw.apply(&config);
        assert_eq!(background, Some("#ffffff"));
        assert_eq!(derived.line_color, "#000000");
        assert_eq!(derived.line_alpha, 1.0);
        assert_eq!(derived.coords.color, "#000000");
        assert_eq!(derived.coords.alpha, 1.0);

        // The source config is left alone.
        assert_eq!(config.line_color, "#ff0000");
    }

    #[test]
    fn alpha_and_color_keep_configured_colors() {
        let mut config = Config::default();
        config.line_color = "#123456".into();

        let (derived, background) = ExportMode::Alpha.apply(&config);
        assert_eq!(background, None);
        assert_eq!(derived, config);

        let (derived, background) = ExportMode::Color.apply(&config);
        assert_eq!(background, Some("#ffffff"));
        assert_eq!(derived, config);
    }

    #[test]
    fn preview_fits_the_page_into_the_container() {
        assert_eq!(preview_size(0.0, 500.0, PageOrientation::Landscape), None);

        // Width-limited.
        let (w, h) = preview_size(1000.0, 1000.0, PageOrientation::Landscape).unwrap();
        let available: f64 = 1000.0 * 0.95;
        assert_eq!(w, available.floor() as u32);
        assert_eq!(h, (available / A4_ASPECT).floor() as u32);

        // Height-limited.
        let (w, h) = preview_size(1000.0, 400.0, PageOrientation::Portrait).unwrap();
        let available: f64 = 400.0 * 0.95;
        assert_eq!(h, available.floor() as u32);
        assert_eq!(w, (available / A4_ASPECT).floor() as u32);
        assert!(w < h);
    }

    #[test]
    fn export_svg_has_one_label_per_hex() {
        let config = Config {
            map_width: 4,
            map_height: 3,
            ..Config::default()
        };
        let svg = export_svg(&config, ExportMode::Alpha);

        assert!(svg.contains(r#"width="3508""#));
        assert!(!svg.contains("<rect"));
        assert_eq!(
            svg.matches("<text").count(),
            HexGrid::new(&config).count()
        );
    }

    #[test]
    fn svg_rasterizes_at_its_own_size() {
        let mut surface = SvgSurface::new(40, 30);
        crate::surface::Surface::fill_rect(&mut surface, 0.0, 0.0, 40.0, 30.0, "#ffffff");
        let png = svg_to_png(&surface.finish()).unwrap();

        let pixmap = Pixmap::decode_png(&png).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (40, 30));
        assert_eq!(pixmap.pixel(5, 5).unwrap().alpha(), 255);
    }

    #[test]
    fn pdf_wraps_the_raster() {
        let pixmap = Pixmap::new(4, 3).unwrap();
        let png = pixmap.encode_png().unwrap();
        let pdf = png_to_pdf(&png, PageSize::a4(PageOrientation::Landscape)).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn output_format_follows_the_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("a.SVG")).unwrap(), OutputFormat::Svg);
        assert_eq!(OutputFormat::from_path(Path::new("a.png")).unwrap(), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("a.pdf")).unwrap(), OutputFormat::Pdf);
        assert!(matches!(
            OutputFormat::from_path(Path::new("a.jpg")),
            Err(Error::UnsupportedFormat(ext)) if ext == "jpg"
        ));
        assert!(OutputFormat::from_path(Path::new("a")).is_err());
    }

    #[test]
    fn pdf_ignores_the_preview_pane() {
        let config = Config::default();
        let pane = Some((800.0, 600.0));

        assert_eq!(OutputFormat::Pdf.render_size(&config, pane).unwrap(), (3508, 2480));
        assert_eq!(OutputFormat::Png.render_size(&config, None).unwrap(), (3508, 2480));

        let preview = OutputFormat::Svg.render_size(&config, pane).unwrap();
        assert_eq!(Some(preview), preview_size(800.0, 600.0, config.page_orientation));
        assert!(OutputFormat::Png.render_size(&config, Some((0.0, 10.0))).is_err());
    }

    #[test]
    fn svg_output_is_drawn_at_the_requested_size() {
        let config = Config::default();
        let bytes = OutputFormat::Svg.encode(&config, ExportMode::Bw, (320, 226)).unwrap();
        let svg = String::from_utf8(bytes).unwrap();
        assert!(svg.contains(r#"viewBox="0 0 320 226""#));
    }

    #[test]
    fn filenames_swap_extension() {
        assert_eq!(build_filename("", "pdf"), PathBuf::from("hexmap.pdf"));
        assert_eq!(build_filename("  map.png ", "svg"), PathBuf::from("map.svg"));
        assert_eq!(build_filename("out/sheet", "png"), PathBuf::from("out/sheet.png"));
    }
}
