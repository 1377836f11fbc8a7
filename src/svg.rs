use std::fmt::Write as _;

use tiny_skia::Transform;

use crate::geometry::Point;
use crate::surface::{LineCap, StrokeStyle, Surface, TextAlign, TextBaseline, TextStyle};

/// XML 1.0 valid char ranges:
/// - 0x09, 0x0A, 0x0D
/// - 0x20..=0xD7FF
/// - 0xE000..=0xFFFD
/// - 0x10000..=0x10FFFF
fn is_valid_xml_char(c: char) -> bool {
    matches!(
        c as u32,
        0x09 | 0x0A | 0x0D | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x10000..=0x10FFFF
    )
}

/// Escape text for element content and attribute values, dropping chars
/// XML cannot carry.
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars().filter(|&c| is_valid_xml_char(c)) {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn matrix(t: &Transform) -> String {
    format!(
        "matrix({} {} {} {} {} {})",
        t.sx, t.ky, t.kx, t.sy, t.tx, t.ty
    )
}

/// A [`Surface`] that records drawing as an SVG document in device
/// pixels. Each transform change opens a new `<g>` group.
pub struct SvgSurface {
    width: u32,
    height: u32,
    transform: Transform,
    content: String,
    path: String,
}

impl SvgSurface {
    pub fn new(width: u32, height: u32) -> Self {
        let mut surface = Self {
            width,
            height,
            transform: Transform::identity(),
            content: String::new(),
            path: String::new(),
        };
        surface.open_group();
        surface
    }

    fn open_group(&mut self) {
        let _ = write!(self.content, r#"<g transform="{}">"#, matrix(&self.transform));
    }

    /// Close the document and return its text.
    pub fn finish(mut self) -> String {
        self.content.push_str("</g>");
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">{}</svg>"#,
            self.content,
            w = self.width,
            h = self.height,
        )
    }
}

impl Surface for SvgSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_transform(&mut self, transform: Transform) {
        if transform == self.transform {
            return;
        }
        self.content.push_str("</g>");
        self.transform = transform;
        self.open_group();
    }

    fn clear(&mut self) {
        self.content.clear();
        self.path.clear();
        self.open_group();
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        let _ = write!(
            self.content,
            r#"<rect x="{:.3}" y="{:.3}" width="{:.3}" height="{:.3}" fill="{}" />"#,
            x,
            y,
            width,
            height,
            escape_xml(color),
        );
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, point: Point) {
        let _ = write!(self.path, "M{:.3} {:.3}", point.x, point.y);
    }

    fn line_to(&mut self, point: Point) {
        let _ = write!(self.path, "L{:.3} {:.3}", point.x, point.y);
    }

    fn stroke(&mut self, style: &StrokeStyle) {
        if self.path.is_empty() {
            return;
        }

        let cap = match style.cap {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
        };
        let dash = if style.dash.is_empty() {
            String::new()
        } else {
            let lengths: Vec<String> = style.dash.iter().map(|d| format!("{:.3}", d)).collect();
            format!(r#" stroke-dasharray="{}""#, lengths.join(" "))
        };

        let _ = write!(
            self.content,
            r#"<path d="{}" fill="none" stroke="{}" stroke-opacity="{}" stroke-width="{:.3}" stroke-linecap="{}" stroke-linejoin="miter"{} />"#,
            self.path,
            escape_xml(&style.color),
            style.alpha,
            style.width,
            cap,
            dash,
        );
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        let anchor = match style.align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        };
        let baseline = match style.baseline {
            TextBaseline::Top => "text-before-edge",
            TextBaseline::Middle => "central",
            TextBaseline::Alphabetic => "alphabetic",
        };
        let weight_attr = if style.bold { r#" font-weight="700""# } else { "" };
        let style_attr = if style.italic { r#" font-style="italic""# } else { "" };

        let _ = write!(
            self.content,
            r#"<text x="{:.3}" y="{:.3}" font-family="{}" font-size="{:.3}" text-anchor="{}" dominant-baseline="{}" fill="{}" fill-opacity="{}"{}{}>{}</text>"#,
            at.x,
            at.y,
            escape_xml(&style.font),
            style.size,
            anchor,
            baseline,
            escape_xml(&style.color),
            style.alpha,
            weight_attr,
            style_attr,
            escape_xml(text),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke() -> StrokeStyle {
        StrokeStyle {
            width: 0.5,
            dash: vec![2.0, 1.5],
            cap: LineCap::Round,
            color: "#112233".into(),
            alpha: 0.5,
        }
    }

    #[test]
    fn remove_invalid_control_chars() {
        assert_eq!(escape_xml("A\u{0007}B\u{000C}C"), "ABC");
        assert_eq!(escape_xml("a\tb\nc"), "a\tb\nc");
    }

    #[test]
    fn escape_special_xml_chars() {
        assert_eq!(
            escape_xml(r#"<"Fira" & 'Sans'>"#),
            "&lt;&quot;Fira&quot; &amp; &apos;Sans&apos;&gt;"
        );
    }

    #[test]
    fn document_carries_size_and_balanced_groups() {
        let mut surface = SvgSurface::new(300, 200);
        surface.set_transform(Transform::from_scale(2.0, 2.0));
        surface.set_transform(Transform::from_scale(2.0, 2.0));
        let svg = surface.finish();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 300 200""#));
        assert!(svg.contains("matrix(2 0 0 2 0 0)"));
        assert_eq!(svg.matches("<g ").count(), 2);
        assert_eq!(svg.matches("</g>").count(), 2);
    }

    #[test]
    fn stroke_writes_path_with_style() {
        let mut surface = SvgSurface::new(10, 10);
        surface.begin_path();
        surface.move_to(Point::new(0.0, 0.0));
        surface.line_to(Point::new(1.0, 2.5));
        surface.stroke(&stroke());
        let svg = surface.finish();

        assert!(svg.contains(r#"d="M0.000 0.000L1.000 2.500""#));
        assert!(svg.contains(r#"stroke-dasharray="2.000 1.500""#));
        assert!(svg.contains(r#"stroke-linecap="round""#));
        assert!(svg.contains(r#"stroke-opacity="0.5""#));
    }

    #[test]
    fn empty_path_strokes_nothing() {
        let mut surface = SvgSurface::new(10, 10);
        surface.begin_path();
        surface.stroke(&stroke());
        assert!(!surface.finish().contains("<path"));
    }

    #[test]
    fn clear_drops_earlier_drawing() {
        let mut surface = SvgSurface::new(10, 10);
        surface.fill_rect(0.0, 0.0, 10.0, 10.0, "#ffffff");
        surface.clear();
        assert!(!surface.finish().contains("<rect"));
    }

    #[test]
    fn text_is_escaped_and_styled() {
        let mut surface = SvgSurface::new(10, 10);
        let style = TextStyle {
            font: "\"Fira Sans\"".into(),
            size: 3.0,
            bold: true,
            italic: false,
            align: TextAlign::Center,
            baseline: TextBaseline::Top,
            color: "#000000".into(),
            alpha: 1.0,
        };
        surface.fill_text("A<1>", Point::new(5.0, 5.0), &style);
        let svg = surface.finish();

        assert!(svg.contains("A&lt;1&gt;</text>"));
        assert!(svg.contains(r#"font-family="&quot;Fira Sans&quot;""#));
        assert!(svg.contains(r#"text-anchor="middle""#));
        assert!(svg.contains(r#"dominant-baseline="text-before-edge""#));
        assert!(svg.contains(r#"font-weight="700""#));
        assert!(!svg.contains("font-style"));
    }
}
