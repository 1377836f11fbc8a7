use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::render::PageSize;

const HEX_SIZE: f64 = 20.0;
const LINE_WIDTH: f64 = 0.3;
const LINE_COLOR: &str = "#000000";
const MAP_WIDTH: i32 = 10;
const MAP_HEIGHT: i32 = 10;

const COORDS_OFFSET: f64 = 0.5;
const COORDS_FONT: &str = "sans-serif";
const COORDS_SIZE: f64 = 2.5;
const COORDS_COLOR: &str = "#000000";
const COORDS_DELIMITER: &str = ".";
const COORDS_PADDING: &str = "00";

/// Value a numeric override falls back to when it does not parse.
pub const NUMERIC_FALLBACK: f64 = 1.0;

const BUILTIN_PRESETS: &[(&str, &str)] = &[
    ("classic", include_str!("../presets/classic.toml")),
    ("spiral", include_str!("../presets/spiral.toml")),
    ("wargame", include_str!("../presets/wargame.toml")),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    Pointy,
    #[default]
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineDash {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MapShape {
    #[default]
    Square,
    Hexagon,
}

/// Which columns (rows for pointy hexes) are pushed half a hex down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Handedness {
    Odd,
    #[default]
    Even,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageOrientation {
    Portrait,
    #[default]
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoordStyle {
    #[default]
    Xy,
    Index,
}

/// Where row zero sits on square maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    #[default]
    Top,
    Bottom,
}

/// Vertical placement of a label inside its hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelPosition {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// How a coordinate value is spelled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    #[default]
    Number,
    LetterUpperCase,
    LetterLowerCase,
    /// Anything else; encodes to an empty segment.
    #[serde(other)]
    Unknown,
}

/// Compass direction where index numbering starts on each ring of a
/// hexagon map. Snapped to the nearest ring corner for the orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartDirection {
    #[default]
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl StartDirection {
    #[cfg(test)]
    pub const ALL: [StartDirection; 8] = [
        StartDirection::N,
        StartDirection::NE,
        StartDirection::E,
        StartDirection::SE,
        StartDirection::S,
        StartDirection::SW,
        StartDirection::W,
        StartDirection::NW,
    ];

    /// Degrees clockwise from north.
    pub fn angle(self) -> f64 {
        match self {
            StartDirection::N => 0.0,
            StartDirection::NE => 45.0,
            StartDirection::E => 90.0,
            StartDirection::SE => 135.0,
            StartDirection::S => 180.0,
            StartDirection::SW => 225.0,
            StartDirection::W => 270.0,
            StartDirection::NW => 315.0,
        }
    }
}

/// Coordinate label settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordsConfig {
    #[serde(default = "default_true")]
    pub show: bool,
    #[serde(default)]
    pub style: CoordStyle,
    #[serde(default)]
    pub origin: Origin,
    #[serde(default)]
    pub index_start: StartDirection,
    #[serde(default)]
    pub position: LabelPosition,
    #[serde(default = "default_coords_offset")]
    pub offset: f64,

    #[serde(default = "default_coords_font")]
    pub font: String,
    #[serde(default = "default_coords_size")]
    pub size: f64,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default = "default_coords_color")]
    pub color: String,
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub x_type: Encoding,
    #[serde(default)]
    pub x_start: i64,
    #[serde(default = "default_coords_padding")]
    pub x_padding: String,
    #[serde(default = "default_coords_delimiter")]
    pub delimiter: String,
    #[serde(default)]
    pub y_type: Encoding,
    #[serde(default)]
    pub y_start: i64,
    #[serde(default = "default_coords_padding")]
    pub y_padding: String,
}

/// One complete description of a hex sheet. Rebuilt whenever an input
/// changes and passed by reference into every geometry and render call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_hex_size")]
    pub hex_size: f64,
    #[serde(default)]
    pub hex_orientation: Orientation,
    #[serde(default)]
    pub hex_margin: f64,

    #[serde(default = "default_true")]
    pub line_show: bool,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(default)]
    pub line_dash: LineDash,
    #[serde(default = "default_line_color")]
    pub line_color: String,
    #[serde(default = "default_alpha")]
    pub line_alpha: f64,

    #[serde(default)]
    pub map_shape: MapShape,
    #[serde(default)]
    pub map_handedness: Handedness,
    #[serde(default = "default_map_width")]
    pub map_width: i32,
    #[serde(default = "default_map_height")]
    pub map_height: i32,

    #[serde(default)]
    pub page_orientation: PageOrientation,

    #[serde(default)]
    pub coords: CoordsConfig,
}

fn default_true() -> bool {
    true
}
fn default_alpha() -> f64 {
    1.0
}
fn default_hex_size() -> f64 {
    HEX_SIZE
}
fn default_line_width() -> f64 {
    LINE_WIDTH
}
fn default_line_color() -> String {
    LINE_COLOR.to_string()
}
fn default_map_width() -> i32 {
    MAP_WIDTH
}
fn default_map_height() -> i32 {
    MAP_HEIGHT
}
fn default_coords_offset() -> f64 {
    COORDS_OFFSET
}
fn default_coords_font() -> String {
    COORDS_FONT.to_string()
}
fn default_coords_size() -> f64 {
    COORDS_SIZE
}
fn default_coords_color() -> String {
    COORDS_COLOR.to_string()
}
fn default_coords_delimiter() -> String {
    COORDS_DELIMITER.to_string()
}
fn default_coords_padding() -> String {
    COORDS_PADDING.to_string()
}

impl Default for CoordsConfig {
    fn default() -> Self {
        Self {
            show: true,
            style: CoordStyle::default(),
            origin: Origin::default(),
            index_start: StartDirection::default(),
            position: LabelPosition::default(),
            offset: COORDS_OFFSET,
            font: COORDS_FONT.to_string(),
            size: COORDS_SIZE,
            bold: false,
            italic: false,
            color: COORDS_COLOR.to_string(),
            alpha: 1.0,
            prefix: String::new(),
            x_type: Encoding::default(),
            x_start: 0,
            x_padding: COORDS_PADDING.to_string(),
            delimiter: COORDS_DELIMITER.to_string(),
            y_type: Encoding::default(),
            y_start: 0,
            y_padding: COORDS_PADDING.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hex_size: HEX_SIZE,
            hex_orientation: Orientation::default(),
            hex_margin: 0.0,
            line_show: true,
            line_width: LINE_WIDTH,
            line_dash: LineDash::default(),
            line_color: LINE_COLOR.to_string(),
            line_alpha: 1.0,
            map_shape: MapShape::default(),
            map_handedness: Handedness::default(),
            map_width: MAP_WIDTH,
            map_height: MAP_HEIGHT,
            page_orientation: PageOrientation::default(),
            coords: CoordsConfig::default(),
        }
    }
}

impl Config {
    pub fn from_builtin(name: &str) -> Result<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        let content = BUILTIN_PRESETS
            .iter()
            .find(|(n, _)| *n == normalized)
            .map(|(_, c)| *c)
            .ok_or_else(|| {
                Error::Config(format!(
                    "Unknown preset '{}'. Available: {}",
                    name,
                    Self::list_builtins().join(", ")
                ))
            })?;
        Self::from_toml(content)
    }

    pub fn list_builtins() -> Vec<&'static str> {
        BUILTIN_PRESETS.iter().map(|(n, _)| *n).collect()
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a config file, picking the parser from the extension. Files
    /// without a known extension are tried as TOML, then YAML.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("toml") => Self::from_toml(&content),
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("json") => Self::from_json(&content),
            _ => Self::from_toml(&content).or_else(|_| Self::from_yaml(&content)),
        }
    }

    /// Enforce the invariants the geometry core relies on: hexagon maps
    /// have an odd width, equal height and even handedness.
    pub fn normalize(mut self) -> Self {
        if self.map_shape == MapShape::Hexagon {
            if self.map_width % 2 == 0 {
                self.map_width = (self.map_width - 1).max(1);
            }
            self.map_height = self.map_width;
            self.map_handedness = Handedness::Even;
        }
        self
    }

    pub fn page_size(&self) -> PageSize {
        PageSize::a4(self.page_orientation)
    }

    /// Set a single field from its textual form, as a form input would.
    ///
    /// `key` is a field name, with `coords.` (or `coords_`) selecting the
    /// label settings. Numbers that fail to parse fall back to
    /// [`NUMERIC_FALLBACK`]; unknown keys and unknown enum values are
    /// errors.
    pub fn apply_override(&mut self, key: &str, value: &str) -> Result<()> {
        let (section, field) = split_override_key(key);

        let mut root = serde_json::to_value(&*self)?;
        let target = match section {
            Some(section) => root.get_mut(section).and_then(|s| s.get_mut(field)),
            None => root.get_mut(field),
        }
        .ok_or_else(|| Error::Config(format!("Unknown config key '{}'", key)))?;

        *target = override_value(target, key, value);
        *self = serde_json::from_value(root)
            .map_err(|e| Error::Config(format!("Invalid value '{}' for '{}': {}", value, key, e)))?;
        Ok(())
    }
}

fn split_override_key(key: &str) -> (Option<&str>, &str) {
    let key = key.trim();
    if let Some(field) = key.strip_prefix("coords.") {
        (Some("coords"), field)
    } else if let Some(field) = key.strip_prefix("coords_") {
        (Some("coords"), field)
    } else {
        (None, key)
    }
}

fn override_value(current: &Value, key: &str, raw: &str) -> Value {
    match current {
        Value::Number(n) => {
            let parsed = parse_number_or(raw, NUMERIC_FALLBACK);
            if n.is_f64() {
                Value::from(parsed)
            } else {
                Value::from(parsed.trunc() as i64)
            }
        }
        Value::Bool(_) => Value::Bool(matches!(
            raw.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "on" | "yes"
        )),
        _ => {
            tracing::debug!(key, raw, "string override");
            Value::String(raw.to_string())
        }
    }
}

/// Parse a number the way a numeric form input does, falling back to
/// `default` for anything that is not a finite number.
pub fn parse_number_or(raw: &str, default: f64) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            tracing::warn!(raw, default, "unparseable number, using default");
            default
        }
    }
}
