//! Coordinate label text.

use crate::config::{Config, CoordStyle, CoordsConfig, Encoding, MapShape};
use crate::ranking::{Hexagon, snap_start};

/// Spell `value` in bijective base 26: 0 is "A", 25 is "Z", 26 is "AA".
/// Negative values have no spelling and give an empty string.
pub fn letterize(value: i64) -> String {
    if value < 0 {
        return String::new();
    }

    let mut n = value;
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (n % 26) as u8);
        n /= 26;
        if n == 0 {
            break;
        }
        n -= 1;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

pub fn encode(value: i64, encoding: Encoding) -> String {
    match encoding {
        Encoding::Number => value.to_string(),
        Encoding::LetterUpperCase => letterize(value),
        Encoding::LetterLowerCase => letterize(value).to_ascii_lowercase(),
        Encoding::Unknown => String::new(),
    }
}

/// Left-pad `text` to the length of `pad`, filling with `pad` repeated
/// from its start. An empty pad leaves `text` unchanged.
pub fn pad_start(text: &str, pad: &str) -> String {
    let target = pad.chars().count();
    let len = text.chars().count();
    if len >= target {
        return text.to_string();
    }

    let mut padded: String = pad.chars().cycle().take(target - len).collect();
    padded.push_str(text);
    padded
}

/// One label segment: shift by `start`, encode, pad.
pub fn encode_segment(value: i64, start: i64, encoding: Encoding, padding: &str) -> String {
    pad_start(&encode(value + start, encoding), padding)
}

/// Label of an index-style hex: the prefix followed by the index on the
/// x channel.
pub fn index_label(coords: &CoordsConfig, index: i64) -> String {
    format!(
        "{}{}",
        coords.prefix,
        encode_segment(index, coords.x_start, coords.x_type, &coords.x_padding)
    )
}

/// Label of hex (x, y).
///
/// `display_y` is the row as shown, possibly mirrored; `y` is the raw row
/// used for indices. Index labels count row-major on square maps and
/// spiral out ring by ring on hexagon maps `map_width` hexes across.
pub fn compute_label(config: &Config, x: i32, y: i32, display_y: i32, map_width: i32) -> String {
    let coords = &config.coords;
    match (coords.style, config.map_shape) {
        (CoordStyle::Xy, _) => format!(
            "{}{}{}{}",
            coords.prefix,
            encode_segment(i64::from(x), coords.x_start, coords.x_type, &coords.x_padding),
            coords.delimiter,
            encode_segment(
                i64::from(display_y),
                coords.y_start,
                coords.y_type,
                &coords.y_padding
            ),
        ),
        (CoordStyle::Index, MapShape::Square) => {
            let index = i64::from(y) * i64::from(map_width) + i64::from(x);
            index_label(coords, index)
        }
        (CoordStyle::Index, MapShape::Hexagon) => {
            let rotation = snap_start(coords.index_start, config.hex_orientation);
            let ranked = Hexagon::new(map_width, config.hex_orientation)
                .rank_index(x, y)
                .rotated(rotation);
            index_label(coords, i64::from(ranked.index))
        }
    }
}
