//! Printable hex-grid sheets.
//!
//! A [`Config`] describes the map: hex size and orientation, map shape,
//! line style and coordinate labels. [`render`] draws it centered on an
//! A4 page onto any [`Surface`]; the [`export`] module turns that into
//! SVG, PNG or PDF files.

pub mod border;
pub mod config;
pub mod error;
pub mod export;
pub mod geometry;
pub mod grid;
pub mod label;
pub mod ranking;
pub mod render;
pub mod surface;
pub mod svg;

pub use config::Config;
pub use error::{Error, Result};
pub use export::ExportMode;
pub use grid::HexGrid;
pub use label::compute_label;
pub use render::{PageSize, render};
pub use surface::Surface;
