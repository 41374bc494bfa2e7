//! Text to outline conversion.
//!
//! Text is never emitted as SVG `<text>`; every string becomes a filled path so
//! the banner looks the same without the fonts installed on the viewer side.

use crate::error::{Error, Result};
use crate::geometry::{PathCommand, Point, VectorPath};
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::{FontRef, GlyphId, MetadataProvider};
use std::path::{Path, PathBuf};

/// Font weights used by the banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Bold,
    Semibold,
    Medium,
}

/// Produces outline paths for text
pub trait GlyphRenderer: Send + Sync {
    /// Outline of `text` laid out on one line. `origin` is the left-top
    /// anchor: the baseline sits one ascent below `origin.y`.
    fn text_path(&self, text: &str, weight: FontWeight, size: f32, origin: Point) -> VectorPath;
}

/// Locations of the three font files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontPaths {
    pub bold: PathBuf,
    pub semibold: PathBuf,
    pub medium: PathBuf,
}

impl FontPaths {
    /// `bold.ttf`, `semibold.ttf` and `medium.ttf` inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            bold: dir.join("bold.ttf"),
            semibold: dir.join("semibold.ttf"),
            medium: dir.join("medium.ttf"),
        }
    }
}

impl Default for FontPaths {
    fn default() -> Self {
        Self::in_dir("fonts")
    }
}

struct FontData {
    bytes: Vec<u8>,
}

impl FontData {
    fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            Error::InitializationError(format!("Failed to read font {}: {}", path.display(), e))
        })?;
        Self::from_bytes(bytes, &path.display().to_string())
    }

    fn from_bytes(bytes: Vec<u8>, name: &str) -> Result<Self> {
        FontRef::new(&bytes).map_err(|e| {
            Error::InitializationError(format!("Failed to parse font {}: {}", name, e))
        })?;
        Ok(Self { bytes })
    }

    fn font(&self) -> Option<FontRef<'_>> {
        // validated in `from_bytes`
        FontRef::new(&self.bytes).ok()
    }
}

/// The three font weights, loaded once at startup
pub struct FontSet {
    bold: FontData,
    semibold: FontData,
    medium: FontData,
}

impl FontSet {
    pub fn load(paths: &FontPaths) -> Result<Self> {
        let set = Self {
            bold: FontData::load(&paths.bold)?,
            semibold: FontData::load(&paths.semibold)?,
            medium: FontData::load(&paths.medium)?,
        };
        log::debug!("Loaded fonts from {:?}", paths);
        Ok(set)
    }

    pub fn from_bytes(bold: Vec<u8>, semibold: Vec<u8>, medium: Vec<u8>) -> Result<Self> {
        Ok(Self {
            bold: FontData::from_bytes(bold, "bold")?,
            semibold: FontData::from_bytes(semibold, "semibold")?,
            medium: FontData::from_bytes(medium, "medium")?,
        })
    }

    fn data(&self, weight: FontWeight) -> &FontData {
        match weight {
            FontWeight::Bold => &self.bold,
            FontWeight::Semibold => &self.semibold,
            FontWeight::Medium => &self.medium,
        }
    }
}

impl GlyphRenderer for FontSet {
    fn text_path(&self, text: &str, weight: FontWeight, size: f32, origin: Point) -> VectorPath {
        let mut pen = PathPen::default();
        let Some(font) = self.data(weight).font() else {
            return pen.path;
        };

        let size = Size::new(size);
        let location = LocationRef::default();
        let charmap = font.charmap();
        let metrics = font.glyph_metrics(size, location);
        let outlines = font.outline_glyphs();
        let ascent = font.metrics(size, location).ascent;

        pen.y = origin.y + ascent;
        let mut x = origin.x;
        for ch in text.chars() {
            let gid = charmap.map(ch).unwrap_or(GlyphId::NOTDEF);
            pen.x = x;
            if let Some(glyph) = outlines.get(gid) {
                if let Err(e) = glyph.draw(DrawSettings::unhinted(size, location), &mut pen) {
                    log::warn!("Failed to draw glyph for {:?}: {}", ch, e);
                }
            }
            x += metrics.advance_width(gid).unwrap_or(0.0);
        }

        pen.path
    }
}

/// Collects outline callbacks into a `VectorPath`, flipping y to screen space.
#[derive(Default)]
struct PathPen {
    x: f32,
    y: f32,
    path: VectorPath,
}

impl PathPen {
    fn at(&self, x: f32, y: f32) -> Point {
        Point::new(self.x + x, self.y - y)
    }
}

impl OutlinePen for PathPen {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.at(x, y);
        self.path.push(PathCommand::MoveTo(p));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.at(x, y);
        self.path.push(PathCommand::LineTo(p));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        let c = self.at(cx0, cy0);
        let p = self.at(x, y);
        self.path.push(PathCommand::QuadTo(c, p));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let c1 = self.at(cx0, cy0);
        let c2 = self.at(cx1, cy1);
        let p = self.at(x, y);
        self.path.push(PathCommand::CubicTo(c1, c2, p));
    }

    fn close(&mut self) {
        self.path.push(PathCommand::Close);
    }
}
